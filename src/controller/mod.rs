//! Controllers driving the two client flows.
//!
//! [`ScanController`] owns the submit-and-poll lifecycle of a scan job;
//! [`AuthController`] mirrors and updates the login session. Each holds
//! its own state and talks to the server only through the service traits
//! in [`crate::api`], so both can be exercised against in-memory fakes.

mod auth;
mod scan;

pub use auth::{AuthController, NavState, Redirect, REDIRECT_DELAY};
pub use scan::{
    ScanController, ScanOutcome, ScanPhase, DEFAULT_POLL_INTERVAL, DEFAULT_POLL_TIMEOUT,
};
