//! Core data types for scan jobs, findings, and auth state.
//!
//! This module contains the fundamental types used throughout surascan:
//!
//! - [`ScanRequest`] - Parameters for creating a scan job
//! - [`ScanRecord`] - A scan job as reported by the server
//! - [`JobStatus`] - Server-side lifecycle state of a job
//! - [`Vulnerability`] - A single finding
//! - [`Severity`] - Finding severity with lenient parsing
//!
//! # Example
//!
//! ```
//! use surascan::model::{ScanRequest, ScanType};
//!
//! let request = ScanRequest::new("https://example.com", ScanType::Website)
//!     .with_name("Nightly scan");
//!
//! assert_eq!(request.scan_type.as_str(), "website");
//! ```

mod scan;
mod vulnerability;

pub use scan::*;
pub use vulnerability::*;
