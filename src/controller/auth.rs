//! Session mirroring and login/signup/logout flows.
//!
//! The server owns the session; [`AuthController`] mirrors it into a
//! [`NavState`] with a single status check, and updates it optimistically
//! after a successful login or logout. An offline variant reproduces the
//! same flow against the local [`SessionStore`] without any network,
//! selected explicitly by the `offline_auth` config flag.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::time::sleep;
use tracing::error;

use crate::api::{ApiError, AuthService};
use crate::notify::{Notifier, NoticeLevel};
use crate::session::SessionStore;

/// Fixed pause before handing out the post-auth destination.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1000);

/// What the navigation should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavState {
    Guest,
    Authenticated { email: String },
}

impl NavState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, NavState::Authenticated { .. })
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            NavState::Authenticated { email } => Some(email),
            NavState::Guest => None,
        }
    }
}

/// Where to continue after a successful auth action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub destination: &'static str,
}

pub struct AuthController {
    service: Arc<dyn AuthService>,
    notifier: Arc<dyn Notifier>,
    sessions: SessionStore,
    offline: bool,
    nav: NavState,
}

impl AuthController {
    pub fn new(
        service: Arc<dyn AuthService>,
        notifier: Arc<dyn Notifier>,
        sessions: SessionStore,
        offline: bool,
    ) -> Self {
        Self {
            service,
            notifier,
            sessions,
            offline,
            nav: NavState::Guest,
        }
    }

    pub fn nav(&self) -> &NavState {
        &self.nav
    }

    /// Mirrors the server session into the nav state, once.
    ///
    /// Anything other than a positive answer with a user (absent user,
    /// rejection, transport failure) shows the guest variant. No retry.
    pub async fn check_status(&mut self) -> &NavState {
        if self.offline {
            self.nav = match self.sessions.load() {
                Some(session) => NavState::Authenticated {
                    email: session.email,
                },
                None => NavState::Guest,
            };
            return &self.nav;
        }

        self.nav = match self.service.current_user().await {
            Ok(Some(user)) => NavState::Authenticated { email: user.email },
            Ok(None) => NavState::Guest,
            Err(e) => {
                error!("session check failed: {e}");
                NavState::Guest
            }
        };
        &self.nav
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Redirect> {
        self.validate(email, password)?;
        if self.offline {
            return self.offline_login(email).await;
        }

        match self.service.login(email, password).await {
            Ok(()) => {
                self.notifier
                    .notice(NoticeLevel::Success, "Login successful!");
                self.signed_in(email).await
            }
            Err(e) => Err(self.auth_failed(e, "login")),
        }
    }

    pub async fn signup(&mut self, email: &str, password: &str) -> Result<Redirect> {
        self.validate(email, password)?;
        if self.offline {
            return self.offline_login(email).await;
        }

        match self.service.signup(email, password).await {
            Ok(()) => {
                self.notifier
                    .notice(NoticeLevel::Success, "Account created successfully!");
                self.signed_in(email).await
            }
            Err(e) => Err(self.auth_failed(e, "signup")),
        }
    }

    pub async fn logout(&mut self) -> Result<Redirect> {
        if self.offline {
            self.sessions.clear()?;
            self.notifier
                .notice(NoticeLevel::Success, "Demo logout successful!");
            return self.signed_out().await;
        }

        match self.service.logout().await {
            Ok(()) => {
                self.notifier
                    .notice(NoticeLevel::Success, "Logged out successfully!");
                self.signed_out().await
            }
            Err(e) => Err(self.auth_failed(e, "logout")),
        }
    }

    fn validate(&self, email: &str, password: &str) -> Result<()> {
        if email.is_empty() || password.is_empty() {
            self.notifier
                .notice(NoticeLevel::Error, "Please fill in all fields");
            bail!("email and password are required");
        }
        Ok(())
    }

    async fn offline_login(&mut self, email: &str) -> Result<Redirect> {
        self.sessions.save(email)?;
        self.notifier
            .notice(NoticeLevel::Success, "Demo login successful!");
        self.signed_in(email).await
    }

    async fn signed_in(&mut self, email: &str) -> Result<Redirect> {
        self.nav = NavState::Authenticated {
            email: email.to_string(),
        };
        sleep(REDIRECT_DELAY).await;
        Ok(Redirect {
            destination: "/dashboard",
        })
    }

    async fn signed_out(&mut self) -> Result<Redirect> {
        self.nav = NavState::Guest;
        sleep(REDIRECT_DELAY).await;
        Ok(Redirect { destination: "/" })
    }

    /// Surfaces an auth failure and leaves the nav state unchanged.
    fn auth_failed(&self, err: ApiError, action: &str) -> anyhow::Error {
        let message = err.user_message(&format!(
            "An error occurred during {}. Please try again.",
            action
        ));
        self.notifier.notice(NoticeLevel::Error, &message);
        error!("{action} failed: {err}");
        anyhow::anyhow!(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AuthUser;
    use crate::notify::RecordingNotifier;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;

    #[derive(Default)]
    struct FakeAuth {
        user: Mutex<Option<AuthUser>>,
        me_fails: Mutex<bool>,
        login_error: Mutex<Option<String>>,
        logout_error: Mutex<Option<String>>,
        calls: AtomicUsize,
    }

    fn server_err(detail: &str) -> ApiError {
        ApiError::Server {
            status: reqwest::StatusCode::UNAUTHORIZED,
            detail: detail.to_string(),
        }
    }

    #[async_trait]
    impl AuthService for FakeAuth {
        async fn current_user(&self) -> Result<Option<AuthUser>, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if *self.me_fails.lock().unwrap() {
                return Err(server_err("session expired"));
            }
            Ok(self.user.lock().unwrap().clone())
        }

        async fn login(&self, _email: &str, _password: &str) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.login_error.lock().unwrap().clone() {
                Some(detail) => Err(server_err(&detail)),
                None => Ok(()),
            }
        }

        async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
            self.login(email, password).await
        }

        async fn logout(&self) -> Result<(), ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.logout_error.lock().unwrap().clone() {
                Some(detail) => Err(server_err(&detail)),
                None => Ok(()),
            }
        }
    }

    fn online_controller(
        service: &Arc<FakeAuth>,
        notifier: &Arc<RecordingNotifier>,
        dir: &tempfile::TempDir,
    ) -> AuthController {
        AuthController::new(
            service.clone(),
            notifier.clone(),
            SessionStore::with_dir(dir.path()),
            false,
        )
    }

    #[tokio::test]
    async fn test_check_status_mirrors_server_session() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        assert_eq!(*controller.check_status().await, NavState::Guest);

        *service.user.lock().unwrap() = Some(AuthUser {
            email: "founder@startup.test".to_string(),
        });
        let nav = controller.check_status().await;
        assert_eq!(nav.email(), Some("founder@startup.test"));
    }

    #[tokio::test]
    async fn test_check_status_failure_shows_guest() {
        let service = Arc::new(FakeAuth::default());
        *service.me_fails.lock().unwrap() = true;
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        assert_eq!(*controller.check_status().await, NavState::Guest);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_success_redirects_after_fixed_delay() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        let start = Instant::now();
        let redirect = controller.login("a@b.test", "hunter2").await.unwrap();

        assert_eq!(redirect.destination, "/dashboard");
        assert_eq!(Instant::now() - start, REDIRECT_DELAY);
        assert!(controller.nav().is_authenticated());
        assert!(notifier.has_notice(NoticeLevel::Success, "Login successful!"));
    }

    #[tokio::test]
    async fn test_login_failure_keeps_nav_and_surfaces_detail() {
        let service = Arc::new(FakeAuth::default());
        *service.login_error.lock().unwrap() = Some("Invalid credentials".to_string());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        let result = controller.login("a@b.test", "wrong").await;

        assert!(result.is_err());
        assert!(notifier.has_notice(NoticeLevel::Error, "Invalid credentials"));
        assert_eq!(*controller.nav(), NavState::Guest);
    }

    #[tokio::test]
    async fn test_empty_fields_send_no_request() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        assert!(controller.login("", "pw").await.is_err());
        assert!(controller.login("a@b.test", "").await.is_err());

        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.has_notice(NoticeLevel::Error, "Please fill in all fields"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_signup_success_notice() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        let redirect = controller.signup("new@b.test", "pw").await.unwrap();

        assert_eq!(redirect.destination, "/dashboard");
        assert!(notifier.has_notice(NoticeLevel::Success, "Account created successfully!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_logout_returns_home() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let mut controller = online_controller(&service, &notifier, &dir);

        controller.login("a@b.test", "pw").await.unwrap();
        let redirect = controller.logout().await.unwrap();

        assert_eq!(redirect.destination, "/");
        assert_eq!(*controller.nav(), NavState::Guest);
        assert!(notifier.has_notice(NoticeLevel::Success, "Logged out successfully!"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_login_persists_without_network() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());
        let mut controller =
            AuthController::new(service.clone(), notifier.clone(), store, true);

        let redirect = controller.login("demo@b.test", "pw").await.unwrap();

        assert_eq!(redirect.destination, "/dashboard");
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
        assert!(notifier.has_notice(NoticeLevel::Success, "Demo login successful!"));
        assert_eq!(
            SessionStore::with_dir(dir.path()).load().map(|s| s.email),
            Some("demo@b.test".to_string())
        );
    }

    #[tokio::test]
    async fn test_offline_status_reads_the_store() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        SessionStore::with_dir(dir.path())
            .save("demo@b.test")
            .unwrap();

        let mut controller = AuthController::new(
            service.clone(),
            notifier.clone(),
            SessionStore::with_dir(dir.path()),
            true,
        );

        let nav = controller.check_status().await;
        assert_eq!(nav.email(), Some("demo@b.test"));
        assert_eq!(service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_logout_clears_the_store() {
        let service = Arc::new(FakeAuth::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store.save("demo@b.test").unwrap();

        let mut controller =
            AuthController::new(service.clone(), notifier.clone(), store, true);

        let redirect = controller.logout().await.unwrap();

        assert_eq!(redirect.destination, "/");
        assert!(SessionStore::with_dir(dir.path()).load().is_none());
        assert!(notifier.has_notice(NoticeLevel::Success, "Demo logout successful!"));
    }
}
