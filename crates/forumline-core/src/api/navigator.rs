//! Login redirect hook invoked when the backend rejects the credential.

use tracing::info;

/// Sends the user to the login entry point.
///
/// Called after the stored credential has been cleared and before the 401
/// error is returned to the caller. Concurrent calls that all fail with 401
/// each invoke it, so implementations must tolerate repeated calls.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self, login_path: &str);
}

/// Navigator for hosts with nowhere to send the user (tests, batch jobs).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn redirect_to_login(&self, login_path: &str) {
        info!(login_path, "Session rejected, no navigator installed");
    }
}

impl<F> Navigator for F
where
    F: Fn(&str) + Send + Sync,
{
    fn redirect_to_login(&self, login_path: &str) {
        self(login_path)
    }
}
