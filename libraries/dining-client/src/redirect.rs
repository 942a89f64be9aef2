//! Navigation back to the login view.

use tracing::warn;

/// Sends the user back to the login view.
///
/// The gateway calls this exactly once per authentication failure, after
/// the session has been cleared.
pub trait LoginRedirect: Send + Sync {
    /// Navigate to the login view
    fn redirect_to_login(&self);
}

/// Redirect for headless front ends: logs that a new login is needed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self) {
        warn!("Session is no longer valid, sign in again");
    }
}
