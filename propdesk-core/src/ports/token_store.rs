//! Session storage port

use crate::domain::result::Result;
use crate::domain::Session;

/// Where the admin session lives between requests.
///
/// The HTTP adapter calls [`TokenStore::token`] on every request instead of
/// caching the token, so a login or logout in another process is observed by
/// the next request.
pub trait TokenStore: Send + Sync {
    /// Current session, if logged in
    fn session(&self) -> Result<Option<Session>>;

    /// Persist a new session (login, token refresh)
    fn save(&self, session: &Session) -> Result<()>;

    /// Forget the session (logout)
    fn clear(&self) -> Result<()>;

    /// Access token of the current session.
    ///
    /// Unreadable storage counts as logged out.
    fn token(&self) -> Option<String> {
        self.session()
            .ok()
            .flatten()
            .map(|s| s.access_token)
            .filter(|t| !t.is_empty())
    }
}
