//! Server session.

use std::sync::{Arc, PoisonError, RwLock};

use nxc_core::config::Settings;

use crate::error::{ClientError, ClientResult};
use crate::transport::{HttpRequest, HttpTransport, RawResponse, Transport};

/// Connection to one server as one user.
///
/// The transport sits behind a lock so that closing the session is seen by
/// every requester sharing it; calls made after [`Session::close`] fail
/// with `ClientError::SessionClosed`.
#[derive(Debug)]
pub struct Session {
    base_url: String,
    user: String,
    transport: Arc<dyn Transport>,
    active: RwLock<Option<Arc<dyn Transport>>>,
}

impl Session {
    /// Opens a session over `transport`.
    #[must_use]
    pub fn new(base_url: &str, user: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            user: user.into(),
            active: RwLock::new(Some(Arc::clone(&transport))),
            transport,
        }
    }

    /// Opens a session with an [`HttpTransport`] built from `settings`.
    ///
    /// ## Errors
    /// Returns `ClientError::InvalidArgument` when no user is configured and
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        let user = settings
            .auth
            .user
            .clone()
            .ok_or_else(|| ClientError::InvalidArgument("auth.user is not set".to_owned()))?;
        let transport = HttpTransport::new(&settings.auth, &settings.client)?;
        Ok(Self::new(settings.server.base_url(), user, Arc::new(transport)))
    }

    /// Server URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Name of the authenticated user.
    #[must_use]
    pub fn current_user(&self) -> &str {
        &self.user
    }

    /// Returns whether requests can be sent.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Re-attaches the transport after [`Session::close`].
    pub fn open(&self) {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        *active = Some(Arc::clone(&self.transport));
        tracing::debug!(user = %self.user, "Session opened");
    }

    /// Detaches the transport. Returns whether the session was open.
    pub fn close(&self) -> bool {
        let mut active = self.active.write().unwrap_or_else(PoisonError::into_inner);
        let was_open = active.take().is_some();
        tracing::debug!(user = %self.user, was_open, "Session closed");
        was_open
    }

    /// Sends `request` over the active transport.
    ///
    /// ## Errors
    /// Returns `ClientError::SessionClosed` after [`Session::close`], or the
    /// transport's error.
    pub fn execute(&self, request: HttpRequest) -> ClientResult<RawResponse> {
        let transport = self
            .active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(ClientError::SessionClosed)?;
        transport.execute(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Echo;

    impl Transport for Echo {
        fn execute(&self, request: HttpRequest) -> ClientResult<RawResponse> {
            Ok(RawResponse {
                method: request.method,
                url: request.url,
                status: 200,
                headers: Vec::new(),
                body: Vec::new(),
            })
        }
    }

    #[test]
    fn trims_base_url() {
        let session = Session::new("https://cloud.example.com//", "alice", Arc::new(Echo));
        assert_eq!(session.base_url(), "https://cloud.example.com");
        assert_eq!(session.current_user(), "alice");
    }

    #[test]
    fn closed_session_refuses_requests() {
        let session = Session::new("https://cloud.example.com", "alice", Arc::new(Echo));
        assert!(session.execute(HttpRequest::new("GET", "https://cloud.example.com")).is_ok());

        assert!(session.close());
        assert!(!session.close());
        assert!(!session.is_open());
        let err = session
            .execute(HttpRequest::new("GET", "https://cloud.example.com"))
            .unwrap_err();
        assert!(matches!(err, ClientError::SessionClosed));

        session.open();
        assert!(session.is_open());
    }
}
