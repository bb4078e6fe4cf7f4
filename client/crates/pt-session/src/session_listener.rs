use pt_core::User;

/// Front-end hook for session events.
pub trait SessionListener: Send + Sync {
    /// The session could not be refreshed and has been cleared; the user has
    /// to log in again. Called at most once per session.
    fn session_expired(&self, user: Option<&User>);
}
