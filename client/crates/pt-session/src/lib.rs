//! Session ownership for the paytrack client: the cached login, the
//! proactive token refresh timer, and the hooks a front end plugs in.

pub mod clock;
pub mod error;
pub mod file_session_store;
pub mod memory_session_store;
pub mod refresh_state;
pub mod session_listener;
pub mod session_manager;
pub mod session_refresher;
pub mod session_settings;
pub mod session_store;
pub mod ticker;

#[cfg(test)]
mod tests;

pub use clock::{Clock, TokioClock};
pub use error::{Result as SessionResult, SessionError};
pub use file_session_store::FileSessionStore;
pub use memory_session_store::MemorySessionStore;
pub use refresh_state::{RefreshState, RefreshTrigger};
pub use session_listener::SessionListener;
pub use session_manager::SessionManager;
pub use session_refresher::SessionRefresher;
pub use session_settings::SessionSettings;
pub use session_store::{SessionStore, StoredSession};
pub use ticker::RelativeTimeTicker;
