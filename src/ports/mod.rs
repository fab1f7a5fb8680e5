pub mod management_session;

pub use management_session::{ManagementSession, SessionError, SessionResult};
