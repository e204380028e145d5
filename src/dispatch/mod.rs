//! Dispatch session: the state the operator shell drives

pub mod log;
pub mod session;

pub use log::{EventLog, LogCategory, LogEntry};
pub use session::{DispatchSession, SessionSnapshot};
