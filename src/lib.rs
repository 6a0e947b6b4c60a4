//! Hint Tutor - guided-hint tutoring chat client
//!
//! A student exchanges messages with a tutoring backend that answers with
//! graduated hints. The session controller keeps the transcript, the
//! in-flight request and the help level consistent.

pub mod backend;
pub mod config;
pub mod identity;
pub mod level;
pub mod session;
pub mod state_machine;
pub mod transcript;

pub use backend::{BackendError, HttpBackend, LoggingBackend, TutorBackend};
pub use config::TutorConfig;
pub use level::{HelpLevel, InvalidLevel};
pub use session::{SessionController, SessionError, SessionHandle, SessionRuntime, SessionUpdate};
pub use transcript::{Role, Turn};
