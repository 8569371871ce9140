/*
[INPUT]:  Public API exports for pomo-engine crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod session;
pub mod view;

// Re-export main types for convenience
pub use config::{ConfigError, SessionConfig};
pub use session::driver::CountdownDriver;
pub use session::state_machine::{Command, RunState, SessionError, SessionSnapshot, Step};
pub use view::SessionView;
