/*
[INPUT]:  Individual session components
[OUTPUT]: Unified session module
[POS]:    Session domain layer - aggregates state machine and countdown driver
[UPDATE]: When adding new session-related modules or functionality
*/

pub mod driver;
pub mod state_machine;

pub use driver::CountdownDriver;
pub use state_machine::{
    Command, RunState, SessionError, SessionSnapshot, SessionStateMachine, Step,
};
