/*
[INPUT]:  Session snapshots from the state machine
[OUTPUT]: Display-ready view values for observers
[POS]:    Shared runtime view between the driver and display layers
[UPDATE]: When adding/removing published session signals
*/

use std::time::Duration;

use crate::session::state_machine::{RunState, SessionStateMachine, Step};

/// Display-ready session state, published after every accepted command and
/// every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionView {
    pub step: Step,
    pub state: RunState,
    pub fraction_remaining: f64,
    pub completed_cycles: u32,
    pub remaining: Duration,
}

impl SessionView {
    pub(crate) fn from_machine(machine: &SessionStateMachine) -> Self {
        let snapshot = machine.snapshot();
        Self {
            step: snapshot.step,
            state: snapshot.state,
            fraction_remaining: machine.fraction_remaining(),
            completed_cycles: snapshot.completed_cycles,
            remaining: snapshot.remaining,
        }
    }

    /// Remaining time rendered as `MM:SS`, truncated to whole seconds.
    pub fn display_remaining(&self) -> String {
        let total = self.remaining.as_secs();
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
