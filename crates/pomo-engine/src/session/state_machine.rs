/*
[INPUT]:  Session commands and elapsed-time ticks
[OUTPUT]: Validated state transitions for the focus session
[POS]:    Session domain logic - state machine for interval lifecycle
[UPDATE]: When step rollover rules or command preconditions change
*/

use std::time::Duration;

use thiserror::Error;

use crate::config::{ConfigError, SessionConfig};

/// Which kind of interval is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

/// Whether the current step's countdown is idle, running, or paused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    InProgress,
    Paused,
}

/// Commands that can trigger session state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Stop,
    Tick,
}

/// Errors occurring during state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("invalid transition: {command:?} while {step:?}/{state:?}")]
    InvalidTransition {
        command: Command,
        step: Step,
        state: RunState,
    },
}

/// Session state owned exclusively by [`SessionStateMachine`].
///
/// Consumers only ever hold copies obtained through the publish channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub step: Step,
    pub state: RunState,
    pub remaining: Duration,
    pub completed_cycles: u32,
}

/// State machine enforcing legal session transitions and applying elapsed time.
///
/// Purely functional over (snapshot, command): no clock, no I/O. Pause does
/// not drain `remaining`; the driver ceases tick delivery while paused.
#[derive(Debug)]
pub struct SessionStateMachine {
    config: SessionConfig,
    snapshot: SessionSnapshot,
}

impl SessionStateMachine {
    /// Create a machine idle at the first pomodoro.
    ///
    /// Configuration is validated here, once; it is never re-checked later.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            config,
            snapshot: SessionSnapshot {
                step: Step::Pomodoro,
                state: RunState::NotStarted,
                remaining: Duration::ZERO,
                completed_cycles: 0,
            },
        })
    }

    /// Current snapshot, by value.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Begin the current step's countdown.
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.expect_state(RunState::NotStarted, Command::Start)?;

        self.snapshot.remaining = self.configured_duration(self.snapshot.step);
        self.snapshot.state = RunState::InProgress;
        Ok(())
    }

    /// Suspend the running countdown. `remaining` is unchanged.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        self.expect_state(RunState::InProgress, Command::Pause)?;

        self.snapshot.state = RunState::Paused;
        Ok(())
    }

    /// Continue a paused countdown. `remaining` is unchanged.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        self.expect_state(RunState::Paused, Command::Resume)?;

        self.snapshot.state = RunState::InProgress;
        Ok(())
    }

    /// Abort the session. Legal from any state.
    ///
    /// The one operation that also clears `completed_cycles`, distinguishing
    /// an abort from a natural rollover.
    pub fn stop(&mut self) {
        self.snapshot = SessionSnapshot {
            step: Step::Pomodoro,
            state: RunState::NotStarted,
            remaining: Duration::ZERO,
            completed_cycles: 0,
        };
    }

    /// Apply elapsed time to the running countdown.
    ///
    /// Exhausting the countdown lands on the next step's `NotStarted`; the
    /// machine never rests at zero while still in progress.
    pub fn tick(&mut self, elapsed: Duration) -> Result<(), SessionError> {
        self.expect_state(RunState::InProgress, Command::Tick)?;

        if elapsed < self.snapshot.remaining {
            self.snapshot.remaining -= elapsed;
            return Ok(());
        }

        self.snapshot.remaining = Duration::ZERO;
        self.snapshot.state = RunState::NotStarted;

        let (step, completed_cycles) = rollover(
            self.snapshot.step,
            self.snapshot.completed_cycles,
            self.config.cycles_before_long_break,
        );
        self.snapshot.step = step;
        self.snapshot.completed_cycles = completed_cycles;
        Ok(())
    }

    /// Remaining time over the configured duration for the current step.
    ///
    /// 0.0 while `NotStarted` (no active interval); otherwise in [0, 1].
    pub fn fraction_remaining(&self) -> f64 {
        if self.snapshot.state == RunState::NotStarted {
            return 0.0;
        }

        let duration = self.configured_duration(self.snapshot.step);
        self.snapshot.remaining.as_secs_f64() / duration.as_secs_f64()
    }

    fn configured_duration(&self, step: Step) -> Duration {
        match step {
            Step::Pomodoro => self.config.pomodoro(),
            Step::ShortBreak => self.config.short_break(),
            Step::LongBreak => self.config.long_break(),
        }
    }

    fn expect_state(&self, expected: RunState, command: Command) -> Result<(), SessionError> {
        if self.snapshot.state == expected {
            return Ok(());
        }

        Err(SessionError::InvalidTransition {
            command,
            step: self.snapshot.step,
            state: self.snapshot.state,
        })
    }
}

/// Per-step rollover table applied when a countdown exhausts.
///
/// The cycle count resets only on long-break completion; short-break
/// completion preserves it.
fn rollover(step: Step, completed_cycles: u32, cycles_before_long_break: u32) -> (Step, u32) {
    match step {
        Step::Pomodoro => {
            let completed = completed_cycles + 1;
            if completed == cycles_before_long_break {
                (Step::LongBreak, completed)
            } else {
                (Step::ShortBreak, completed)
            }
        }
        Step::ShortBreak => (Step::Pomodoro, completed_cycles),
        Step::LongBreak => (Step::Pomodoro, 0),
    }
}
