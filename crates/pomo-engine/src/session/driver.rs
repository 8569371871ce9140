/*
[INPUT]:  Session commands from the caller + repeating tokio timing source
[OUTPUT]: Published SessionView snapshots after every accepted command or tick
[POS]:    Execution layer - bridges wall-clock time into the state machine
[UPDATE]: When changing arm/disarm semantics or publish ordering
*/

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::{ConfigError, SessionConfig};
use crate::session::state_machine::{RunState, SessionError, SessionStateMachine};
use crate::view::SessionView;

/// Countdown driver owning the timing source for a single session.
///
/// All mutation is serialized through one mutex; commands are synchronous
/// bounded-time transitions and the lock is never held across an await.
/// Observers hold only read-only copies obtained via the watch channel.
#[derive(Debug)]
pub struct CountdownDriver {
    machine: Arc<Mutex<SessionStateMachine>>,
    view_tx: watch::Sender<SessionView>,
    ticker: CancellationToken,
    tick_interval: Duration,
}

impl CountdownDriver {
    /// Validate the configuration and build an idle driver.
    ///
    /// Nothing is spawned until the session is started.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let tick_interval = config.tick_interval();
        let machine = SessionStateMachine::new(config)?;
        let (view_tx, _rx) = watch::channel(SessionView::from_machine(&machine));

        // Disarmed until the first start.
        let ticker = CancellationToken::new();
        ticker.cancel();

        Ok(Self {
            machine: Arc::new(Mutex::new(machine)),
            view_tx,
            ticker,
            tick_interval,
        })
    }

    /// Subscribe to published session views.
    ///
    /// The receiver always contains the latest snapshot, so late subscribers
    /// still see current state.
    pub fn subscribe(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    /// Current view, for an initial render before any event fires.
    pub fn view(&self) -> SessionView {
        *self.view_tx.borrow()
    }

    /// Begin the current step's countdown and arm the timing source.
    pub fn start(&mut self) -> Result<(), SessionError> {
        let view = self.apply(|machine| machine.start())?;
        info!(
            step = ?view.step,
            completed_cycles = view.completed_cycles,
            remaining = ?view.remaining,
            "session step started"
        );
        self.arm();
        Ok(())
    }

    /// Suspend the countdown and disarm the timing source.
    pub fn pause(&mut self) -> Result<(), SessionError> {
        let view = self.apply(|machine| machine.pause())?;
        self.ticker.cancel();
        info!(step = ?view.step, remaining = ?view.remaining, "session paused");
        Ok(())
    }

    /// Continue a paused countdown and re-arm the timing source.
    pub fn resume(&mut self) -> Result<(), SessionError> {
        let view = self.apply(|machine| machine.resume())?;
        info!(step = ?view.step, remaining = ?view.remaining, "session resumed");
        self.arm();
        Ok(())
    }

    /// Abort the session. Disarms the timing source unconditionally.
    pub fn stop(&mut self) {
        self.ticker.cancel();

        let view = {
            let mut machine = self.machine.lock().expect("session lock");
            machine.stop();
            SessionView::from_machine(&machine)
        };
        let _ = self.view_tx.send(view);
        info!("session stopped");
    }

    /// Apply a command under the lock and publish the resulting view.
    ///
    /// A rejected command propagates unchanged: nothing is published and the
    /// timing-source arm state is untouched.
    fn apply<F>(&self, op: F) -> Result<SessionView, SessionError>
    where
        F: FnOnce(&mut SessionStateMachine) -> Result<(), SessionError>,
    {
        let view = {
            let mut machine = self.machine.lock().expect("session lock");
            op(&mut machine)?;
            SessionView::from_machine(&machine)
        };
        let _ = self.view_tx.send(view);
        Ok(view)
    }

    /// Arm the repeating timing source.
    ///
    /// The worker re-checks the run state under the lock on every firing, so
    /// a firing already in flight when disarm happened is a no-op.
    fn arm(&mut self) {
        let token = CancellationToken::new();
        self.ticker = token.clone();

        let machine = Arc::clone(&self.machine);
        let view_tx = self.view_tx.clone();
        let tick_interval = self.tick_interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(tick_interval);
            // The first interval tick completes immediately; consume it so
            // elapsed time is only applied once per real period.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        let view = {
                            let mut machine = machine.lock().expect("session lock");
                            if machine.snapshot().state != RunState::InProgress {
                                // Disarmed while this firing was in flight.
                                break;
                            }
                            match machine.tick(tick_interval) {
                                Ok(()) => SessionView::from_machine(&machine),
                                Err(err) => {
                                    debug!(error = %err, "tick rejected; ticker exiting");
                                    break;
                                }
                            }
                        };

                        let in_progress = view.state == RunState::InProgress;
                        let _ = view_tx.send(view);

                        if !in_progress {
                            info!(
                                step = ?view.step,
                                completed_cycles = view.completed_cycles,
                                "countdown exhausted; rolled over"
                            );
                            break;
                        }
                    }
                }
            }
        });
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        self.ticker.cancel();
    }
}
