//! # Poll Loop Module
//!
//! Drives one controller at a fixed period:
//! read → normalize → emit stick output → detect edges → dispatch → store
//! previous state → sleep.
//!
//! The loop owns the only mutable state that survives a cycle: the previous
//! raw snapshot used for edge detection. Both operating modes run this
//! exact pipeline; they differ only in the injected [`ControlSink`] and the
//! period, so diagnostic runs validate the same logic that flies.
//!
//! A failed device read is logged and the cycle proceeds on the previous
//! snapshot; the next poll is the retry point. There is no internal
//! shutdown signal beyond process-level Ctrl+C.

use tokio::time::{interval, Duration};
use tracing::{info, warn};

use crate::control::dispatch::{CommandDispatcher, Dispatch};
use crate::control::sink::ControlSink;
use crate::controller::edges::{detect_edges, is_down};
use crate::controller::normalizer::normalize;
use crate::controller::profile::{DeviceProfile, LogicalButton};
use crate::device::{InputSource, RawControllerState};
use crate::error::Result;

/// Fixed-rate control loop over one input source and one sink.
#[derive(Debug)]
pub struct PollLoop<S: InputSource, K: ControlSink> {
    source: S,
    sink: K,
    profile: DeviceProfile,
    dispatcher: CommandDispatcher,
    period: Duration,
    previous: RawControllerState,
}

impl<S: InputSource, K: ControlSink> PollLoop<S, K> {
    /// Wires a source, sink and profile into a loop with the given period.
    #[must_use]
    pub fn new(source: S, sink: K, profile: DeviceProfile, period: Duration) -> Self {
        let previous = RawControllerState::new(source.axis_count());
        let dispatcher = CommandDispatcher::new(&profile);
        Self {
            source,
            sink,
            profile,
            dispatcher,
            period,
            previous,
        }
    }

    /// Runs exactly one poll cycle.
    ///
    /// Split out from [`PollLoop::run`] so the pipeline is testable without
    /// timers or signals.
    pub fn cycle(&mut self) {
        let current = match self.source.read() {
            Ok(state) => state,
            Err(e) => {
                // Recoverable: continue the cycle on the stale snapshot
                warn!("controller read failed: {}", e);
                self.previous.clone()
            }
        };

        // Precision is level-sensitive: evaluated against the current mask
        // every cycle, not edge-triggered
        let precision = is_down(&self.profile, &current, LogicalButton::R2);
        let sticks = normalize(&self.profile, &current, precision);
        self.sink.stick_output(sticks);

        for event in detect_edges(&self.profile, &self.previous, &current) {
            match self.dispatcher.dispatch(&event) {
                Dispatch::Action(action) => {
                    self.sink.transition(&event);
                    if let Err(e) = self.sink.action(action) {
                        warn!("vehicle action failed: {}", e);
                    }
                }
                Dispatch::Noted => self.sink.transition(&event),
                Dispatch::Ignored => {}
            }
        }

        self.previous = current;
    }

    /// Runs cycles at the configured period until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Currently infallible at this level; the signature leaves room for a
    /// sink that must tear down.
    pub async fn run(mut self) -> Result<()> {
        let mut ticker = interval(self.period);

        info!(
            "control loop started for '{}' (period {:?})",
            self.profile.name(),
            self.period
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => self.cycle(),
                _ = tokio::signal::ctrl_c() => {
                    info!("received Ctrl+C, stopping control loop");
                    break;
                }
            }
        }

        Ok(())
    }
}
