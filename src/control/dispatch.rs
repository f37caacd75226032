//! # Command Dispatcher Module
//!
//! Maps button transition events to flight actions.
//!
//! ## Action table
//!
//! | Button edge | Action |
//! |-------------|--------|
//! | L1 pressed | Enter slow flight mode |
//! | L2 pressed | Toggle bounce mode |
//! | R1 pressed | Enter fast flight mode |
//! | Square pressed | Palm-land if airborne, else throw-assisted takeoff |
//! | Triangle pressed | Takeoff |
//! | Circle pressed | Capture photo |
//! | X pressed | Land |
//! | D-pad pressed | Left/right/forward/back flip (only with flips enabled) |
//!
//! R2 is never edge-dispatched; the normalizer consumes it level-
//! sensitively for precision scaling. L3/R3 edges are detected but
//! currently reserved. The mapping is independent of the device profile
//! except for the flip feature gate.

use crate::controller::edges::{ButtonEvent, Transition};
use crate::controller::profile::{DeviceProfile, Feature, LogicalButton};

/// A named vehicle action produced by exactly one rising edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightAction {
    SlowMode,
    FastMode,
    Bounce,
    /// Square: resolved against the live flight state by the executing
    /// sink — palm-land when airborne, throw-takeoff when grounded.
    ThrowOrPalmLand,
    TakeOff,
    Land,
    TakePicture,
    FlipLeft,
    FlipRight,
    FlipForward,
    FlipBack,
}

/// Outcome of dispatching one transition event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The edge triggers a vehicle action.
    Action(FlightAction),
    /// The edge is recognized and surfaced to diagnostics, but carries no
    /// action (reserved buttons, precision-modifier notifications).
    Noted,
    /// The edge is dropped silently (releases, gated flips, unknown bits).
    Ignored,
}

/// Maps transition events to dispatch decisions.
///
/// Pure and stateless apart from the feature gate captured at
/// construction; the same event always produces the same decision.
///
/// # Examples
///
/// ```
/// use joy_bridge::control::dispatch::{CommandDispatcher, Dispatch, FlightAction};
/// use joy_bridge::controller::edges::{ButtonEvent, Transition};
/// use joy_bridge::controller::profile::{select_profile, HostOs, LogicalButton};
///
/// let profile = select_profile("DualShock4", HostOs::Other)?;
/// let dispatcher = CommandDispatcher::new(&profile);
///
/// let event = ButtonEvent {
///     button: LogicalButton::Triangle,
///     transition: Transition::Pressed,
/// };
/// assert_eq!(dispatcher.dispatch(&event), Dispatch::Action(FlightAction::TakeOff));
/// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CommandDispatcher {
    flips_enabled: bool,
}

impl CommandDispatcher {
    /// Captures the feature gates of the active profile.
    #[must_use]
    pub fn new(profile: &DeviceProfile) -> Self {
        Self {
            flips_enabled: profile.feature(Feature::FlipsEnabled),
        }
    }

    /// Decides what one transition event does.
    #[must_use]
    pub fn dispatch(&self, event: &ButtonEvent) -> Dispatch {
        match event.transition {
            Transition::Pressed => self.dispatch_press(event.button),
            // Falling edges matter only for the precision-modifier
            // notification in diagnostic mode
            Transition::Released => match event.button {
                LogicalButton::R2 => Dispatch::Noted,
                _ => Dispatch::Ignored,
            },
        }
    }

    fn dispatch_press(&self, button: LogicalButton) -> Dispatch {
        match button {
            LogicalButton::L1 => Dispatch::Action(FlightAction::SlowMode),
            LogicalButton::L2 => Dispatch::Action(FlightAction::Bounce),
            LogicalButton::R1 => Dispatch::Action(FlightAction::FastMode),
            LogicalButton::Square => Dispatch::Action(FlightAction::ThrowOrPalmLand),
            LogicalButton::Triangle => Dispatch::Action(FlightAction::TakeOff),
            LogicalButton::Circle => Dispatch::Action(FlightAction::TakePicture),
            LogicalButton::X => Dispatch::Action(FlightAction::Land),

            LogicalButton::DPadLeft if self.flips_enabled => {
                Dispatch::Action(FlightAction::FlipLeft)
            }
            LogicalButton::DPadRight if self.flips_enabled => {
                Dispatch::Action(FlightAction::FlipRight)
            }
            LogicalButton::DPadUp if self.flips_enabled => {
                Dispatch::Action(FlightAction::FlipForward)
            }
            LogicalButton::DPadDown if self.flips_enabled => {
                Dispatch::Action(FlightAction::FlipBack)
            }
            LogicalButton::DPadLeft
            | LogicalButton::DPadRight
            | LogicalButton::DPadUp
            | LogicalButton::DPadDown => Dispatch::Ignored,

            // Reserved stick clicks and the precision modifier surface in
            // diagnostics only
            LogicalButton::L3 | LogicalButton::R3 | LogicalButton::R2 => Dispatch::Noted,

            LogicalButton::Unknown => Dispatch::Ignored,
        }
    }
}
