//! # Edge Detector Module
//!
//! Turns two consecutive button bitmasks into discrete press/release
//! transition events per logical button.
//!
//! A button is down when its profile-mapped bit is set in the mask. A
//! rising edge is "down now, up last cycle"; a falling edge is the
//! symmetric opposite. Holding a button across any number of cycles yields
//! exactly one pressed event and, on release, exactly one released event.
//!
//! There is no debounce beyond the two-state comparison itself: a single
//! noisy glitch cycle produces a spurious press/release pair. That is a
//! documented limitation, not corrected here.

use crate::controller::profile::{DeviceProfile, LogicalButton};
use crate::device::RawControllerState;

/// Direction of a button transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Pressed,
    Released,
}

/// One button transition observed between two consecutive polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    pub button: LogicalButton,
    pub transition: Transition,
}

/// Whether a logical button is down in the given snapshot.
///
/// A button the profile does not map is never down.
#[must_use]
pub fn is_down(profile: &DeviceProfile, state: &RawControllerState, button: LogicalButton) -> bool {
    match profile.button_bit(button) {
        Some(bit) => state.buttons & (1 << bit) != 0,
        None => false,
    }
}

/// Compares two consecutive snapshots and returns every transition, in the
/// fixed scan order of [`LogicalButton::ALL`].
///
/// # Examples
///
/// ```
/// use joy_bridge::controller::edges::{detect_edges, Transition};
/// use joy_bridge::controller::profile::{select_profile, HostOs, LogicalButton};
/// use joy_bridge::device::RawControllerState;
///
/// let profile = select_profile("DualShock4", HostOs::Other)?;
/// let rest = RawControllerState::new(6);
/// let mut pressed = RawControllerState::new(6);
/// pressed.buttons = 1 << 4; // L1 on this profile
///
/// let events = detect_edges(&profile, &rest, &pressed);
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].button, LogicalButton::L1);
/// assert_eq!(events[0].transition, Transition::Pressed);
/// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
/// ```
#[must_use]
pub fn detect_edges(
    profile: &DeviceProfile,
    previous: &RawControllerState,
    current: &RawControllerState,
) -> Vec<ButtonEvent> {
    let mut events = Vec::new();

    for button in LogicalButton::ALL {
        if profile.button_bit(button).is_none() {
            continue;
        }
        let was_down = is_down(profile, previous, button);
        let now_down = is_down(profile, current, button);

        if now_down && !was_down {
            events.push(ButtonEvent {
                button,
                transition: Transition::Pressed,
            });
        } else if was_down && !now_down {
            events.push(ButtonEvent {
                button,
                transition: Transition::Released,
            });
        }
    }

    events
}
