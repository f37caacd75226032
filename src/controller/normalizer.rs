//! # Stick Normalizer Module
//!
//! Converts raw per-axis readings into the signed, dead-zone-filtered,
//! precision-scaled stick output the vehicle consumes.
//!
//! ## Pipeline (per axis)
//!
//! 1. Look up the physical index through the device profile.
//! 2. Clamp the saturation sentinel: a raw magnitude of exactly 32768 (one
//!    past `i16::MAX`, reported by some driver stacks at full deflection)
//!    becomes ±32767 instead of wrapping negative when narrowed.
//! 3. Otherwise narrow to `i16` with two's-complement wrapping.
//! 4. Invert the sign of Y axes so stick "up" maps to positive climb.
//! 5. Zero any value whose magnitude is below the dead zone, per axis,
//!    after inversion and before precision scaling.
//! 6. While the precision button is held, divide all four outputs by 3
//!    (truncating toward zero). Level-sensitive, re-evaluated every cycle.
//!
//! Raw sticks never rest exactly at center; the dead zone suppresses the
//! drift commands that residue would otherwise produce.

use crate::controller::profile::DeviceProfile;
use crate::device::RawControllerState;

/// Dead-zone threshold on the ±32767 scale (≈6% deflection). Magnitudes
/// strictly below this become exactly zero.
pub const DEAD_ZONE: i16 = 2000;

/// Raw value some driver stacks report at full positive deflection; one
/// past `i16::MAX`, so it must be clamped rather than narrowed.
pub const AXIS_SENTINEL: i32 = 32768;

/// Divisor applied to all four outputs while precision mode is held.
pub const PRECISION_DIVISOR: i16 = 3;

/// Normalized stick deflection for one poll cycle.
///
/// Recomputed every cycle and consumed immediately; never retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickOutput {
    /// Left stick X, −32767..32767.
    pub lx: i16,
    /// Left stick Y, −32767..32767, positive = up.
    pub ly: i16,
    /// Right stick X, −32767..32767.
    pub rx: i16,
    /// Right stick Y, −32767..32767, positive = up.
    pub ry: i16,
}

impl StickOutput {
    /// True when all four axes are exactly centered.
    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.lx == 0 && self.ly == 0 && self.rx == 0 && self.ry == 0
    }
}

/// Normalizes one raw snapshot into stick output.
///
/// Pure: the same snapshot, profile and precision flag always produce the
/// same output.
///
/// # Arguments
///
/// * `profile` - Active device profile (stick axes resolved at build time)
/// * `state` - Current raw snapshot
/// * `precision` - Whether the precision button is held this cycle
///
/// # Examples
///
/// ```
/// use joy_bridge::controller::normalizer::normalize;
/// use joy_bridge::controller::profile::{select_profile, HostOs};
/// use joy_bridge::device::RawControllerState;
///
/// let profile = select_profile("DualShock4", HostOs::Other)?;
/// let mut state = RawControllerState::new(6);
/// state.axes[0] = 32768; // LeftX at the saturation sentinel
///
/// let out = normalize(&profile, &state, false);
/// assert_eq!(out.lx, 32767);
/// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
/// ```
#[must_use]
pub fn normalize(profile: &DeviceProfile, state: &RawControllerState, precision: bool) -> StickOutput {
    let sticks = profile.stick_axes();

    let mut out = StickOutput {
        lx: apply_dead_zone(narrow(state.axis(sticks.left_x), false)),
        ly: apply_dead_zone(narrow(state.axis(sticks.left_y), true)),
        rx: apply_dead_zone(narrow(state.axis(sticks.right_x), false)),
        ry: apply_dead_zone(narrow(state.axis(sticks.right_y), true)),
    };

    if precision {
        out.lx /= PRECISION_DIVISOR;
        out.ly /= PRECISION_DIVISOR;
        out.rx /= PRECISION_DIVISOR;
        out.ry /= PRECISION_DIVISOR;
    }

    out
}

/// Narrows a raw magnitude to `i16`, clamping the saturation sentinel and
/// inverting Y axes.
fn narrow(raw: i32, inverted: bool) -> i16 {
    if raw == AXIS_SENTINEL {
        return if inverted { -i16::MAX } else { i16::MAX };
    }
    let narrowed = raw as i16;
    if inverted {
        narrowed.wrapping_neg()
    } else {
        narrowed
    }
}

/// Forces magnitudes below [`DEAD_ZONE`] to exactly zero.
fn apply_dead_zone(value: i16) -> i16 {
    if value.unsigned_abs() < DEAD_ZONE as u16 {
        0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::profile::{select_profile, DeviceProfile, HostOs};

    fn playstation() -> DeviceProfile {
        select_profile("DualShock4", HostOs::Other).unwrap()
    }

    /// DualShock4 (native stack): LeftX=0, LeftY=1, RightX=3, RightY=4.
    fn state_with(axes: [(usize, i32); 4]) -> RawControllerState {
        let mut state = RawControllerState::new(6);
        for (index, value) in axes {
            state.axes[index] = value;
        }
        state
    }

    // ==================== Dead Zone Tests ====================

    #[test]
    fn test_at_rest_is_centered() {
        let out = normalize(&playstation(), &RawControllerState::new(6), false);
        assert!(out.is_centered());
    }

    #[test]
    fn test_below_dead_zone_is_exactly_zero() {
        for value in [1, 500, 1999, -1, -500, -1999] {
            let state = state_with([(0, value), (1, value), (3, value), (4, value)]);
            let out = normalize(&playstation(), &state, false);
            assert!(out.is_centered(), "raw {} should be suppressed", value);
        }
    }

    #[test]
    fn test_dead_zone_boundary_passes() {
        let state = state_with([(0, 2000), (1, 0), (3, -2000), (4, 0)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.lx, 2000);
        assert_eq!(out.rx, -2000);
    }

    #[test]
    fn test_dead_zone_is_per_axis() {
        // One deflected axis must not drag the centered ones with it
        let state = state_with([(0, 10000), (1, 100), (3, 0), (4, 1500)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.lx, 10000);
        assert_eq!(out.ly, 0);
        assert_eq!(out.rx, 0);
        assert_eq!(out.ry, 0);
    }

    // ==================== Sentinel & Narrowing Tests ====================

    #[test]
    fn test_sentinel_clamps_x_to_positive_max() {
        let state = state_with([(0, 32768), (1, 0), (3, 32768), (4, 0)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.lx, 32767);
        assert_eq!(out.rx, 32767);
    }

    #[test]
    fn test_sentinel_clamps_y_to_negative_max() {
        let state = state_with([(0, 0), (1, 32768), (3, 0), (4, 32768)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.ly, -32767);
        assert_eq!(out.ry, -32767);
    }

    #[test]
    fn test_narrowing_wraps_above_sentinel() {
        // 40000 narrows to -25536; the Y inversion turns it positive
        let state = state_with([(0, 0), (1, 40000), (3, 0), (4, 0)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.ly, 25536);
    }

    #[test]
    fn test_y_axes_inverted() {
        // Stick pushed "down" (positive raw) must command descent
        let state = state_with([(0, 0), (1, 5000), (3, 0), (4, -6000)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.ly, -5000);
        assert_eq!(out.ry, 6000);
    }

    #[test]
    fn test_x_axes_direct() {
        let state = state_with([(0, 5000), (1, 0), (3, -6000), (4, 0)]);
        let out = normalize(&playstation(), &state, false);
        assert_eq!(out.lx, 5000);
        assert_eq!(out.rx, -6000);
    }

    // ==================== Precision Mode Tests ====================

    #[test]
    fn test_precision_divides_all_axes_truncating() {
        let state = state_with([(0, 9000), (1, 9000), (3, -9000), (4, -9000)]);
        let out = normalize(&playstation(), &state, true);
        assert_eq!(out.lx, 3000);
        assert_eq!(out.ly, -3000);
        assert_eq!(out.rx, -3000);
        assert_eq!(out.ry, 3000);
    }

    #[test]
    fn test_precision_truncates_toward_zero() {
        // 2001 survives the dead zone, then truncates: 2001 / 3 = 667
        let state = state_with([(0, 2001), (1, 0), (3, -2001), (4, 0)]);
        let out = normalize(&playstation(), &state, true);
        assert_eq!(out.lx, 667);
        assert_eq!(out.rx, -667);
    }

    #[test]
    fn test_precision_applies_after_dead_zone() {
        // A dead-zoned axis stays exactly zero, not zero-divided-by-three
        // of some residual value
        let state = state_with([(0, 1999), (1, 0), (3, 0), (4, 0)]);
        let out = normalize(&playstation(), &state, true);
        assert_eq!(out.lx, 0);
    }

    #[test]
    fn test_precision_scales_sentinel_output() {
        let state = state_with([(0, 32768), (1, 32768), (3, 0), (4, 0)]);
        let out = normalize(&playstation(), &state, true);
        assert_eq!(out.lx, 32767 / 3);
        assert_eq!(out.ly, -32767 / 3);
    }

    #[test]
    fn test_precision_has_no_residual_state() {
        let state = state_with([(0, 9000), (1, 0), (3, 0), (4, 0)]);
        let held = normalize(&playstation(), &state, true);
        let released = normalize(&playstation(), &state, false);
        assert_eq!(held.lx, 3000);
        assert_eq!(released.lx, 9000);
    }

    // ==================== Determinism & Profile Remap Tests ====================

    #[test]
    fn test_normalize_is_pure() {
        let state = state_with([(0, 32768), (1, 40000), (3, -12345), (4, 2500)]);
        let first = normalize(&playstation(), &state, false);
        for _ in 0..10 {
            assert_eq!(normalize(&playstation(), &state, false), first);
        }
    }

    #[test]
    fn test_profile_remaps_physical_indices() {
        // HOTAS X reads LeftX from physical axis 4 and LeftY from axis 2
        let hotas = select_profile("HotasX", HostOs::Other).unwrap();
        let mut state = RawControllerState::new(6);
        state.axes[4] = 7000;
        state.axes[2] = 8000;

        let out = normalize(&hotas, &state, false);
        assert_eq!(out.lx, 7000);
        assert_eq!(out.ly, -8000);
    }

    #[test]
    fn test_short_axis_array_reads_centered() {
        // A device reporting fewer axes than the profile expects normalizes
        // the missing ones as centered instead of faulting
        let hotas = select_profile("HotasX", HostOs::Other).unwrap();
        let state = RawControllerState::new(2);
        let out = normalize(&hotas, &state, false);
        assert!(out.is_centered());
    }
}
