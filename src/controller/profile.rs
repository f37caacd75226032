//! # Device Profile Module
//!
//! Static per-model tables mapping physical controller indices to the
//! logical control surface, plus the registry that selects a profile by
//! model name and host OS.
//!
//! ## Logical surface
//!
//! | Logical | Role |
//! |---------|------|
//! | LeftX / LeftY | Left stick deflection |
//! | RightX / RightY | Right stick deflection |
//! | X / Circle / Triangle / Square | Face buttons (action dispatch) |
//! | L1 / L2 / R1 | Flight mode buttons |
//! | R2 | Precision modifier (level-sensitive, never edge-dispatched) |
//! | L3 / R3 | Stick clicks (detected, reserved) |
//! | DPad* | Flip maneuvers (feature-gated) |
//!
//! ## Validation
//!
//! A profile is immutable once built. `ProfileBuilder::build` rejects any
//! table that omits a mapping the dispatch path relies on: the four stick
//! axes, the eight action buttons, and the four D-pad buttons whenever
//! flips are enabled. A lookup that would have faulted mid-loop therefore
//! fails at start-up instead.
//!
//! ## Registry
//!
//! Known models: `DualShock4`, `HotasX`, `EightBitDoSF30Pro`,
//! `SteamController`. DualShock4 button bits differ between the native
//! stack and the Windows HID stack, so selection is parameterized by OS;
//! every other model is OS-independent.

use std::collections::HashMap;

use crate::error::{JoyBridgeError, Result};

/// Logical stick and trigger axes.
///
/// Only the four stick axes are populated by current profiles; the trigger
/// axes are reserved for controllers that report analog triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalAxis {
    LeftX,
    LeftY,
    RightX,
    RightY,
    L1,
    L2,
    R1,
    R2,
}

/// Logical buttons across all supported controller models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalButton {
    X,
    Circle,
    Triangle,
    Square,
    L1,
    L2,
    L3,
    R1,
    R2,
    R3,
    DPadLeft,
    DPadRight,
    DPadUp,
    DPadDown,
    Unknown,
}

impl LogicalButton {
    /// Every dispatchable button, in the fixed order edge detection scans.
    pub const ALL: [LogicalButton; 14] = [
        LogicalButton::L1,
        LogicalButton::L2,
        LogicalButton::R1,
        LogicalButton::R2,
        LogicalButton::L3,
        LogicalButton::R3,
        LogicalButton::Square,
        LogicalButton::Triangle,
        LogicalButton::Circle,
        LogicalButton::X,
        LogicalButton::DPadLeft,
        LogicalButton::DPadRight,
        LogicalButton::DPadUp,
        LogicalButton::DPadDown,
    ];
}

/// Optional per-model capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// The controller has bindable D-pad buttons for flip maneuvers.
    FlipsEnabled,
}

/// Host OS distinction for profile selection.
///
/// Only the DualShock4 tables differ by OS today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    Other,
}

impl HostOs {
    /// Detects the OS the process is running on.
    #[must_use]
    pub fn current() -> Self {
        if std::env::consts::OS == "windows" {
            HostOs::Windows
        } else {
            HostOs::Other
        }
    }
}

/// Axes required by every profile.
const REQUIRED_AXES: [LogicalAxis; 4] = [
    LogicalAxis::LeftX,
    LogicalAxis::LeftY,
    LogicalAxis::RightX,
    LogicalAxis::RightY,
];

/// Buttons the dispatch and precision paths rely on unconditionally.
const REQUIRED_BUTTONS: [LogicalButton; 8] = [
    LogicalButton::X,
    LogicalButton::Circle,
    LogicalButton::Triangle,
    LogicalButton::Square,
    LogicalButton::L1,
    LogicalButton::L2,
    LogicalButton::R1,
    LogicalButton::R2,
];

/// Buttons required whenever [`Feature::FlipsEnabled`] is set.
const FLIP_BUTTONS: [LogicalButton; 4] = [
    LogicalButton::DPadLeft,
    LogicalButton::DPadRight,
    LogicalButton::DPadUp,
    LogicalButton::DPadDown,
];

/// Physical indices of the four stick axes, resolved once at build time so
/// the per-cycle normalization path never handles a missing mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StickAxes {
    pub left_x: usize,
    pub left_y: usize,
    pub right_x: usize,
    pub right_y: usize,
}

/// Immutable mapping from one controller model's physical indices to the
/// logical control surface.
///
/// One instance is selected per process lifetime; all lookups the poll loop
/// performs were proven present when the profile was built.
///
/// # Examples
///
/// ```
/// use joy_bridge::controller::profile::{select_profile, Feature, HostOs, LogicalButton};
///
/// let profile = select_profile("EightBitDoSF30Pro", HostOs::Other)?;
/// assert!(profile.feature(Feature::FlipsEnabled));
/// assert_eq!(profile.button_bit(LogicalButton::DPadLeft), Some(13));
/// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    name: String,
    axes: HashMap<LogicalAxis, usize>,
    buttons: HashMap<LogicalButton, u32>,
    features: HashMap<Feature, bool>,
    sticks: StickAxes,
    precision_bit: u32,
}

impl DeviceProfile {
    /// Model name this profile was registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Physical axis index for a logical axis, if the model maps it.
    #[must_use]
    pub fn axis_index(&self, axis: LogicalAxis) -> Option<usize> {
        self.axes.get(&axis).copied()
    }

    /// Physical bit index for a logical button, if the model maps it.
    #[must_use]
    pub fn button_bit(&self, button: LogicalButton) -> Option<u32> {
        self.buttons.get(&button).copied()
    }

    /// The stick-axis indices, resolved at build time.
    #[must_use]
    pub fn stick_axes(&self) -> StickAxes {
        self.sticks
    }

    /// Bit index of the precision-modifier button (R2), resolved at build time.
    #[must_use]
    pub fn precision_bit(&self) -> u32 {
        self.precision_bit
    }

    /// Whether an optional capability is enabled for this model.
    #[must_use]
    pub fn feature(&self, feature: Feature) -> bool {
        self.features.get(&feature).copied().unwrap_or(false)
    }
}

/// Builds a [`DeviceProfile`], validating completeness of the mappings the
/// dispatch path requires.
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    name: String,
    axes: HashMap<LogicalAxis, usize>,
    buttons: HashMap<LogicalButton, u32>,
    features: HashMap<Feature, bool>,
}

impl ProfileBuilder {
    /// Starts a profile for the given model name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Maps a logical axis to a physical axis index.
    #[must_use]
    pub fn axis(mut self, axis: LogicalAxis, index: usize) -> Self {
        self.axes.insert(axis, index);
        self
    }

    /// Maps a logical button to a physical bit index in the button mask.
    #[must_use]
    pub fn button(mut self, button: LogicalButton, bit: u32) -> Self {
        self.buttons.insert(button, bit);
        self
    }

    /// Sets an optional capability flag.
    #[must_use]
    pub fn feature(mut self, feature: Feature, enabled: bool) -> Self {
        self.features.insert(feature, enabled);
        self
    }

    /// Validates the table and produces the immutable profile.
    ///
    /// # Errors
    ///
    /// Returns [`JoyBridgeError::MissingAxis`] or
    /// [`JoyBridgeError::MissingButton`] if a mapping the dispatch path
    /// relies on is absent. With [`Feature::FlipsEnabled`] set, the four
    /// D-pad buttons are also required.
    pub fn build(self) -> Result<DeviceProfile> {
        for axis in REQUIRED_AXES {
            if !self.axes.contains_key(&axis) {
                return Err(JoyBridgeError::MissingAxis(axis));
            }
        }
        for button in REQUIRED_BUTTONS {
            if !self.buttons.contains_key(&button) {
                return Err(JoyBridgeError::MissingButton(button));
            }
        }
        if self.features.get(&Feature::FlipsEnabled).copied().unwrap_or(false) {
            for button in FLIP_BUTTONS {
                if !self.buttons.contains_key(&button) {
                    return Err(JoyBridgeError::MissingButton(button));
                }
            }
        }

        let sticks = StickAxes {
            left_x: self.axes[&LogicalAxis::LeftX],
            left_y: self.axes[&LogicalAxis::LeftY],
            right_x: self.axes[&LogicalAxis::RightX],
            right_y: self.axes[&LogicalAxis::RightY],
        };
        let precision_bit = self.buttons[&LogicalButton::R2];

        Ok(DeviceProfile {
            name: self.name,
            axes: self.axes,
            buttons: self.buttons,
            features: self.features,
            sticks,
            precision_bit,
        })
    }
}

/// Model names the registry recognizes.
pub const KNOWN_MODELS: [&str; 4] = [
    "DualShock4",
    "HotasX",
    "EightBitDoSF30Pro",
    "SteamController",
];

/// Selects the device profile for a model name and host OS.
///
/// Selection is pure; there is no runtime default for an unknown model.
///
/// # Errors
///
/// Returns [`JoyBridgeError::UnknownModel`] if the model is not registered.
///
/// # Examples
///
/// ```
/// use joy_bridge::controller::profile::{select_profile, HostOs, LogicalButton};
///
/// let linux = select_profile("DualShock4", HostOs::Other)?;
/// let windows = select_profile("DualShock4", HostOs::Windows)?;
/// assert_eq!(linux.button_bit(LogicalButton::X), Some(0));
/// assert_eq!(windows.button_bit(LogicalButton::X), Some(1));
/// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
/// ```
pub fn select_profile(model: &str, os: HostOs) -> Result<DeviceProfile> {
    match model {
        "DualShock4" => match os {
            HostOs::Windows => dual_shock4_windows(),
            HostOs::Other => dual_shock4(),
        },
        "HotasX" => hotas_x(),
        "EightBitDoSF30Pro" => eight_bit_do_sf30_pro(),
        "SteamController" => steam_controller(),
        other => Err(JoyBridgeError::UnknownModel(other.to_string())),
    }
}

/// Sony DualShock 4 over the native USB/Bluetooth stack.
fn dual_shock4() -> Result<DeviceProfile> {
    ProfileBuilder::new("DualShock4")
        .axis(LogicalAxis::LeftX, 0)
        .axis(LogicalAxis::LeftY, 1)
        .axis(LogicalAxis::RightX, 3)
        .axis(LogicalAxis::RightY, 4)
        .button(LogicalButton::X, 0)
        .button(LogicalButton::Circle, 1)
        .button(LogicalButton::Triangle, 2)
        .button(LogicalButton::Square, 3)
        .button(LogicalButton::L1, 4)
        .button(LogicalButton::R1, 5)
        .button(LogicalButton::L2, 6)
        .button(LogicalButton::R2, 7)
        .feature(Feature::FlipsEnabled, false)
        .build()
}

/// Sony DualShock 4 under the Windows HID stack, which renumbers the face
/// buttons and packs the axes contiguously.
fn dual_shock4_windows() -> Result<DeviceProfile> {
    ProfileBuilder::new("DualShock4")
        .axis(LogicalAxis::LeftX, 0)
        .axis(LogicalAxis::LeftY, 1)
        .axis(LogicalAxis::RightX, 2)
        .axis(LogicalAxis::RightY, 3)
        .button(LogicalButton::Square, 0)
        .button(LogicalButton::X, 1)
        .button(LogicalButton::Circle, 2)
        .button(LogicalButton::Triangle, 3)
        .button(LogicalButton::L1, 4)
        .button(LogicalButton::R1, 5)
        .button(LogicalButton::L2, 6)
        .button(LogicalButton::R2, 7)
        .feature(Feature::FlipsEnabled, false)
        .build()
}

/// 8BitDo SF30 Pro. Face buttons are labeled B, A, Y, X on the shell.
fn eight_bit_do_sf30_pro() -> Result<DeviceProfile> {
    ProfileBuilder::new("EightBitDoSF30Pro")
        .axis(LogicalAxis::LeftX, 0)
        .axis(LogicalAxis::LeftY, 1)
        .axis(LogicalAxis::RightX, 2)
        .axis(LogicalAxis::RightY, 3)
        .button(LogicalButton::X, 0)
        .button(LogicalButton::Circle, 1)
        .button(LogicalButton::Square, 2)
        .button(LogicalButton::Triangle, 3)
        .button(LogicalButton::L1, 4)
        .button(LogicalButton::R1, 5)
        .button(LogicalButton::L2, 6)
        .button(LogicalButton::R2, 7)
        .button(LogicalButton::DPadLeft, 13)
        .button(LogicalButton::DPadRight, 14)
        .button(LogicalButton::DPadUp, 15)
        .button(LogicalButton::DPadDown, 16)
        .feature(Feature::FlipsEnabled, true)
        .build()
}

/// Thrustmaster T-Flight HOTAS X. Mapping is identical on Windows and Linux.
fn hotas_x() -> Result<DeviceProfile> {
    ProfileBuilder::new("HotasX")
        .axis(LogicalAxis::LeftX, 4)
        .axis(LogicalAxis::LeftY, 2)
        .axis(LogicalAxis::RightX, 0)
        .axis(LogicalAxis::RightY, 1)
        .button(LogicalButton::R1, 0)
        .button(LogicalButton::L1, 1)
        .button(LogicalButton::R3, 2)
        .button(LogicalButton::L3, 3)
        .button(LogicalButton::Square, 4)
        .button(LogicalButton::X, 5)
        .button(LogicalButton::Circle, 6)
        .button(LogicalButton::Triangle, 7)
        .button(LogicalButton::R2, 8)
        .button(LogicalButton::L2, 9)
        .feature(Feature::FlipsEnabled, false)
        .build()
}

/// Valve Steam Controller. Bits 0, 1, 10, 11, 12, 15, 16 are the touch pads
/// and menu buttons, left unmapped.
fn steam_controller() -> Result<DeviceProfile> {
    ProfileBuilder::new("SteamController")
        .axis(LogicalAxis::LeftX, 0)
        .axis(LogicalAxis::LeftY, 1)
        .axis(LogicalAxis::RightX, 2)
        .axis(LogicalAxis::RightY, 3)
        .button(LogicalButton::X, 2)
        .button(LogicalButton::Circle, 3)
        .button(LogicalButton::Square, 4)
        .button(LogicalButton::Triangle, 5)
        .button(LogicalButton::L1, 6)
        .button(LogicalButton::R1, 7)
        .button(LogicalButton::L2, 8)
        .button(LogicalButton::R2, 9)
        .button(LogicalButton::L3, 13)
        .button(LogicalButton::R3, 14)
        .button(LogicalButton::DPadUp, 17)
        .button(LogicalButton::DPadDown, 18)
        .button(LogicalButton::DPadLeft, 19)
        .button(LogicalButton::DPadRight, 20)
        .feature(Feature::FlipsEnabled, true)
        .build()
}
