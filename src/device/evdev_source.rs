//! # Evdev Input Source
//!
//! Linux evdev-backed [`InputSource`] implementation.
//!
//! ## Index derivation
//!
//! The device profiles address axes and buttons by the flat physical
//! indices the classic joystick interface exposes. evdev instead reports
//! sparse event codes, so on open this source derives the same indexing the
//! kernel joystick driver uses:
//!
//! - physical axis index = position of the axis code among the device's
//!   supported absolute-axis codes, in ascending code order
//! - physical button index = position of the key code among the device's
//!   supported key codes at or above `BTN_MISC` (0x100), in ascending code
//!   order
//!
//! ## Value scaling
//!
//! Absolute axis values are rescaled from the device's advertised
//! `[minimum, maximum]` range into −32767..32767, matching the joystick
//! interface. A read that would block means "no new events this cycle" and
//! returns the previous snapshot unchanged.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use evdev::{AbsoluteAxisType, Device, InputEventKind};
use tracing::{debug, info};

use super::{InputSource, RawControllerState};
use crate::error::{JoyBridgeError, Result};

/// First event code of the button range (`BTN_MISC`). Key codes below this
/// are keyboard keys and never belong to a controller's button mask.
const BTN_CODE_BASE: u16 = 0x100;

/// Full joystick-interface deflection.
const AXIS_SPAN: i64 = 32767;

/// Diagnostic summary of one detected controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSummary {
    pub id: usize,
    pub name: String,
    pub axis_count: usize,
    pub button_count: usize,
}

/// A game controller opened through `/dev/input/event*`.
pub struct EvdevSource {
    device: Device,
    name: String,
    device_path: String,
    /// Event code → physical axis index.
    axis_lookup: HashMap<u16, usize>,
    /// Advertised (minimum, maximum) per physical axis index.
    axis_ranges: Vec<(i32, i32)>,
    /// Event code → physical button bit index.
    key_lookup: HashMap<u16, u32>,
    button_count: usize,
    state: RawControllerState,
}

impl std::fmt::Debug for EvdevSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevSource")
            .field("name", &self.name)
            .field("device_path", &self.device_path)
            .field("axes", &self.axis_ranges.len())
            .field("buttons", &self.button_count)
            .finish_non_exhaustive()
    }
}

impl EvdevSource {
    /// Opens the `id`-th controller-capable input device.
    ///
    /// Scans `/dev/input/event*` in path order (deterministic when several
    /// controllers are connected) and counts only devices that expose both
    /// absolute axes and controller buttons.
    ///
    /// # Errors
    ///
    /// Returns [`JoyBridgeError::DeviceOpen`] if no such device exists or it
    /// cannot be opened.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use joy_bridge::device::EvdevSource;
    ///
    /// let source = EvdevSource::open(0)?;
    /// # Ok::<(), joy_bridge::error::JoyBridgeError>(())
    /// ```
    pub fn open(id: usize) -> Result<Self> {
        let mut seen = 0usize;

        for path in event_device_paths()? {
            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    // Permission denied or transient races; skip the node
                    debug!("could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            if !is_controller(&device) {
                continue;
            }

            if seen == id {
                return Self::from_device(device, path.to_string_lossy().to_string(), id);
            }
            seen += 1;
        }

        Err(JoyBridgeError::DeviceOpen {
            id,
            reason: format!("no controller at index {} ({} detected)", id, seen),
        })
    }

    fn from_device(device: Device, device_path: String, id: usize) -> Result<Self> {
        let name = device.name().unwrap_or("unknown controller").to_string();

        let axis_codes: Vec<AbsoluteAxisType> = device
            .supported_absolute_axes()
            .map(|axes| axes.iter().collect())
            .unwrap_or_default();

        let mut axis_lookup = HashMap::new();
        for (index, code) in axis_codes.iter().enumerate() {
            axis_lookup.insert(code.0, index);
        }

        let key_codes: Vec<u16> = device
            .supported_keys()
            .map(|keys| {
                keys.iter()
                    .map(|key| key.code())
                    .filter(|&code| code >= BTN_CODE_BASE)
                    .collect()
            })
            .unwrap_or_default();

        let mut key_lookup = HashMap::new();
        for (bit, code) in key_codes.iter().enumerate() {
            key_lookup.insert(*code, bit as u32);
        }

        let abs_state = device
            .get_abs_state()
            .map_err(|e| JoyBridgeError::DeviceOpen {
                id,
                reason: format!("could not query axis state of {}: {}", device_path, e),
            })?;

        let mut axis_ranges = Vec::with_capacity(axis_codes.len());
        let mut state = RawControllerState::new(axis_codes.len());
        for (index, code) in axis_codes.iter().enumerate() {
            let info = abs_state[code.0 as usize];
            axis_ranges.push((info.minimum, info.maximum));
            state.axes[index] = scale_axis(info.value, info.minimum, info.maximum);
        }

        info!(
            "opened controller '{}' at {} ({} axes, {} buttons)",
            name,
            device_path,
            axis_codes.len(),
            key_codes.len()
        );

        Ok(Self {
            device,
            name,
            device_path,
            axis_lookup,
            axis_ranges,
            key_lookup,
            button_count: key_codes.len(),
            state,
        })
    }

    /// The `/dev/input/eventX` path backing this source.
    #[must_use]
    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl InputSource for EvdevSource {
    fn read(&mut self) -> Result<RawControllerState> {
        match self.device.fetch_events() {
            Ok(events) => {
                for event in events {
                    match event.kind() {
                        InputEventKind::AbsAxis(axis) => {
                            if let Some(&index) = self.axis_lookup.get(&axis.0) {
                                let (min, max) = self.axis_ranges[index];
                                self.state.axes[index] = scale_axis(event.value(), min, max);
                            }
                        }
                        InputEventKind::Key(key) => {
                            if let Some(&bit) = self.key_lookup.get(&key.code()) {
                                if event.value() != 0 {
                                    self.state.buttons |= 1 << bit;
                                } else {
                                    self.state.buttons &= !(1 << bit);
                                }
                            }
                        }
                        _ => {
                            // Sync and misc events carry no controller state
                        }
                    }
                }
                Ok(self.state.clone())
            }
            // The device is opened non-blocking; no pending events is not
            // an error, the snapshot simply carries over
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(self.state.clone()),
            Err(e) => Err(JoyBridgeError::DeviceRead(e.to_string())),
        }
    }

    fn axis_count(&self) -> usize {
        self.axis_ranges.len()
    }

    fn button_count(&self) -> usize {
        self.button_count
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Enumerates all connected controller-capable devices for the diagnostic
/// listing.
///
/// # Errors
///
/// Returns an error only if `/dev/input` itself cannot be scanned; an
/// individual unopenable node is skipped.
pub fn list_devices() -> Result<Vec<DeviceSummary>> {
    let mut summaries = Vec::new();

    for path in event_device_paths()? {
        let device = match Device::open(&path) {
            Ok(device) => device,
            Err(e) => {
                debug!("could not open {}: {}", path.display(), e);
                continue;
            }
        };

        if !is_controller(&device) {
            continue;
        }

        let axis_count = device
            .supported_absolute_axes()
            .map_or(0, |axes| axes.iter().count());
        let button_count = device.supported_keys().map_or(0, |keys| {
            keys.iter().filter(|key| key.code() >= BTN_CODE_BASE).count()
        });

        summaries.push(DeviceSummary {
            id: summaries.len(),
            name: device.name().unwrap_or("unknown controller").to_string(),
            axis_count,
            button_count,
        });
    }

    Ok(summaries)
}

/// Sorted `/dev/input/event*` paths.
fn event_device_paths() -> Result<Vec<PathBuf>> {
    let input_dir = Path::new("/dev/input");

    let mut paths: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().starts_with("event"))
                .unwrap_or(false)
        })
        .collect();

    paths.sort();
    Ok(paths)
}

/// A node counts as a controller when it exposes both absolute axes and
/// button-range keys. Keyboards, mice and sensor nodes fail one of the two.
fn is_controller(device: &Device) -> bool {
    let has_axes = device
        .supported_absolute_axes()
        .map_or(false, |axes| axes.iter().next().is_some());
    let has_buttons = device
        .supported_keys()
        .map_or(false, |keys| keys.iter().any(|key| key.code() >= BTN_CODE_BASE));
    has_axes && has_buttons
}

/// Rescales a raw absolute value from `[min, max]` to −32767..32767, the
/// joystick-interface convention the profiles assume.
fn scale_axis(value: i32, min: i32, max: i32) -> i32 {
    if max <= min {
        // Degenerate range advertised; pass the value through
        return value;
    }
    let span = i64::from(max) - i64::from(min);
    let offset = i64::from(value.clamp(min, max)) - i64::from(min);
    (offset * 2 * AXIS_SPAN / span - AXIS_SPAN) as i32
}
