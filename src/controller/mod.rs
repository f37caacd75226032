//! # Controller Module
//!
//! Logical control surface over physically different controllers.
//!
//! This module handles:
//! - Per-model device profiles and the model registry
//! - Stick normalization (sentinel clamp, inversion, dead zone, precision)
//! - Button edge detection between consecutive polls

pub mod profile;
pub mod normalizer;
pub mod edges;

pub use edges::{detect_edges, is_down, ButtonEvent, Transition};
pub use normalizer::{normalize, StickOutput};
pub use profile::{select_profile, DeviceProfile, Feature, HostOs, LogicalAxis, LogicalButton};
