//! # Control Module
//!
//! The per-cycle pipeline that turns normalized input into commands.
//!
//! This module handles:
//! - Mapping button edges to flight actions (with feature gating)
//! - The sink strategy separating diagnostic from operational output
//! - The fixed-rate poll loop driving read → normalize → dispatch

pub mod dispatch;
pub mod sink;
pub mod poll;

pub use dispatch::{CommandDispatcher, Dispatch, FlightAction};
pub use poll::PollLoop;
pub use sink::{ConsoleSink, ControlSink, VehicleSink};
