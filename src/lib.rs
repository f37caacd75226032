//! # Joy Bridge Library
//!
//! Fly a camera quadcopter with an ordinary game controller.
//!
//! This library normalizes raw joystick axis and button readings into
//! flight-control commands: per-model device profiles, dead-zone filtering,
//! axis inversion, edge-triggered button dispatch, and a fixed-rate poll
//! loop that feeds a stick-output queue and a vehicle-control backend.

pub mod config;
pub mod error;
pub mod controller;
pub mod device;
pub mod vehicle;
pub mod control;
