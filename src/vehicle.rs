//! # Vehicle Module
//!
//! Seam to the vehicle-control collaborator.
//!
//! The poll loop calls these methods synchronously on edge-triggered
//! actions; a call that blocks or errors stalls that cycle only. The
//! transport behind the trait (UDP command link, SDK, simulator) is outside
//! this crate.

use tracing::info;

use crate::error::Result;

/// Snapshot of the vehicle state the dispatcher branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlightData {
    /// Whether the vehicle is currently airborne.
    pub flying: bool,
}

/// Edge-triggered flight commands and the flight-state query.
///
/// Every method is synchronous; implementations decide their own transport
/// and timeouts (none are applied here).
#[cfg_attr(test, mockall::automock)]
pub trait VehicleControl: Send {
    /// Enter slow flight mode.
    fn set_slow_mode(&mut self) -> Result<()>;
    /// Enter fast flight mode.
    fn set_fast_mode(&mut self) -> Result<()>;
    /// Toggle bounce mode.
    fn bounce(&mut self) -> Result<()>;
    /// Motor-on takeoff.
    fn take_off(&mut self) -> Result<()>;
    /// Controlled landing.
    fn land(&mut self) -> Result<()>;
    /// Throw-assisted takeoff.
    fn throw_take_off(&mut self) -> Result<()>;
    /// Land into an open palm.
    fn palm_land(&mut self) -> Result<()>;
    /// Capture a photo.
    fn take_picture(&mut self) -> Result<()>;
    /// Flip left.
    fn left_flip(&mut self) -> Result<()>;
    /// Flip right.
    fn right_flip(&mut self) -> Result<()>;
    /// Flip forward.
    fn forward_flip(&mut self) -> Result<()>;
    /// Flip backward.
    fn back_flip(&mut self) -> Result<()>;
    /// Current flight state, queried synchronously.
    fn flight_data(&mut self) -> Result<FlightData>;
}

/// Stand-in backend that records every action to the log and reports the
/// vehicle as grounded.
///
/// Lets the operational pipeline run end-to-end without a transport.
// TODO: replace with the UDP command-link backend once the protocol layer lands
#[derive(Debug, Default)]
pub struct LoggingVehicle {
    flying: bool,
}

impl LoggingVehicle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log(&self, action: &str) {
        info!("vehicle action: {}", action);
    }
}

impl VehicleControl for LoggingVehicle {
    fn set_slow_mode(&mut self) -> Result<()> {
        self.log("set slow mode");
        Ok(())
    }

    fn set_fast_mode(&mut self) -> Result<()> {
        self.log("set fast mode");
        Ok(())
    }

    fn bounce(&mut self) -> Result<()> {
        self.log("bounce");
        Ok(())
    }

    fn take_off(&mut self) -> Result<()> {
        self.log("take off");
        self.flying = true;
        Ok(())
    }

    fn land(&mut self) -> Result<()> {
        self.log("land");
        self.flying = false;
        Ok(())
    }

    fn throw_take_off(&mut self) -> Result<()> {
        self.log("throw take off");
        self.flying = true;
        Ok(())
    }

    fn palm_land(&mut self) -> Result<()> {
        self.log("palm land");
        self.flying = false;
        Ok(())
    }

    fn take_picture(&mut self) -> Result<()> {
        self.log("take picture");
        Ok(())
    }

    fn left_flip(&mut self) -> Result<()> {
        self.log("left flip");
        Ok(())
    }

    fn right_flip(&mut self) -> Result<()> {
        self.log("right flip");
        Ok(())
    }

    fn forward_flip(&mut self) -> Result<()> {
        self.log("forward flip");
        Ok(())
    }

    fn back_flip(&mut self) -> Result<()> {
        self.log("back flip");
        Ok(())
    }

    fn flight_data(&mut self) -> Result<FlightData> {
        Ok(FlightData {
            flying: self.flying,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_vehicle_tracks_airborne_state() {
        let mut vehicle = LoggingVehicle::new();
        assert!(!vehicle.flight_data().unwrap().flying);

        vehicle.take_off().unwrap();
        assert!(vehicle.flight_data().unwrap().flying);

        vehicle.land().unwrap();
        assert!(!vehicle.flight_data().unwrap().flying);

        vehicle.throw_take_off().unwrap();
        assert!(vehicle.flight_data().unwrap().flying);

        vehicle.palm_land().unwrap();
        assert!(!vehicle.flight_data().unwrap().flying);
    }

    #[test]
    fn test_logging_vehicle_actions_succeed() {
        let mut vehicle = LoggingVehicle::new();
        assert!(vehicle.set_slow_mode().is_ok());
        assert!(vehicle.set_fast_mode().is_ok());
        assert!(vehicle.bounce().is_ok());
        assert!(vehicle.take_picture().is_ok());
        assert!(vehicle.left_flip().is_ok());
        assert!(vehicle.right_flip().is_ok());
        assert!(vehicle.forward_flip().is_ok());
        assert!(vehicle.back_flip().is_ok());
    }
}
