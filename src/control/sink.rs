//! # Control Sink Module
//!
//! Output strategy for the poll pipeline.
//!
//! The pipeline itself (read → normalize → detect → dispatch) is identical
//! in diagnostic and operational mode; only the sink differs. That keeps
//! the logic exercised on the console exactly the logic that flies the
//! vehicle.
//!
//! - [`ConsoleSink`]: prints transitions and non-zero stick values, never
//!   touches the vehicle.
//! - [`VehicleSink`]: enqueues stick output every cycle and executes
//!   actions against the vehicle backend.
//!
//! ## Backpressure
//!
//! The stick hand-off is a bounded channel written with `try_send`: a full
//! queue drops that cycle's frame (counted, logged at debug) rather than
//! stalling input processing. The consumer always drains the freshest data
//! the queue admitted; the loop never blocks on a slow consumer.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::control::dispatch::FlightAction;
use crate::controller::edges::{ButtonEvent, Transition};
use crate::controller::normalizer::StickOutput;
use crate::controller::profile::LogicalButton;
use crate::error::Result;
use crate::vehicle::VehicleControl;

/// Where one poll cycle's results go.
pub trait ControlSink {
    /// Receives the cycle's stick output. Called unconditionally every
    /// cycle, zero or not, so the consumer always has fresh data at the
    /// polling rate.
    fn stick_output(&mut self, sticks: StickOutput);

    /// Receives a recognized transition (for human-readable diagnostics).
    fn transition(&mut self, event: &ButtonEvent);

    /// Executes a flight action.
    ///
    /// # Errors
    ///
    /// An error is logged by the poll loop and stalls nothing beyond the
    /// current cycle.
    fn action(&mut self, action: FlightAction) -> Result<()>;
}

/// Human-readable button name for diagnostic output.
fn button_label(button: LogicalButton) -> &'static str {
    match button {
        LogicalButton::X => "X",
        LogicalButton::Circle => "Circle",
        LogicalButton::Triangle => "Triangle",
        LogicalButton::Square => "Square",
        LogicalButton::L1 => "L1",
        LogicalButton::L2 => "L2",
        LogicalButton::L3 => "L3",
        LogicalButton::R1 => "R1",
        LogicalButton::R2 => "R2",
        LogicalButton::R3 => "R3",
        LogicalButton::DPadLeft => "D-Pad Left",
        LogicalButton::DPadRight => "D-Pad Right",
        LogicalButton::DPadUp => "D-Pad Up",
        LogicalButton::DPadDown => "D-Pad Down",
        LogicalButton::Unknown => "Unknown",
    }
}

/// Diagnostic sink: prints what the pipeline saw, calls nothing.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ControlSink for ConsoleSink {
    fn stick_output(&mut self, sticks: StickOutput) {
        // Only deflected sticks are worth a console line
        if !sticks.is_centered() {
            println!(
                "JS: Lx: {}, Ly: {}, Rx: {}, Ry: {}",
                sticks.lx, sticks.ly, sticks.rx, sticks.ry
            );
        }
    }

    fn transition(&mut self, event: &ButtonEvent) {
        let verb = match event.transition {
            Transition::Pressed => "pressed",
            Transition::Released => "released",
        };
        println!("{} {}", button_label(event.button), verb);
    }

    fn action(&mut self, _action: FlightAction) -> Result<()> {
        // Diagnostic mode validates the pipeline without flying anything
        Ok(())
    }
}

/// Operational sink: stick frames to the transmission queue, actions to the
/// vehicle backend.
pub struct VehicleSink {
    vehicle: Box<dyn VehicleControl>,
    sticks: mpsc::Sender<StickOutput>,
    dropped_frames: u64,
}

impl std::fmt::Debug for VehicleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VehicleSink")
            .field("dropped_frames", &self.dropped_frames)
            .finish_non_exhaustive()
    }
}

impl VehicleSink {
    /// Wires a vehicle backend and the bounded stick-output channel.
    #[must_use]
    pub fn new(vehicle: Box<dyn VehicleControl>, sticks: mpsc::Sender<StickOutput>) -> Self {
        Self {
            vehicle,
            sticks,
            dropped_frames: 0,
        }
    }

    /// Frames dropped so far because the stick queue was full.
    #[must_use]
    pub fn dropped_frames(&self) -> u64 {
        self.dropped_frames
    }
}

impl ControlSink for VehicleSink {
    fn stick_output(&mut self, sticks: StickOutput) {
        match self.sticks.try_send(sticks) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                self.dropped_frames += 1;
                debug!("stick queue full; dropped frame ({} total)", self.dropped_frames);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                warn!("stick queue consumer gone; frame discarded");
            }
        }
    }

    fn transition(&mut self, _event: &ButtonEvent) {
        // Transitions are a diagnostic surface; operationally only the
        // resulting action matters
    }

    fn action(&mut self, action: FlightAction) -> Result<()> {
        match action {
            FlightAction::SlowMode => self.vehicle.set_slow_mode(),
            FlightAction::FastMode => self.vehicle.set_fast_mode(),
            FlightAction::Bounce => self.vehicle.bounce(),
            FlightAction::TakeOff => self.vehicle.take_off(),
            FlightAction::Land => self.vehicle.land(),
            FlightAction::TakePicture => self.vehicle.take_picture(),
            FlightAction::FlipLeft => self.vehicle.left_flip(),
            FlightAction::FlipRight => self.vehicle.right_flip(),
            FlightAction::FlipForward => self.vehicle.forward_flip(),
            FlightAction::FlipBack => self.vehicle.back_flip(),
            FlightAction::ThrowOrPalmLand => {
                if self.vehicle.flight_data()?.flying {
                    self.vehicle.palm_land()
                } else {
                    self.vehicle.throw_take_off()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::{FlightData, MockVehicleControl};

    fn stick(lx: i16) -> StickOutput {
        StickOutput {
            lx,
            ..StickOutput::default()
        }
    }

    // ==================== Queue Policy Tests ====================

    #[test]
    fn test_draining_consumer_receives_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut sink = VehicleSink::new(Box::new(MockVehicleControl::new()), tx);

        for lx in [100, 200, 300] {
            sink.stick_output(stick(lx));
        }

        assert_eq!(rx.try_recv().unwrap().lx, 100);
        assert_eq!(rx.try_recv().unwrap().lx, 200);
        assert_eq!(rx.try_recv().unwrap().lx, 300);
        assert_eq!(sink.dropped_frames(), 0);
    }

    #[test]
    fn test_stalled_consumer_drops_without_blocking() {
        let (tx, mut rx) = mpsc::channel(1);
        let mut sink = VehicleSink::new(Box::new(MockVehicleControl::new()), tx);

        // Nobody drains; the first frame fills the queue, the rest drop
        sink.stick_output(stick(1));
        sink.stick_output(stick(2));
        sink.stick_output(stick(3));

        assert_eq!(sink.dropped_frames(), 2);
        assert_eq!(rx.try_recv().unwrap().lx, 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_closed_consumer_discards_quietly() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let mut sink = VehicleSink::new(Box::new(MockVehicleControl::new()), tx);

        sink.stick_output(stick(1));
        // Closed is not counted as a capacity drop
        assert_eq!(sink.dropped_frames(), 0);
    }

    // ==================== Action Routing Tests ====================

    #[test]
    fn test_simple_actions_route_to_vehicle() {
        let (tx, _rx) = mpsc::channel(1);
        let mut vehicle = MockVehicleControl::new();
        vehicle.expect_set_slow_mode().times(1).returning(|| Ok(()));
        vehicle.expect_set_fast_mode().times(1).returning(|| Ok(()));
        vehicle.expect_bounce().times(1).returning(|| Ok(()));
        vehicle.expect_take_off().times(1).returning(|| Ok(()));
        vehicle.expect_land().times(1).returning(|| Ok(()));
        vehicle.expect_take_picture().times(1).returning(|| Ok(()));

        let mut sink = VehicleSink::new(Box::new(vehicle), tx);
        for action in [
            FlightAction::SlowMode,
            FlightAction::FastMode,
            FlightAction::Bounce,
            FlightAction::TakeOff,
            FlightAction::Land,
            FlightAction::TakePicture,
        ] {
            sink.action(action).unwrap();
        }
    }

    #[test]
    fn test_flip_actions_route_to_vehicle() {
        let (tx, _rx) = mpsc::channel(1);
        let mut vehicle = MockVehicleControl::new();
        vehicle.expect_left_flip().times(1).returning(|| Ok(()));
        vehicle.expect_right_flip().times(1).returning(|| Ok(()));
        vehicle.expect_forward_flip().times(1).returning(|| Ok(()));
        vehicle.expect_back_flip().times(1).returning(|| Ok(()));

        let mut sink = VehicleSink::new(Box::new(vehicle), tx);
        sink.action(FlightAction::FlipLeft).unwrap();
        sink.action(FlightAction::FlipRight).unwrap();
        sink.action(FlightAction::FlipForward).unwrap();
        sink.action(FlightAction::FlipBack).unwrap();
    }

    #[test]
    fn test_square_branches_on_airborne() {
        let (tx, _rx) = mpsc::channel(1);
        let mut vehicle = MockVehicleControl::new();
        vehicle
            .expect_flight_data()
            .times(1)
            .returning(|| Ok(FlightData { flying: true }));
        vehicle.expect_palm_land().times(1).returning(|| Ok(()));
        vehicle.expect_throw_take_off().times(0);

        let mut sink = VehicleSink::new(Box::new(vehicle), tx);
        sink.action(FlightAction::ThrowOrPalmLand).unwrap();
    }

    #[test]
    fn test_square_branches_on_grounded() {
        let (tx, _rx) = mpsc::channel(1);
        let mut vehicle = MockVehicleControl::new();
        vehicle
            .expect_flight_data()
            .times(1)
            .returning(|| Ok(FlightData { flying: false }));
        vehicle.expect_throw_take_off().times(1).returning(|| Ok(()));
        vehicle.expect_palm_land().times(0);

        let mut sink = VehicleSink::new(Box::new(vehicle), tx);
        sink.action(FlightAction::ThrowOrPalmLand).unwrap();
    }

    // ==================== Console Sink Tests ====================

    #[test]
    fn test_console_sink_action_is_inert() {
        let mut sink = ConsoleSink::new();
        assert!(sink.action(FlightAction::TakeOff).is_ok());
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(button_label(LogicalButton::Square), "Square");
        assert_eq!(button_label(LogicalButton::DPadLeft), "D-Pad Left");
        assert_eq!(button_label(LogicalButton::R2), "R2");
    }
}
