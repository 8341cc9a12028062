#![no_std]
//! Driver for digital pyroelectric (PIR) motion sensors running in wake-up mode.
//!
//! The sensor is configured once over its SERIAL IN line with a 25-bit register, then signals
//! motion by raising its DIRECT LINK line. Each edge is counted from interrupt context, and a
//! small state machine driven by an external cooperative scheduler reports the accumulated count
//! to a gateway notefile.
//!
//! The driver is split into two halves sharing a [`PirState`]:
//! - [`PirSensor`], owned by the interrupt handler, counts edges and re-arms the line.
//! - [`PirPoller`], owned by the scheduler, registers the notefile template and sends reports.

use core::convert::Infallible;

pub mod config;
pub mod direct_link;
pub mod note;
mod pending;
mod pir_poller;
mod pir_sensor;
mod pir_sensor_builder;
pub mod scheduler;
pub mod serial_in;

pub use config::{ConfigurationRegister, HpfCutoff, PirConfig, PulseDetectionMode};
pub use direct_link::DirectLink;
pub use note::{Body, NoteResponse, NoteTransport, Request, Value};
pub use pir_poller::PirPoller;
pub use pir_sensor::{PirSensor, PirState};
pub use pir_sensor_builder::PirSensorBuilder;
pub use scheduler::Scheduler;

/// Notefile the reports are appended to. The gateway replaces the leading `*` with this node's
/// textual sensor address; `#` is reserved by the notecard for the sensor ID within events.
pub const SENSORDATA_NOTEFILE: &str = "*#motion.qo";

/// Correlation ID carried by the template registration, echoed back in its response.
pub const TEMPLATE_REQUEST_ID: u32 = 1;

/// Slot of a sensor in the external scheduler.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorId(pub u8);

impl From<u8> for SensorId {
    fn from(id: u8) -> Self {
        SensorId(id)
    }
}

impl From<SensorId> for u8 {
    fn from(id: SensorId) -> u8 {
        id.0
    }
}

/// Logical poll state of the sensor.
///
/// `Activated` and `Deactivated` are owned by the scheduler; `MotionCheck` is local to this
/// driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollState {
    /// The scheduler just woke the sensor up.
    Activated,
    /// Dormant until the next motion interrupt.
    Deactivated,
    /// Report any accumulated motion, or go back to sleep.
    MotionCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E = Infallible> {
    /// A GPIO operation on SERIAL IN or DIRECT LINK failed.
    Gpio(embedded_hal::digital::ErrorKind),
    /// A request, body or the pending registry ran out of capacity.
    Exhausted,
    /// The messaging layer refused the request.
    Transport(E),
}

impl Error {
    pub(crate) fn gpio<P: embedded_hal::digital::Error>(err: P) -> Self {
        Error::Gpio(err.kind())
    }
}
