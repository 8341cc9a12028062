//! DIRECT LINK wake interrupt.
//!
//! In wake-up mode the sensor pushes DIRECT LINK from low to high once its motion criteria are
//! met, and keeps it there until the host pulls the line low again. The line therefore has to
//! be driven low and re-armed after every edge, or the sensor never signals again.

use embedded_hal::{delay::DelayNs, digital::ErrorType};

use crate::Error;

/// Minimum is 35 µs.
pub const RESET_HOLD_US: u32 = 250;

/// The DIRECT LINK pin together with its interrupt line.
///
/// Implemented by the board support code on top of its GPIO and interrupt controller.
pub trait DirectLink: ErrorType {
    /// Reconfigures the pin as a push-pull output driven low.
    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Reconfigures the pin as a pulled-down input and enables its rising edge interrupt at
    /// `priority`.
    ///
    /// The pull-down keeps an unpopulated footprint from raising noise interrupts; the sensor's
    /// active level is strong enough to override it.
    fn listen_rising_edge(&mut self, priority: u8) -> Result<(), Self::Error>;

    /// Bit of this pin in the pin set handed to the interrupt dispatcher.
    fn pin_mask(&self) -> u16;
}

/// Enables the wake interrupt.
pub fn arm<L: DirectLink>(line: &mut L, priority: u8) -> Result<(), Error> {
    line.listen_rising_edge(priority).map_err(Error::gpio)
}

/// Resets the sensor's alarm unit and enables the wake interrupt again.
pub fn rearm<L, D>(line: &mut L, delay: &mut D, priority: u8) -> Result<(), Error>
where
    L: DirectLink,
    D: DelayNs,
{
    line.drive_low().map_err(Error::gpio)?;
    delay.delay_us(RESET_HOLD_US);
    arm(line, priority)
}
