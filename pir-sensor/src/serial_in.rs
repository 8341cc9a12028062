//! SERIAL IN configuration protocol.
//!
//! The sensor samples SERIAL IN on its own clock, so the host frames every bit with a short
//! low/high pulse and then holds the data level long enough to be sampled. There is no
//! acknowledgement; a wrong level or a stretched frame silently corrupts the register.

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{config::ConfigurationRegister, Error};

/// Low time before the first bit, must be at least 580 µs.
pub const START_HOLD_US: u32 = 750;
/// Low phase opening each bit frame. Can be very short.
pub const BIT_LOW_US: u32 = 5;
/// High phase between the frame start and the data level.
pub const BIT_HIGH_US: u32 = 1;
/// Data level hold time, must be at least 72 µs.
pub const BIT_HOLD_US: u32 = 100;
/// Low time after the last bit that latches the register, must be at least 580 µs.
pub const LATCH_HOLD_US: u32 = 750;

/// Clocks `register` out MSB first.
///
/// Busy-waits for roughly 4.2 ms and must not be preempted for long; callers typically run it
/// once during init.
pub fn write_register<P, D>(
    pin: &mut P,
    delay: &mut D,
    register: ConfigurationRegister,
) -> Result<(), Error>
where
    P: OutputPin,
    D: DelayNs,
{
    pin.set_low().map_err(Error::gpio)?;
    delay.delay_us(START_HOLD_US);

    for bit in register.msb_first() {
        pin.set_low().map_err(Error::gpio)?;
        delay.delay_us(BIT_LOW_US);
        pin.set_high().map_err(Error::gpio)?;
        delay.delay_us(BIT_HIGH_US);
        pin.set_state(bit.into()).map_err(Error::gpio)?;
        delay.delay_us(BIT_HOLD_US);
    }

    pin.set_low().map_err(Error::gpio)?;
    delay.delay_us(LATCH_HOLD_US);
    Ok(())
}
