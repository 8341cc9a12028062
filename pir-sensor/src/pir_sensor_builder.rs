//! Builder for the PirSensor driver
//!
//! Use this to configure the sensor and arm its wake interrupt

use embedded_hal::{delay::DelayNs, digital::OutputPin};

use crate::{serial_in, DirectLink, Error, PirConfig, PirSensor, PirState, SensorId};

pub struct PirSensorBuilder<P, L, D> {
    id: SensorId,
    serial_in: P,
    direct_link: L,
    delay: D,
    config: PirConfig,
    priority: u8,
}

impl<P, L, D> PirSensorBuilder<P, L, D>
where
    P: OutputPin,
    L: DirectLink,
    D: DelayNs,
{
    /// Create a new builder with the default wake-up configuration and interrupt priority 0
    pub fn new(id: SensorId, serial_in: P, direct_link: L, delay: D) -> Self {
        PirSensorBuilder {
            id,
            serial_in,
            direct_link,
            delay,
            config: PirConfig::default(),
            priority: 0,
        }
    }

    /// Sets the detection parameters written to the sensor
    pub fn with_config(self, config: PirConfig) -> Self {
        PirSensorBuilder { config, ..self }
    }

    /// Sets the priority of the DIRECT LINK interrupt
    pub fn with_priority(self, priority: u8) -> Self {
        PirSensorBuilder { priority, ..self }
    }

    /// Writes the configuration to the sensor and arms the wake interrupt.
    ///
    /// Blocks for a few milliseconds while the register is clocked out.
    pub fn build(self, state: &PirState) -> Result<PirSensor<'_, P, L, D>, Error> {
        let mut sensor = PirSensor {
            id: self.id,
            state,
            serial_in: self.serial_in,
            direct_link: self.direct_link,
            delay: self.delay,
            priority: self.priority,
        };

        let register = self.config.register();
        sensor.serial_in.set_low().map_err(Error::gpio)?;
        serial_in::write_register(&mut sensor.serial_in, &mut sensor.delay, register)?;
        sensor.rearm()?;

        log::info!("pir: configured with register {:#09x}", register.bits());
        Ok(sensor)
    }
}
