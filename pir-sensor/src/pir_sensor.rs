use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;
use embedded_hal_async::digital::Wait;

use crate::{direct_link, DirectLink, Error, PollState, Scheduler, SensorId};

/// State shared between the interrupt handler and the poller.
///
/// Only atomics live here so it can sit in a `static` and be touched from interrupt context
/// without a lock. The counter's swap-to-zero can race an increment; at worst an edge that lands
/// in between is reported one cycle late, never lost and never counted twice.
#[derive(Debug, Default)]
pub struct PirState {
    motion_events: AtomicU32,
    template_registered: AtomicBool,
}

impl PirState {
    pub const fn new() -> Self {
        Self {
            motion_events: AtomicU32::new(0),
            template_registered: AtomicBool::new(false),
        }
    }

    /// Motion edges seen since the last report.
    pub fn motion_events(&self) -> u32 {
        self.motion_events.load(Ordering::Relaxed)
    }

    /// Whether the gateway acknowledged the notefile template.
    pub fn is_template_registered(&self) -> bool {
        self.template_registered.load(Ordering::Relaxed)
    }

    pub(crate) fn record_motion(&self) {
        self.motion_events.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn take_motion_events(&self) -> u32 {
        self.motion_events.swap(0, Ordering::Relaxed)
    }

    /// Puts back events taken for a report that was never sent.
    pub(crate) fn restore_motion_events(&self, count: u32) {
        self.motion_events.fetch_add(count, Ordering::Relaxed);
    }

    pub(crate) fn set_template_registered(&self) {
        self.template_registered.store(true, Ordering::Relaxed);
    }
}

/// The interrupt half of the driver.
///
/// Owns the sensor pins once configured. Create it with a
/// [`PirSensorBuilder`](crate::PirSensorBuilder), then forward the GPIO interrupt to
/// [`PirSensor::on_interrupt`], or await [`PirSensor::wait_for_motion`] on an async executor.
///
/// Example:
/// ```ignore
/// static PIR: PirState = PirState::new();
///
/// let mut sensor = PirSensorBuilder::new(SensorId(3), serial_in, direct_link, Delay)
///     .with_priority(2)
///     .build(&PIR)?;
///
/// // from the EXTI handler
/// sensor.on_interrupt(pending_pins, &mut scheduler)?;
/// ```
pub struct PirSensor<'a, P, L, D> {
    pub(crate) id: SensorId,
    pub(crate) state: &'a PirState,
    pub(crate) serial_in: P,
    pub(crate) direct_link: L,
    pub(crate) delay: D,
    pub(crate) priority: u8,
}

impl<'a, P, L, D> PirSensor<'a, P, L, D>
where
    L: DirectLink,
    D: DelayNs,
{
    pub fn id(&self) -> SensorId {
        self.id
    }

    pub fn state(&self) -> &'a PirState {
        self.state
    }

    /// Handles a GPIO interrupt for the pins in `pins`.
    ///
    /// Returns `Ok(false)` without touching anything if DIRECT LINK is not among them, which
    /// happens when several pins share one interrupt vector. See [`Scheduler`] for sharing
    /// `scheduler` with the poller.
    pub fn on_interrupt<S: Scheduler>(&mut self, pins: u16, scheduler: &mut S) -> Result<bool, Error> {
        if pins & self.direct_link.pin_mask() == 0 {
            return Ok(false);
        }
        self.record_motion(scheduler)?;
        Ok(true)
    }

    /// Resets the sensor's alarm unit and enables the wake interrupt again.
    pub fn rearm(&mut self) -> Result<(), Error> {
        direct_link::rearm(&mut self.direct_link, &mut self.delay, self.priority)
    }

    /// Releases the serial in pin, direct link and delay.
    pub fn release(self) -> (P, L, D) {
        (self.serial_in, self.direct_link, self.delay)
    }

    fn record_motion<S: Scheduler>(&mut self, scheduler: &mut S) -> Result<(), Error> {
        self.state.record_motion();
        let rearmed = self.rearm();
        if scheduler.state(self.id) == PollState::Deactivated {
            scheduler.activate_now_from_isr(self.id, PollState::MotionCheck);
        }
        rearmed
    }
}

impl<P, L, D> PirSensor<'_, P, L, D>
where
    L: DirectLink + Wait,
    D: DelayNs,
{
    /// Waits for the next motion edge and handles it like [`PirSensor::on_interrupt`] would.
    pub async fn wait_for_motion<S: Scheduler>(&mut self, scheduler: &mut S) -> Result<(), Error> {
        self.direct_link
            .wait_for_rising_edge()
            .await
            .map_err(Error::gpio)?;
        self.record_motion(scheduler)
    }
}
