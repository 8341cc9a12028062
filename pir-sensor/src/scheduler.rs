//! Interface to the cooperative scheduler that owns the sensor's poll state.

use crate::{PollState, SensorId};

/// The sensor scheduler.
///
/// The driver never changes its own state; it only asks the scheduler for transitions and is
/// polled again with whatever state the scheduler decides on.
///
/// The same scheduler is handed to [`PirSensor::on_interrupt`](crate::PirSensor::on_interrupt)
/// from interrupt context and to [`PirPoller::poll`](crate::PirPoller::poll) from normal
/// context. Share it behind a critical section, for example a
/// `critical_section::Mutex<RefCell<_>>` borrowed for the duration of each call, so an interrupt
/// never lands while the poller holds it. Implementations of
/// [`Scheduler::activate_now_from_isr`] must not block.
pub trait Scheduler {
    /// Current state of `sensor`.
    fn state(&self, sensor: SensorId) -> PollState;

    /// Moves `sensor` to `state` right away. `reason` is for tracing.
    fn set_state(&mut self, sensor: SensorId, state: PollState, reason: &'static str);

    /// Parks `sensor` in `pending` until the outstanding gateway request completes, then polls
    /// it again in `completion`.
    fn set_completion_state(&mut self, sensor: SensorId, pending: PollState, completion: PollState);

    /// Activates a dormant `sensor` out of band, polling it next in `state`. Called from
    /// interrupt context.
    fn activate_now_from_isr(&mut self, sensor: SensorId, state: PollState);
}
