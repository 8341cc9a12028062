#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, ErrorKind, ErrorType, OutputPin},
};
use embedded_hal_async::digital::Wait;
use pir_sensor::{DirectLink, NoteResponse, NoteTransport, PollState, Request, Scheduler, SensorId};

pub const DIRECT_LINK_MASK: u16 = 1 << 5;

/// Everything the sensor pins and the delay did, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// SERIAL IN driven to the given level.
    SerialIn(bool),
    DelayUs(u32),
    /// DIRECT LINK switched to a low output.
    DriveLow,
    /// DIRECT LINK switched to a rising edge interrupt input with the given priority.
    ListenRisingEdge(u8),
    WaitRisingEdge,
}

pub type Timeline = Rc<RefCell<Vec<Event>>>;

pub fn timeline() -> Timeline {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    IoError,
}

impl digital::Error for MockError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

pub struct MockSerialIn {
    timeline: Timeline,
    fail: bool,
}

impl MockSerialIn {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            fail: false,
        }
    }

    pub fn failing(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            fail: true,
        }
    }

    fn record(&mut self, level: bool) -> Result<(), MockError> {
        if self.fail {
            return Err(MockError::IoError);
        }
        self.timeline.borrow_mut().push(Event::SerialIn(level));
        Ok(())
    }
}

impl ErrorType for MockSerialIn {
    type Error = MockError;
}

impl OutputPin for MockSerialIn {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.record(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.record(true)
    }
}

pub struct MockDelay {
    timeline: Timeline,
}

impl MockDelay {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.timeline.borrow_mut().push(Event::DelayUs(ns / 1_000));
    }

    fn delay_us(&mut self, us: u32) {
        self.timeline.borrow_mut().push(Event::DelayUs(us));
    }
}

pub struct MockDirectLink {
    timeline: Timeline,
    mask: u16,
}

impl MockDirectLink {
    pub fn new(timeline: &Timeline) -> Self {
        Self {
            timeline: timeline.clone(),
            mask: DIRECT_LINK_MASK,
        }
    }
}

impl ErrorType for MockDirectLink {
    type Error = MockError;
}

impl DirectLink for MockDirectLink {
    fn drive_low(&mut self) -> Result<(), Self::Error> {
        self.timeline.borrow_mut().push(Event::DriveLow);
        Ok(())
    }

    fn listen_rising_edge(&mut self, priority: u8) -> Result<(), Self::Error> {
        self.timeline
            .borrow_mut()
            .push(Event::ListenRisingEdge(priority));
        Ok(())
    }

    fn pin_mask(&self) -> u16 {
        self.mask
    }
}

impl Wait for MockDirectLink {
    async fn wait_for_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_rising_edge(&mut self) -> Result<(), Self::Error> {
        self.timeline.borrow_mut().push(Event::WaitRisingEdge);
        Ok(())
    }

    async fn wait_for_falling_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    async fn wait_for_any_edge(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Scheduler calls, as seen by the mock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerCall {
    SetState(SensorId, PollState),
    SetCompletionState(SensorId, PollState, PollState),
    ActivateNowFromIsr(SensorId, PollState),
}

#[derive(Debug, Default)]
pub struct MockScheduler {
    pub states: HashMap<SensorId, PollState>,
    pub calls: Vec<SchedulerCall>,
}

impl MockScheduler {
    pub fn with_state(sensor: SensorId, state: PollState) -> Self {
        let mut scheduler = Self::default();
        scheduler.states.insert(sensor, state);
        scheduler
    }
}

impl Scheduler for MockScheduler {
    fn state(&self, sensor: SensorId) -> PollState {
        self.states
            .get(&sensor)
            .copied()
            .unwrap_or(PollState::Deactivated)
    }

    fn set_state(&mut self, sensor: SensorId, state: PollState, _reason: &'static str) {
        self.states.insert(sensor, state);
        self.calls.push(SchedulerCall::SetState(sensor, state));
    }

    fn set_completion_state(&mut self, sensor: SensorId, pending: PollState, completion: PollState) {
        self.states.insert(sensor, pending);
        self.calls
            .push(SchedulerCall::SetCompletionState(sensor, pending, completion));
    }

    fn activate_now_from_isr(&mut self, sensor: SensorId, state: PollState) {
        self.states.insert(sensor, state);
        self.calls.push(SchedulerCall::ActivateNowFromIsr(sensor, state));
    }
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub sent: Vec<(Request, bool)>,
    pub fail: bool,
}

impl NoteTransport for MockTransport {
    type Error = MockError;

    fn send_async(&mut self, request: Request, expect_response: bool) -> Result<(), Self::Error> {
        if self.fail {
            return Err(MockError::IoError);
        }
        self.sent.push((request, expect_response));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MockResponse {
    pub err: Option<&'static str>,
    pub id: Option<i64>,
}

impl MockResponse {
    pub fn with_id(id: i64) -> Self {
        Self {
            err: None,
            id: Some(id),
        }
    }

    pub fn with_err(err: &'static str) -> Self {
        Self {
            err: Some(err),
            id: None,
        }
    }
}

impl NoteResponse for MockResponse {
    fn string(&self, name: &str) -> Option<&str> {
        match name {
            "err" => self.err,
            _ => None,
        }
    }

    fn int(&self, name: &str) -> Option<i64> {
        match name {
            "id" => self.id,
            _ => None,
        }
    }
}
