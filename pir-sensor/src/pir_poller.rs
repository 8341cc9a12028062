use crate::{
    note::{Body, NoteResponse, NoteTransport, Request, TINT32},
    pending::{Completion, PendingRequests},
    Error, PirState, PollState, Scheduler, SensorId, SENSORDATA_NOTEFILE, TEMPLATE_REQUEST_ID,
};

/// Outcome of handling a single poll state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    Stop,
    /// Handle another state within the same poll.
    Continue(PollState),
}

/// The scheduler half of the driver.
///
/// Reports the motion counted by [`PirSensor`](crate::PirSensor) to the gateway. The scheduler
/// calls [`PirPoller::poll`] with the sensor's current state and hands gateway responses to
/// [`PirPoller::on_response`]; neither is ever called from interrupt context.
///
/// Keep one poller per sensor for as long as the sensor runs, next to its [`PirState`]. It holds
/// the IDs of requests still waiting for a response, so a poller created between a request and
/// its response drops the acknowledgement and registers the template again on the next
/// `Activated` poll.
pub struct PirPoller<'a> {
    id: SensorId,
    state: &'a PirState,
    notefile: &'static str,
    pending: PendingRequests,
}

impl<'a> PirPoller<'a> {
    pub fn new(id: SensorId, state: &'a PirState) -> Self {
        PirPoller {
            id,
            state,
            notefile: SENSORDATA_NOTEFILE,
            pending: PendingRequests::new(),
        }
    }

    /// Reports to `notefile` instead of [`SENSORDATA_NOTEFILE`].
    pub fn with_notefile(self, notefile: &'static str) -> Self {
        PirPoller { notefile, ..self }
    }

    pub fn id(&self) -> SensorId {
        self.id
    }

    /// Does the work of `state` and asks the scheduler for the next one.
    ///
    /// If a request cannot be built or queued, no transition is requested and the error is
    /// returned; the scheduler polls again on its next tick.
    pub fn poll<S, T>(
        &mut self,
        state: PollState,
        scheduler: &mut S,
        transport: &mut T,
    ) -> Result<(), Error<T::Error>>
    where
        S: Scheduler,
        T: NoteTransport,
    {
        let mut state = state;
        while let Transition::Continue(next) = self.step(state, scheduler, transport)? {
            state = next;
        }
        Ok(())
    }

    fn step<S, T>(
        &mut self,
        state: PollState,
        scheduler: &mut S,
        transport: &mut T,
    ) -> Result<Transition, Error<T::Error>>
    where
        S: Scheduler,
        T: NoteTransport,
    {
        match state {
            PollState::Activated if !self.state.is_template_registered() => {
                self.register_template(transport)
                    .inspect_err(|_| log::warn!("pir: template registration not sent"))?;
                scheduler.set_completion_state(self.id, PollState::Activated, PollState::MotionCheck);
                log::info!("pir: template registration request");
                Ok(Transition::Stop)
            }
            PollState::Activated => Ok(Transition::Continue(PollState::MotionCheck)),
            PollState::MotionCheck => {
                if self.state.motion_events() == 0 {
                    scheduler.set_state(self.id, PollState::Deactivated, "pir: completed");
                    return Ok(Transition::Stop);
                }
                let count = self
                    .send_report(transport)
                    .inspect_err(|_| log::warn!("pir: report not sent"))?;
                scheduler.set_completion_state(self.id, PollState::MotionCheck, PollState::MotionCheck);
                log::info!("pir: {} motion events sensed, note queued", count);
                Ok(Transition::Stop)
            }
            PollState::Deactivated => Ok(Transition::Stop),
        }
    }

    fn register_template<T: NoteTransport>(&mut self, transport: &mut T) -> Result<(), Error<T::Error>> {
        let mut req = Request::new("note.template");
        let mut body = Body::new();

        // Echoed back by the notecard, identifies the response without any extra state.
        req.add_number("id", TEMPLATE_REQUEST_ID.into())?;
        req.add_string("file", self.notefile)?;
        body.add_number("count", TINT32)?;
        req.attach_body(body);

        self.pending.insert(TEMPLATE_REQUEST_ID, Completion::TemplateRegistered)?;
        transport.send_async(req, true).map_err(|err| {
            self.pending.remove(TEMPLATE_REQUEST_ID);
            Error::Transport(err)
        })
    }

    /// Sends the accumulated count and returns it.
    fn send_report<T: NoteTransport>(&mut self, transport: &mut T) -> Result<u32, Error<T::Error>> {
        let mut req = Request::new("note.add");
        req.add_string("file", self.notefile)?;
        let mut body = Body::new();
        body.add_number("count", 0)?;

        // Nothing past this point runs out of room.
        let count = self.state.take_motion_events();
        body.update_number("count", count.into());
        req.attach_body(body);

        if let Err(err) = transport.send_async(req, false) {
            self.state.restore_motion_events(count);
            return Err(Error::Transport(err));
        }
        Ok(count)
    }

    /// Handles the gateway's answer to a request sent with `expect_response`. `None` means the
    /// request timed out.
    pub fn on_response<R: NoteResponse>(&mut self, response: Option<&R>) {
        let Some(rsp) = response else {
            log::warn!("pir: response timeout");
            return;
        };

        if let Some(err) = rsp.string("err").filter(|err| !err.is_empty()) {
            log::warn!("pir: error response: {}", err);
            return;
        }

        let Some(id) = rsp.int("id").and_then(|id| u32::try_from(id).ok()) else {
            return;
        };
        if let Some(Completion::TemplateRegistered) = self.pending.remove(id) {
            self.state.set_template_registered();
            log::info!("pir: template registered");
        }
    }
}
