use heapless::LinearMap;

use crate::note::Exhausted;

const MAX_PENDING: usize = 2;

/// What to do once the response to a correlated request arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum Completion {
    TemplateRegistered,
}

/// Outstanding requests by correlation ID.
#[derive(Debug, Default)]
pub(crate) struct PendingRequests {
    requests: LinearMap<u32, Completion, MAX_PENDING>,
}

impl PendingRequests {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers `id`. A request resent under the same ID replaces the earlier entry, which
    /// either timed out or will complete the same way.
    pub(crate) fn insert(&mut self, id: u32, completion: Completion) -> Result<(), Exhausted> {
        self.requests
            .insert(id, completion)
            .map(|_| ())
            .map_err(|_| Exhausted)
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<Completion> {
        self.requests.remove(&id)
    }
}
