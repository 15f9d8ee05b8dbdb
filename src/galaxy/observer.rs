//! Change notification for display collaborators.

use std::fmt;

use super::engine::Galaxy;
use super::system::SystemId;

/// What just changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalaxyEvent {
    Stepped,
    Jiggled,
    Reset,
    ParametersChanged,
    SystemMoved(SystemId),
}

impl GalaxyEvent {
    /// Short stable name, used for JS callbacks.
    pub fn name(self) -> &'static str {
        match self {
            Self::Stepped => "stepped",
            Self::Jiggled => "jiggled",
            Self::Reset => "reset",
            Self::ParametersChanged => "parametersChanged",
            Self::SystemMoved(_) => "systemMoved",
        }
    }
}

/// Handle returned by [`Galaxy::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u32);

type Callback = Box<dyn FnMut(&Galaxy, GalaxyEvent)>;

/// Registered callbacks, notified in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    next_id: u32,
    entries: Vec<(ObserverId, Callback)>,
}

impl Observers {
    pub(crate) fn add(&mut self, callback: Callback) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, callback));
        id
    }

    pub(crate) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn notify(&mut self, galaxy: &Galaxy, event: GalaxyEvent) {
        for (_, callback) in &mut self.entries {
            callback(galaxy, event);
        }
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("count", &self.entries.len())
            .finish()
    }
}
