// src/simulation/listener.rs

//! Listener protocol for observers of a [`DiscreteModel`].

use super::DiscreteModel;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Notifications emitted by the model, synchronously and in registration
/// order. All methods default to no-ops.
pub trait ModelListener {
    /// Grid content changed; renderers and anything reading the grid should
    /// re-read it.
    fn finished_time_step(&mut self, _model: &DiscreteModel) {}

    /// Grid dimensions changed; display buffers must be reallocated.
    fn size_changed(&mut self) {}

    /// Potential terms were added or removed.
    fn potential_changed(&mut self) {}
}

/// Shared handle to a registered listener. The caller keeps a clone to read
/// the listener's state back.
pub type SharedListener = Rc<RefCell<dyn ModelListener>>;

/// Handle returned by [`DiscreteModel::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    entries: Vec<(ListenerId, SharedListener)>,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, listener: SharedListener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// The listeners as registered at the time of the call. Dispatch iterates
    /// this copy, so the registry may change while events are delivered.
    pub(crate) fn snapshot(&self) -> Vec<SharedListener> {
        self.entries.iter().map(|(_, listener)| Rc::clone(listener)).collect()
    }
}
