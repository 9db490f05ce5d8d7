//! Ordered subscriber lists with removable handles.
//!
//! Subscribers are notified synchronously in registration order. The list is
//! borrowed mutably for the whole notification pass, so a subscriber can never
//! add or remove entries mid-iteration; removal always goes through the
//! handle returned by [`ObserverList::add`].

/// Handle identifying a registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// An ordered collection of boxed subscribers.
pub struct ObserverList<O: ?Sized> {
    next_id: u64,
    entries: Vec<(ObserverId, Box<O>)>,
}

impl<O: ?Sized> ObserverList<O> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Register a subscriber at the end of the notification order.
    pub fn add(&mut self, observer: Box<O>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    /// Unregister a subscriber, handing it back to the caller.
    pub fn remove(&mut self, id: ObserverId) -> Option<Box<O>> {
        let idx = self.entries.iter().position(|(eid, _)| *eid == id)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.entries.iter().any(|(eid, _)| *eid == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Invoke `f` on every subscriber in registration order.
    pub fn for_each(&mut self, mut f: impl FnMut(&mut O)) {
        for (_, observer) in &mut self.entries {
            f(observer);
        }
    }
}

impl<O: ?Sized> Default for ObserverList<O> {
    fn default() -> Self {
        Self::new()
    }
}
