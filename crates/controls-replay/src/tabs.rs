//! Scripted tabs whose renderer feedback is driven by scenario events.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use controls_core::{ControlsOffsets, TabControlsFeedback};
use controls_types::{ControlsConstraint, TabId};

use crate::scenario::TabEntry;

pub struct ReplayTab {
    id: TabId,
    interactable: Cell<bool>,
    hidden: Cell<bool>,
    crashed: Cell<bool>,
    offsets: Cell<Option<ControlsOffsets>>,
    constraint: ControlsConstraint,
}

impl ReplayTab {
    pub fn from_entry(entry: &TabEntry) -> Self {
        Self {
            id: entry.id,
            interactable: Cell::new(entry.interactable),
            hidden: Cell::new(false),
            crashed: Cell::new(false),
            offsets: Cell::new(None),
            constraint: entry.constraint,
        }
    }

    pub fn set_interactable(&self, interactable: bool) {
        self.interactable.set(interactable);
    }

    /// Hidden tabs are no longer interactable.
    pub fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
        if hidden {
            self.interactable.set(false);
        }
    }

    pub fn set_crashed(&self) {
        self.crashed.set(true);
    }

    /// A main-frame navigation replaces a crash page.
    pub fn clear_crashed(&self) {
        self.crashed.set(false);
    }

    pub fn record_offsets(&self, offsets: ControlsOffsets) {
        self.offsets.set(Some(offsets));
    }

    fn cached(&self) -> ControlsOffsets {
        self.offsets.get().unwrap_or_default()
    }
}

impl TabControlsFeedback for ReplayTab {
    fn id(&self) -> TabId {
        self.id
    }

    fn is_user_interactable(&self) -> bool {
        self.interactable.get()
    }

    fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn is_showing_non_renderer_page(&self) -> bool {
        self.crashed.get()
    }

    fn offset_initialized(&self) -> bool {
        self.offsets.get().is_some()
    }

    fn top_controls_offset(&self) -> i32 {
        self.cached().top_controls_offset
    }

    fn bottom_controls_offset(&self) -> i32 {
        self.cached().bottom_controls_offset
    }

    fn content_offset(&self) -> i32 {
        self.cached().content_offset
    }

    fn top_controls_min_height_offset(&self) -> i32 {
        self.cached().top_min_height_offset
    }

    fn bottom_controls_min_height_offset(&self) -> i32 {
        self.cached().bottom_min_height_offset
    }

    fn committed_constraint(&self) -> ControlsConstraint {
        self.constraint
    }
}

/// Every tab a scenario declares, keyed by id.
#[derive(Default)]
pub struct TabRegistry {
    tabs: BTreeMap<TabId, Rc<ReplayTab>>,
}

impl TabRegistry {
    pub fn from_entries(entries: &[TabEntry]) -> Self {
        let tabs = entries
            .iter()
            .map(|entry| (entry.id, Rc::new(ReplayTab::from_entry(entry))))
            .collect();
        Self { tabs }
    }

    pub fn get(&self, id: TabId) -> Option<&Rc<ReplayTab>> {
        self.tabs.get(&id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }
}
