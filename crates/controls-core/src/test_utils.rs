//! Shared test utilities for controls-core tests.
//!
//! Every recorder pushes into a shared log handed back from its constructor,
//! so tests can keep inspecting calls after the recorder is boxed and moved
//! into the coordinator.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use controls_types::{ControlsConstraint, FullscreenOptions, TabId, Visibility};

use crate::fullscreen::FullscreenListener;
use crate::offsets::{BrowserControlsObserver, ControlsOffsets};
use crate::sinks::{
    AndroidControlsViewSink, ContentViewSink, FullscreenUiSink, TabControlsFeedback,
};

pub type CallLog<T> = Rc<RefCell<Vec<T>>>;

fn new_log<T>() -> CallLog<T> {
    Rc::new(RefCell::new(Vec::new()))
}

/// A recorded [`BrowserControlsObserver`] notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverCall {
    Offsets {
        offsets: ControlsOffsets,
        needs_animate: bool,
    },
    Content(i32),
    TopHeight(i32, i32),
    BottomHeight(i32, i32),
}

pub struct RecordingObserver {
    calls: CallLog<ObserverCall>,
}

impl RecordingObserver {
    pub fn new() -> (Self, CallLog<ObserverCall>) {
        let calls = new_log();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl BrowserControlsObserver for RecordingObserver {
    fn on_controls_offset_changed(&mut self, offsets: &ControlsOffsets, needs_animate: bool) {
        self.calls.borrow_mut().push(ObserverCall::Offsets {
            offsets: *offsets,
            needs_animate,
        });
    }

    fn on_content_offset_changed(&mut self, offset: i32) {
        self.calls.borrow_mut().push(ObserverCall::Content(offset));
    }

    fn on_top_controls_height_changed(&mut self, height: i32, min_height: i32) {
        self.calls
            .borrow_mut()
            .push(ObserverCall::TopHeight(height, min_height));
    }

    fn on_bottom_controls_height_changed(&mut self, height: i32, min_height: i32) {
        self.calls
            .borrow_mut()
            .push(ObserverCall::BottomHeight(height, min_height));
    }
}

/// A recorded [`FullscreenListener`] notification.
#[derive(Debug, Clone, PartialEq)]
pub enum ListenerCall {
    Enter(TabId, FullscreenOptions),
    Exit(TabId),
}

pub struct RecordingListener {
    calls: CallLog<ListenerCall>,
}

impl RecordingListener {
    pub fn new() -> (Self, CallLog<ListenerCall>) {
        let calls = new_log();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl FullscreenListener for RecordingListener {
    fn on_enter_fullscreen(&mut self, tab: TabId, options: &FullscreenOptions) {
        self.calls
            .borrow_mut()
            .push(ListenerCall::Enter(tab, *options));
    }

    fn on_exit_fullscreen(&mut self, tab: TabId) {
        self.calls.borrow_mut().push(ListenerCall::Exit(tab));
    }
}

/// A recorded [`ContentViewSink`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentCall {
    Translation(i32),
    Margins(i32, i32),
    NeedsResize(bool),
}

pub struct RecordingContentView {
    calls: CallLog<ContentCall>,
}

impl RecordingContentView {
    pub fn new() -> (Self, CallLog<ContentCall>) {
        let calls = new_log();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl ContentViewSink for RecordingContentView {
    fn apply_top_translation(&mut self, px: i32) {
        self.calls.borrow_mut().push(ContentCall::Translation(px));
    }

    fn apply_top_bottom_margins(&mut self, top_px: i32, bottom_px: i32) {
        self.calls
            .borrow_mut()
            .push(ContentCall::Margins(top_px, bottom_px));
    }

    fn set_viewport_needs_resize(&mut self, needs_resize: bool) {
        self.calls
            .borrow_mut()
            .push(ContentCall::NeedsResize(needs_resize));
    }
}

/// A recorded [`AndroidControlsViewSink`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlsViewCall {
    Visibility(Visibility),
    TranslationY(i32),
}

pub struct RecordingControlsView {
    calls: CallLog<ControlsViewCall>,
}

impl RecordingControlsView {
    pub fn new() -> (Self, CallLog<ControlsViewCall>) {
        let calls = new_log();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl AndroidControlsViewSink for RecordingControlsView {
    fn set_visibility(&mut self, visibility: Visibility) {
        self.calls
            .borrow_mut()
            .push(ControlsViewCall::Visibility(visibility));
    }

    fn set_translation_y(&mut self, px: i32) {
        self.calls
            .borrow_mut()
            .push(ControlsViewCall::TranslationY(px));
    }
}

/// A recorded [`FullscreenUiSink`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCall {
    ApplyFlags(TabId, FullscreenOptions),
    ClearFlags(TabId),
    ClearLayoutFlag(TabId),
    MultiTouchZoom(TabId, bool),
    RestoreConstraint(TabId),
    ShowToast,
    HideToast,
}

pub struct RecordingFullscreenUi {
    calls: CallLog<UiCall>,
}

impl RecordingFullscreenUi {
    pub fn new() -> (Self, CallLog<UiCall>) {
        let calls = new_log();
        (
            Self {
                calls: Rc::clone(&calls),
            },
            calls,
        )
    }
}

impl FullscreenUiSink for RecordingFullscreenUi {
    fn apply_fullscreen_flags(&mut self, tab: TabId, options: &FullscreenOptions) {
        self.calls
            .borrow_mut()
            .push(UiCall::ApplyFlags(tab, *options));
    }

    fn clear_fullscreen_flags(&mut self, tab: TabId) {
        self.calls.borrow_mut().push(UiCall::ClearFlags(tab));
    }

    fn clear_layout_fullscreen_flag(&mut self, tab: TabId) {
        self.calls.borrow_mut().push(UiCall::ClearLayoutFlag(tab));
    }

    fn set_multi_touch_zoom(&mut self, tab: TabId, enabled: bool) {
        self.calls
            .borrow_mut()
            .push(UiCall::MultiTouchZoom(tab, enabled));
    }

    fn restore_controls_constraint(&mut self, tab: TabId) {
        self.calls.borrow_mut().push(UiCall::RestoreConstraint(tab));
    }

    fn show_notification_toast(&mut self) {
        self.calls.borrow_mut().push(UiCall::ShowToast);
    }

    fn hide_notification_toast(&mut self) {
        self.calls.borrow_mut().push(UiCall::HideToast);
    }
}

/// A tab whose renderer feedback is set directly by the test.
pub struct FakeTab {
    pub id: TabId,
    pub interactable: Cell<bool>,
    pub hidden: Cell<bool>,
    pub non_renderer_page: Cell<bool>,
    pub offsets: Cell<Option<ControlsOffsets>>,
    pub constraint: Cell<ControlsConstraint>,
}

impl FakeTab {
    pub fn new(id: u32) -> Rc<Self> {
        Rc::new(Self {
            id: TabId(id),
            interactable: Cell::new(true),
            hidden: Cell::new(false),
            non_renderer_page: Cell::new(false),
            offsets: Cell::new(None),
            constraint: Cell::new(ControlsConstraint::Both),
        })
    }

    pub fn report(&self, offsets: ControlsOffsets) {
        self.offsets.set(Some(offsets));
    }

    fn cached(&self) -> ControlsOffsets {
        self.offsets.get().unwrap_or_default()
    }
}

impl TabControlsFeedback for FakeTab {
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
        self.non_renderer_page.get()
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
        self.constraint.get()
    }
}
