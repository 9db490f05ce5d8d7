//! Collaborators that log every call and append it to a shared transcript.

use std::cell::RefCell;
use std::rc::Rc;

use controls_core::{
    AndroidControlsViewSink, BrowserControlsObserver, ContentViewSink, ControlsOffsets,
    FullscreenListener, FullscreenUiSink,
};
use controls_types::{FullscreenOptions, TabId, Visibility};

/// Lines recorded by every sink, in call order.
pub type Transcript = Rc<RefCell<Vec<String>>>;

pub fn new_transcript() -> Transcript {
    Rc::new(RefCell::new(Vec::new()))
}

struct Recorder {
    source: &'static str,
    transcript: Transcript,
}

impl Recorder {
    fn new(source: &'static str, transcript: &Transcript) -> Self {
        Self {
            source,
            transcript: Rc::clone(transcript),
        }
    }

    fn record(&self, line: String) {
        log::info!("[{}] {line}", self.source);
        self.transcript
            .borrow_mut()
            .push(format!("{}: {line}", self.source));
    }
}

pub struct LoggingObserver(Recorder);

impl LoggingObserver {
    pub fn new(transcript: &Transcript) -> Self {
        Self(Recorder::new("observer", transcript))
    }
}

impl BrowserControlsObserver for LoggingObserver {
    fn on_controls_offset_changed(&mut self, offsets: &ControlsOffsets, needs_animate: bool) {
        self.0.record(format!(
            "offsets top={} bottom={} content={} top_min={} bottom_min={} animate={needs_animate}",
            offsets.top_controls_offset,
            offsets.bottom_controls_offset,
            offsets.content_offset,
            offsets.top_min_height_offset,
            offsets.bottom_min_height_offset,
        ));
    }

    fn on_content_offset_changed(&mut self, offset: i32) {
        self.0.record(format!("content offset {offset}"));
    }

    fn on_top_controls_height_changed(&mut self, height: i32, min_height: i32) {
        self.0
            .record(format!("top height {height} (min {min_height})"));
    }

    fn on_bottom_controls_height_changed(&mut self, height: i32, min_height: i32) {
        self.0
            .record(format!("bottom height {height} (min {min_height})"));
    }
}

pub struct LoggingListener(Recorder);

impl LoggingListener {
    pub fn new(transcript: &Transcript) -> Self {
        Self(Recorder::new("fullscreen", transcript))
    }
}

impl FullscreenListener for LoggingListener {
    fn on_enter_fullscreen(&mut self, tab: TabId, options: &FullscreenOptions) {
        self.0.record(format!(
            "enter {tab} (navigation bar {})",
            options.show_navigation_bar
        ));
    }

    fn on_exit_fullscreen(&mut self, tab: TabId) {
        self.0.record(format!("exit {tab}"));
    }
}

pub struct LoggingContentView(Recorder);

impl LoggingContentView {
    pub fn new(transcript: &Transcript) -> Self {
        Self(Recorder::new("content", transcript))
    }
}

impl ContentViewSink for LoggingContentView {
    fn apply_top_translation(&mut self, px: i32) {
        self.0.record(format!("translate top children {px}"));
    }

    fn apply_top_bottom_margins(&mut self, top_px: i32, bottom_px: i32) {
        self.0.record(format!("margins top={top_px} bottom={bottom_px}"));
    }

    fn set_viewport_needs_resize(&mut self, needs_resize: bool) {
        self.0.record(format!("viewport needs resize {needs_resize}"));
    }
}

pub struct LoggingControlsView(Recorder);

impl LoggingControlsView {
    pub fn new(transcript: &Transcript) -> Self {
        Self(Recorder::new("controls", transcript))
    }
}

impl AndroidControlsViewSink for LoggingControlsView {
    fn set_visibility(&mut self, visibility: Visibility) {
        self.0.record(format!("visibility {visibility:?}"));
    }

    fn set_translation_y(&mut self, px: i32) {
        self.0.record(format!("translation y {px}"));
    }
}

pub struct LoggingFullscreenUi(Recorder);

impl LoggingFullscreenUi {
    pub fn new(transcript: &Transcript) -> Self {
        Self(Recorder::new("window", transcript))
    }
}

impl FullscreenUiSink for LoggingFullscreenUi {
    fn apply_fullscreen_flags(&mut self, tab: TabId, options: &FullscreenOptions) {
        self.0.record(format!(
            "apply fullscreen flags {tab} (navigation bar {})",
            options.show_navigation_bar
        ));
    }

    fn clear_fullscreen_flags(&mut self, tab: TabId) {
        self.0.record(format!("clear fullscreen flags {tab}"));
    }

    fn clear_layout_fullscreen_flag(&mut self, tab: TabId) {
        self.0.record(format!("clear layout flag {tab}"));
    }

    fn set_multi_touch_zoom(&mut self, tab: TabId, enabled: bool) {
        self.0.record(format!("multi-touch zoom {tab} {enabled}"));
    }

    fn restore_controls_constraint(&mut self, tab: TabId) {
        self.0.record(format!("restore constraint {tab}"));
    }

    fn show_notification_toast(&mut self) {
        self.0.record("show toast".to_string());
    }

    fn hide_notification_toast(&mut self) {
        self.0.record("hide toast".to_string());
    }
}
