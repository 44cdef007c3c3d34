//! # Scrub Gesture Router
//!
//! Turns raw input events into transport intents. Two competing intents share
//! the same surface: a horizontal drag scrubs, a vertical swipe or wheel tick
//! navigates tracks. Touch gestures are classified within their first few
//! pixels of motion and the axis then stays locked until release — a gesture
//! cannot flip from seeking to navigating midway.
//!
//! The router is a pure event→intent mapping over its own transient state;
//! feed it synthetic sequences and assert the intents, no surface required.

use tracing::trace;

use crate::view::TimeAxis;

/// Wheel delta accumulation needed for one track step on desktop.
pub const WHEEL_STEP_THRESHOLD: f32 = 150.0;
/// Vertical swipe accumulation needed for one track step on touch.
pub const TOUCH_STEP_THRESHOLD: f32 = 60.0;
/// Motion (px) within which a touch gesture's axis is still undecided.
const AXIS_CLASSIFY_PX: f32 = 10.0;

/// Raw input events, host-agnostic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    Wheel { delta_y: f32 },
    KeyDown { key: Key },
    TouchStart { x: f32, y: f32 },
    TouchMove { x: f32, y: f32 },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Other,
}

/// What the transport should do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerIntent {
    /// Move the playback position to this time (seconds).
    Seek(f64),
    /// Flip play/pause.
    ToggleTransport,
    /// Switch to the adjacent track in this direction (±1).
    StepTrack(isize),
    /// Reset the inactivity overlay timer.
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

/// Transient state of an in-progress drag. Created on down (or on the first
/// classified horizontal touch move), destroyed on release.
#[derive(Debug, Clone, Copy)]
struct DragState {
    start_x: f32,
    current_x: f32,
    moved: bool,
    was_playing_before_drag: bool,
}

/// Transient state of a touch sequence awaiting or holding axis
/// classification.
#[derive(Debug, Clone, Copy)]
struct TouchState {
    origin_x: f32,
    origin_y: f32,
    axis: Option<Axis>,
    last_y: f32,
}

/// The input-to-intent state machine.
#[derive(Debug, Default)]
pub struct ScrubGestureRouter {
    drag: Option<DragState>,
    touch: Option<TouchState>,
    wheel_accum: f32,
    touch_accum: f32,
}

impl ScrubGestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret one event. `axis` is the current frame's time↔pixel mapping
    /// (the same one the renderer draws with); `is_playing` is sampled so a
    /// drag can remember the transport state it started under.
    pub fn route(
        &mut self,
        event: InputEvent,
        axis: &TimeAxis,
        is_playing: bool,
    ) -> Vec<PlayerIntent> {
        let mut intents = Vec::new();
        match event {
            InputEvent::PointerDown { x, .. } => {
                intents.push(PlayerIntent::Activity);
                self.drag = Some(DragState {
                    start_x: x,
                    current_x: x,
                    moved: false,
                    was_playing_before_drag: is_playing,
                });
            }
            InputEvent::PointerMove { x, .. } => {
                intents.push(PlayerIntent::Activity);
                if let Some(drag) = self.drag.as_mut() {
                    if (x - drag.start_x).abs() > 0.0 {
                        drag.moved = true;
                        drag.current_x = x.clamp(0.0, axis.width);
                        intents.push(PlayerIntent::Seek(axis.x_to_time(drag.current_x)));
                    }
                }
            }
            InputEvent::PointerUp => {
                if let Some(drag) = self.drag.take() {
                    if !drag.moved {
                        // A press without motion is a tap.
                        intents.push(PlayerIntent::ToggleTransport);
                    }
                    // A finished drag needs nothing: seeks preserved the
                    // transport state throughout.
                }
            }
            InputEvent::Wheel { delta_y } => {
                self.wheel_accum += delta_y;
                if self.wheel_accum > WHEEL_STEP_THRESHOLD {
                    intents.push(PlayerIntent::StepTrack(1));
                    self.wheel_accum = 0.0;
                } else if self.wheel_accum < -WHEEL_STEP_THRESHOLD {
                    intents.push(PlayerIntent::StepTrack(-1));
                    self.wheel_accum = 0.0;
                }
            }
            InputEvent::KeyDown { key } => {
                intents.push(PlayerIntent::Activity);
                if key == Key::Space {
                    intents.push(PlayerIntent::ToggleTransport);
                }
            }
            InputEvent::TouchStart { x, y } => {
                intents.push(PlayerIntent::Activity);
                self.touch = Some(TouchState {
                    origin_x: x,
                    origin_y: y,
                    axis: None,
                    last_y: y,
                });
                self.touch_accum = 0.0;
            }
            InputEvent::TouchMove { x, y } => {
                let Some(mut touch) = self.touch else {
                    return intents;
                };
                if touch.axis.is_none() {
                    let dx = (x - touch.origin_x).abs();
                    let dy = (y - touch.origin_y).abs();
                    if dx > AXIS_CLASSIFY_PX || dy > AXIS_CLASSIFY_PX {
                        let axis_lock = if dx > dy { Axis::X } else { Axis::Y };
                        trace!(?axis_lock, "touch gesture classified");
                        touch.axis = Some(axis_lock);
                        if axis_lock == Axis::X {
                            self.drag = Some(DragState {
                                start_x: touch.origin_x,
                                current_x: touch.origin_x,
                                moved: false,
                                was_playing_before_drag: is_playing,
                            });
                        }
                    } else {
                        self.touch = Some(touch);
                        return intents;
                    }
                }
                match touch.axis {
                    Some(Axis::X) => {
                        if let Some(drag) = self.drag.as_mut() {
                            drag.moved = true;
                            drag.current_x = x.clamp(0.0, axis.width);
                            intents.push(PlayerIntent::Seek(axis.x_to_time(drag.current_x)));
                        }
                    }
                    Some(Axis::Y) => {
                        self.touch_accum += touch.last_y - y;
                        touch.last_y = y;
                        if self.touch_accum > TOUCH_STEP_THRESHOLD {
                            intents.push(PlayerIntent::StepTrack(1));
                            self.touch_accum = 0.0;
                        } else if self.touch_accum < -TOUCH_STEP_THRESHOLD {
                            intents.push(PlayerIntent::StepTrack(-1));
                            self.touch_accum = 0.0;
                        }
                    }
                    None => {}
                }
                self.touch = Some(touch);
            }
            InputEvent::TouchEnd => {
                let touch = self.touch.take();
                if let Some(drag) = self.drag.take() {
                    if !drag.moved {
                        intents.push(PlayerIntent::ToggleTransport);
                    }
                } else if touch.is_some_and(|t| t.axis.is_none()) {
                    // Touch released without any classified motion: a tap.
                    intents.push(PlayerIntent::ToggleTransport);
                }
            }
        }
        intents
    }

    /// X position of the active drag, for the playhead while scrubbing.
    pub fn drag_x(&self) -> Option<f32> {
        self.drag.as_ref().filter(|d| d.moved).map(|d| d.current_x)
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Transport state captured when the active drag began. Seeks preserve
    /// play/pause on their own; this is exposed so hosts with a real audio
    /// backend can re-assert the pre-drag state on release.
    pub fn drag_was_playing(&self) -> Option<bool> {
        self.drag.as_ref().map(|d| d.was_playing_before_drag)
    }
}
