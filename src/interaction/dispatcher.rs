use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::Vector2;
use crate::error::ChartResult;
use crate::interaction::{
    EventType, EventValue, InputSurface, InteractionConfig, RawInput, TouchPoint,
};
use crate::layout::{LayoutArea, LayoutCache, LayoutKey};

/// Callback for dispatched gestures. Returning `Ok(true)` consumes the event,
/// so no later listener sees it.
pub trait EventHandler {
    fn handle(&self, event: &EventValue, node: LayoutKey, area: LayoutArea) -> ChartResult<bool>;
}

impl<F> EventHandler for F
where
    F: Fn(&EventValue, LayoutKey, LayoutArea) -> ChartResult<bool>,
{
    fn handle(&self, event: &EventValue, node: LayoutKey, area: LayoutArea) -> ChartResult<bool> {
        self(event, node, area)
    }
}

/// Handler handle; its pointer identity is the registration key.
pub type SharedEventHandler = Rc<dyn EventHandler>;

struct ListenerInfo {
    event_type: EventType,
    node: LayoutKey,
    handler: SharedEventHandler,
}

/// Counters of one [`EventDispatcher::dispatch`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Events drained from the queue.
    pub events: usize,
    /// Handler invocations (hit-tests that matched).
    pub delivered: usize,
    /// Events stopped by a handler returning `true`.
    pub consumed: usize,
}

#[derive(Debug, Default, Clone, Copy)]
struct PointerGesture {
    /// Hover position, kept while the pointer is over the surface.
    position: Option<Vector2>,
    anchor: Option<Vector2>,
    last: Option<Vector2>,
}

#[derive(Debug, Default, Clone, Copy)]
struct TouchGesture {
    anchor: Option<Vector2>,
    last: Option<Vector2>,
    /// Two-finger distance in client pixels at the last emitted pinch step.
    pinch_distance: Option<f64>,
}

/// Turns raw pointer/touch/wheel input into queued gestures and delivers them
/// once per frame to listeners whose layout area contains the gesture.
///
/// Input is only queued while a surface is bound and at least one listener is
/// registered; everything else is dropped silently.
pub struct EventDispatcher {
    config: InteractionConfig,
    surface: Option<Box<dyn InputSurface>>,
    listeners: IndexMap<usize, ListenerInfo>,
    queue: Vec<EventValue>,
    pointer: PointerGesture,
    touch: TouchGesture,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("config", &self.config)
            .field("surface", &self.surface)
            .field("listeners", &self.listeners.len())
            .field("queue", &self.queue)
            .field("pointer", &self.pointer)
            .field("touch", &self.touch)
            .finish()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

impl EventDispatcher {
    #[must_use]
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            surface: None,
            listeners: IndexMap::new(),
            queue: Vec::new(),
            pointer: PointerGesture::default(),
            touch: TouchGesture::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> InteractionConfig {
        self.config
    }

    pub fn set_config(&mut self, config: InteractionConfig) -> ChartResult<()> {
        self.config = config.validate()?;
        Ok(())
    }

    /// Binds the dispatcher to an input surface.
    ///
    /// Binding the surface that is already bound is a no-op. Any other change,
    /// including unbinding with `None`, drops queued events and gesture state.
    pub fn bind(&mut self, surface: Option<Box<dyn InputSurface>>) {
        let current = self.surface.as_ref().map(|bound| bound.id());
        let next = surface.as_ref().map(|bound| bound.id());
        if current == next {
            return;
        }

        let dropped = self.queue.len();
        self.reset_pending();
        self.surface = surface;
        debug!(surface = ?next, dropped, "bound event surface");
    }

    /// Unbinds the surface and clears all pending state.
    pub fn dispose(&mut self) {
        self.bind(None);
    }

    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.surface.is_some()
    }

    /// Registers `handler` for gestures hitting `node`'s area.
    ///
    /// Registering the same handler again replaces its event type and node
    /// but keeps its original position in the dispatch order.
    pub fn on(&mut self, event_type: EventType, node: LayoutKey, handler: SharedEventHandler) {
        let key = handler_key(&handler);
        self.listeners.insert(
            key,
            ListenerInfo {
                event_type,
                node,
                handler,
            },
        );
    }

    /// Removes a registration; returns whether the handler was registered.
    pub fn off(&mut self, handler: &SharedEventHandler) -> bool {
        self.listeners.shift_remove(&handler_key(handler)).is_some()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Last normalized pointer position over the bound surface; `None` after
    /// the pointer left it or before any move. Drives hover overlays.
    #[must_use]
    pub fn pointer_position(&self) -> Option<Vector2> {
        self.pointer.position
    }

    /// Events waiting for the next [`EventDispatcher::dispatch`].
    #[must_use]
    pub fn pending_events(&self) -> &[EventValue] {
        &self.queue
    }

    /// Queues an already-normalized gesture, bypassing recognition.
    pub fn enqueue(&mut self, event: EventValue) {
        self.queue.push(event);
    }

    /// Feeds one raw input. Returns `true` when the host should suppress the
    /// input's default action (page scrolling for wheel input).
    pub fn handle_input(&mut self, input: RawInput) -> bool {
        match input {
            RawInput::Wheel {
                client_x,
                client_y,
                delta_y,
            } => self.on_wheel(client_x, client_y, delta_y),
            RawInput::MouseDown {
                client_x,
                client_y,
                buttons,
            } => {
                self.on_mouse_down(client_x, client_y, buttons);
                false
            }
            RawInput::MouseMove {
                client_x,
                client_y,
                buttons,
            } => {
                self.on_mouse_move(client_x, client_y, buttons);
                false
            }
            RawInput::MouseUp => {
                self.on_mouse_up();
                false
            }
            RawInput::MouseLeave => {
                self.on_mouse_leave();
                false
            }
            RawInput::TouchStart { touches } => {
                self.on_touch_start(&touches);
                false
            }
            RawInput::TouchMove { touches } => self.on_touch_move(&touches),
            RawInput::TouchEnd { touches } => {
                self.on_touch_end(&touches);
                false
            }
        }
    }

    /// Queues a wheel gesture at the pointer position with the raw delta.
    pub fn on_wheel(&mut self, client_x: f64, client_y: f64, delta_y: f64) -> bool {
        if self.listeners.is_empty() || !delta_y.is_finite() {
            return false;
        }
        let Some(position) = self.normalize(client_x, client_y) else {
            return false;
        };
        self.push(EventValue::wheel(position, delta_y));
        true
    }

    /// Starts a drag when exactly the primary button is pressed; other
    /// buttons only update the hover position.
    pub fn on_mouse_down(&mut self, client_x: f64, client_y: f64, buttons: u16) {
        let Some(position) = self.normalize(client_x, client_y) else {
            return;
        };
        if buttons != self.config.primary_button_mask {
            self.pointer.position = Some(position);
            return;
        }
        self.pointer = PointerGesture {
            position: Some(position),
            anchor: Some(position),
            last: Some(position),
        };
    }

    /// Emits the movement since the previous move as a pan delta, positioned
    /// at the drag anchor, while exactly the primary button is held.
    pub fn on_mouse_move(&mut self, client_x: f64, client_y: f64, buttons: u16) {
        let Some(position) = self.normalize(client_x, client_y) else {
            return;
        };
        self.pointer.position = Some(position);

        if self.listeners.is_empty() || buttons != self.config.primary_button_mask {
            return;
        }
        let Some(anchor) = self.pointer.anchor else {
            return;
        };
        let last = self.pointer.last.replace(position);
        if let Some(last) = last {
            self.push(EventValue::pan(anchor, position - last));
        }
    }

    pub fn on_mouse_up(&mut self) {
        self.end_pointer_gesture();
    }

    pub fn on_mouse_leave(&mut self) {
        self.end_pointer_gesture();
        self.pointer.position = None;
    }

    pub fn on_touch_start(&mut self, touches: &[TouchPoint]) {
        match touches {
            [] => self.touch = TouchGesture::default(),
            [single] => {
                let position = self.normalize(single.client_x, single.client_y);
                self.touch = TouchGesture {
                    anchor: position,
                    last: position,
                    pinch_distance: None,
                };
            }
            [first, second, ..] => {
                self.touch = TouchGesture {
                    anchor: None,
                    last: None,
                    pinch_distance: Some(client_distance(first, second)),
                };
            }
        }
    }

    /// Returns whether a gesture was queued, i.e. whether the host should
    /// suppress the default touch action (page scrolling).
    pub fn on_touch_move(&mut self, touches: &[TouchPoint]) -> bool {
        match touches {
            [] => false,
            [single] => self.touch_pan(single),
            [first, second, ..] => self.touch_pinch(first, second),
        }
    }

    /// `touches` are the points still down; fewer than two ends every touch
    /// gesture, and a remaining finger starts a fresh pan on its next move.
    pub fn on_touch_end(&mut self, touches: &[TouchPoint]) {
        if touches.len() < 2 {
            self.touch = TouchGesture::default();
        }
    }

    /// Delivers every queued event to the listeners whose node area contains
    /// the event position, in registration order.
    ///
    /// The queue is swapped out first, so events raised while handlers run
    /// wait for the next frame. A listener whose node has no area in `cache`
    /// aborts the dispatch with `MissingArea`.
    pub fn dispatch(&mut self, cache: &LayoutCache) -> ChartResult<DispatchSummary> {
        if self.queue.is_empty() {
            return Ok(DispatchSummary::default());
        }

        let queue = std::mem::take(&mut self.queue);
        let mut summary = DispatchSummary {
            events: queue.len(),
            ..DispatchSummary::default()
        };

        for event in &queue {
            for listener in self.listeners.values() {
                if self.config.match_listener_event_type
                    && listener.event_type != event.event_type()
                {
                    continue;
                }

                let area = cache.area(listener.node)?;
                if !area.contains(event.position) {
                    continue;
                }

                summary.delivered += 1;
                if listener.handler.handle(event, listener.node, area)? {
                    summary.consumed += 1;
                    break;
                }
            }
        }

        debug!(
            events = summary.events,
            delivered = summary.delivered,
            consumed = summary.consumed,
            "dispatched queued events"
        );
        Ok(summary)
    }

    fn touch_pan(&mut self, touch: &TouchPoint) -> bool {
        let Some(position) = self.normalize(touch.client_x, touch.client_y) else {
            return false;
        };
        let (Some(anchor), Some(last)) = (self.touch.anchor, self.touch.last) else {
            self.touch.anchor = Some(position);
            self.touch.last = Some(position);
            return false;
        };
        self.touch.last = Some(position);
        if self.listeners.is_empty() {
            return false;
        }
        self.push(EventValue::pan(anchor, position - last));
        true
    }

    fn touch_pinch(&mut self, first: &TouchPoint, second: &TouchPoint) -> bool {
        let distance = client_distance(first, second);
        let Some(previous) = self.touch.pinch_distance else {
            self.touch.pinch_distance = Some(distance);
            return false;
        };

        let change = distance - previous;
        if change.abs() <= self.config.pinch_dead_zone_px {
            return false;
        }
        self.touch.pinch_distance = Some(distance);

        if self.listeners.is_empty() {
            return false;
        }
        let midpoint_x = (first.client_x + second.client_x) * 0.5;
        let midpoint_y = (first.client_y + second.client_y) * 0.5;
        let Some(position) = self.normalize(midpoint_x, midpoint_y) else {
            return false;
        };
        // Fingers moving apart zoom in, i.e. behave like a negative wheel delta.
        self.push(EventValue::wheel(
            position,
            -change * self.config.pinch_wheel_factor,
        ));
        true
    }

    fn push(&mut self, event: EventValue) {
        trace!(?event, queued = self.queue.len() + 1, "queued gesture");
        self.queue.push(event);
    }

    fn end_pointer_gesture(&mut self) {
        self.pointer.anchor = None;
        self.pointer.last = None;
    }

    fn reset_pending(&mut self) {
        self.queue.clear();
        self.pointer = PointerGesture::default();
        self.touch = TouchGesture::default();
    }

    /// Client coordinates to normalized surface coordinates; both axes are
    /// divided by the surface width. `None` without a usable surface.
    fn normalize(&self, client_x: f64, client_y: f64) -> Option<Vector2> {
        let rect = self.surface.as_ref()?.bounding_rect();
        if !rect.width.is_finite() || rect.width <= 0.0 {
            trace!(width = rect.width, "dropping input for zero-width surface");
            return None;
        }
        Some(Vector2::new(
            (client_x - rect.left) / rect.width,
            (client_y - rect.top) / rect.width,
        ))
    }
}

fn handler_key(handler: &SharedEventHandler) -> usize {
    Rc::as_ptr(handler).cast::<()>() as usize
}

fn client_distance(first: &TouchPoint, second: &TouchPoint) -> f64 {
    (first.client_x - second.client_x).hypot(first.client_y - second.client_y)
}
