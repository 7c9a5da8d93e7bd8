use std::cell::Cell;
use std::rc::Rc;

use approx::assert_abs_diff_eq;
use gpu_chart::ChartError;
use gpu_chart::core::{Vector2, Viewport};
use gpu_chart::error::ChartResult;
use gpu_chart::interaction::{
    EventDispatcher, EventPayload, EventType, EventValue, FixedSurface, InteractionConfig,
    RawInput, SharedEventHandler, SurfaceRect, TouchPoint,
};
use gpu_chart::layout::{LayoutArea, LayoutCache, LayoutCell, LayoutContext, LayoutKey, LayoutNode};

fn bound_dispatcher(config: InteractionConfig) -> EventDispatcher {
    let mut dispatcher = EventDispatcher::new(config);
    dispatcher.bind(Some(Box::new(FixedSurface::new(
        1,
        SurfaceRect::new(0.0, 0.0, 1000.0, 500.0),
    ))));
    dispatcher
}

fn counting_handler(calls: &Rc<Cell<usize>>, consume: bool) -> SharedEventHandler {
    let calls = Rc::clone(calls);
    Rc::new(
        move |_event: &EventValue, _node: LayoutKey, _area: LayoutArea| -> ChartResult<bool> {
            calls.set(calls.get() + 1);
            Ok(consume)
        },
    )
}

fn root_cache() -> (LayoutCell, LayoutCache) {
    let context = LayoutContext::new(Viewport::new(1000, 500));
    let mut cache = LayoutCache::new();
    let root = LayoutCell::new();
    root.calculate(&context, &mut cache, context.root_area())
        .expect("layout pass");
    (root, cache)
}

#[test]
fn mouse_drag_emits_incremental_pan_deltas() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_mouse_down(500.0, 500.0, 1);
    dispatcher.on_mouse_move(600.0, 500.0, 1);
    dispatcher.on_mouse_move(600.0, 600.0, 1);

    let events = dispatcher.pending_events();
    assert_eq!(events.len(), 2);

    let first = events[0].pan_delta();
    assert_abs_diff_eq!(first.x, 0.1, epsilon = 1e-12);
    assert_abs_diff_eq!(first.y, 0.0, epsilon = 1e-12);
    let second = events[1].pan_delta();
    assert_abs_diff_eq!(second.x, 0.0, epsilon = 1e-12);
    assert_abs_diff_eq!(second.y, 0.1, epsilon = 1e-12);

    // Pan events are positioned at the drag anchor.
    assert_eq!(events[0].position, Vector2::new(0.5, 0.5));
    assert_eq!(events[1].position, Vector2::new(0.5, 0.5));
}

#[test]
fn mouse_move_without_primary_button_does_not_pan() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_mouse_down(100.0, 100.0, 1);
    dispatcher.on_mouse_move(120.0, 100.0, 0);
    dispatcher.on_mouse_move(140.0, 100.0, 3);
    dispatcher.on_mouse_up();
    dispatcher.on_mouse_move(160.0, 100.0, 1);

    assert!(dispatcher.pending_events().is_empty());
}

#[test]
fn wheel_is_queued_at_pointer_with_raw_delta() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, LayoutKey::next(), counting_handler(&calls, true));

    let prevent_default = dispatcher.handle_input(RawInput::Wheel {
        client_x: 250.0,
        client_y: 100.0,
        delta_y: 120.0,
    });

    assert!(prevent_default);
    assert_eq!(
        dispatcher.pending_events(),
        &[EventValue::wheel(Vector2::new(0.25, 0.1), 120.0)]
    );
}

#[test]
fn input_without_listeners_is_not_queued() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());

    assert!(!dispatcher.on_wheel(10.0, 10.0, 120.0));
    dispatcher.on_mouse_down(10.0, 10.0, 1);
    dispatcher.on_mouse_move(20.0, 10.0, 1);

    assert!(dispatcher.pending_events().is_empty());
}

#[test]
fn input_without_surface_is_dropped() {
    let mut dispatcher = EventDispatcher::default();
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, LayoutKey::next(), counting_handler(&calls, true));

    assert!(!dispatcher.is_bound());
    assert!(!dispatcher.on_wheel(10.0, 10.0, 120.0));
    assert!(dispatcher.pending_events().is_empty());
}

#[test]
fn unbinding_clears_queue_and_gesture_state() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_mouse_down(0.0, 0.0, 1);
    dispatcher.on_mouse_move(10.0, 0.0, 1);
    assert_eq!(dispatcher.pending_events().len(), 1);

    dispatcher.dispose();
    assert!(dispatcher.pending_events().is_empty());

    dispatcher.on_mouse_move(20.0, 0.0, 1);
    assert!(dispatcher.pending_events().is_empty());

    // A fresh surface needs a fresh mouse-down before panning again.
    dispatcher.bind(Some(Box::new(FixedSurface::new(
        2,
        SurfaceRect::new(0.0, 0.0, 100.0, 100.0),
    ))));
    dispatcher.on_mouse_move(30.0, 0.0, 1);
    assert!(dispatcher.pending_events().is_empty());
}

#[test]
fn rebinding_the_same_surface_keeps_pending_events() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_wheel(10.0, 10.0, 50.0);
    dispatcher.bind(Some(Box::new(FixedSurface::new(
        1,
        SurfaceRect::new(0.0, 0.0, 1000.0, 500.0),
    ))));
    assert_eq!(dispatcher.pending_events().len(), 1);
}

#[test]
fn positions_are_normalized_by_surface_width() {
    let mut dispatcher = EventDispatcher::default();
    dispatcher.bind(Some(Box::new(FixedSurface::new(
        7,
        SurfaceRect::new(100.0, 50.0, 400.0, 200.0),
    ))));
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_wheel(300.0, 250.0, 1.0);
    assert_eq!(dispatcher.pending_events()[0].position, Vector2::new(0.5, 0.5));
}

#[test]
fn pinch_emits_wheel_steps_outside_the_dead_zone() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.on_touch_start(&[
        TouchPoint::new(1, 100.0, 100.0),
        TouchPoint::new(2, 200.0, 100.0),
    ]);
    dispatcher.on_touch_move(&[
        TouchPoint::new(1, 90.0, 100.0),
        TouchPoint::new(2, 210.0, 100.0),
    ]);
    // Within the dead zone of the last emitted distance.
    dispatcher.on_touch_move(&[
        TouchPoint::new(1, 89.0, 100.0),
        TouchPoint::new(2, 211.0, 100.0),
    ]);
    dispatcher.on_touch_move(&[
        TouchPoint::new(1, 100.0, 100.0),
        TouchPoint::new(2, 200.0, 100.0),
    ]);

    let events = dispatcher.pending_events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].position, Vector2::new(0.15, 0.1));
    assert_abs_diff_eq!(events[0].wheel_delta(), -40.0, epsilon = 1e-9);
    assert_abs_diff_eq!(events[1].wheel_delta(), 40.0, epsilon = 1e-9);
}

#[test]
fn single_touch_pans_incrementally_and_resets_on_release() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));

    dispatcher.handle_input(RawInput::TouchStart {
        touches: vec![TouchPoint::new(1, 100.0, 100.0)],
    });
    dispatcher.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 150.0, 100.0)],
    });
    dispatcher.handle_input(RawInput::TouchEnd { touches: vec![] });
    // After release the next move only re-anchors.
    dispatcher.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 300.0, 100.0)],
    });

    let events = dispatcher.pending_events();
    assert_eq!(events.len(), 1);
    assert_abs_diff_eq!(events[0].pan_delta().x, 0.05, epsilon = 1e-12);
    assert_eq!(events[0].position, Vector2::new(0.1, 0.1));
}

#[test]
fn first_consuming_listener_wins() {
    let (root, cache) = root_cache();
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());

    let passive = Rc::new(Cell::new(0));
    let consuming = Rc::new(Cell::new(0));
    let shadowed = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, root.key(), counting_handler(&passive, false));
    dispatcher.on(EventType::Wheel, root.key(), counting_handler(&consuming, true));
    dispatcher.on(EventType::Wheel, root.key(), counting_handler(&shadowed, true));

    dispatcher.on_wheel(100.0, 100.0, 120.0);
    dispatcher.on_wheel(200.0, 100.0, 120.0);
    let summary = dispatcher.dispatch(&cache).expect("dispatch");

    assert_eq!(summary.events, 2);
    assert_eq!(summary.delivered, 4);
    assert_eq!(summary.consumed, 2);
    assert_eq!(passive.get(), 2);
    assert_eq!(consuming.get(), 2);
    assert_eq!(shadowed.get(), 0);
    assert!(dispatcher.pending_events().is_empty());
}

#[test]
fn events_outside_the_listener_area_are_skipped() {
    let mut cache = LayoutCache::new();
    let node = LayoutKey::next();
    cache.set_area(node, LayoutArea::new(0.0, 0.0, 0.2, 0.2));

    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Wheel, node, counting_handler(&calls, true));

    dispatcher.on_wheel(500.0, 100.0, 1.0);
    dispatcher.on_wheel(200.0, 200.0, 1.0);
    let summary = dispatcher.dispatch(&cache).expect("dispatch");

    assert_eq!(summary.events, 2);
    assert_eq!(calls.get(), 1);
}

#[test]
fn listener_type_is_ignored_unless_configured() {
    let (root, cache) = root_cache();

    let mut lenient = bound_dispatcher(InteractionConfig::default());
    let lenient_calls = Rc::new(Cell::new(0));
    lenient.on(EventType::Pan, root.key(), counting_handler(&lenient_calls, true));
    lenient.on_wheel(10.0, 10.0, 1.0);
    lenient.dispatch(&cache).expect("dispatch");
    assert_eq!(lenient_calls.get(), 1);

    let strict_config = InteractionConfig {
        match_listener_event_type: true,
        ..InteractionConfig::default()
    };
    let mut strict = bound_dispatcher(strict_config);
    let strict_calls = Rc::new(Cell::new(0));
    strict.on(EventType::Pan, root.key(), counting_handler(&strict_calls, true));
    strict.on_wheel(10.0, 10.0, 1.0);
    strict.dispatch(&cache).expect("dispatch");
    assert_eq!(strict_calls.get(), 0);
}

#[test]
fn reregistering_a_handler_replaces_its_binding() {
    let (root, cache) = root_cache();
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    let handler = counting_handler(&calls, true);

    dispatcher.on(EventType::Wheel, LayoutKey::next(), handler.clone());
    dispatcher.on(EventType::Wheel, root.key(), handler.clone());
    assert_eq!(dispatcher.listener_count(), 1);

    dispatcher.on_wheel(10.0, 10.0, 1.0);
    dispatcher.dispatch(&cache).expect("dispatch");
    assert_eq!(calls.get(), 1);

    assert!(dispatcher.off(&handler));
    assert!(!dispatcher.off(&handler));
    assert_eq!(dispatcher.listener_count(), 0);
}

#[test]
fn listener_on_uncalculated_node_aborts_dispatch() {
    let (_root, cache) = root_cache();
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let calls = Rc::new(Cell::new(0));
    let missing = LayoutKey::next();
    dispatcher.on(EventType::Wheel, missing, counting_handler(&calls, true));

    dispatcher.on_wheel(10.0, 10.0, 1.0);
    let result = dispatcher.dispatch(&cache);
    assert!(matches!(result, Err(ChartError::MissingArea { key }) if key == missing));
}

#[test]
fn handler_payload_matches_queued_event() {
    let (root, cache) = root_cache();
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    let seen = Rc::new(Cell::new(None));
    let sink = Rc::clone(&seen);
    let handler: SharedEventHandler = Rc::new(
        move |event: &EventValue, _node: LayoutKey, area: LayoutArea| -> ChartResult<bool> {
            sink.set(Some((event.payload, area)));
            Ok(true)
        },
    );
    dispatcher.on(EventType::Wheel, root.key(), handler);

    dispatcher.on_wheel(10.0, 10.0, -240.0);
    dispatcher.dispatch(&cache).expect("dispatch");

    let (payload, area) = seen.get().expect("handler called");
    assert_eq!(payload, EventPayload::Wheel { delta: -240.0 });
    assert_eq!(area, LayoutArea::new(0.0, 0.0, 1.0, 0.5));
}

#[test]
fn invalid_interaction_config_is_rejected() {
    let config = InteractionConfig {
        wheel_zoom_divisor: 0.0,
        ..InteractionConfig::default()
    };
    assert!(config.validate().is_err());
    assert!(InteractionConfig::default().validate().is_ok());
    assert_eq!(InteractionConfig::default().wheel_zoom_fraction(120.0), 0.1);
}

#[test]
fn touch_move_only_suppresses_default_when_a_gesture_is_queued() {
    let mut unbound = EventDispatcher::default();
    let calls = Rc::new(Cell::new(0));
    unbound.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));
    assert!(!unbound.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 100.0, 100.0)],
    }));

    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    assert!(!dispatcher.handle_input(RawInput::TouchMove { touches: vec![] }));
    // The first move only seeds the anchor.
    assert!(!dispatcher.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 100.0, 100.0)],
    }));
    // Nothing is listening yet.
    assert!(!dispatcher.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 120.0, 100.0)],
    }));

    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));
    assert!(dispatcher.handle_input(RawInput::TouchMove {
        touches: vec![TouchPoint::new(1, 150.0, 100.0)],
    }));
    assert_eq!(dispatcher.pending_events().len(), 1);
}

#[test]
fn pointer_position_tracks_hover_until_leave() {
    let mut dispatcher = bound_dispatcher(InteractionConfig::default());
    assert_eq!(dispatcher.pointer_position(), None);

    dispatcher.on_mouse_move(250.0, 100.0, 0);
    assert_eq!(dispatcher.pointer_position(), Some(Vector2::new(0.25, 0.1)));

    // Secondary buttons move the hover point without starting a drag.
    let calls = Rc::new(Cell::new(0));
    dispatcher.on(EventType::Pan, LayoutKey::next(), counting_handler(&calls, true));
    dispatcher.on_mouse_down(500.0, 100.0, 2);
    dispatcher.on_mouse_move(600.0, 100.0, 1);
    assert!(dispatcher.pending_events().is_empty());
    assert_eq!(dispatcher.pointer_position(), Some(Vector2::new(0.6, 0.1)));

    dispatcher.on_mouse_leave();
    assert_eq!(dispatcher.pointer_position(), None);
}
