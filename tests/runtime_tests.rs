use std::cell::RefCell;
use std::rc::Rc;

use gpu_chart::ChartError;
use gpu_chart::api::{BasicChartLayout, ChartConfig, ChartRuntime, FrameThrottle, LineSeries};
use gpu_chart::axis::VerticalAxisPosition;
use gpu_chart::core::{DataPoint, Scale, Viewport};
use gpu_chart::interaction::{FixedSurface, SurfaceRect};
use gpu_chart::render::NullRenderer;

fn viewport() -> Viewport {
    Viewport::new(800, 400)
}

fn runtime(config: &ChartConfig) -> ChartRuntime<NullRenderer> {
    ChartRuntime::new(NullRenderer::default(), config).expect("runtime")
}

#[test]
fn throttle_skips_frames_inside_the_delay() {
    let mut throttle = FrameThrottle::default();
    assert_eq!(throttle.frame_delay_ms(), 10.0);

    assert!(throttle.should_render(0.0));
    assert!(!throttle.should_render(5.0));
    assert!(!throttle.should_render(10.0));
    assert!(throttle.should_render(20.0));
    assert!(!throttle.should_render(30.0));
    assert!(throttle.should_render(31.0));

    throttle.reset();
    assert!(throttle.should_render(31.5));
}

#[test]
fn throttle_rejects_invalid_rates() {
    assert!(FrameThrottle::new(0.0).is_err());
    assert!(FrameThrottle::new(f64::INFINITY).is_err());

    let mut throttle = FrameThrottle::new(50.0).expect("throttle");
    assert_eq!(throttle.frame_delay_ms(), 20.0);
    assert!(throttle.set_max_frame_rate(-1.0).is_err());
    assert_eq!(throttle.max_frame_rate(), 50.0);
}

#[test]
fn runtime_throttles_and_counts_frames() {
    let mut runtime = runtime(&ChartConfig::default());

    assert!(runtime.render_frame(0.0, viewport()).expect("frame 0"));
    assert!(!runtime.render_frame(5.0, viewport()).expect("frame 5"));
    assert!(runtime.render_frame(20.0, viewport()).expect("frame 20"));
    assert!(!runtime.render_frame(30.0, viewport()).expect("frame 30"));

    assert_eq!(runtime.frames_rendered(), 2);
    assert_eq!(runtime.renderer().frames_rendered, 2);
}

#[test]
fn invalid_viewport_fails_the_frame() {
    let mut runtime = runtime(&ChartConfig::default());
    let err = runtime
        .render_frame(0.0, Viewport::new(0, 400))
        .expect_err("zero width");
    assert!(matches!(
        err,
        ChartError::InvalidViewport {
            width: 0,
            height: 400
        }
    ));
    assert_eq!(runtime.frames_rendered(), 0);

    // The rejected frame does not count towards the frame-rate limit.
    assert!(runtime.render_frame(1.0, viewport()).expect("valid frame"));
    assert_eq!(runtime.frames_rendered(), 1);
}

#[test]
fn callback_draws_chart_and_series() {
    let mut runtime = runtime(&ChartConfig::default());
    let x_scale = Scale::new(0.0, 10.0).expect("x").into_shared();
    let y_scale = Scale::new(0.0, 100.0).expect("y").into_shared();

    let mut chart = BasicChartLayout::new(
        runtime.dispatcher_mut(),
        x_scale.clone(),
        None,
        ChartConfig::default().axes,
    )
    .expect("chart layout");
    chart.add_y_scale(
        runtime.dispatcher_mut(),
        y_scale.clone(),
        Some("Value".to_owned()),
        VerticalAxisPosition::Left,
    );
    let chart = Rc::new(RefCell::new(chart));
    runtime.set_root(chart.clone());

    let series = LineSeries::new(vec![
        DataPoint::new(0.0, 0.0),
        DataPoint::new(5.0, 50.0),
        DataPoint::new(10.0, 100.0),
    ]);
    let drawn = chart.clone();
    runtime.set_render_callback(move |state, frame| {
        let chart = drawn.borrow();
        chart.draw(state.context, state.cache, frame)?;
        let area = chart.chart_area(state.cache)?;
        series.draw(&x_scale.borrow(), &y_scale.borrow(), area, frame)
    });

    assert!(runtime.render_frame(0.0, viewport()).expect("frame"));
    let renderer = runtime.renderer();
    assert!(renderer.last_line_count > 2);
    assert!(renderer.last_text_count > 2);
    assert_eq!(renderer.last_rect_count, 0);
}

#[test]
fn callback_errors_abort_the_frame() {
    let mut runtime = runtime(&ChartConfig::default());
    runtime.set_render_callback(|_, _| Err(ChartError::InvalidData("boom".to_owned())));

    assert!(runtime.render_frame(0.0, viewport()).is_err());
    assert_eq!(runtime.renderer().frames_rendered, 0);

    runtime.clear_render_callback();
    assert!(runtime.render_frame(50.0, viewport()).expect("frame"));
}

#[test]
fn debug_layout_outlines_every_cached_area() {
    let config = ChartConfig::default().with_debug_layout(true);
    let mut runtime = runtime(&config);
    let chart = BasicChartLayout::new(
        runtime.dispatcher_mut(),
        Scale::new(0.0, 1.0).expect("x").into_shared(),
        None,
        config.axes.clone(),
    )
    .expect("chart layout");
    runtime.set_root(Rc::new(RefCell::new(chart)));

    runtime.render_frame(0.0, viewport()).expect("frame");
    let areas = runtime.cache().len();
    assert!(areas > 0);
    assert_eq!(runtime.renderer().last_rect_count, areas);
    assert_eq!(runtime.renderer().last_text_count, areas);

    runtime.set_debug_layout(false);
    runtime.render_frame(100.0, viewport()).expect("frame");
    assert_eq!(runtime.renderer().last_rect_count, 0);
}

#[test]
fn frames_dispatch_queued_input() {
    let mut runtime = runtime(&ChartConfig::default());
    let x_scale = Scale::new(0.0, 10.0).expect("x").into_shared();
    let chart = BasicChartLayout::new(
        runtime.dispatcher_mut(),
        x_scale.clone(),
        None,
        ChartConfig::default().axes,
    )
    .expect("chart layout");
    runtime.set_root(Rc::new(RefCell::new(chart)));
    runtime
        .dispatcher_mut()
        .bind(Some(Box::new(FixedSurface::new(7, SurfaceRect::new(0.0, 0.0, 800.0, 400.0)))));

    runtime.dispatcher_mut().on_wheel(400.0, 100.0, 120.0);
    assert_eq!(runtime.dispatcher().pending_events().len(), 1);

    // Throttled frames leave the queue alone.
    runtime.render_frame(0.0, viewport()).expect("frame");
    runtime.dispatcher_mut().on_wheel(400.0, 100.0, 120.0);
    assert!(!runtime.render_frame(1.0, viewport()).expect("throttled"));
    assert_eq!(runtime.dispatcher().pending_events().len(), 1);

    runtime.render_frame(20.0, viewport()).expect("frame");
    assert!(runtime.dispatcher().pending_events().is_empty());
    assert!(x_scale.borrow().range() > 10.0);
}

#[test]
fn dispose_unbinds_and_drops_the_root() {
    let mut runtime = runtime(&ChartConfig::default());
    let chart = BasicChartLayout::new(
        runtime.dispatcher_mut(),
        Scale::new(0.0, 1.0).expect("x").into_shared(),
        None,
        ChartConfig::default().axes,
    )
    .expect("chart layout");
    runtime.set_root(Rc::new(RefCell::new(chart)));
    runtime
        .dispatcher_mut()
        .bind(Some(Box::new(FixedSurface::new(1, SurfaceRect::new(0.0, 0.0, 800.0, 400.0)))));

    runtime.render_frame(0.0, viewport()).expect("frame");
    assert!(!runtime.cache().is_empty());

    runtime.dispose();
    assert!(!runtime.dispatcher().is_bound());
    runtime.render_frame(100.0, viewport()).expect("frame");
    assert!(runtime.cache().is_empty());
}
