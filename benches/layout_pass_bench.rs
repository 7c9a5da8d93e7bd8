use std::cell::RefCell;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use gpu_chart::api::{BasicChartLayout, ChartConfig, ChartRuntime, LineSeries};
use gpu_chart::axis::VerticalAxisPosition;
use gpu_chart::core::{DataPoint, Scale, Viewport};
use gpu_chart::interaction::EventDispatcher;
use gpu_chart::layout::{
    HorizontalTableLayout, LayoutCache, LayoutContext, LayoutNode, LinearLayout,
};
use gpu_chart::render::{NullRenderer, RenderFrame};
use std::hint::black_box;

fn bench_calculate_ticks(c: &mut Criterion) {
    let scale = Scale::new(-1_234.5, 98_765.4).expect("valid scale");

    c.bench_function("calculate_ticks", |b| {
        b.iter(|| {
            let _ = scale
                .calculate_ticks(black_box(7.2), black_box(1_600.0), black_box(false))
                .expect("ticks");
        })
    });
}

fn bench_stacked_chart_layout_pass(c: &mut Criterion) {
    let mut dispatcher = EventDispatcher::default();
    let context = LayoutContext::new(Viewport::new(1920, 1080));
    let table = HorizontalTableLayout::new();
    let mut root = LinearLayout::vertical();

    for pane in 0..4 {
        let mut chart = BasicChartLayout::new(
            &mut dispatcher,
            Scale::new(0.0, 1_000.0).expect("x").into_shared(),
            Some(&table),
            ChartConfig::default().axes,
        )
        .expect("chart layout");
        for axis in 0..=pane % 3 {
            let position = if axis % 2 == 0 {
                VerticalAxisPosition::Left
            } else {
                VerticalAxisPosition::Right
            };
            chart.add_y_scale(
                &mut dispatcher,
                Scale::new(0.0, 100.0).expect("y").into_shared(),
                Some(format!("pane {pane} axis {axis}")),
                position,
            );
        }
        root.add_relative_cell(1.0, false)
            .add_layout(Rc::new(RefCell::new(chart)));
    }

    let mut cache = LayoutCache::new();
    c.bench_function("stacked_chart_layout_pass", |b| {
        b.iter(|| {
            cache.clear();
            root.calculate(&context, &mut cache, context.root_area())
                .expect("layout pass");
            black_box(cache.len());
        })
    });
}

fn bench_runtime_frame_10k_points(c: &mut Criterion) {
    let config = ChartConfig::default().with_max_frame_rate(1_000_000.0);
    let mut runtime = ChartRuntime::new(NullRenderer::default(), &config).expect("runtime");
    let x_scale = Scale::new(0.0, 10_000.0).expect("x").into_shared();
    let y_scale = Scale::new(0.0, 2_500.0).expect("y").into_shared();

    let mut chart = BasicChartLayout::new(
        runtime.dispatcher_mut(),
        x_scale.clone(),
        None,
        config.axes.clone(),
    )
    .expect("chart layout");
    chart.add_y_scale(
        runtime.dispatcher_mut(),
        y_scale.clone(),
        Some("Price".to_owned()),
        VerticalAxisPosition::Left,
    );
    let chart = Rc::new(RefCell::new(chart));
    runtime.set_root(chart.clone());

    let series = LineSeries::new(
        (0..10_000)
            .map(|i| {
                let t = f64::from(i);
                DataPoint::new(t, 1_250.0 + (t * 0.01).sin() * 1_000.0)
            })
            .collect(),
    );
    runtime.set_render_callback(move |state, frame: &mut RenderFrame| {
        let chart = chart.borrow();
        chart.draw(state.context, state.cache, frame)?;
        let area = chart.chart_area(state.cache)?;
        series.draw(&x_scale.borrow(), &y_scale.borrow(), area, frame)
    });

    let viewport = Viewport::new(1600, 900);
    let mut time_ms = 0.0;
    c.bench_function("runtime_frame_10k_points", |b| {
        b.iter(|| {
            time_ms += 1.0;
            let _ = runtime
                .render_frame(black_box(time_ms), viewport)
                .expect("frame should render");
        })
    });
}

criterion_group!(
    benches,
    bench_calculate_ticks,
    bench_stacked_chart_layout_pass,
    bench_runtime_frame_10k_points
);
criterion_main!(benches);
