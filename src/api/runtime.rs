use tracing::debug;

use crate::api::{ChartConfig, FrameThrottle, draw_layout_debug};
use crate::core::{Vector2, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{DispatchSummary, EventDispatcher};
use crate::layout::{LayoutCache, LayoutContext, LayoutNode, TextMeasurer};
use crate::render::{RenderFrame, Renderer};

/// Read-only view of one frame handed to the render callback.
#[derive(Debug)]
pub struct FrameState<'a> {
    pub time_ms: f64,
    pub context: &'a LayoutContext,
    pub cache: &'a LayoutCache,
    pub dispatch: DispatchSummary,
    /// Hover position over the bound surface, for crosshairs and markers.
    pub pointer: Option<Vector2>,
}

/// Fills the frame's primitives once layout and input handling are done.
pub type RenderCallback = Box<dyn FnMut(&FrameState<'_>, &mut RenderFrame) -> ChartResult<()>>;

/// Frame driver: owns the layout cache, the event dispatcher and a renderer.
///
/// Each rendered frame runs viewport and throttle checks, cache reset, root
/// layout over `(0, 0, 1, height / width)`, event dispatch, the render
/// callback and finally the renderer, in that order.
pub struct ChartRuntime<R: Renderer> {
    renderer: R,
    context: LayoutContext,
    cache: LayoutCache,
    dispatcher: EventDispatcher,
    root: Option<Box<dyn LayoutNode>>,
    throttle: FrameThrottle,
    render_callback: Option<RenderCallback>,
    debug_layout: bool,
    frames_rendered: u64,
}

impl<R: Renderer> ChartRuntime<R> {
    pub fn new(renderer: R, config: &ChartConfig) -> ChartResult<Self> {
        config.validate()?;
        Ok(Self {
            renderer,
            context: LayoutContext::new(Viewport::new(0, 0)),
            cache: LayoutCache::new(),
            dispatcher: EventDispatcher::new(config.interaction),
            root: None,
            throttle: FrameThrottle::new(config.max_frame_rate)?,
            render_callback: None,
            debug_layout: config.debug_layout,
            frames_rendered: 0,
        })
    }

    #[must_use]
    pub fn with_text_measurer(mut self, text_measurer: Box<dyn TextMeasurer>) -> Self {
        self.context = LayoutContext::new(self.context.viewport()).with_text_measurer(text_measurer);
        self
    }

    /// Replaces the layout root. Keep an `Rc<RefCell<_>>` clone of the node
    /// to reconfigure it between frames.
    pub fn set_root<N: LayoutNode + 'static>(&mut self, root: N) {
        self.root = Some(Box::new(root));
    }

    pub fn clear_root(&mut self) {
        self.root = None;
    }

    pub fn set_render_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&FrameState<'_>, &mut RenderFrame) -> ChartResult<()> + 'static,
    {
        self.render_callback = Some(Box::new(callback));
    }

    pub fn clear_render_callback(&mut self) {
        self.render_callback = None;
    }

    pub fn set_debug_layout(&mut self, enabled: bool) {
        self.debug_layout = enabled;
    }

    #[must_use]
    pub fn debug_layout(&self) -> bool {
        self.debug_layout
    }

    pub fn set_max_frame_rate(&mut self, max_frame_rate: f64) -> ChartResult<()> {
        self.throttle.set_max_frame_rate(max_frame_rate)
    }

    #[must_use]
    pub fn max_frame_rate(&self) -> f64 {
        self.throttle.max_frame_rate()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }

    /// Areas of the last rendered frame.
    #[must_use]
    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    #[must_use]
    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Runs one frame at host time `time_ms`.
    ///
    /// Returns `Ok(false)` when the frame was throttled. Layout and dispatch
    /// errors abort the frame before anything reaches the renderer; the host
    /// may simply try again on its next tick.
    pub fn render_frame(&mut self, time_ms: f64, viewport: Viewport) -> ChartResult<bool> {
        // A rejected viewport must not use up the throttle slot.
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        if !self.throttle.should_render(time_ms) {
            return Ok(false);
        }

        self.context.set_viewport(viewport);
        self.cache.clear();
        if let Some(root) = &self.root {
            root.calculate(&self.context, &mut self.cache, self.context.root_area())?;
        }

        let dispatch = self.dispatcher.dispatch(&self.cache)?;

        let mut frame = RenderFrame::new(viewport);
        if let Some(callback) = self.render_callback.as_mut() {
            let state = FrameState {
                time_ms,
                context: &self.context,
                cache: &self.cache,
                dispatch,
                pointer: self.dispatcher.pointer_position(),
            };
            callback(&state, &mut frame)?;
        }
        if self.debug_layout {
            draw_layout_debug(&self.cache, &mut frame);
        }

        self.renderer.render(&frame)?;
        self.frames_rendered += 1;
        debug!(
            time_ms,
            areas = self.cache.len(),
            events = dispatch.events,
            lines = frame.lines.len(),
            texts = frame.texts.len(),
            "rendered frame"
        );
        Ok(true)
    }

    /// Unbinds input and drops the layout root and render callback.
    pub fn dispose(&mut self) {
        self.dispatcher.dispose();
        self.root = None;
        self.render_callback = None;
        self.cache.clear();
    }
}
