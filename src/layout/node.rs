use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::layout::{HeuristicTextMeasurer, LayoutArea, LayoutCache, TextMeasurer};

static NEXT_LAYOUT_KEY: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of one layout node, used as its cache slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayoutKey(u64);

impl LayoutKey {
    /// Allocates a key that no other node of this process will receive.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_LAYOUT_KEY.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayoutKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}", self.0)
    }
}

/// Length expressed either in pixels or in normalized (width-relative) units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScreenLength {
    Pixels(f64),
    Normalized(f64),
}

impl ScreenLength {
    pub const ZERO: Self = Self::Pixels(0.0);

    #[must_use]
    pub fn to_normalized(self, context: &LayoutContext) -> f64 {
        match self {
            Self::Pixels(value) => context.viewport().to_normalized(value),
            Self::Normalized(value) => value,
        }
    }

    #[must_use]
    pub fn to_pixels(self, context: &LayoutContext) -> f64 {
        match self {
            Self::Pixels(value) => value,
            Self::Normalized(value) => context.viewport().to_pixels(value),
        }
    }
}

/// Per-frame inputs shared by every node: the viewport and text metrics.
#[derive(Debug)]
pub struct LayoutContext {
    viewport: Viewport,
    text_measurer: Box<dyn TextMeasurer>,
}

impl LayoutContext {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            text_measurer: Box::new(HeuristicTextMeasurer::default()),
        }
    }

    #[must_use]
    pub fn with_text_measurer(mut self, text_measurer: Box<dyn TextMeasurer>) -> Self {
        self.text_measurer = text_measurer;
        self
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    #[must_use]
    pub fn text_measurer(&self) -> &dyn TextMeasurer {
        self.text_measurer.as_ref()
    }

    /// The full drawing surface: `(0, 0, 1, height / width)`.
    #[must_use]
    pub fn root_area(&self) -> LayoutArea {
        LayoutArea::new(0.0, 0.0, 1.0, self.viewport.aspect_height())
    }
}

/// A node of the layout tree.
///
/// `calculate` is called once per frame with the area assigned by the parent;
/// the node writes its own area into the cache before arranging its children.
pub trait LayoutNode: fmt::Debug {
    fn key(&self) -> LayoutKey;

    fn calculate(
        &self,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()>;

    /// Area written by the last `calculate` of this frame.
    fn area(&self, cache: &LayoutCache) -> ChartResult<LayoutArea> {
        cache.area(self.key())
    }
}

/// Lets a host keep a handle on a node (e.g. a chart layout it reconfigures
/// between frames) while the tree owns a clone of the same node.
impl<N: LayoutNode> LayoutNode for Rc<RefCell<N>> {
    fn key(&self) -> LayoutKey {
        self.borrow().key()
    }

    fn calculate(
        &self,
        context: &LayoutContext,
        cache: &mut LayoutCache,
        area: LayoutArea,
    ) -> ChartResult<()> {
        let node = self.try_borrow().map_err(|_| {
            ChartError::InvalidLayout("layout node is borrowed mutably during calculation".to_owned())
        })?;
        node.calculate(context, cache, area)
    }
}
