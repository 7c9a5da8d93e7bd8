//! Per-frame layout tree.
//!
//! Each frame the host clears a [`LayoutCache`] and calls `calculate` on the
//! root node; every node writes its area and arranges its children
//! depth-first. Renderers and event hit-testing then read the cached areas.

mod alignment;
mod area;
mod cache;
mod cell;
mod intersected;
mod linear;
mod measure;
mod node;
mod table;

pub use alignment::Alignment;
pub use area::LayoutArea;
pub use cache::LayoutCache;
pub use cell::LayoutCell;
pub use intersected::IntersectedLayout;
pub use linear::{Direction, LinearLayout};
pub use measure::{ContentMeasure, HeuristicTextMeasurer, TextMeasurer};
pub use node::{LayoutContext, LayoutKey, LayoutNode, ScreenLength};
pub use table::{HorizontalTableLayout, TableRowLayout};
