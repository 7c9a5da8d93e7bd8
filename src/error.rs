use thiserror::Error;

use crate::layout::LayoutKey;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    /// A node read an area that was not calculated during the current frame.
    #[error("area with key {key} not found in layout")]
    MissingArea { key: LayoutKey },
}
