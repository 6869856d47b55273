//! Page layout: positioned text fragments and their grouping into lines.

mod cluster;

pub use cluster::{DEFAULT_LINE_TOLERANCE, Line, LineClusterer, LineGroups, Lines};

/// One positioned run of text on a page.
///
/// Coordinates are the run's baseline origin in page space.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedFragment {
    /// Text content of the run.
    pub text: String,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl PositionedFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}
