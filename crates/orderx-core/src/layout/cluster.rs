//! Single-pass Y clustering of fragments into text lines.

use std::iter::{Map, Peekable};
use std::vec::IntoIter;

use tracing::{debug, trace};

use super::PositionedFragment;

/// Default vertical tolerance in page units.
pub const DEFAULT_LINE_TOLERANCE: f32 = 5.0;

/// Line strings of one page, in emission order.
pub type Lines = Map<LineGroups, fn(Line) -> String>;

/// Groups a page's fragments into lines.
///
/// Fragments are sorted by `y`, then swept once. A fragment joins the open
/// line while it lies strictly within `tolerance` of the line's first
/// fragment. A closed line is never reopened.
#[derive(Debug, Clone, Copy)]
pub struct LineClusterer {
    tolerance: f32,
}

impl LineClusterer {
    /// Create a clusterer with the default tolerance.
    pub fn new() -> Self {
        Self {
            tolerance: DEFAULT_LINE_TOLERANCE,
        }
    }

    /// Set the vertical tolerance.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Group fragments into lines, lazily.
    pub fn group(&self, mut fragments: Vec<PositionedFragment>) -> LineGroups {
        fragments.sort_by(|a, b| a.y.total_cmp(&b.y));
        debug!(
            "Clustering {} fragments with tolerance {}",
            fragments.len(),
            self.tolerance
        );

        LineGroups {
            fragments: fragments.into_iter().peekable(),
            tolerance: self.tolerance,
        }
    }

    /// Cluster fragments into line strings, lazily.
    pub fn cluster(&self, fragments: Vec<PositionedFragment>) -> Lines {
        self.group(fragments).map(Line::into_text as fn(Line) -> String)
    }
}

impl Default for LineClusterer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fragments judged to share one text row, ordered by `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    anchor_y: f32,
    fragments: Vec<PositionedFragment>,
}

impl Line {
    /// Vertical position of the first fragment admitted to the line.
    pub fn anchor_y(&self) -> f32 {
        self.anchor_y
    }

    pub fn fragments(&self) -> &[PositionedFragment] {
        &self.fragments
    }

    /// Fragment texts joined by single spaces, trimmed.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .map(|f| f.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    }

    pub fn into_text(self) -> String {
        self.text()
    }
}

/// Iterator over the lines of one page.
///
/// Finite and not restartable: each call to [`LineClusterer::group`] owns
/// its fragments.
pub struct LineGroups {
    fragments: Peekable<IntoIter<PositionedFragment>>,
    tolerance: f32,
}

impl Iterator for LineGroups {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let anchor = self.fragments.next()?;
        let anchor_y = anchor.y;
        let tolerance = self.tolerance;

        let mut fragments = vec![anchor];
        while let Some(fragment) = self
            .fragments
            .next_if(|f| (f.y - anchor_y).abs() < tolerance)
        {
            fragments.push(fragment);
        }

        fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
        trace!("Line at y={:.1}: {} fragments", anchor_y, fragments.len());

        Some(Line {
            anchor_y,
            fragments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frag(text: &str, x: f32, y: f32) -> PositionedFragment {
        PositionedFragment::new(text, x, y)
    }

    #[test]
    fn test_empty_input() {
        let lines: Vec<String> = LineClusterer::new().cluster(Vec::new()).collect();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_groups_by_y_and_orders_by_x() {
        let fragments = vec![
            frag("World", 50.0, 100.0),
            frag("Second", 10.0, 120.0),
            frag("Hello", 10.0, 102.0),
            frag("line", 60.0, 121.0),
        ];

        let lines: Vec<String> = LineClusterer::new().cluster(fragments).collect();
        assert_eq!(lines, vec!["Hello World", "Second line"]);
    }

    #[test]
    fn test_tolerance_is_measured_from_anchor() {
        // 100 -> 104 -> 108: 108 is within 5 of 104 but not of the anchor.
        let fragments = vec![
            frag("a", 0.0, 100.0),
            frag("b", 10.0, 104.0),
            frag("c", 20.0, 108.0),
        ];

        let lines: Vec<String> = LineClusterer::new().cluster(fragments).collect();
        assert_eq!(lines, vec!["a b", "c"]);
    }

    #[test]
    fn test_tolerance_is_strict() {
        let fragments = vec![frag("a", 0.0, 100.0), frag("b", 10.0, 105.0)];

        let lines: Vec<String> = LineClusterer::new().cluster(fragments).collect();
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn test_custom_tolerance() {
        let fragments = vec![frag("a", 0.0, 100.0), frag("b", 10.0, 112.0)];

        let lines: Vec<String> = LineClusterer::new()
            .with_tolerance(15.0)
            .cluster(fragments)
            .collect();
        assert_eq!(lines, vec!["a b"]);
    }

    #[test]
    fn test_trims_joined_text() {
        let fragments = vec![frag("  Qty Shipped ", 0.0, 10.0), frag(" ", 90.0, 10.0)];

        let lines: Vec<String> = LineClusterer::new().cluster(fragments).collect();
        assert_eq!(lines, vec!["Qty Shipped"]);
    }

    #[test]
    fn test_line_order_follows_anchor_y() {
        let fragments = vec![
            frag("top", 0.0, 700.0),
            frag("bottom", 0.0, 40.0),
            frag("middle", 0.0, 300.0),
            frag("middle-right", 200.0, 302.5),
        ];

        let lines: Vec<Line> = LineClusterer::new().group(fragments).collect();
        let anchors: Vec<f32> = lines.iter().map(Line::anchor_y).collect();
        assert!(anchors.windows(2).all(|w| w[0] <= w[1]));

        for line in &lines {
            let xs: Vec<f32> = line.fragments().iter().map(|f| f.x).collect();
            assert!(xs.windows(2).all(|w| w[0] <= w[1]));
        }

        let texts: Vec<String> = lines.into_iter().map(Line::into_text).collect();
        assert_eq!(texts, vec!["bottom", "middle middle-right", "top"]);
    }

    #[test]
    fn test_reclustering_output_is_stable() {
        let fragments = vec![
            frag("PO #", 10.0, 700.0),
            frag("PO12345", 40.0, 701.0),
            frag("Ship To:", 10.0, 680.0),
            frag("John Doe", 60.0, 683.0),
            frag("Qty Shipped", 10.0, 400.0),
            frag("2", 10.0, 390.0),
        ];

        let clusterer = LineClusterer::new();
        let lines: Vec<Line> = clusterer.group(fragments).collect();
        let first: Vec<String> = lines.iter().map(Line::text).collect();

        let synthetic: Vec<PositionedFragment> = lines
            .iter()
            .map(|line| frag(&line.text(), 0.0, line.anchor_y()))
            .collect();
        let second: Vec<String> = clusterer.cluster(synthetic).collect();

        assert_eq!(first, second);
    }
}
