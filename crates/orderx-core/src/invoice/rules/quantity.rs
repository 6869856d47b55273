//! Quantity shipped.
//!
//! Two template versions place the quantity differently. The policy is
//! chosen per template version; the two are never combined.

use serde::{Deserialize, Serialize};

use super::patterns::{DIGITS_ONLY, QTY_MARKER};
use super::{ExtractionMatch, FieldExtractor};

/// Where the quantity is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuantityPolicy {
    /// The line right after a line reading exactly "Qty Shipped".
    AfterMarker,
    /// A fixed line index.
    FixedLine(usize),
}

impl Default for QuantityPolicy {
    fn default() -> Self {
        Self::AfterMarker
    }
}

/// Quantity extractor for one policy.
pub struct QuantityExtractor {
    policy: QuantityPolicy,
}

impl QuantityExtractor {
    pub fn new(policy: QuantityPolicy) -> Self {
        Self { policy }
    }
}

impl FieldExtractor for QuantityExtractor {
    type Output = String;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<String>> {
        let index = match self.policy {
            QuantityPolicy::AfterMarker => {
                lines.iter().position(|l| l.trim() == QTY_MARKER)? + 1
            }
            QuantityPolicy::FixedLine(index) => index,
        };

        let line = lines.get(index)?;
        let value = line.trim();
        DIGITS_ONLY
            .is_match(value)
            .then(|| ExtractionMatch::new(value.to_string(), index, line.as_str()))
    }
}

/// Extract the quantity under the given policy.
pub fn extract_quantity(lines: &[String], policy: QuantityPolicy) -> Option<String> {
    QuantityExtractor::new(policy).extract(lines).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::lines;

    #[test]
    fn test_after_marker() {
        let page = lines(&["Model Number X", "Qty Shipped", " 12 "]);
        assert_eq!(
            extract_quantity(&page, QuantityPolicy::AfterMarker),
            Some("12".to_string())
        );
    }

    #[test]
    fn test_after_marker_rejects_non_digits() {
        let page = lines(&["Qty Shipped", "12 EA"]);
        assert_eq!(extract_quantity(&page, QuantityPolicy::AfterMarker), None);

        let page = lines(&["Qty Shipped"]);
        assert_eq!(extract_quantity(&page, QuantityPolicy::AfterMarker), None);

        let page = lines(&["Qty Shipped Total", "3"]);
        assert_eq!(extract_quantity(&page, QuantityPolicy::AfterMarker), None);

        let page = lines(&["Qty Shipped", "١٢"]);
        assert_eq!(extract_quantity(&page, QuantityPolicy::AfterMarker), None);
    }

    #[test]
    fn test_fixed_line() {
        let mut page: Vec<String> = (0..24).map(|i| format!("line {}", i)).collect();
        page.push("7".to_string());

        assert_eq!(
            extract_quantity(&page, QuantityPolicy::FixedLine(24)),
            Some("7".to_string())
        );
        // The marker is ignored in fixed-line mode.
        assert_eq!(extract_quantity(&page, QuantityPolicy::AfterMarker), None);
    }

    #[test]
    fn test_fixed_line_out_of_range() {
        let page = lines(&["Qty Shipped", "4"]);
        assert_eq!(extract_quantity(&page, QuantityPolicy::FixedLine(24)), None);
    }
}
