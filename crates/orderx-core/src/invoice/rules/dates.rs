//! Order date line.

use super::patterns::DATE_LINE;
use super::{find_line, ExtractionMatch, FieldExtractor};

/// Date extractor: the first line that is nothing but a numeric date.
pub struct DateExtractor;

impl FieldExtractor for DateExtractor {
    type Output = String;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<String>> {
        let (index, line) = find_line(lines, |_, l| DATE_LINE.is_match(l.trim()))?;
        Some(ExtractionMatch::new(line.trim().to_string(), index, line))
    }
}

/// Extract the order date as printed.
pub fn extract_order_date(lines: &[String]) -> Option<String> {
    DateExtractor.extract(lines).map(|m| m.value)
}
