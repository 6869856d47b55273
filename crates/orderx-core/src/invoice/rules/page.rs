//! In-document page number marker.

use super::patterns::{PAGE_MARKER, PAGE_NUMBER};
use super::{ExtractionMatch, FieldExtractor};

/// "Page: N" extractor.
pub struct PageNumberExtractor;

impl FieldExtractor for PageNumberExtractor {
    type Output = u32;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<u32>> {
        lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.contains(PAGE_MARKER))
            .find_map(|(index, line)| {
                let caps = PAGE_NUMBER.captures(line)?;
                let page = caps[1].parse().ok()?;
                Some(ExtractionMatch::new(page, index, line.as_str()))
            })
    }
}

/// Extract the printed page number, if any line carries one.
pub fn extract_page_number(lines: &[String]) -> Option<u32> {
    PageNumberExtractor.extract(lines).map(|m| m.value)
}
