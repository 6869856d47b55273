//! Line item fields: model number, description, internet number, carrier.

use super::patterns::{
    DESCRIPTION_INSULATION, DESCRIPTION_REFRIGERANT, INTERNET_MARKER, INTERNET_NUMBER,
    MODEL_MARKER, MODEL_NUMBER, SHIP_VIA, SHIP_VIA_MARKER,
};
use crate::models::order::DEFAULT_SHIP_VIA;

use super::{find_line, ExtractionMatch, FieldExtractor};

/// Model number extractor.
///
/// The label also appears in longer table headings near the top of the
/// page, so only short lines past `min_index` are considered.
pub struct ModelNumberExtractor {
    min_index: usize,
    max_len: usize,
}

impl ModelNumberExtractor {
    pub fn new() -> Self {
        Self {
            min_index: 5,
            max_len: 30,
        }
    }

    /// Only lines with an index greater than this are considered.
    pub fn with_min_index(mut self, min_index: usize) -> Self {
        self.min_index = min_index;
        self
    }

    /// Only lines shorter than this many characters are considered.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }
}

impl Default for ModelNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ModelNumberExtractor {
    type Output = String;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<String>> {
        let (index, line) = find_line(lines, |i, l| {
            i > self.min_index
                && l.trim().starts_with(MODEL_MARKER)
                && l.chars().count() < self.max_len
        })?;

        let caps = MODEL_NUMBER.captures(line)?;
        Some(ExtractionMatch::new(caps[1].trim().to_string(), index, line))
    }
}

/// Extract the model number with default guards.
pub fn extract_model_number(lines: &[String]) -> Option<String> {
    ModelNumberExtractor::new().extract(lines).map(|m| m.value)
}

/// First product description line.
pub fn extract_description(lines: &[String]) -> Option<ExtractionMatch<String>> {
    let (index, line) = find_line(lines, |_, l| {
        l.contains(DESCRIPTION_REFRIGERANT)
            || (l.contains(DESCRIPTION_INSULATION) && l.chars().count() > 20)
    })?;
    Some(ExtractionMatch::new(line.trim().to_string(), index, line))
}

/// Digit run after the first "Internet Number" label.
pub fn extract_internet_number(lines: &[String]) -> Option<ExtractionMatch<String>> {
    let (index, line) = find_line(lines, |_, l| l.contains(INTERNET_MARKER))?;
    let caps = INTERNET_NUMBER.captures(line)?;
    Some(ExtractionMatch::new(caps[1].to_string(), index, line))
}

/// Carrier from a "Ship Via" line, or the default carrier when printed alone.
pub fn extract_ship_via(lines: &[String]) -> Option<ExtractionMatch<String>> {
    let labelled = lines.iter().enumerate().find_map(|(index, line)| {
        if !line.contains(SHIP_VIA_MARKER) {
            return None;
        }
        let caps = SHIP_VIA.captures(line)?;
        Some(ExtractionMatch::new(caps[1].trim().to_string(), index, line.as_str()))
    });

    labelled.or_else(|| {
        let (index, line) = find_line(lines, |_, l| l.contains(DEFAULT_SHIP_VIA))?;
        Some(ExtractionMatch::new(DEFAULT_SHIP_VIA.to_string(), index, line))
    })
}
