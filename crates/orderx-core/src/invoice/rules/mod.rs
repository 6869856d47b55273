//! Line-based field rules for the invoice template.
//!
//! Every rule scans a page's lines top to bottom and the first matching
//! line wins. Rules are pure and never fail; a rule that finds nothing
//! returns `None` and the caller applies the field default.

pub mod patterns;
pub mod page;
pub mod header;
pub mod ship_to;
pub mod dates;
pub mod items;
pub mod quantity;

pub use page::{extract_page_number, PageNumberExtractor};
pub use header::{extract_header, HeaderExtractor, HeaderFields};
pub use ship_to::{
    extract_address_type, extract_ship_to, normalize_phone, parse_ship_to_line, PostalAddress,
    ShipTo, ShipToExtractor,
};
pub use dates::{extract_order_date, DateExtractor};
pub use items::{
    extract_description, extract_internet_number, extract_model_number, extract_ship_via,
    ModelNumberExtractor,
};
pub use quantity::{extract_quantity, QuantityExtractor, QuantityPolicy};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from a page's lines.
    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<Self::Output>>;
}

/// An extracted value and the line it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Index of the source line on the page.
    pub line: usize,
    /// Source line text.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, line: usize, source: impl Into<String>) -> Self {
        Self {
            value,
            line,
            source: source.into(),
        }
    }

    /// Transform the value, keeping the source position.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ExtractionMatch<U> {
        ExtractionMatch {
            value: f(self.value),
            line: self.line,
            source: self.source,
        }
    }
}

/// First line satisfying the predicate, with its index.
pub fn find_line<'a>(
    lines: &'a [String],
    predicate: impl Fn(usize, &str) -> bool,
) -> Option<(usize, &'a str)> {
    lines
        .iter()
        .enumerate()
        .find(|(index, line)| predicate(*index, line))
        .map(|(index, line)| (index, line.as_str()))
}

#[cfg(test)]
pub(crate) fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|l| l.to_string()).collect()
}
