//! Header line: PO number, customer order number and customer name.

use super::patterns::{
    CUSTOMER_NAME, CUSTOMER_NAME_MARKER, CUST_ORDER_MARKER, CUST_ORDER_NUMBER, PO_MARKER,
    PO_NUMBER,
};
use super::{find_line, ExtractionMatch, FieldExtractor};

/// Fields carried by the header line. Empty when the marker had no value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderFields {
    pub po_number: String,
    pub cust_num: String,
    pub customer_name: String,
}

/// Header line extractor.
///
/// Only a line carrying all three markers is considered.
pub struct HeaderExtractor;

impl HeaderExtractor {
    fn is_header(line: &str) -> bool {
        line.contains(PO_MARKER)
            && line.contains(CUST_ORDER_MARKER)
            && line.contains(CUSTOMER_NAME_MARKER)
    }
}

impl FieldExtractor for HeaderExtractor {
    type Output = HeaderFields;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<HeaderFields>> {
        let (index, line) = find_line(lines, |_, l| Self::is_header(l))?;

        let capture = |re: &regex::Regex| {
            re.captures(line)
                .map(|caps| caps[1].trim().to_string())
                .unwrap_or_default()
        };

        let fields = HeaderFields {
            po_number: capture(&PO_NUMBER),
            cust_num: capture(&CUST_ORDER_NUMBER),
            customer_name: capture(&CUSTOMER_NAME),
        };

        Some(ExtractionMatch::new(fields, index, line))
    }
}

/// Extract the header fields from a page.
pub fn extract_header(lines: &[String]) -> Option<HeaderFields> {
    HeaderExtractor.extract(lines).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_line() {
        let page = lines(&[
            "Invoice",
            "PO # PO12345 Customer Order #: CO-9988 Customer Name: Acme Corp",
        ]);

        let m = HeaderExtractor.extract(&page).unwrap();
        assert_eq!(m.line, 1);
        assert_eq!(
            m.value,
            HeaderFields {
                po_number: "PO12345".to_string(),
                cust_num: "CO-9988".to_string(),
                customer_name: "Acme Corp".to_string(),
            }
        );
    }

    #[test]
    fn test_requires_all_markers() {
        let page = lines(&["PO # PO1 Customer Order #: C1", "Customer Name: Someone"]);
        assert_eq!(extract_header(&page), None);
    }

    #[test]
    fn test_customer_name_runs_to_end_of_line() {
        let page = lines(&[
            "PO # 778 Customer Order #: W123456 Customer Name: Mary Jane Watson  ",
        ]);
        let header = extract_header(&page).unwrap();
        assert_eq!(header.customer_name, "Mary Jane Watson");
        assert_eq!(header.cust_num, "W123456");
    }

    #[test]
    fn test_customer_order_number_stops_at_punctuation() {
        let page = lines(&[
            "PO # 1 Customer Order #: AB-12/7 Customer Name: X",
        ]);
        assert_eq!(extract_header(&page).unwrap().cust_num, "AB-12");
    }
}
