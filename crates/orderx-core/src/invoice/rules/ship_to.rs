//! Ship-to line: recipient name, addresses, phone and delivery variant.
//!
//! The ship-to line carries everything in one string with no reliable
//! delimiters:
//!
//! ```text
//! Ship To: John Doe 123 Main St Springfield, IL 62704 (217) 555-0100
//! Ship To: Jane Roe 55 Oak Ave Home Depot 900 Industrial Pkwy Atlanta, GA 30301
//! ```
//!
//! A line naming the store is a commercial delivery: the customer's street
//! comes before the store marker and the store address after it. Otherwise
//! one address serves as both customer and ship-to address.

use regex::Regex;
use tracing::{debug, warn};

use crate::models::order::AddressType;

use super::patterns::{
    CITY_TAIL, PHONE, PHONE_RUN, SHIP_TO_MARKER, SHIP_TO_NAME, STATE_ZIP, STORE_MARKER,
    STORE_STREET, STREET,
};
use super::{find_line, ExtractionMatch, FieldExtractor};

/// A postal address split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostalAddress {
    /// Place name printed before the street (e.g. the store).
    pub place: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl PostalAddress {
    /// Check if the address has any data.
    pub fn is_empty(&self) -> bool {
        self.place.is_empty()
            && self.street.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.zip.is_empty()
    }

    /// `City, ST zip` part.
    pub fn locality(&self) -> String {
        let state_zip = format!("{} {}", self.state, self.zip).trim().to_string();
        [self.city.as_str(), state_zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Format address as a single string.
    pub fn format(&self) -> String {
        let first = format!("{} {}", self.place, self.street).trim().to_string();
        let locality = self.locality();
        [first.as_str(), locality.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parsed ship-to line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipTo {
    /// Recipient name.
    pub name: String,
    /// Delivery variant implied by the line.
    pub variant: AddressType,
    /// Customer address.
    pub customer: PostalAddress,
    /// Delivery address.
    pub ship_to: PostalAddress,
    /// Phone, normalized when ten digits were found.
    pub phone: String,
    /// Customer locality was copied from the store address.
    pub locality_assumed: bool,
}

/// Ship-to line extractor.
pub struct ShipToExtractor;

impl FieldExtractor for ShipToExtractor {
    type Output = ShipTo;

    fn extract(&self, lines: &[String]) -> Option<ExtractionMatch<ShipTo>> {
        let (index, line) = find_line(lines, |_, l| l.contains(SHIP_TO_MARKER))?;
        Some(ExtractionMatch::new(parse_ship_to_line(line), index, line))
    }
}

/// Extract the ship-to block from a page.
pub fn extract_ship_to(lines: &[String]) -> Option<ShipTo> {
    ShipToExtractor.extract(lines).map(|m| m.value)
}

/// Parse one ship-to line. A line without the marker yields an empty result.
pub fn parse_ship_to_line(line: &str) -> ShipTo {
    let Some(start) = line.find(SHIP_TO_MARKER) else {
        return ShipTo::default();
    };
    let body = &line[start..];

    let name = parse_name(body);

    let mut ship_to = match body.find(STORE_MARKER) {
        Some(store_pos) => parse_commercial(body, store_pos),
        None => parse_residential(body),
    };
    ship_to.name = name;

    debug!(
        "Ship-to parsed as {}: name={:?} ship_to={:?}",
        ship_to.variant,
        ship_to.name,
        ship_to.ship_to.format()
    );

    ship_to
}

fn parse_name(body: &str) -> String {
    if let Some(caps) = SHIP_TO_NAME.captures(body) {
        return caps[1].trim().to_string();
    }
    // No digits at all: the rest of the line is the name.
    body.strip_prefix(SHIP_TO_MARKER)
        .unwrap_or(body)
        .trim()
        .to_string()
}

fn parse_residential(body: &str) -> ShipTo {
    let (address, zip_end) = parse_address(body, &STREET);
    let phone = zip_end
        .map(|end| extract_phone(&body[end..]))
        .unwrap_or_default();

    ShipTo {
        name: String::new(),
        variant: AddressType::Residential,
        customer: address.clone(),
        ship_to: address,
        phone,
        locality_assumed: false,
    }
}

fn parse_commercial(body: &str, store_pos: usize) -> ShipTo {
    let before_store = &body[..store_pos];
    let after_store = &body[store_pos + STORE_MARKER.len()..];

    let customer_street = STREET
        .find(before_store)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let (mut store, zip_end) = parse_address(after_store, &STORE_STREET);
    store.place = STORE_MARKER.to_string();

    let phone = zip_end
        .map(|end| extract_phone(&after_store[end..]))
        .unwrap_or_default();

    // The invoice only prints the store's locality; the customer is assumed
    // to share it.
    let locality_assumed = !store.locality().is_empty();
    if locality_assumed {
        warn!(
            "Commercial ship-to: customer locality assumed equal to store ({})",
            store.locality()
        );
    }

    let customer = PostalAddress {
        place: String::new(),
        street: customer_street,
        city: store.city.clone(),
        state: store.state.clone(),
        zip: store.zip.clone(),
    };

    ShipTo {
        name: String::new(),
        variant: AddressType::Commercial,
        customer,
        ship_to: store,
        phone,
        locality_assumed,
    }
}

/// Parse `<street> <City>, <ST> <zip>` out of `text`.
///
/// Returns the address and the byte offset just past the zip code.
fn parse_address(text: &str, street_re: &Regex) -> (PostalAddress, Option<usize>) {
    let mut address = PostalAddress::default();

    let locality = STATE_ZIP.captures(text);
    let comma = locality.as_ref().and_then(|c| c.get(0)).map(|m| m.start());

    // Longest street ending before the locality comma.
    let street = street_re.find(&text[..comma.unwrap_or(text.len())]);
    if let Some(m) = street {
        address.street = m.as_str().trim().to_string();
    }

    if let Some(caps) = locality {
        let full = caps.get(0).map(|m| (m.start(), m.end()));
        if let Some((comma_pos, zip_end)) = full {
            address.state = caps[1].to_string();
            address.zip = caps[2].to_string();
            address.city = parse_city(text, street.map(|m| m.end()), comma_pos);
            return (address, Some(zip_end));
        }
    }

    (address, None)
}

fn parse_city(text: &str, street_end: Option<usize>, comma_pos: usize) -> String {
    match street_end {
        Some(end) if end <= comma_pos => text[end..comma_pos].trim().to_string(),
        _ => {
            // Without a street, take the trailing word before the comma.
            let before = text[..comma_pos].trim_end();
            CITY_TAIL
                .captures(before)
                .and_then(|caps| caps[1].split_whitespace().last().map(str::to_string))
                .unwrap_or_default()
        }
    }
}

fn extract_phone(after_zip: &str) -> String {
    PHONE
        .find(after_zip)
        .or_else(|| PHONE_RUN.find(after_zip))
        .map(|m| normalize_phone(m.as_str()))
        .unwrap_or_default()
}

/// Normalize to `(XXX) XXX-XXXX` when exactly ten digits are present,
/// otherwise return the trimmed input.
pub fn normalize_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..10])
    } else {
        raw.trim().to_string()
    }
}

/// Explicit "Residential" or "Commercial" line, overriding the variant.
pub fn extract_address_type(lines: &[String]) -> Option<ExtractionMatch<AddressType>> {
    lines.iter().enumerate().find_map(|(index, line)| {
        AddressType::from_label(line).map(|t| ExtractionMatch::new(t, index, line.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::lines;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_residential_line() {
        let ship_to = parse_ship_to_line(
            "Ship To: John Doe 123 Main St Springfield, IL 62704 (217) 555-0100",
        );

        assert_eq!(ship_to.name, "John Doe");
        assert_eq!(ship_to.variant, AddressType::Residential);
        assert_eq!(ship_to.ship_to.street, "123 Main St");
        assert_eq!(ship_to.ship_to.city, "Springfield");
        assert_eq!(ship_to.ship_to.format(), "123 Main St, Springfield, IL 62704");
        assert_eq!(ship_to.customer, ship_to.ship_to);
        assert_eq!(ship_to.phone, "(217) 555-0100");
        assert!(!ship_to.locality_assumed);
    }

    #[test]
    fn test_commercial_line() {
        let ship_to = parse_ship_to_line(
            "Ship To: Jane Roe 55 Oak Ave Home Depot 900 Industrial Pkwy Atlanta, GA 30301",
        );

        assert_eq!(ship_to.name, "Jane Roe");
        assert_eq!(ship_to.variant, AddressType::Commercial);
        assert_eq!(ship_to.customer.street, "55 Oak Ave");
        assert_eq!(ship_to.ship_to.street, "900 Industrial Pkwy");
        assert_eq!(ship_to.ship_to.city, "Atlanta");
        assert_eq!(
            ship_to.ship_to.format(),
            "Home Depot 900 Industrial Pkwy, Atlanta, GA 30301"
        );
        assert_eq!(ship_to.customer.format(), "55 Oak Ave, Atlanta, GA 30301");
        assert!(ship_to.locality_assumed);
    }

    #[test]
    fn test_commercial_phone_after_store_zip() {
        let ship_to = parse_ship_to_line(
            "Ship To: Jane Roe 55 Oak Ave Home Depot 900 Industrial Pkwy Atlanta, GA 30301 404.555.0199",
        );
        assert_eq!(ship_to.phone, "(404) 555-0199");
    }

    #[test]
    fn test_street_with_unit_and_multiword_city() {
        let ship_to = parse_ship_to_line(
            "Ship To: Ann Lee 4500 Lake Shore Drive Apt 12 Salt Lake City, UT 84101 8015550123",
        );

        assert_eq!(ship_to.ship_to.street, "4500 Lake Shore Drive Apt 12");
        assert_eq!(ship_to.ship_to.city, "Salt Lake City");
        assert_eq!(ship_to.phone, "(801) 555-0123");
    }

    #[test]
    fn test_phone_kept_raw_when_not_ten_digits() {
        let ship_to = parse_ship_to_line(
            "Ship To: Bo Li 9 Elm St Dover, DE 19901 1-302-555-0100",
        );
        assert_eq!(ship_to.phone, "1-302-555-0100");
    }

    #[test]
    fn test_street_named_after_suffix() {
        let ship_to = parse_ship_to_line(
            "Ship To: Bob Ray 45 Court St Springfield, IL 62704 (217) 555-0100",
        );
        assert_eq!(ship_to.ship_to.street, "45 Court St");
        assert_eq!(ship_to.ship_to.city, "Springfield");

        let ship_to =
            parse_ship_to_line("Ship To: Sue Kim 200 Circle Dr Salem, OR 97301 503-555-0111");
        assert_eq!(ship_to.ship_to.street, "200 Circle Dr");
        assert_eq!(ship_to.ship_to.city, "Salem");
        assert_eq!(ship_to.phone, "(503) 555-0111");
    }

    #[test]
    fn test_commercial_customer_street_named_after_suffix() {
        let ship_to = parse_ship_to_line(
            "Ship To: Jane Roe 12 Way Ave Home Depot 900 Industrial Pkwy Atlanta, GA 30301",
        );
        assert_eq!(ship_to.customer.street, "12 Way Ave");
        assert_eq!(ship_to.ship_to.street, "900 Industrial Pkwy");
        assert_eq!(ship_to.ship_to.city, "Atlanta");
    }

    #[test]
    fn test_phone_ignores_trailing_digits() {
        let ship_to = parse_ship_to_line(
            "Ship To: John Doe 123 Main St Springfield, IL 62704 (217) 555-0100 12",
        );
        assert_eq!(ship_to.phone, "(217) 555-0100");
    }

    #[test]
    fn test_line_without_marker() {
        assert_eq!(
            parse_ship_to_line("Größe 12 Main St Springfield, IL 62704"),
            ShipTo::default()
        );
        assert_eq!(
            parse_ship_to_line("Ship To: Zoë"),
            ShipTo {
                name: "Zoë".to_string(),
                ..ShipTo::default()
            }
        );
    }

    #[test]
    fn test_unrecognized_street_suffix() {
        let ship_to = parse_ship_to_line("Ship To: Al Ng 77 Route Nine Keene, NH 03431");

        assert_eq!(ship_to.name, "Al Ng");
        assert_eq!(ship_to.ship_to.street, "");
        assert_eq!(ship_to.ship_to.city, "Keene");
        assert_eq!(ship_to.ship_to.zip, "03431");
    }

    #[test]
    fn test_name_only() {
        let ship_to = parse_ship_to_line("Ship To: Pat Smith");
        assert_eq!(ship_to.name, "Pat Smith");
        assert!(ship_to.ship_to.is_empty());
        assert_eq!(ship_to.phone, "");
    }

    #[test]
    fn test_extract_from_page() {
        let page = lines(&[
            "Header",
            "Ship To: John Doe 123 Main St Springfield, IL 62704 (217) 555-0100",
        ]);
        let m = ShipToExtractor.extract(&page).unwrap();
        assert_eq!(m.line, 1);
        assert_eq!(m.value.name, "John Doe");
        assert!(extract_ship_to(&lines(&["nothing here"])).is_none());
    }

    #[test]
    fn test_address_type_line() {
        let page = lines(&["Residential address", "Commercial", "Residential"]);
        let m = extract_address_type(&page).unwrap();
        assert_eq!(m.value, AddressType::Commercial);
        assert_eq!(m.line, 1);
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("217-555-0100"), "(217) 555-0100");
        assert_eq!(normalize_phone("(217)5550100"), "(217) 555-0100");
        assert_eq!(normalize_phone(" 555-0100 "), "555-0100");
    }
}
