//! Common markers and regex patterns for the invoice template.

use lazy_static::lazy_static;
use regex::Regex;

// Line markers
pub const PO_MARKER: &str = "PO #";
pub const CUST_ORDER_MARKER: &str = "Customer Order #:";
pub const CUSTOMER_NAME_MARKER: &str = "Customer Name:";
pub const SHIP_TO_MARKER: &str = "Ship To:";
pub const PAGE_MARKER: &str = "Page:";
pub const STORE_MARKER: &str = "Home Depot";
pub const MODEL_MARKER: &str = "Model Number";
pub const INTERNET_MARKER: &str = "Internet Number";
pub const QTY_MARKER: &str = "Qty Shipped";
pub const DESCRIPTION_REFRIGERANT: &str = "R-22";
pub const DESCRIPTION_INSULATION: &str = "Insulation";
pub const SHIP_VIA_MARKER: &str = "Ship Via";

lazy_static! {
    // Page marker
    pub static ref PAGE_NUMBER: Regex = Regex::new(r"Page:\s*([0-9]+)").unwrap();

    // Header line fields
    pub static ref PO_NUMBER: Regex = Regex::new(r"PO #\s*(\S+)").unwrap();

    pub static ref CUST_ORDER_NUMBER: Regex = Regex::new(
        r"Customer Order #:\s*([A-Za-z0-9-]+)"
    ).unwrap();

    pub static ref CUSTOMER_NAME: Regex = Regex::new(r"Customer Name:\s*(.+)$").unwrap();

    // Ship-to name runs up to the first digit run
    pub static ref SHIP_TO_NAME: Regex = Regex::new(r"Ship To:\s*(.*?)\s*[0-9]").unwrap();

    // Street address: number, words, fixed suffix token, optional unit.
    // Greedy word run, so the match must be bounded by the locality comma.
    pub static ref STREET: Regex = Regex::new(
        r"(?i)\b[0-9]+\s+(?:[A-Za-z.']+\s+)*(?:Way|Rd|St|Street|Avenue|Ave|Court|Drive|Dr|Lane|Ln|Boulevard|Blvd|Circle|Cir)\b\.?(?:\s+(?:Ste|Suite|Apt|Unit)\b\.?\s*#?\s*[A-Za-z0-9-]+)?"
    ).unwrap();

    // Store street addresses also use highway-style suffixes
    pub static ref STORE_STREET: Regex = Regex::new(
        r"(?i)\b[0-9]+\s+(?:[A-Za-z.']+\s+)*(?:Way|Rd|Road|St|Street|Avenue|Ave|Court|Ct|Drive|Dr|Lane|Ln|Boulevard|Blvd|Circle|Cir|Pkwy|Parkway|Hwy|Highway|Pike|Plaza|Pl|Trail|Trl|Expy|Tpke|Sq)\b\.?(?:\s+(?:Ste|Suite|Apt|Unit)\b\.?\s*#?\s*[A-Za-z0-9-]+)?"
    ).unwrap();

    // ", ST 12345" with optional zip+4
    pub static ref STATE_ZIP: Regex = Regex::new(
        r",\s*([A-Z]{2})\s+([0-9]{5})(?:-[0-9]{4})?\b"
    ).unwrap();

    // Alphabetic run directly before the locality comma
    pub static ref CITY_TAIL: Regex = Regex::new(r"([A-Za-z][A-Za-z\s.'-]*)$").unwrap();

    // North American number with optional country prefix
    pub static ref PHONE: Regex = Regex::new(
        r"(?:\+?1[\s.-]?)?\(?[0-9]{3}\)?[\s.-]*[0-9]{3}[\s.-]*[0-9]{4}\b"
    ).unwrap();

    // Any other phone-like digit run following the zip code
    pub static ref PHONE_RUN: Regex = Regex::new(r"\(?\+?[0-9][0-9()\s.-]*[0-9]").unwrap();

    // Numeric order date, whole line
    pub static ref DATE_LINE: Regex = Regex::new(
        r"^[0-9]{1,2}/[0-9]{1,2}/(?:[0-9]{4}|[0-9]{2})$"
    ).unwrap();

    // Line item fields
    pub static ref MODEL_NUMBER: Regex = Regex::new(r"Model Number\s+(.+)$").unwrap();

    pub static ref INTERNET_NUMBER: Regex = Regex::new(r"Internet Number\s+([0-9]+)").unwrap();

    pub static ref SHIP_VIA: Regex = Regex::new(r"Ship Via:?\s+(.+)$").unwrap();

    pub static ref DIGITS_ONLY: Regex = Regex::new(r"^[0-9]+$").unwrap();
}
