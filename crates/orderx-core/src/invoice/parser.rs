//! Rule-driven order parser turning a page's lines into one order.

use tracing::debug;

use crate::models::config::ExtractionConfig;
use crate::models::order::{AddressSchema, Order};

use super::rules::{
    extract_address_type, extract_description, extract_internet_number, extract_ship_via,
    DateExtractor, FieldExtractor, HeaderExtractor, ModelNumberExtractor, PageNumberExtractor,
    QuantityExtractor, QuantityPolicy, ShipToExtractor,
};

/// Result of order extraction for one page.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Extracted order.
    pub order: Order,
    /// Lines the order was extracted from.
    pub lines: Vec<String>,
    /// Extraction warnings, one per rule that found nothing.
    pub warnings: Vec<String>,
}

/// A field rule: applies its findings to the order, returns whether it matched.
type Rule = fn(&OrderFieldExtractor, &[String], &mut Order) -> bool;

/// Rules in evaluation order. The page rule runs first because the
/// customer order number fallback is derived from the page number, and the
/// explicit address type line runs after the ship-to rule it overrides.
const RULES: &[(&str, Rule)] = &[
    ("page number", OrderFieldExtractor::apply_page),
    ("header line", OrderFieldExtractor::apply_header),
    ("ship-to line", OrderFieldExtractor::apply_ship_to),
    ("address type", OrderFieldExtractor::apply_address_type),
    ("model number", OrderFieldExtractor::apply_model_number),
    ("description", OrderFieldExtractor::apply_description),
    ("order date", OrderFieldExtractor::apply_date),
    ("ship via", OrderFieldExtractor::apply_ship_via),
    ("quantity", OrderFieldExtractor::apply_quantity),
    ("internet number", OrderFieldExtractor::apply_internet_number),
];

/// Maps one page's lines to an [`Order`].
///
/// Extraction is total: every field either matches or keeps its default.
#[derive(Debug, Clone)]
pub struct OrderFieldExtractor {
    schema: AddressSchema,
    quantity_policy: QuantityPolicy,
    model_min_index: usize,
    model_max_len: usize,
}

impl OrderFieldExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self {
            schema: AddressSchema::default(),
            quantity_policy: QuantityPolicy::default(),
            model_min_index: 5,
            model_max_len: 30,
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self {
            schema: config.schema,
            quantity_policy: config.quantity_policy(),
            model_min_index: config.model_min_index,
            model_max_len: config.model_max_len,
        }
    }

    /// Set the address schema.
    pub fn with_schema(mut self, schema: AddressSchema) -> Self {
        self.schema = schema;
        self
    }

    /// Set the quantity policy.
    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    /// Set the model number guards.
    pub fn with_model_guards(mut self, min_index: usize, max_len: usize) -> Self {
        self.model_min_index = min_index;
        self.model_max_len = max_len;
        self
    }

    pub fn schema(&self) -> AddressSchema {
        self.schema
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        self.quantity_policy
    }

    /// Extract one order from a page's lines.
    pub fn extract(&self, lines: &[String], page_index: u32) -> Order {
        self.extract_with_report(lines, page_index).order
    }

    /// Extract one order and keep the lines and warnings for diagnostics.
    pub fn extract_with_report(&self, lines: &[String], page_index: u32) -> ExtractionResult {
        let mut order = Order::new(page_index);
        let mut warnings = Vec::new();

        for (name, rule) in RULES {
            if !rule(self, lines, &mut order) {
                debug!("Page {}: no {} found, keeping default", page_index, name);
                warnings.push(format!("Could not extract {}", name));
            }
        }

        debug!(
            "Page {} extracted: custNum={} poNumber={} quantity={}",
            order.page, order.cust_num, order.po_number, order.quantity
        );

        ExtractionResult {
            order,
            lines: lines.to_vec(),
            warnings,
        }
    }

    fn apply_page(&self, lines: &[String], order: &mut Order) -> bool {
        match PageNumberExtractor.extract(lines) {
            Some(m) => {
                *order = Order::new(m.value);
                true
            }
            None => false,
        }
    }

    fn apply_header(&self, lines: &[String], order: &mut Order) -> bool {
        let Some(m) = HeaderExtractor.extract(lines) else {
            return false;
        };
        let header = m.value;

        order.po_number = header.po_number;
        order.customer_name = header.customer_name;
        if !header.cust_num.is_empty() {
            order.cust_num = header.cust_num;
        }
        true
    }

    fn apply_ship_to(&self, lines: &[String], order: &mut Order) -> bool {
        let Some(m) = ShipToExtractor.extract(lines) else {
            return false;
        };
        let ship_to = m.value;

        match self.schema {
            AddressSchema::Single => {
                order.customer_address = ship_to.name.clone();
                order.address = ship_to.ship_to.format();
            }
            AddressSchema::Split => {
                order.ship_to_name = ship_to.name.clone();
                order.customer_address = ship_to.customer.format();
                order.ship_to_address = ship_to.ship_to.format();
                order.address = order.ship_to_address.clone();
            }
        }

        order.street = ship_to.ship_to.street;
        order.city = ship_to.ship_to.city;
        order.state = ship_to.ship_to.state;
        order.zip = ship_to.ship_to.zip;
        order.phone = ship_to.phone;
        order.address_type = ship_to.variant;

        if ship_to.locality_assumed {
            order
                .review
                .push("customer city/state/zip assumed from store address".to_string());
        }
        true
    }

    fn apply_address_type(&self, lines: &[String], order: &mut Order) -> bool {
        match extract_address_type(lines) {
            Some(m) => {
                order.address_type = m.value;
                true
            }
            None => false,
        }
    }

    fn apply_model_number(&self, lines: &[String], order: &mut Order) -> bool {
        let extractor = ModelNumberExtractor::new()
            .with_min_index(self.model_min_index)
            .with_max_len(self.model_max_len);
        set_from(extractor.extract(lines).map(|m| m.value), &mut order.model_number)
    }

    fn apply_description(&self, lines: &[String], order: &mut Order) -> bool {
        set_from(extract_description(lines).map(|m| m.value), &mut order.description)
    }

    fn apply_date(&self, lines: &[String], order: &mut Order) -> bool {
        set_from(DateExtractor.extract(lines).map(|m| m.value), &mut order.date)
    }

    fn apply_ship_via(&self, lines: &[String], order: &mut Order) -> bool {
        set_from(extract_ship_via(lines).map(|m| m.value), &mut order.ship_via)
    }

    fn apply_quantity(&self, lines: &[String], order: &mut Order) -> bool {
        let extractor = QuantityExtractor::new(self.quantity_policy);
        set_from(extractor.extract(lines).map(|m| m.value), &mut order.quantity)
    }

    fn apply_internet_number(&self, lines: &[String], order: &mut Order) -> bool {
        set_from(
            extract_internet_number(lines).map(|m| m.value),
            &mut order.internet_number,
        )
    }
}

impl Default for OrderFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn set_from(value: Option<String>, slot: &mut String) -> bool {
    match value {
        Some(value) => {
            *slot = value;
            true
        }
        None => false,
    }
}
