//! Document-level processing into an explicit order collection.

use tracing::{debug, info};

use crate::error::{EditError, Result};
use crate::invoice::OrderFieldExtractor;
use crate::layout::LineClusterer;
use crate::models::order::{AddressSchema, Order};
use crate::pdf::PdfProcessor;

/// Ordered orders extracted from one document, one per page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderBatch {
    schema: AddressSchema,
    orders: Vec<Order>,
}

impl OrderBatch {
    /// Create an empty batch for the given address schema.
    pub fn new(schema: AddressSchema) -> Self {
        Self {
            schema,
            orders: Vec::new(),
        }
    }

    pub fn schema(&self) -> AddressSchema {
        self.schema
    }

    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Overwrite one field of one order.
    pub fn set_field(
        &mut self,
        index: usize,
        field: &str,
        value: &str,
    ) -> std::result::Result<(), EditError> {
        let len = self.orders.len();
        let order = self
            .orders
            .get_mut(index)
            .ok_or(EditError::IndexOutOfRange { index, len })?;
        order.set_field(field, value)
    }

    pub fn clear(&mut self) {
        self.orders.clear();
    }

    /// Replace the whole collection, e.g. after re-processing a document.
    pub fn replace(&mut self, other: OrderBatch) {
        *self = other;
    }

    /// All validation issues across the batch.
    pub fn validate(&self) -> Vec<String> {
        self.orders.iter().flat_map(Order::validate).collect()
    }
}

impl IntoIterator for OrderBatch {
    type Item = Order;
    type IntoIter = std::vec::IntoIter<Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.into_iter()
    }
}

/// Diagnostics for one processed page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageReport {
    /// 1-based page index in the document.
    pub page: u32,
    /// Clustered lines, top to bottom as sorted.
    pub lines: Vec<String>,
    /// Fields that kept their default.
    pub warnings: Vec<String>,
}

/// Process every page of a loaded document into a fresh batch.
pub fn process_document(
    processor: &impl PdfProcessor,
    clusterer: &LineClusterer,
    extractor: &OrderFieldExtractor,
) -> Result<OrderBatch> {
    process_document_with_reports(processor, clusterer, extractor, 0).map(|(batch, _)| batch)
}

/// Process pages in order, keeping per-page diagnostics.
///
/// `max_pages` caps the number of pages read; `0` reads all of them. The
/// batch is only returned when every page succeeded.
pub fn process_document_with_reports(
    processor: &impl PdfProcessor,
    clusterer: &LineClusterer,
    extractor: &OrderFieldExtractor,
    max_pages: usize,
) -> Result<(OrderBatch, Vec<PageReport>)> {
    let mut page_count = processor.page_count();
    if max_pages > 0 && page_count as usize > max_pages {
        debug!("Limiting processing to {} of {} pages", max_pages, page_count);
        page_count = max_pages as u32;
    }

    info!("Processing {} pages", page_count);

    let mut batch = OrderBatch::new(extractor.schema());
    let mut reports = Vec::with_capacity(page_count as usize);

    for page in 1..=page_count {
        let fragments = processor.page_fragments(page)?;
        let lines: Vec<String> = clusterer.cluster(fragments).collect();

        let result = extractor.extract_with_report(&lines, page);
        debug!(
            "Page {}: {} lines, {} warnings",
            page,
            lines.len(),
            result.warnings.len()
        );

        batch.push(result.order);
        reports.push(PageReport {
            page,
            lines: result.lines,
            warnings: result.warnings,
        });
    }

    info!("Extracted {} orders", batch.len());
    Ok((batch, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OrderxError, PdfError};
    use crate::layout::PositionedFragment;
    use crate::pdf;
    use pretty_assertions::assert_eq;

    /// In-memory document; `None` pages fail to decode.
    struct FakePdf {
        pages: Vec<Option<Vec<PositionedFragment>>>,
    }

    impl PdfProcessor for FakePdf {
        fn load(&mut self, _data: &[u8]) -> pdf::Result<()> {
            Ok(())
        }

        fn page_count(&self) -> u32 {
            self.pages.len() as u32
        }

        fn page_fragments(&self, page: u32) -> pdf::Result<Vec<PositionedFragment>> {
            self.pages
                .get(page as usize - 1)
                .cloned()
                .flatten()
                .ok_or_else(|| PdfError::TextExtraction(format!("page {}", page)))
        }
    }

    fn invoice_page(cust: &str, qty: &str) -> Vec<PositionedFragment> {
        vec![
            PositionedFragment::new(qty, 300.0, 100.0),
            PositionedFragment::new("Qty Shipped", 300.0, 90.0),
            PositionedFragment::new(format!("Customer Order #: {}", cust), 200.0, 20.0),
            PositionedFragment::new("PO # P1", 72.0, 21.0),
            PositionedFragment::new("Customer Name: Acme", 400.0, 19.0),
        ]
    }

    #[test]
    fn test_process_document_in_page_order() {
        let pdf = FakePdf {
            pages: vec![Some(invoice_page("C-1", "3")), Some(invoice_page("C-2", "5"))],
        };

        let (batch, reports) = process_document_with_reports(
            &pdf,
            &LineClusterer::new(),
            &OrderFieldExtractor::new(),
            0,
        )
        .unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.orders()[0].cust_num, "C-1");
        assert_eq!(batch.orders()[0].po_number, "P1");
        assert_eq!(batch.orders()[0].quantity, "3");
        assert_eq!(batch.orders()[1].cust_num, "C-2");
        assert_eq!(batch.orders()[1].page, 2);

        assert_eq!(
            reports[0].lines,
            vec![
                "PO # P1 Customer Order #: C-1 Customer Name: Acme".to_string(),
                "Qty Shipped".to_string(),
                "3".to_string(),
            ]
        );
    }

    #[test]
    fn test_failed_page_discards_batch() {
        let pdf = FakePdf {
            pages: vec![Some(invoice_page("C-1", "3")), None],
        };

        let result = process_document(&pdf, &LineClusterer::new(), &OrderFieldExtractor::new());
        assert!(matches!(
            result,
            Err(OrderxError::Pdf(PdfError::TextExtraction(_)))
        ));
    }

    #[test]
    fn test_max_pages() {
        let pdf = FakePdf {
            pages: vec![Some(vec![]), Some(vec![]), None],
        };

        let (batch, reports) = process_document_with_reports(
            &pdf,
            &LineClusterer::new(),
            &OrderFieldExtractor::new(),
            2,
        )
        .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(reports.len(), 2);
        assert_eq!(batch.orders()[1].cust_num, "ORDER-2");
    }

    #[test]
    fn test_batch_edits() {
        let mut batch = OrderBatch::new(AddressSchema::Split);
        batch.push(Order::new(1));

        batch.set_field(0, "quantity", "12").unwrap();
        assert_eq!(batch.orders()[0].quantity, "12");

        assert_eq!(
            batch.set_field(1, "quantity", "1"),
            Err(EditError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            batch.set_field(0, "colour", "red"),
            Err(EditError::UnknownField("colour".to_string()))
        );
    }

    #[test]
    fn test_replace_and_clear() {
        let mut batch = OrderBatch::new(AddressSchema::Split);
        batch.push(Order::new(1));

        let mut fresh = OrderBatch::new(AddressSchema::Single);
        fresh.push(Order::new(1));
        fresh.push(Order::new(2));

        batch.replace(fresh.clone());
        assert_eq!(batch, fresh);
        assert_eq!(batch.schema(), AddressSchema::Single);

        batch.clear();
        assert!(batch.is_empty());
    }
}
