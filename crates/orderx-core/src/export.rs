//! Export schema: tabular rows and the remote spreadsheet payload.

use std::io;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::batch::OrderBatch;
use crate::error::ExportError;
use crate::models::order::{AddressSchema, Order};

/// Column headers of the tabular export, in order.
pub const EXPORT_HEADERS: [&str; 13] = [
    "Page",
    "Date",
    "Cust Order #",
    "PO Number",
    "Customer Name",
    "Ship To Name",
    "Customer Address",
    "Ship To Address",
    "Phone",
    "Address Type",
    "Model Number",
    "Internet Num",
    "Qty Shipped",
];

/// Ship-to name, customer address and ship-to address columns for a schema.
fn address_columns(order: &Order, schema: AddressSchema) -> (String, String, String) {
    match schema {
        AddressSchema::Single => (
            order.customer_address.clone(),
            order.address.clone(),
            order.address.clone(),
        ),
        AddressSchema::Split => (
            order.ship_to_name.clone(),
            order.customer_address.clone(),
            order.ship_to_address.clone(),
        ),
    }
}

/// One export row, aligned with [`EXPORT_HEADERS`].
pub fn order_row(order: &Order, schema: AddressSchema) -> [String; 13] {
    let (ship_to_name, customer_address, ship_to_address) = address_columns(order, schema);
    [
        order.page.to_string(),
        order.date.clone(),
        order.cust_num.clone(),
        order.po_number.clone(),
        order.customer_name.clone(),
        ship_to_name,
        customer_address,
        ship_to_address,
        order.phone.clone(),
        order.address_type.to_string(),
        order.model_number.clone(),
        order.internet_number.clone(),
        order.quantity.clone(),
    ]
}

/// Write the batch as CSV, header row first.
pub fn write_csv<W: io::Write>(batch: &OrderBatch, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(EXPORT_HEADERS)?;
    for order in batch.orders() {
        wtr.write_record(order_row(order, batch.schema()))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    debug!("Wrote {} CSV rows", batch.len());
    Ok(())
}

/// Render the batch as a CSV string.
pub fn to_csv(batch: &OrderBatch) -> Result<String, ExportError> {
    let mut buf = Vec::new();
    write_csv(batch, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Default download file name, `<prefix>_<YYYY-MM-DD>.csv`.
pub fn default_file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}_{}.csv", prefix, date.format("%Y-%m-%d"))
}

/// One order as sent to the spreadsheet endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetOrder {
    pub page: u32,
    pub date: String,
    pub cust_num: String,
    pub po_number: String,
    pub customer_name: String,
    pub ship_to_name: String,
    pub customer_address: String,
    pub ship_to_address: String,
    pub phone: String,
    pub address_type: String,
    pub model_number: String,
    pub internet_number: String,
    pub quantity: String,
}

impl SheetOrder {
    pub fn from_order(order: &Order, schema: AddressSchema) -> Self {
        let [
            _page,
            date,
            cust_num,
            po_number,
            customer_name,
            ship_to_name,
            customer_address,
            ship_to_address,
            phone,
            address_type,
            model_number,
            internet_number,
            quantity,
        ] = order_row(order, schema);

        Self {
            page: order.page,
            date,
            cust_num,
            po_number,
            customer_name,
            ship_to_name,
            customer_address,
            ship_to_address,
            phone,
            address_type,
            model_number,
            internet_number,
            quantity,
        }
    }
}

/// Append request envelope: `{"orders": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPayload {
    pub orders: Vec<SheetOrder>,
}

impl SheetPayload {
    pub fn from_batch(batch: &OrderBatch) -> Self {
        Self {
            orders: batch
                .orders()
                .iter()
                .map(|order| SheetOrder::from_order(order, batch.schema()))
                .collect(),
        }
    }
}

/// Reply from the spreadsheet endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetResponse {
    pub success: bool,
    pub message: Option<String>,
    pub rows_added: Option<u64>,
    pub error: Option<String>,
}
