use anyhow::Result;
use std::io::Write;

use crate::application::CafeService;

const EXPORT_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Exporter for writing ledger records as CSV
pub struct Exporter<'a> {
    service: &'a CafeService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a CafeService) -> Self {
        Self { service }
    }

    /// Export orders to CSV format, newest first
    pub async fn export_orders_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let orders = self.service.get_all_orders().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "timestamp",
            "total_amount",
            "payment_method",
            "is_debt",
            "is_paid",
            "note",
        ])?;

        for order in &orders {
            csv_writer.write_record([
                order.id.to_string(),
                order.timestamp.format(EXPORT_TIMESTAMP).to_string(),
                order.total_amount.to_string(),
                order.payment_method.as_str().to_string(),
                order.is_debt.to_string(),
                order.is_paid.to_string(),
                order.note.clone().unwrap_or_default(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(orders.len())
    }

    /// Export order items to CSV format
    pub async fn export_items_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let items = self.service.get_all_items().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "order_id", "name", "quantity", "unit_price", "line_total"])?;

        for item in &items {
            csv_writer.write_record([
                item.id.to_string(),
                item.order_id.to_string(),
                item.name.clone(),
                item.quantity.to_string(),
                item.unit_price.to_string(),
                item.line_total.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(items.len())
    }

    /// Export expenses to CSV format, newest first
    pub async fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let expenses = self.service.get_all_expenses().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "timestamp", "description", "amount"])?;

        for expense in &expenses {
            csv_writer.write_record([
                expense.id.to_string(),
                expense.timestamp.format(EXPORT_TIMESTAMP).to_string(),
                expense.description.clone(),
                expense.amount.to_string(),
            ])?;
        }

        csv_writer.flush()?;
        Ok(expenses.len())
    }
}
