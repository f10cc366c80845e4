use thiserror::Error;

use crate::domain::OrderId;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    #[error("Order not found: #{0}")]
    OrderNotFound(OrderId),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
