use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Amount;

pub type OrderId = i64;
pub type OrderItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Paid in cash at the counter
    Cash,
    /// Paid by bank transfer
    Transfer,
    /// Not paid yet, recorded in the debt book
    Debt,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::Transfer => "transfer",
            PaymentMethod::Debt => "debt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "transfer" => Some(PaymentMethod::Transfer),
            "debt" => Some(PaymentMethod::Debt),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMethod::from_str(s).ok_or_else(|| format!("unknown payment method: {}", s))
    }
}

/// How an order is presented in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StatusLabel {
    Debt,
    Transfer,
    Cash,
}

impl StatusLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusLabel::Debt => "DEBT",
            StatusLabel::Transfer => "TRANSFER",
            StatusLabel::Cash => "CASH",
        }
    }
}

impl std::fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pending line in a cart or an order request. Not persisted on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: i64,
    pub unit_price: Amount,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: i64, unit_price: Amount) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// quantity × unit_price, or None on overflow.
    pub fn line_total(&self) -> Option<Amount> {
        self.quantity.checked_mul(self.unit_price)
    }
}

/// A recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the repository on insert
    pub id: OrderId,
    /// Sum of the line totals of this order's items
    pub total_amount: Amount,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    /// Fixed at creation
    pub is_debt: bool,
    /// Starts as `!is_debt`; only a debt order can later flip to true
    pub is_paid: bool,
    /// Local wall-clock time of the sale
    pub timestamp: NaiveDateTime,
}

impl Order {
    /// Create a new order. The id must be assigned by the repository.
    ///
    /// A debt order is always stored with `PaymentMethod::Debt` and unpaid,
    /// whatever method the caller picked.
    pub fn new(
        total_amount: Amount,
        payment_method: PaymentMethod,
        is_debt: bool,
        timestamp: NaiveDateTime,
    ) -> Self {
        let payment_method = if is_debt {
            PaymentMethod::Debt
        } else {
            payment_method
        };

        Self {
            id: 0, // Will be set by repository
            total_amount,
            note: None,
            payment_method,
            is_debt,
            is_paid: !is_debt,
            timestamp,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let note = note.into();
        self.note = if note.trim().is_empty() {
            None
        } else {
            Some(note)
        };
        self
    }

    /// True while a debt order has not been collected.
    pub fn is_outstanding_debt(&self) -> bool {
        !self.is_paid
    }

    /// Mark the order as collected in cash.
    pub fn settle(&mut self) {
        self.is_paid = true;
        self.payment_method = PaymentMethod::Cash;
    }

    pub fn status_label(&self) -> StatusLabel {
        if !self.is_paid {
            StatusLabel::Debt
        } else if self.payment_method == PaymentMethod::Transfer {
            StatusLabel::Transfer
        } else {
            StatusLabel::Cash
        }
    }
}

/// A line of a recorded order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub name: String,
    pub quantity: i64,
    pub unit_price: Amount,
    /// Always quantity × unit_price, fixed at write time
    pub line_total: Amount,
}

impl OrderItem {
    /// Build an item row from a validated line. Ids are assigned on insert.
    pub fn from_line(line: &LineItem, line_total: Amount) -> Self {
        Self {
            id: 0,
            order_id: 0,
            name: line.name.trim().to_string(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total,
        }
    }
}
