use super::{Amount, LineItem};

/// Items picked during one till session that have not been checked out yet.
/// Owned by the caller and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Zero quantity and zero price are refused here so that
    /// a forgotten price on a custom item never reaches the order.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        quantity: i64,
        unit_price: Amount,
    ) -> Result<(), CartError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CartError::MissingName);
        }
        if quantity <= 0 {
            return Err(CartError::InvalidQuantity(quantity));
        }
        if unit_price <= 0 {
            return Err(CartError::InvalidPrice(unit_price));
        }

        self.items.push(LineItem::new(name, quantity, unit_price));
        Ok(())
    }

    /// Remove the line at `index`, returning it.
    pub fn remove(&mut self, index: usize) -> Option<LineItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Drop every pending line (order cancelled).
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Running total shown to the customer. Saturates instead of overflowing.
    pub fn total(&self) -> Amount {
        self.items.iter().fold(0, |acc: Amount, item| {
            acc.saturating_add(item.quantity.saturating_mul(item.unit_price))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    MissingName,
    InvalidQuantity(i64),
    InvalidPrice(Amount),
}

impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartError::MissingName => write!(f, "item name is required"),
            CartError::InvalidQuantity(q) => write!(f, "quantity must be positive, got {}", q),
            CartError::InvalidPrice(p) => write!(f, "price must be positive, got {}", p),
        }
    }
}

impl std::error::Error for CartError {}
