use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{
    Amount, Cart, Clock, Expense, LineItem, Order, OrderId, OrderItem, PaymentMethod,
    StatusLabel, SystemClock,
};
use crate::storage::Repository;

use super::{
    build_daily_report, build_monthly_report, day_bounds, filter_orders, month_bounds, AppError,
    DailyReport, MonthlyReport, OrderFilter,
};

/// Application service for the café till and books.
/// This is the primary interface for any client (CLI, GUI, etc.).
pub struct CafeService {
    repo: Repository,
    clock: Arc<dyn Clock>,
}

/// An order with its lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

impl OrderDetails {
    pub fn status_label(&self) -> StatusLabel {
        self.order.status_label()
    }
}

impl CafeService {
    /// Create a new service using the machine's local clock.
    pub fn new(repo: Repository) -> Self {
        Self::with_clock(repo, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: Repository, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let repo = Repository::init(&Self::create_url(database_path)).await?;
        Ok(Self::new(repo))
    }

    /// Initialize a new database at the given path with a custom clock.
    pub async fn init_with_clock(
        database_path: &str,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AppError> {
        let repo = Repository::init(&Self::create_url(database_path)).await?;
        Ok(Self::with_clock(repo, clock))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    fn create_url(database_path: &str) -> String {
        format!("sqlite:{}?mode=rwc", database_path)
    }

    /// Today's date according to the service clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date()
    }

    // ========================
    // Order operations
    // ========================

    /// Record a sale.
    ///
    /// A debt order is stored as unpaid with method `Debt`, regardless of
    /// `payment_method`. A non-debt order must be paid by cash or transfer.
    /// The order and all of its items are written atomically.
    pub async fn create_order(
        &self,
        items: &[LineItem],
        note: Option<String>,
        payment_method: PaymentMethod,
        is_debt: bool,
    ) -> Result<OrderId, AppError> {
        if items.is_empty() {
            return Err(AppError::InvalidOrder("cart is empty".to_string()));
        }
        if !is_debt && payment_method == PaymentMethod::Debt {
            return Err(AppError::InvalidOrder(
                "a paid order must use cash or transfer".to_string(),
            ));
        }

        let mut rows = Vec::with_capacity(items.len());
        let mut total: Amount = 0;

        for line in items {
            if line.name.trim().is_empty() {
                return Err(AppError::InvalidOrder("item name is required".to_string()));
            }
            if line.quantity <= 0 {
                return Err(AppError::InvalidOrder(format!(
                    "quantity of '{}' must be positive",
                    line.name
                )));
            }
            if line.unit_price < 0 {
                return Err(AppError::InvalidOrder(format!(
                    "price of '{}' cannot be negative",
                    line.name
                )));
            }

            let line_total = line
                .line_total()
                .ok_or_else(|| AppError::InvalidOrder("amount too large".to_string()))?;
            total = total
                .checked_add(line_total)
                .ok_or_else(|| AppError::InvalidOrder("amount too large".to_string()))?;

            rows.push(OrderItem::from_line(line, line_total));
        }

        let mut order = Order::new(total, payment_method, is_debt, self.clock.now());
        if let Some(note) = note {
            order = order.with_note(note);
        }

        self.repo.save_order(&mut order, &mut rows).await?;

        info!(
            order_id = order.id,
            total = order.total_amount,
            method = %order.payment_method,
            items = rows.len(),
            "Order recorded"
        );

        Ok(order.id)
    }

    /// Check out a cart. The cart is emptied only if the order was stored.
    pub async fn checkout(
        &self,
        cart: &mut Cart,
        note: Option<String>,
        payment_method: PaymentMethod,
        is_debt: bool,
    ) -> Result<OrderId, AppError> {
        let order_id = self
            .create_order(cart.items(), note, payment_method, is_debt)
            .await?;
        cart.clear();
        Ok(order_id)
    }

    /// Mark a debt order as collected in cash.
    ///
    /// The revenue stays attributed to the day the order was sold. Settling
    /// an order that is already paid rewrites the same state.
    pub async fn settle_debt(&self, order_id: OrderId) -> Result<Order, AppError> {
        let mut order = self
            .repo
            .get_order(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;

        if !order.is_outstanding_debt() {
            warn!(order_id, method = %order.payment_method, "Settling an order that is not an outstanding debt");
        }

        if !self.repo.settle_order(order_id).await? {
            return Err(AppError::OrderNotFound(order_id));
        }
        order.settle();

        info!(order_id, total = order.total_amount, "Debt settled");
        Ok(order)
    }

    /// Get an order and its items.
    pub async fn get_order(&self, order_id: OrderId) -> Result<OrderDetails, AppError> {
        let order = self
            .repo
            .get_order(order_id)
            .await?
            .ok_or(AppError::OrderNotFound(order_id))?;
        let items = self.repo.list_items_for_order(order_id).await?;
        Ok(OrderDetails { order, items })
    }

    /// All orders, newest first.
    pub async fn get_all_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_orders().await?)
    }

    /// All order items.
    pub async fn get_all_items(&self) -> Result<Vec<OrderItem>, AppError> {
        Ok(self.repo.list_order_items().await?)
    }

    /// Orders sold on `date` matching `filter`, newest first, with items.
    pub async fn list_orders(
        &self,
        date: NaiveDate,
        filter: OrderFilter,
    ) -> Result<Vec<OrderDetails>, AppError> {
        let (from, to) = day_bounds(date);
        let orders = self.repo.list_orders_between(from, to).await?;

        let mut listing = Vec::new();
        for order in filter_orders(&orders, date, filter) {
            let items = self.repo.list_items_for_order(order.id).await?;
            listing.push(OrderDetails { order, items });
        }
        Ok(listing)
    }

    // ========================
    // Expense operations
    // ========================

    /// Record an operating expense stamped with the current time.
    pub async fn create_expense(
        &self,
        description: &str,
        amount: Amount,
    ) -> Result<Expense, AppError> {
        if description.trim().is_empty() {
            return Err(AppError::InvalidExpense(
                "description is required".to_string(),
            ));
        }
        if amount <= 0 {
            return Err(AppError::InvalidExpense(
                "amount must be positive".to_string(),
            ));
        }

        let mut expense = Expense::new(description, amount, self.clock.now());
        self.repo.save_expense(&mut expense).await?;

        info!(expense_id = expense.id, amount, "Expense recorded");
        Ok(expense)
    }

    /// All expenses, newest first.
    pub async fn get_all_expenses(&self) -> Result<Vec<Expense>, AppError> {
        Ok(self.repo.list_expenses().await?)
    }

    /// Expenses recorded on `date`, newest first.
    pub async fn list_expenses_on(&self, date: NaiveDate) -> Result<Vec<Expense>, AppError> {
        let (from, to) = day_bounds(date);
        Ok(self.repo.list_expenses_between(from, to).await?)
    }

    // ========================
    // Reports
    // ========================

    /// Revenue, debt and expenses for one day.
    pub async fn daily_report(&self, date: NaiveDate) -> Result<DailyReport, AppError> {
        let (from, to) = day_bounds(date);
        let orders = self.repo.list_orders_between(from, to).await?;
        let expenses = self.repo.list_expenses_between(from, to).await?;

        debug!(%date, orders = orders.len(), expenses = expenses.len(), "Building daily report");
        Ok(build_daily_report(date, &orders, &expenses))
    }

    /// Revenue, debt and expenses for one calendar month.
    pub async fn monthly_report(&self, month: u32, year: i32) -> Result<MonthlyReport, AppError> {
        let (from, to) = month_bounds(year, month)
            .ok_or_else(|| AppError::InvalidPeriod(format!("{}-{:02}", year, month)))?;
        let orders = self.repo.list_orders_between(from, to).await?;
        let expenses = self.repo.list_expenses_between(from, to).await?;

        debug!(year, month, orders = orders.len(), "Building monthly report");
        Ok(build_monthly_report(year, month, &orders, &expenses))
    }

    /// Report for the month the clock is currently in.
    pub async fn current_month_report(&self) -> Result<MonthlyReport, AppError> {
        let today = self.today();
        self.monthly_report(today.month(), today.year()).await
    }
}
