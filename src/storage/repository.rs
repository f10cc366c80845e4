use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::{Row, SqlitePool};

use crate::domain::{Expense, Order, OrderId, OrderItem, PaymentMethod};

use super::MIGRATION_001_INITIAL;

/// Timestamps are stored as fixed-width local time text so that string
/// comparison in SQL matches chronological order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(s: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .with_context(|| format!("Invalid timestamp: {}", s))
}

const ORDER_COLUMNS: &str =
    "id, total_amount, note, payment_method, is_debt, is_paid, timestamp";

/// Repository for persisting and querying orders, order items and expenses.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Order operations
    // ========================

    /// Save an order together with its items in a single transaction.
    /// Assigns ids to the order and to every item. If any insert fails the
    /// transaction is rolled back and nothing is stored.
    pub async fn save_order(&self, order: &mut Order, items: &mut [OrderItem]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin order transaction")?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (total_amount, note, payment_method, is_debt, is_paid, timestamp)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.total_amount)
        .bind(&order.note)
        .bind(order.payment_method.as_str())
        .bind(order.is_debt)
        .bind(order.is_paid)
        .bind(format_timestamp(order.timestamp))
        .execute(&mut *tx)
        .await
        .context("Failed to save order")?;

        let order_id = result.last_insert_rowid();

        for item in items.iter_mut() {
            let result = sqlx::query(
                r#"
                INSERT INTO order_items (order_id, name, quantity, unit_price, line_total)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(order_id)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.line_total)
            .execute(&mut *tx)
            .await
            .context("Failed to save order item")?;

            item.id = result.last_insert_rowid();
            item.order_id = order_id;
        }

        tx.commit()
            .await
            .context("Failed to commit order transaction")?;

        order.id = order_id;
        Ok(())
    }

    /// Mark an order as paid in cash. Returns false if no such order exists.
    pub async fn settle_order(&self, id: OrderId) -> Result<bool> {
        let result = sqlx::query("UPDATE orders SET is_paid = 1, payment_method = ? WHERE id = ?")
            .bind(PaymentMethod::Cash.as_str())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to settle order")?;

        Ok(result.rows_affected() > 0)
    }

    /// Get an order by ID.
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let query = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch order")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_order(&row)?)),
            None => Ok(None),
        }
    }

    /// List all orders, newest first.
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        let query = format!("SELECT {} FROM orders ORDER BY id DESC", ORDER_COLUMNS);
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list orders")?;

        rows.iter().map(Self::row_to_order).collect()
    }

    /// List orders with `from <= timestamp < to`, newest first.
    pub async fn list_orders_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Order>> {
        let query = format!(
            "SELECT {} FROM orders WHERE timestamp >= ? AND timestamp < ? ORDER BY id DESC",
            ORDER_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(format_timestamp(from))
            .bind(format_timestamp(to))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list orders in range")?;

        rows.iter().map(Self::row_to_order).collect()
    }

    /// List every order item (no particular order).
    pub async fn list_order_items(&self) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            "SELECT id, order_id, name, quantity, unit_price, line_total FROM order_items",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list order items")?;

        rows.iter().map(Self::row_to_order_item).collect()
    }

    /// List the items of one order, in insertion order.
    pub async fn list_items_for_order(&self, order_id: OrderId) -> Result<Vec<OrderItem>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, name, quantity, unit_price, line_total
            FROM order_items
            WHERE order_id = ?
            ORDER BY id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list items for order")?;

        rows.iter().map(Self::row_to_order_item).collect()
    }

    fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> Result<Order> {
        let method_str: String = row.get("payment_method");
        let timestamp_str: String = row.get("timestamp");

        Ok(Order {
            id: row.get("id"),
            total_amount: row.get("total_amount"),
            note: row.get("note"),
            payment_method: PaymentMethod::from_str(&method_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment method: {}", method_str))?,
            is_debt: row.get::<i32, _>("is_debt") != 0,
            is_paid: row.get::<i32, _>("is_paid") != 0,
            timestamp: parse_timestamp(&timestamp_str)?,
        })
    }

    fn row_to_order_item(row: &sqlx::sqlite::SqliteRow) -> Result<OrderItem> {
        Ok(OrderItem {
            id: row.get("id"),
            order_id: row.get("order_id"),
            name: row.get("name"),
            quantity: row.get("quantity"),
            unit_price: row.get("unit_price"),
            line_total: row.get("line_total"),
        })
    }

    // ========================
    // Expense operations
    // ========================

    /// Save a new expense and assign its id.
    pub async fn save_expense(&self, expense: &mut Expense) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO expenses (description, amount, timestamp)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&expense.description)
        .bind(expense.amount)
        .bind(format_timestamp(expense.timestamp))
        .execute(&self.pool)
        .await
        .context("Failed to save expense")?;

        expense.id = result.last_insert_rowid();
        Ok(())
    }

    /// List all expenses, newest first.
    pub async fn list_expenses(&self) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            "SELECT id, description, amount, timestamp FROM expenses ORDER BY id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    /// List expenses with `from <= timestamp < to`, newest first.
    pub async fn list_expenses_between(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Expense>> {
        let rows = sqlx::query(
            r#"
            SELECT id, description, amount, timestamp
            FROM expenses
            WHERE timestamp >= ? AND timestamp < ?
            ORDER BY id DESC
            "#,
        )
        .bind(format_timestamp(from))
        .bind(format_timestamp(to))
        .fetch_all(&self.pool)
        .await
        .context("Failed to list expenses in range")?;

        rows.iter().map(Self::row_to_expense).collect()
    }

    fn row_to_expense(row: &sqlx::sqlite::SqliteRow) -> Result<Expense> {
        let timestamp_str: String = row.get("timestamp");

        Ok(Expense {
            id: row.get("id"),
            description: row.get("description"),
            amount: row.get("amount"),
            timestamp: parse_timestamp(&timestamp_str)?,
        })
    }
}
