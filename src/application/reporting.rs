use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, Expense, Order, PaymentMethod};

/// Takings of a single business day.
///
/// Revenue only counts orders that have been paid. A debt order is attributed
/// to the day it was sold, and shows up in that day's revenue once settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyReport {
    pub date: NaiveDate,
    pub revenue: Amount,
    pub cash_revenue: Amount,
    pub transfer_revenue: Amount,
    pub debt_outstanding: Amount,
    pub expense_total: Amount,
    pub net_profit: Amount,
    pub paid_order_count: i64,
    pub debt_order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub revenue: Amount,
    /// Number of paid orders
    pub order_count: i64,
    pub debt_outstanding: Amount,
    pub expense_total: Amount,
    pub net_profit: Amount,
    /// Paid revenue per sale date, ascending, for charting
    pub daily_revenue: Vec<DailyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub revenue: Amount,
}

/// Which orders a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderFilter {
    #[default]
    All,
    /// Paid in cash (includes settled debts)
    Cash,
    /// Paid by transfer
    Transfer,
    /// Debts not collected yet
    Debt,
}

impl OrderFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderFilter::All => "all",
            OrderFilter::Cash => "cash",
            OrderFilter::Transfer => "transfer",
            OrderFilter::Debt => "debt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "all" => Some(OrderFilter::All),
            "cash" => Some(OrderFilter::Cash),
            "transfer" => Some(OrderFilter::Transfer),
            "debt" | "unpaid" => Some(OrderFilter::Debt),
            _ => None,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        match self {
            OrderFilter::All => true,
            OrderFilter::Cash => order.is_paid && order.payment_method == PaymentMethod::Cash,
            OrderFilter::Transfer => {
                order.is_paid && order.payment_method == PaymentMethod::Transfer
            }
            OrderFilter::Debt => !order.is_paid,
        }
    }
}

impl std::str::FromStr for OrderFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderFilter::from_str(s).ok_or_else(|| format!("unknown order filter: {}", s))
    }
}

/// `[date 00:00, next day 00:00)`
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(NaiveTime::MIN);
    let end = date
        .succ_opt()
        .map(|next| next.and_time(NaiveTime::MIN))
        .unwrap_or(NaiveDateTime::MAX);
    (start, end)
}

/// `[first of month, first of next month)`, or None for an invalid month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some((first.and_time(NaiveTime::MIN), next.and_time(NaiveTime::MIN)))
}

/// Report sums saturate at `Amount::MAX` instead of overflowing.
fn saturating_sum(amounts: impl Iterator<Item = Amount>) -> Amount {
    amounts.fold(0, Amount::saturating_add)
}

fn sum_totals<'a>(orders: impl Iterator<Item = &'a Order>) -> Amount {
    saturating_sum(orders.map(|o| o.total_amount))
}

/// Aggregate one day. Orders and expenses outside `date` are ignored, so the
/// caller may pass a wider snapshot.
pub fn build_daily_report(date: NaiveDate, orders: &[Order], expenses: &[Expense]) -> DailyReport {
    let daily: Vec<&Order> = orders
        .iter()
        .filter(|o| o.timestamp.date() == date)
        .collect();

    let paid = || daily.iter().copied().filter(|o| o.is_paid);

    let revenue = sum_totals(paid());
    let cash_revenue = sum_totals(paid().filter(|o| o.payment_method == PaymentMethod::Cash));
    let transfer_revenue =
        sum_totals(paid().filter(|o| o.payment_method == PaymentMethod::Transfer));
    let debt_outstanding = sum_totals(daily.iter().copied().filter(|o| !o.is_paid));

    let expense_total = saturating_sum(
        expenses
            .iter()
            .filter(|e| e.timestamp.date() == date)
            .map(|e| e.amount),
    );

    DailyReport {
        date,
        revenue,
        cash_revenue,
        transfer_revenue,
        debt_outstanding,
        expense_total,
        net_profit: revenue.saturating_sub(expense_total),
        paid_order_count: paid().count() as i64,
        debt_order_count: daily.iter().filter(|o| !o.is_paid).count() as i64,
    }
}

/// Aggregate one calendar month. Records outside the month are ignored.
pub fn build_monthly_report(
    year: i32,
    month: u32,
    orders: &[Order],
    expenses: &[Expense],
) -> MonthlyReport {
    let in_month = |ts: &NaiveDateTime| ts.year() == year && ts.month() == month;

    let monthly: Vec<&Order> = orders.iter().filter(|o| in_month(&o.timestamp)).collect();

    let mut by_date: BTreeMap<NaiveDate, Amount> = BTreeMap::new();
    let mut revenue: Amount = 0;
    let mut order_count = 0;
    let mut debt_outstanding: Amount = 0;

    for order in &monthly {
        if order.is_paid {
            revenue = revenue.saturating_add(order.total_amount);
            order_count += 1;
            let day = by_date.entry(order.timestamp.date()).or_insert(0);
            *day = day.saturating_add(order.total_amount);
        } else {
            debt_outstanding = debt_outstanding.saturating_add(order.total_amount);
        }
    }

    let expense_total = saturating_sum(
        expenses
            .iter()
            .filter(|e| in_month(&e.timestamp))
            .map(|e| e.amount),
    );

    MonthlyReport {
        year,
        month,
        revenue,
        order_count,
        debt_outstanding,
        expense_total,
        net_profit: revenue.saturating_sub(expense_total),
        daily_revenue: by_date
            .into_iter()
            .map(|(date, revenue)| DailyRevenue { date, revenue })
            .collect(),
    }
}

/// Orders sold on `date` that match `filter`, newest first.
pub fn filter_orders(orders: &[Order], date: NaiveDate, filter: OrderFilter) -> Vec<Order> {
    let mut selected: Vec<Order> = orders
        .iter()
        .filter(|o| o.timestamp.date() == date && filter.matches(o))
        .cloned()
        .collect();
    selected.sort_by(|a, b| b.id.cmp(&a.id));
    selected
}
