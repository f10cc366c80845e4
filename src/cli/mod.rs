use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};

use crate::application::{CafeService, DailyReport, MonthlyReport, OrderDetails, OrderFilter};
use crate::domain::{
    find_menu_item, format_amount, parse_amount, Cart, PaymentMethod, StatusLabel, MENU,
};

/// Cafebook - café till and bookkeeping
#[derive(Parser)]
#[command(name = "cafebook")]
#[command(about = "Record café sales, debts and expenses, and report daily and monthly takings")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "CAFEBOOK_DB", default_value = "cafebook.db")]
    pub database: String,

    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Show the price list
    Menu,

    /// Record a sale
    Order {
        /// Item as NAME, NAME:QTY or NAME:QTY:PRICE (repeatable).
        /// Menu items use the list price unless PRICE is given.
        #[arg(short, long = "item", required = true)]
        items: Vec<String>,

        /// Free-text note (table number, less ice, takeaway...)
        #[arg(short, long)]
        note: Option<String>,

        /// Payment method: cash, transfer
        #[arg(short, long, default_value = "cash")]
        method: String,

        /// Record as debt (customer has not paid yet)
        #[arg(long)]
        debt: bool,
    },

    /// Mark a debt order as paid in cash
    Settle {
        /// Order ID
        id: i64,
    },

    /// Show an order and its items
    Show {
        /// Order ID
        id: i64,
    },

    /// List orders of a day
    Orders {
        /// Day to list (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Filter: all, cash, transfer, debt
        #[arg(short, long, default_value = "all")]
        filter: String,
    },

    /// Record an expense
    Expense {
        /// Amount (e.g. "50000", "50,000" or "50k")
        amount: String,

        /// What the money was spent on
        description: String,
    },

    /// List expenses of a day
    Expenses {
        /// Day to list (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export data to CSV
    Export {
        /// What to export: orders, items, expenses
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Takings of one day
    Daily {
        /// Day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Takings of one month
    Monthly {
        /// Month 1-12 (defaults to current month)
        #[arg(long)]
        month: Option<u32>,

        /// Year (defaults to current year)
        #[arg(long)]
        year: Option<i32>,

        /// Output format: table, json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => {
                CafeService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Menu => {
                println!("{:<28} {:>10}", "ITEM", "PRICE");
                println!("{}", "-".repeat(39));
                for item in MENU {
                    println!("{:<28} {:>10}", item.name, format_amount(item.price));
                }
            }

            Commands::Order {
                items,
                note,
                method,
                debt,
            } => {
                let service = CafeService::connect(&self.database).await?;
                let payment_method = parse_payment_method(&method)?;

                let mut cart = Cart::new();
                for spec in &items {
                    add_item_spec(&mut cart, spec)?;
                }

                let total = cart.total();
                let order_id = service
                    .checkout(&mut cart, note, payment_method, debt)
                    .await?;

                if debt {
                    println!(
                        "Recorded debt order #{}: {} đ (not counted in revenue until paid)",
                        order_id,
                        format_amount(total)
                    );
                } else {
                    println!(
                        "Recorded order #{}: {} đ ({})",
                        order_id,
                        format_amount(total),
                        payment_method
                    );
                }
            }

            Commands::Settle { id } => {
                let service = CafeService::connect(&self.database).await?;
                let order = service.settle_debt(id).await?;
                println!(
                    "Settled order #{}: {} đ collected in cash (sold {})",
                    order.id,
                    format_amount(order.total_amount),
                    order.timestamp.format("%Y-%m-%d %H:%M")
                );
            }

            Commands::Show { id } => {
                let service = CafeService::connect(&self.database).await?;
                let details = service.get_order(id).await?;
                print_order(&details, true);
            }

            Commands::Orders { date, filter } => {
                let service = CafeService::connect(&self.database).await?;
                let day = resolve_date(&service, date)?;
                let filter: OrderFilter = filter.parse().map_err(|e| {
                    anyhow::anyhow!(
                        "Invalid filter. Valid filters: all, cash, transfer, debt. Error: {}",
                        e
                    )
                })?;

                let listing = service.list_orders(day, filter).await?;
                if listing.is_empty() {
                    println!("No orders found.");
                } else {
                    for details in &listing {
                        print_order(details, false);
                    }
                }
            }

            Commands::Expense {
                amount,
                description,
            } => {
                let service = CafeService::connect(&self.database).await?;
                let amount = parse_amount(&amount)
                    .context("Invalid amount format. Use '50000', '50,000' or '50k'")?;
                let expense = service.create_expense(&description, amount).await?;
                println!(
                    "Recorded expense: {} đ {}",
                    format_amount(expense.amount),
                    expense.description
                );
            }

            Commands::Expenses { date } => {
                let service = CafeService::connect(&self.database).await?;
                let day = resolve_date(&service, date)?;
                let expenses = service.list_expenses_on(day).await?;

                if expenses.is_empty() {
                    println!("No expenses found.");
                } else {
                    println!("{:<6} {:>12} DESCRIPTION", "TIME", "AMOUNT");
                    println!("{}", "-".repeat(50));
                    for expense in &expenses {
                        println!(
                            "{:<6} {:>12} {}",
                            expense.timestamp.format("%H:%M"),
                            format_amount(expense.amount),
                            truncate(&expense.description, 30)
                        );
                    }
                }
            }

            Commands::Report(report_cmd) => {
                let service = CafeService::connect(&self.database).await?;
                run_report_command(&service, report_cmd).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = CafeService::connect(&self.database).await?;
                run_export_command(&service, &export_type, output.as_deref()).await?;
            }
        }

        Ok(())
    }
}

async fn run_report_command(service: &CafeService, cmd: ReportCommands) -> Result<()> {
    match cmd {
        ReportCommands::Daily { date, format } => {
            let day = resolve_date(service, date)?;
            let report = service.daily_report(day).await?;

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("date,revenue,cash,transfer,debt_outstanding,expenses,net_profit");
                    println!(
                        "{},{},{},{},{},{},{}",
                        report.date,
                        report.revenue,
                        report.cash_revenue,
                        report.transfer_revenue,
                        report.debt_outstanding,
                        report.expense_total,
                        report.net_profit
                    );
                }
                _ => print_daily_table(&report),
            }
        }

        ReportCommands::Monthly {
            month,
            year,
            format,
        } => {
            let report = match (month, year) {
                (None, None) => service.current_month_report().await?,
                (month, year) => {
                    let today = service.today();
                    service
                        .monthly_report(
                            month.unwrap_or_else(|| today.month()),
                            year.unwrap_or_else(|| today.year()),
                        )
                        .await?
                }
            };

            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                "csv" => {
                    println!("date,revenue");
                    for day in &report.daily_revenue {
                        println!("{},{}", day.date, day.revenue);
                    }
                }
                _ => print_monthly_table(&report),
            }
        }
    }

    Ok(())
}

async fn run_export_command(
    service: &CafeService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{stdout, Write};

    let exporter = Exporter::new(service);

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    let count = match export_type {
        "orders" => exporter.export_orders_csv(writer).await?,
        "items" => exporter.export_items_csv(writer).await?,
        "expenses" => exporter.export_expenses_csv(writer).await?,
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: orders, items, expenses",
                export_type
            );
        }
    };

    if output.is_some() {
        eprintln!("Exported {} {}", count, export_type);
    }

    Ok(())
}

fn print_daily_table(report: &DailyReport) {
    println!("Daily Report {}", report.date.format("%d/%m/%Y"));
    println!();
    println!("Revenue (collected): {:>15} đ", format_amount(report.revenue));
    println!("  Cash:              {:>15} đ", format_amount(report.cash_revenue));
    println!("  Transfer:          {:>15} đ", format_amount(report.transfer_revenue));
    println!("Expenses:            {:>15} đ", format_amount(report.expense_total));
    println!("{}", "-".repeat(39));
    println!("Net profit:          {:>15} đ", format_amount(report.net_profit));
    println!();
    println!(
        "Unpaid debt:         {:>15} đ ({} order(s))",
        format_amount(report.debt_outstanding),
        report.debt_order_count
    );
}

fn print_monthly_table(report: &MonthlyReport) {
    println!("Monthly Report {:02}/{}", report.month, report.year);
    println!();
    println!("Revenue (collected): {:>15} đ", format_amount(report.revenue));
    println!("Orders sold:         {:>15}", report.order_count);
    println!("Unpaid debt:         {:>15} đ", format_amount(report.debt_outstanding));
    println!("Expenses:            {:>15} đ", format_amount(report.expense_total));
    println!("{}", "-".repeat(39));
    println!("Net profit:          {:>15} đ", format_amount(report.net_profit));

    if !report.daily_revenue.is_empty() {
        println!();
        println!("{:<12} {:>15}", "DATE", "REVENUE");
        for day in &report.daily_revenue {
            println!(
                "{:<12} {:>15}",
                day.date.format("%d/%m"),
                format_amount(day.revenue)
            );
        }
    }
}

fn print_order(details: &OrderDetails, verbose: bool) {
    let order = &details.order;
    let label = details.status_label();

    let amount = if label == StatusLabel::Debt {
        format!(
            "{} đ (not yet counted in revenue)",
            format_amount(order.total_amount)
        )
    } else {
        format!("{} đ", format_amount(order.total_amount))
    };
    let note = order
        .note
        .as_deref()
        .map(|n| format!(" | {}", n))
        .unwrap_or_default();
    let time = if verbose {
        order.timestamp.format("%Y-%m-%d %H:%M").to_string()
    } else {
        order.timestamp.format("%H:%M").to_string()
    };

    println!("#{} | {} | {} | {}{}", order.id, time, amount, label, note);
    for item in &details.items {
        println!(
            "    {:<28} x{:<3} {:>12}",
            truncate(&item.name, 28),
            item.quantity,
            format_amount(item.line_total)
        );
    }
}

fn parse_payment_method(method: &str) -> Result<PaymentMethod> {
    match method.parse::<PaymentMethod>() {
        Ok(PaymentMethod::Debt) | Err(_) => anyhow::bail!(
            "Invalid payment method '{}'. Valid methods: cash, transfer (use --debt for debts)",
            method
        ),
        Ok(m) => Ok(m),
    }
}

/// Parse `NAME`, `NAME:QTY` or `NAME:QTY:PRICE` and put it in the cart.
fn add_item_spec(cart: &mut Cart, spec: &str) -> Result<()> {
    let mut parts = spec.splitn(3, ':');
    let name = parts.next().unwrap_or_default().trim();

    let quantity: i64 = match parts.next() {
        Some(q) => q
            .trim()
            .parse()
            .with_context(|| format!("Invalid quantity in '{}'", spec))?,
        None => 1,
    };

    let price = match parts.next() {
        Some(p) => parse_amount(p).with_context(|| format!("Invalid price in '{}'", spec))?,
        None => find_menu_item(name)
            .map(|item| item.price)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "'{}' is not on the menu; give a price as NAME:QTY:PRICE",
                    name
                )
            })?,
    };

    cart.add(name, quantity, price)
        .with_context(|| format!("Cannot add '{}'", spec))?;
    Ok(())
}

fn resolve_date(service: &CafeService, date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(date_str) => parse_date(&date_str)
            .with_context(|| format!("Invalid date format '{}'. Use YYYY-MM-DD", date_str)),
        None => Ok(service.today()),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").context("Date must be in YYYY-MM-DD format")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_menu_item_spec() {
        let mut cart = Cart::new();
        add_item_spec(&mut cart, "Cà phê đen:2").unwrap();
        add_item_spec(&mut cart, "Bạc sỉu").unwrap();

        assert_eq!(cart.items()[0].quantity, 2);
        assert_eq!(cart.items()[0].unit_price, 15_000);
        assert_eq!(cart.items()[1].quantity, 1);
        assert_eq!(cart.total(), 55_000);
    }

    #[test]
    fn test_add_custom_item_spec() {
        let mut cart = Cart::new();
        add_item_spec(&mut cart, "Bánh flan:3:12k").unwrap();
        assert_eq!(cart.items()[0].name, "Bánh flan");
        assert_eq!(cart.total(), 36_000);

        assert!(add_item_spec(&mut cart, "Bánh flan:1").is_err());
        assert!(add_item_spec(&mut cart, "Cà phê đen:0").is_err());
        assert!(add_item_spec(&mut cart, "Cà phê đen:x").is_err());
    }

    #[test]
    fn test_parse_payment_method() {
        assert_eq!(parse_payment_method("cash").unwrap(), PaymentMethod::Cash);
        assert_eq!(
            parse_payment_method("Transfer").unwrap(),
            PaymentMethod::Transfer
        );
        assert!(parse_payment_method("debt").is_err());
        assert!(parse_payment_method("card").is_err());
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Cà phê", 10), "Cà phê");
        assert_eq!(truncate("Matcha latte kem muối", 10), "Matcha ...");
    }
}
