use anyhow::Result;
use cafebook::domain::{Expense, Order, OrderItem, PaymentMethod};
use cafebook::storage::Repository;
use chrono::NaiveDateTime;
use tempfile::TempDir;

async fn test_repo() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let repo = Repository::init(&format!("sqlite:{}?mode=rwc", db_path.display())).await?;
    Ok((repo, temp_dir))
}

fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn item(name: &str, quantity: i64, unit_price: i64) -> OrderItem {
    OrderItem {
        id: 0,
        order_id: 0,
        name: name.to_string(),
        quantity,
        unit_price,
        line_total: quantity * unit_price,
    }
}

#[tokio::test]
async fn test_save_order_assigns_ids() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    let mut order = Order::new(55000, PaymentMethod::Cash, false, ts("2024-03-08 09:15:30"))
        .with_note("mang về");
    let mut items = vec![item("Cà phê đen", 2, 15000), item("Bạc sỉu", 1, 25000)];

    repo.save_order(&mut order, &mut items).await?;

    assert!(order.id > 0);
    assert!(items.iter().all(|i| i.order_id == order.id && i.id > 0));
    assert!(items[0].id < items[1].id);

    let stored = repo.get_order(order.id).await?.unwrap();
    assert_eq!(stored, order);

    let stored_items = repo.list_items_for_order(order.id).await?;
    assert_eq!(stored_items, items);

    Ok(())
}

#[tokio::test]
async fn test_failed_item_insert_leaves_no_partial_order() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    let mut order = Order::new(15000, PaymentMethod::Cash, false, ts("2024-03-08 09:00:00"));
    // Second line violates the quantity check constraint
    let mut items = vec![item("Cà phê đen", 1, 15000), item("Bạc sỉu", 0, 25000)];

    assert!(repo.save_order(&mut order, &mut items).await.is_err());

    assert!(repo.list_orders().await?.is_empty());
    assert!(repo.list_order_items().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_line_total_must_match() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    let mut order = Order::new(30000, PaymentMethod::Cash, false, ts("2024-03-08 09:00:00"));
    let mut bad = item("Cà phê đen", 2, 15000);
    bad.line_total = 20000;

    assert!(repo.save_order(&mut order, &mut [bad]).await.is_err());
    assert!(repo.list_orders().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_settle_order_missing_row() -> Result<()> {
    let (repo, _temp) = test_repo().await?;
    assert!(!repo.settle_order(7).await?);
    Ok(())
}

#[tokio::test]
async fn test_range_scans_are_half_open() -> Result<()> {
    let (repo, _temp) = test_repo().await?;

    for (time, amount) in [
        ("2024-03-07 23:59:59", 1000),
        ("2024-03-08 00:00:00", 2000),
        ("2024-03-08 23:59:59", 3000),
        ("2024-03-09 00:00:00", 4000),
    ] {
        let mut order = Order::new(amount, PaymentMethod::Cash, false, ts(time));
        repo.save_order(&mut order, &mut [item("Nước suối", 1, amount)])
            .await?;

        let mut expense = Expense::new("Đá", amount, ts(time));
        repo.save_expense(&mut expense).await?;
    }

    let from = ts("2024-03-08 00:00:00");
    let to = ts("2024-03-09 00:00:00");

    let totals: Vec<i64> = repo
        .list_orders_between(from, to)
        .await?
        .iter()
        .map(|o| o.total_amount)
        .collect();
    assert_eq!(totals, vec![3000, 2000]);

    let amounts: Vec<i64> = repo
        .list_expenses_between(from, to)
        .await?
        .iter()
        .map(|e| e.amount)
        .collect();
    assert_eq!(amounts, vec![3000, 2000]);

    Ok(())
}

#[tokio::test]
async fn test_reopen_keeps_data() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let url = format!("sqlite:{}?mode=rwc", temp_dir.path().join("till.db").display());

    {
        let repo = Repository::init(&url).await?;
        let mut order = Order::new(30000, PaymentMethod::Debt, true, ts("2024-03-08 09:00:00"));
        repo.save_order(&mut order, &mut [item("Cà phê đen", 2, 15000)])
            .await?;
    }

    // Migrations are re-runnable
    let repo = Repository::init(&url).await?;
    let orders = repo.list_orders().await?;
    assert_eq!(orders.len(), 1);
    assert!(orders[0].is_debt);
    assert!(!orders[0].is_paid);
    assert_eq!(orders[0].payment_method, PaymentMethod::Debt);

    Ok(())
}
