mod common;

use anyhow::Result;
use cafebook::application::AppError;
use common::{parse_date, parse_datetime, test_service};

#[tokio::test]
async fn test_create_expense() -> Result<()> {
    let (service, _clock, _temp) = test_service().await?;

    let expense = service.create_expense("Mua đá", 5000).await?;
    assert!(expense.id > 0);
    assert_eq!(expense.description, "Mua đá");
    assert_eq!(expense.amount, 5000);
    assert_eq!(expense.timestamp, parse_datetime("2024-03-08 09:00"));

    let all = service.get_all_expenses().await?;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], expense);

    Ok(())
}

#[tokio::test]
async fn test_invalid_expenses_rejected() -> Result<()> {
    let (service, _clock, _temp) = test_service().await?;

    assert!(matches!(
        service.create_expense("Mua đá", 0).await,
        Err(AppError::InvalidExpense(_))
    ));
    assert!(matches!(
        service.create_expense("Mua đá", -5000).await,
        Err(AppError::InvalidExpense(_))
    ));
    assert!(matches!(
        service.create_expense("  ", 5000).await,
        Err(AppError::InvalidExpense(_))
    ));

    assert!(service.get_all_expenses().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_expenses_listed_newest_first_per_day() -> Result<()> {
    let (service, clock, _temp) = test_service().await?;

    clock.set(parse_datetime("2024-03-08 06:30"));
    let ice = service.create_expense("Mua đá", 5000).await?;
    clock.set(parse_datetime("2024-03-08 15:00"));
    let milk = service.create_expense("Sữa tươi", 64000).await?;
    clock.set(parse_datetime("2024-03-09 06:30"));
    let sugar = service.create_expense("Đường", 22000).await?;

    let ids: Vec<i64> = service
        .list_expenses_on(parse_date("2024-03-08"))
        .await?
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(ids, vec![milk.id, ice.id]);

    let all: Vec<i64> = service
        .get_all_expenses()
        .await?
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(all, vec![sugar.id, milk.id, ice.id]);

    Ok(())
}
