// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use cafebook::application::CafeService;
use cafebook::domain::{FixedClock, LineItem};
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database and a clock
/// pinned to `start`
pub async fn test_service_at(start: &str) -> Result<(CafeService, Arc<FixedClock>, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let clock = Arc::new(FixedClock::new(parse_datetime(start)));
    let service = CafeService::init_with_clock(db_path.to_str().unwrap(), clock.clone()).await?;
    Ok((service, clock, temp_dir))
}

/// Helper to create a test service whose clock reads 2024-03-08 09:00
pub async fn test_service() -> Result<(CafeService, Arc<FixedClock>, TempDir)> {
    test_service_at("2024-03-08 09:00").await
}

/// Helper to parse "YYYY-MM-DD HH:MM" into a local timestamp
pub fn parse_datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Two black coffees, the standard test cart
pub fn two_black_coffees() -> Vec<LineItem> {
    vec![LineItem::new("Cà phê đen", 2, 15000)]
}
