use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::Row;

use hotdeal_core::domain::deal::{DealId, EventPeriod, HotDeal};

use super::{decode_error, DealRepository, RepositoryError};
use crate::DbPool;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = "SELECT id, registered_on, category, platform, brand, product_name,
        standard_model_name, normal_price, event_start, event_end, final_price,
        perceived_price, gift
 FROM hot_deal";

pub struct SqlDealRepository {
    pool: DbPool,
}

impl SqlDealRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn parse_date(column: &str, value: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|error| RepositoryError::Decode(format!("{column} `{value}`: {error}")))
}

fn parse_money(column: &str, value: &str) -> Result<Decimal, RepositoryError> {
    Decimal::from_str(value)
        .map_err(|error| RepositoryError::Decode(format!("{column} `{value}`: {error}")))
}

fn row_to_deal(row: &sqlx::sqlite::SqliteRow) -> Result<HotDeal, RepositoryError> {
    let text = |column: &str| row.try_get::<String, _>(column).map_err(decode_error);

    let event_start = parse_date("event_start", &text("event_start")?)?;
    let event_end = parse_date("event_end", &text("event_end")?)?;
    let event_period = EventPeriod::new(event_start, event_end).map_err(decode_error)?;

    Ok(HotDeal {
        id: DealId(text("id")?),
        registered_on: parse_date("registered_on", &text("registered_on")?)?,
        category: text("category")?,
        platform: text("platform")?,
        brand: text("brand")?,
        product_name: text("product_name")?,
        standard_model_name: text("standard_model_name")?,
        normal_price: parse_money("normal_price", &text("normal_price")?)?,
        event_period,
        final_price: parse_money("final_price", &text("final_price")?)?,
        perceived_price: parse_money("perceived_price", &text("perceived_price")?)?,
        gift: text("gift")?,
    })
}

#[async_trait::async_trait]
impl DealRepository for SqlDealRepository {
    async fn find_by_id(&self, id: &DealId) -> Result<Option<HotDeal>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_deal(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self) -> Result<Vec<HotDeal>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> =
            sqlx::query(&format!("{SELECT_COLUMNS} ORDER BY rowid ASC"))
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(row_to_deal).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, deal: HotDeal) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO hot_deal (id, registered_on, category, platform, brand, product_name,
                                   standard_model_name, normal_price, event_start, event_end,
                                   final_price, perceived_price, gift)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 category = excluded.category,
                 platform = excluded.platform,
                 brand = excluded.brand,
                 product_name = excluded.product_name,
                 standard_model_name = excluded.standard_model_name,
                 normal_price = excluded.normal_price,
                 event_start = excluded.event_start,
                 event_end = excluded.event_end,
                 final_price = excluded.final_price,
                 perceived_price = excluded.perceived_price,
                 gift = excluded.gift",
        )
        .bind(&deal.id.0)
        .bind(deal.registered_on.format(DATE_FORMAT).to_string())
        .bind(&deal.category)
        .bind(&deal.platform)
        .bind(&deal.brand)
        .bind(&deal.product_name)
        .bind(&deal.standard_model_name)
        .bind(deal.normal_price.to_string())
        .bind(deal.event_period.start().format(DATE_FORMAT).to_string())
        .bind(deal.event_period.end().format(DATE_FORMAT).to_string())
        .bind(deal.final_price.to_string())
        .bind(deal.perceived_price.to_string())
        .bind(&deal.gift)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &DealId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM hot_deal WHERE id = ?").bind(&id.0).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "deal", id: id.0.clone() });
        }
        Ok(())
    }

    async fn standard_model_names(&self) -> Result<Vec<String>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = sqlx::query(
            "SELECT standard_model_name
             FROM hot_deal
             GROUP BY standard_model_name
             ORDER BY MIN(rowid) ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("standard_model_name").map_err(decode_error))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use hotdeal_core::domain::deal::{DealId, EventPeriod, HotDeal};

    use super::SqlDealRepository;
    use crate::repositories::{DealRepository, RepositoryError};
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn sample_deal(id: &str, model: &str, final_price: i64) -> HotDeal {
        let start = NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2025, 11, 11).expect("valid date");
        HotDeal {
            id: DealId(id.to_string()),
            registered_on: start,
            category: "디지털/가전".to_string(),
            platform: "쿠팡".to_string(),
            brand: "삼성전자".to_string(),
            product_name: format!("갤럭시 {model}"),
            standard_model_name: model.to_string(),
            normal_price: Decimal::from(259_000),
            event_period: EventPeriod::new(start, end).expect("period"),
            final_price: Decimal::from(final_price),
            perceived_price: Decimal::from(final_price - 10_000),
            gift: "케이스".to_string(),
        }
    }

    #[tokio::test]
    async fn save_and_find_by_id() {
        let repo = SqlDealRepository::new(setup().await);
        let deal = sample_deal("D-001", "버즈3 프로", 219_000);

        repo.save(deal.clone()).await.expect("save");
        let found = repo.find_by_id(&DealId("D-001".to_string())).await.expect("find");

        assert_eq!(found, Some(deal));
    }

    #[tokio::test]
    async fn money_keeps_exact_decimal_text() {
        let repo = SqlDealRepository::new(setup().await);
        let mut deal = sample_deal("D-002", "버즈3", 0);
        deal.final_price = Decimal::from(-5_000);
        deal.perceived_price = Decimal::ZERO;

        repo.save(deal.clone()).await.expect("save");
        let found = repo.find_by_id(&deal.id).await.expect("find").expect("should exist");

        assert_eq!(found.final_price, Decimal::from(-5_000));
        assert_eq!(found.perceived_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn list_keeps_registration_order_after_upsert() {
        let repo = SqlDealRepository::new(setup().await);
        repo.save(sample_deal("D-001", "버즈3", 219_000)).await.expect("save 1");
        repo.save(sample_deal("D-002", "워치7", 289_000)).await.expect("save 2");

        let mut updated = sample_deal("D-001", "버즈3", 199_000);
        updated.gift = String::new();
        repo.save(updated).await.expect("upsert");

        let deals = repo.list().await.expect("list");
        let ids: Vec<&str> = deals.iter().map(|deal| deal.id.0.as_str()).collect();
        assert_eq!(ids, vec!["D-001", "D-002"]);
        assert_eq!(deals[0].final_price, Decimal::from(199_000));
    }

    #[tokio::test]
    async fn standard_model_names_are_distinct_in_first_seen_order() {
        let repo = SqlDealRepository::new(setup().await);
        repo.save(sample_deal("D-001", "워치7", 289_000)).await.expect("save 1");
        repo.save(sample_deal("D-002", "버즈3", 219_000)).await.expect("save 2");
        repo.save(sample_deal("D-003", "워치7", 279_000)).await.expect("save 3");

        let names = repo.standard_model_names().await.expect("names");
        assert_eq!(names, vec!["워치7".to_string(), "버즈3".to_string()]);
    }

    #[tokio::test]
    async fn delete_missing_deal_is_not_found() {
        let repo = SqlDealRepository::new(setup().await);
        repo.save(sample_deal("D-001", "버즈3", 219_000)).await.expect("save");

        repo.delete(&DealId("D-001".to_string())).await.expect("delete");
        assert!(repo.list().await.expect("list").is_empty());

        let error = repo.delete(&DealId("D-001".to_string())).await.expect_err("second delete");
        assert!(matches!(error, RepositoryError::NotFound { entity: "deal", .. }));
    }
}
