use sqlx::Row;

use hotdeal_core::domain::notice::{Notice, NoticeId, NoticeKind};

use super::deal::parse_date;
use super::{decode_error, NoticeRepository, RepositoryError};
use crate::DbPool;

pub struct SqlNoticeRepository {
    pool: DbPool,
}

impl SqlNoticeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_notice(row: &sqlx::sqlite::SqliteRow) -> Result<Notice, RepositoryError> {
    let id: String = row.try_get("id").map_err(decode_error)?;
    let posted_on: String = row.try_get("posted_on").map_err(decode_error)?;
    let kind: String = row.try_get("kind").map_err(decode_error)?;
    let title: String = row.try_get("title").map_err(decode_error)?;
    let body: String = row.try_get("body").map_err(decode_error)?;

    Ok(Notice {
        id: NoticeId(id),
        posted_on: parse_date("posted_on", &posted_on)?,
        kind: kind.parse::<NoticeKind>().map_err(decode_error)?,
        title,
        body,
    })
}

#[async_trait::async_trait]
impl NoticeRepository for SqlNoticeRepository {
    async fn find_by_id(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError> {
        let row = sqlx::query("SELECT id, posted_on, kind, title, body FROM notice WHERE id = ?")
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(row_to_notice(r)?)),
            None => Ok(None),
        }
    }

    async fn list(&self, kind: Option<NoticeKind>) -> Result<Vec<Notice>, RepositoryError> {
        let rows: Vec<sqlx::sqlite::SqliteRow> = if let Some(kind) = kind {
            sqlx::query(
                "SELECT id, posted_on, kind, title, body
                 FROM notice
                 WHERE kind = ?
                 ORDER BY rowid ASC",
            )
            .bind(kind.as_str())
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT id, posted_on, kind, title, body
                 FROM notice
                 ORDER BY rowid ASC",
            )
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(row_to_notice).collect::<Result<Vec<_>, _>>()
    }

    async fn save(&self, notice: Notice) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO notice (id, posted_on, kind, title, body)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 kind = excluded.kind,
                 title = excluded.title,
                 body = excluded.body",
        )
        .bind(&notice.id.0)
        .bind(notice.posted_on.format("%Y-%m-%d").to_string())
        .bind(notice.kind.as_str())
        .bind(&notice.title)
        .bind(&notice.body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, id: &NoticeId) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM notice WHERE id = ?").bind(&id.0).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound { entity: "notice", id: id.0.clone() });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use hotdeal_core::domain::notice::{Notice, NoticeId, NoticeKind};

    use super::SqlNoticeRepository;
    use crate::repositories::{NoticeRepository, RepositoryError};
    use crate::{connect_with_settings, migrations};

    async fn setup() -> sqlx::SqlitePool {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        migrations::run_pending(&pool).await.expect("migrations");
        pool
    }

    fn sample_notice(id: &str, kind: NoticeKind) -> Notice {
        Notice {
            id: NoticeId(id.to_string()),
            posted_on: NaiveDate::from_ymd_opt(2025, 11, 1).expect("valid date"),
            kind,
            title: format!("{} {id}", kind.label()),
            body: "블랙프라이데이 기간 딜 등록 마감은 11/20입니다.".to_string(),
        }
    }

    #[tokio::test]
    async fn list_filters_by_kind_in_posting_order() {
        let repo = SqlNoticeRepository::new(setup().await);
        repo.save(sample_notice("N-1", NoticeKind::Notice)).await.expect("save 1");
        repo.save(sample_notice("N-2", NoticeKind::Update)).await.expect("save 2");
        repo.save(sample_notice("N-3", NoticeKind::Notice)).await.expect("save 3");

        let notices = repo.list(Some(NoticeKind::Notice)).await.expect("list notices");
        let ids: Vec<&str> = notices.iter().map(|notice| notice.id.0.as_str()).collect();
        assert_eq!(ids, vec!["N-1", "N-3"]);

        assert_eq!(repo.list(None).await.expect("list all").len(), 3);
    }

    #[tokio::test]
    async fn save_upserts_on_conflict() {
        let repo = SqlNoticeRepository::new(setup().await);
        let notice = sample_notice("N-1", NoticeKind::Notice);
        repo.save(notice.clone()).await.expect("save");

        let mut edited = notice;
        edited.title = "정정 공지".to_string();
        repo.save(edited).await.expect("upsert");

        let found = repo.find_by_id(&NoticeId("N-1".to_string())).await.expect("find");
        assert_eq!(found.map(|notice| notice.title), Some("정정 공지".to_string()));
    }

    #[tokio::test]
    async fn delete_reports_missing_notice() {
        let repo = SqlNoticeRepository::new(setup().await);
        let error = repo.delete(&NoticeId("N-404".to_string())).await.expect_err("missing");

        assert!(matches!(error, RepositoryError::NotFound { entity: "notice", .. }));
    }
}
