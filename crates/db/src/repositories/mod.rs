use async_trait::async_trait;
use thiserror::Error;

use hotdeal_core::domain::deal::{DealId, HotDeal};
use hotdeal_core::domain::notice::{Notice, NoticeId, NoticeKind};

pub mod deal;
pub mod memory;
pub mod notice;

pub use deal::SqlDealRepository;
pub use memory::{InMemoryDealRepository, InMemoryNoticeRepository};
pub use notice::SqlNoticeRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("{entity} `{id}` was not found")]
    NotFound { entity: &'static str, id: String },
}

/// Deal table storage. Listing order is registration order.
#[async_trait]
pub trait DealRepository: Send + Sync {
    async fn find_by_id(&self, id: &DealId) -> Result<Option<HotDeal>, RepositoryError>;
    async fn list(&self) -> Result<Vec<HotDeal>, RepositoryError>;
    async fn save(&self, deal: HotDeal) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &DealId) -> Result<(), RepositoryError>;

    /// Distinct standard model names in first-registered order.
    async fn standard_model_names(&self) -> Result<Vec<String>, RepositoryError>;
}

/// Notice board storage. Listing order is posting order.
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    async fn find_by_id(&self, id: &NoticeId) -> Result<Option<Notice>, RepositoryError>;
    async fn list(&self, kind: Option<NoticeKind>) -> Result<Vec<Notice>, RepositoryError>;
    async fn save(&self, notice: Notice) -> Result<(), RepositoryError>;
    async fn delete(&self, id: &NoticeId) -> Result<(), RepositoryError>;
}

pub(crate) fn decode_error(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}
