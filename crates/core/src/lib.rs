pub mod auth;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod search;

pub use auth::{AdminGate, AdminSession, AuthError};
pub use catalog::{resolve_choice, Catalog, Category, DEFAULT_PLATFORMS};
pub use domain::deal::{DealId, DealUpdate, EventPeriod, HotDeal, NewDeal};
pub use domain::notice::{latest_notices, NewNotice, Notice, NoticeEdit, NoticeId, NoticeKind};
pub use errors::{ApplicationError, DomainError};
pub use search::{distinct_platforms, search_deals, DealQuery, SearchOutcome, SortKey, SortOrder};

pub use chrono;
pub use rust_decimal;
