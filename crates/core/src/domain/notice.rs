use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

/// How many notices of each kind the board shows.
pub const BOARD_LIMIT: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub String);

impl NoticeId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Notice,
    Update,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Update => "update",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Notice => "공지사항",
            Self::Update => "업데이트",
        }
    }
}

impl fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeKind {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "notice" | "공지사항" => Ok(Self::Notice),
            "update" | "업데이트" => Ok(Self::Update),
            other => Err(DomainError::InvariantViolation(format!(
                "unknown notice kind `{other}` (expected notice|update)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: NoticeId,
    pub posted_on: NaiveDate,
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl Notice {
    pub fn apply_edit(&mut self, edit: NoticeEdit) -> Result<(), DomainError> {
        if let Some(kind) = edit.kind {
            self.kind = kind;
        }
        if let Some(title) = edit.title {
            self.title = required("title", &title)?;
        }
        if let Some(body) = edit.body {
            self.body = required("body", &body)?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotice {
    pub kind: NoticeKind,
    pub title: String,
    pub body: String,
}

impl NewNotice {
    pub fn into_notice(self, id: NoticeId, posted_on: NaiveDate) -> Result<Notice, DomainError> {
        Ok(Notice {
            id,
            posted_on,
            kind: self.kind,
            title: required("title", &self.title)?,
            body: required("body", &self.body)?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeEdit {
    pub kind: Option<NoticeKind>,
    pub title: Option<String>,
    pub body: Option<String>,
}

/// The newest `limit` notices of `kind`, newest first. `notices` must be in posting order.
pub fn latest_notices(notices: &[Notice], kind: NoticeKind, limit: usize) -> Vec<&Notice> {
    notices.iter().rev().filter(|notice| notice.kind == kind).take(limit).collect()
}

fn required(field: &'static str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::MissingField(field));
    }
    Ok(trimmed.to_string())
}
