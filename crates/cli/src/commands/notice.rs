use chrono::Local;
use hotdeal_core::domain::notice::{
    latest_notices, NewNotice, NoticeEdit, NoticeId, NoticeKind, BOARD_LIMIT,
};
use hotdeal_db::{NoticeRepository, SqlNoticeRepository};
use serde_json::Value;

use crate::commands::{
    application_error, authorize, execute, open_store, repository_error, to_json, CommandError,
    CommandResult,
};

#[derive(Debug, Clone, Default, clap::Args)]
pub struct PostNoticeArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long, default_value = "notice", help = "notice | update")]
    pub kind: String,
    #[arg(long)]
    pub title: String,
    #[arg(long)]
    pub body: String,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct ListNoticeArgs {
    #[arg(long, help = "Only this kind (notice | update); both when omitted")]
    pub kind: Option<String>,
    #[arg(long, default_value_t = BOARD_LIMIT, help = "Newest entries to show per kind")]
    pub limit: usize,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct EditNoticeArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Default, clap::Args)]
pub struct DeleteNoticeArgs {
    #[arg(long, help = "Admin password")]
    pub password: String,
    #[arg(long)]
    pub id: String,
}

pub fn post(args: PostNoticeArgs) -> CommandResult {
    execute("notice.post", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let kind = args.kind.parse::<NoticeKind>().map_err(application_error)?;
        let notice = NewNotice { kind, title: args.title.clone(), body: args.body.clone() }
            .into_notice(NoticeId::generate(), Local::now().date_naive())
            .map_err(application_error)?;

        runtime.block_on(async {
            let pool = open_store(config).await?;
            let saved = SqlNoticeRepository::new(pool.clone())
                .save(notice.clone())
                .await
                .map_err(repository_error);
            pool.close().await;
            saved
        })?;
        tracing::info!(
            event_name = "system.notice.posted",
            notice_id = %notice.id.0,
            kind = notice.kind.as_str(),
            "notice posted"
        );

        Ok(CommandResult::success_with_data(
            "notice.post",
            format!("posted {} `{}`", notice.kind.label(), notice.title),
            to_json(&notice)?,
        ))
    })
}

/// Board view: the newest entries of each kind, newest first.
pub fn list(args: ListNoticeArgs) -> CommandResult {
    execute("notice.list", |config, runtime| {
        let kinds = match args.kind.as_deref() {
            Some(kind) => vec![kind.parse::<NoticeKind>().map_err(application_error)?],
            None => vec![NoticeKind::Notice, NoticeKind::Update],
        };

        let notices = runtime.block_on(async {
            let pool = open_store(config).await?;
            let notices =
                SqlNoticeRepository::new(pool.clone()).list(None).await.map_err(repository_error);
            pool.close().await;
            notices
        })?;

        let mut board = serde_json::Map::new();
        let mut shown = 0;
        for kind in kinds {
            let latest = latest_notices(&notices, kind, args.limit);
            shown += latest.len();
            board.insert(kind.as_str().to_string(), to_json(&latest)?);
        }

        Ok(CommandResult::success_with_data(
            "notice.list",
            format!("{shown} notice(s) shown"),
            Value::Object(board),
        ))
    })
}

pub fn edit(args: EditNoticeArgs) -> CommandResult {
    execute("notice.edit", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let changes = NoticeEdit {
            kind: args
                .kind
                .as_deref()
                .map(str::parse::<NoticeKind>)
                .transpose()
                .map_err(application_error)?,
            title: args.title.clone(),
            body: args.body.clone(),
        };
        let id = NoticeId(args.id.clone());

        let notice = runtime.block_on(async {
            let pool = open_store(config).await?;
            let repo = SqlNoticeRepository::new(pool.clone());
            let result = async {
                let mut notice = repo
                    .find_by_id(&id)
                    .await
                    .map_err(repository_error)?
                    .ok_or_else(|| {
                        ("not_found", format!("notice `{}` was not found", id.0), 2u8)
                    })?;
                notice.apply_edit(changes).map_err(application_error)?;
                repo.save(notice.clone()).await.map_err(repository_error)?;
                Ok::<_, CommandError>(notice)
            }
            .await;
            pool.close().await;
            result
        })?;
        tracing::info!(
            event_name = "system.notice.edited",
            notice_id = %notice.id.0,
            "notice edited"
        );

        Ok(CommandResult::success_with_data(
            "notice.edit",
            format!("edited `{}`", notice.title),
            to_json(&notice)?,
        ))
    })
}

pub fn delete(args: DeleteNoticeArgs) -> CommandResult {
    execute("notice.delete", |config, runtime| {
        let _session = authorize(config, &args.password)?;
        let id = NoticeId(args.id.clone());

        runtime.block_on(async {
            let pool = open_store(config).await?;
            let deleted =
                SqlNoticeRepository::new(pool.clone()).delete(&id).await.map_err(repository_error);
            pool.close().await;
            deleted
        })?;
        tracing::info!(event_name = "system.notice.deleted", notice_id = %id.0, "notice deleted");

        Ok(CommandResult::success("notice.delete", format!("deleted notice `{}`", id.0)))
    })
}
