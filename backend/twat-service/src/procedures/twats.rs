//! Twat procedures: get, create, retwat, like, feed.
use crate::domain::models::{FeedPage, FeedQuery, NewTwat, Twat, TwatView};
use crate::domain::Attachment;
use super::parse_id;
use crate::error::{Result, ServiceError};
use crate::media::MediaUploader;
use crate::rpc::RpcContext;
use serde::Deserialize;
use session_auth::Session;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_FEED_LIMIT: i64 = 20;
pub const MAX_FEED_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct GetTwatInput {
    pub tid: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTwatInput {
    #[validate(length(min = 1, message = "Twat content cannot be empty"))]
    pub content: String,
    #[serde(default)]
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RetwatInput {
    pub tid: String,
    #[validate(length(min = 1, message = "Twat content cannot be empty"))]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct LikeInput {
    pub tid: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedInput {
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub cursor: Option<Uuid>,
    #[validate(range(min = 1, max = 50))]
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Retrieve a twat with the caller's self-interactions; `None` when it does not exist.
pub async fn get(ctx: &RpcContext, caller: &Session, input: GetTwatInput) -> Result<Option<TwatView>> {
    let Some(twat_id) = parse_id(&input.tid) else {
        return Ok(None);
    };
    let details = ctx.store.find_twat(twat_id).await?;
    Ok(details.map(|details| TwatView::for_viewer(details, caller.user_id())))
}

/// Create a twat, re-hosting qualifying image attachments first.
pub async fn create(ctx: &RpcContext, caller: &Session, input: CreateTwatInput) -> Result<TwatView> {
    let attachment = match input.attachment {
        Some(attachment) => resolve_attachment(ctx.media.as_ref(), attachment).await?,
        None => None,
    };

    let details = ctx
        .store
        .create_twat(NewTwat {
            author_id: caller.user_id(),
            content: input.content,
            attachment,
        })
        .await?;

    info!(twat_id = %details.twat.id, user_id = %caller.user_id(), "twat created");

    Ok(TwatView::fresh(details))
}

async fn resolve_attachment(
    media: &dyn MediaUploader,
    attachment: Attachment,
) -> Result<Option<String>> {
    match attachment.upload_source() {
        Some(source) => {
            let uploaded = media.upload(source, &attachment.name).await?;
            Ok(Some(uploaded.url))
        }
        None => Ok(attachment.url),
    }
}

/// Re-post `input.tid`. Missing target and an existing re-post by the caller are no-ops.
pub async fn retwat(ctx: &RpcContext, caller: &Session, input: RetwatInput) -> Result<Option<Twat>> {
    let user_id = caller.user_id();

    let target = match parse_id(&input.tid) {
        Some(twat_id) => ctx.store.find_twat(twat_id).await?,
        None => None,
    };
    let Some(target) = target else {
        debug!(twat_id = %input.tid, %user_id, "retwat target not found");
        return Ok(None);
    };

    if target.retwats.iter().any(|retwat| retwat.author_id == user_id) {
        debug!(twat_id = %input.tid, %user_id, "already retwated");
        return Ok(None);
    }

    let created = ctx
        .store
        .create_retwat(user_id, target.twat.id, &input.content)
        .await?;

    match &created {
        Some(retwat) => info!(twat_id = %retwat.id, target_id = %input.tid, %user_id, "retwat created"),
        None => debug!(twat_id = %input.tid, %user_id, "concurrent retwat collapsed"),
    }

    Ok(created)
}

/// Toggle the caller's like: `-1` when a like was removed, `+1` when one now exists.
pub async fn like(ctx: &RpcContext, caller: &Session, input: LikeInput) -> Result<i32> {
    let user_id = caller.user_id();

    // An id that cannot exist fails like a like on a deleted twat.
    let twat_id =
        parse_id(&input.tid).ok_or(ServiceError::Database(sqlx::Error::RowNotFound))?;

    if ctx.store.delete_like(user_id, twat_id).await? {
        debug!(%twat_id, %user_id, "twat unliked");
        return Ok(-1);
    }

    ctx.store.insert_like(user_id, twat_id).await?;
    debug!(%twat_id, %user_id, "twat liked");
    Ok(1)
}

/// One page of twats, newest first; `author_id` narrows it to a profile timeline.
pub async fn feed(ctx: &RpcContext, caller: &Session, input: FeedInput) -> Result<FeedPage> {
    let limit = input.limit.unwrap_or(DEFAULT_FEED_LIMIT).clamp(1, MAX_FEED_LIMIT);

    let mut rows = ctx
        .store
        .list_twats(FeedQuery {
            author_id: input.author_id,
            cursor: input.cursor,
            limit: limit + 1,
        })
        .await?;

    let next_cursor = if rows.len() as i64 > limit {
        rows.truncate(limit as usize);
        rows.last().map(|details| details.twat.id)
    } else {
        None
    };

    let viewer = caller.user_id();
    Ok(FeedPage {
        items: rows
            .into_iter()
            .map(|details| TwatView::for_viewer(details, viewer))
            .collect(),
        next_cursor,
    })
}
