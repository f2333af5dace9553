use super::StoreResult;
use crate::domain::models::{
    EmbeddedTwat, FeedQuery, Like, NewTwat, Twat, TwatDetails, UserSummary,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

const TWAT_WITH_AUTHOR: &str = r#"
    SELECT t.id, t.author_id, t.content, t.attachment, t.embedded_twat_id, t.created_at,
           u.name AS author_name, u.image AS author_image
    FROM twats t
    JOIN users u ON u.id = t.author_id
"#;

#[derive(sqlx::FromRow)]
struct TwatRow {
    id: Uuid,
    author_id: Uuid,
    content: String,
    attachment: Option<String>,
    embedded_twat_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    author_name: Option<String>,
    author_image: Option<String>,
}

impl TwatRow {
    fn split(self) -> (Twat, UserSummary) {
        let author = UserSummary {
            id: self.author_id,
            name: self.author_name,
            image: self.author_image,
        };
        let twat = Twat {
            id: self.id,
            author_id: self.author_id,
            content: self.content,
            attachment: self.attachment,
            embedded_twat_id: self.embedded_twat_id,
            created_at: self.created_at,
        };
        (twat, author)
    }
}

pub(super) async fn find(pool: &PgPool, twat_id: Uuid) -> StoreResult<Option<TwatDetails>> {
    let row = sqlx::query_as::<_, TwatRow>(&format!("{TWAT_WITH_AUTHOR} WHERE t.id = $1"))
        .bind(twat_id)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => Ok(hydrate(pool, vec![row]).await?.pop()),
        None => Ok(None),
    }
}

pub(super) async fn create(pool: &PgPool, new_twat: NewTwat) -> StoreResult<TwatDetails> {
    let twat_id: Uuid = sqlx::query_scalar(
        r#"
        INSERT INTO twats (author_id, content, attachment)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(new_twat.author_id)
    .bind(&new_twat.content)
    .bind(&new_twat.attachment)
    .fetch_one(pool)
    .await?;

    find(pool, twat_id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Insert a re-post; the partial unique index turns a duplicate into a no-op.
pub(super) async fn create_retwat(
    pool: &PgPool,
    author_id: Uuid,
    target_id: Uuid,
    content: &str,
) -> StoreResult<Option<Twat>> {
    sqlx::query_as::<_, Twat>(
        r#"
        INSERT INTO twats (author_id, content, embedded_twat_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (author_id, embedded_twat_id) WHERE embedded_twat_id IS NOT NULL
        DO NOTHING
        RETURNING id, author_id, content, attachment, embedded_twat_id, created_at
        "#,
    )
    .bind(author_id)
    .bind(content)
    .bind(target_id)
    .fetch_optional(pool)
    .await
}

pub(super) async fn list(pool: &PgPool, query: FeedQuery) -> StoreResult<Vec<TwatDetails>> {
    let rows = sqlx::query_as::<_, TwatRow>(&format!(
        r#"{TWAT_WITH_AUTHOR}
        WHERE ($1::uuid IS NULL OR t.author_id = $1)
          AND ($2::uuid IS NULL OR (t.created_at, t.id) < (
                SELECT c.created_at, c.id FROM twats c WHERE c.id = $2
              ))
        ORDER BY t.created_at DESC, t.id DESC
        LIMIT $3
        "#
    ))
    .bind(query.author_id)
    .bind(query.cursor)
    .bind(query.limit)
    .fetch_all(pool)
    .await?;

    hydrate(pool, rows).await
}

/// Load likes, re-posts and embedded originals for a batch of rows, preserving row order.
async fn hydrate(pool: &PgPool, rows: Vec<TwatRow>) -> StoreResult<Vec<TwatDetails>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let embedded_ids: Vec<Uuid> = rows.iter().filter_map(|r| r.embedded_twat_id).collect();

    let likes = sqlx::query_as::<_, Like>(
        r#"
        SELECT user_id, twat_id, created_at
        FROM likes
        WHERE twat_id = ANY($1)
        ORDER BY created_at
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;

    let retwats = sqlx::query_as::<_, Twat>(
        r#"
        SELECT id, author_id, content, attachment, embedded_twat_id, created_at
        FROM twats
        WHERE embedded_twat_id = ANY($1)
        ORDER BY created_at
        "#,
    )
    .bind(&ids[..])
    .fetch_all(pool)
    .await?;

    let embedded = if embedded_ids.is_empty() {
        Vec::new()
    } else {
        sqlx::query_as::<_, TwatRow>(&format!("{TWAT_WITH_AUTHOR} WHERE t.id = ANY($1)"))
            .bind(&embedded_ids[..])
            .fetch_all(pool)
            .await?
    };

    let mut likes_by_twat: HashMap<Uuid, Vec<Like>> = HashMap::new();
    for like in likes {
        likes_by_twat.entry(like.twat_id).or_default().push(like);
    }

    let mut retwats_by_twat: HashMap<Uuid, Vec<Twat>> = HashMap::new();
    for retwat in retwats {
        if let Some(target) = retwat.embedded_twat_id {
            retwats_by_twat.entry(target).or_default().push(retwat);
        }
    }

    let embedded_by_id: HashMap<Uuid, EmbeddedTwat> = embedded
        .into_iter()
        .map(|row| {
            let (twat, author) = row.split();
            (twat.id, EmbeddedTwat { twat, author })
        })
        .collect();

    Ok(rows
        .into_iter()
        .map(|row| {
            let (twat, author) = row.split();
            TwatDetails {
                likes: likes_by_twat.remove(&twat.id).unwrap_or_default(),
                retwats: retwats_by_twat.remove(&twat.id).unwrap_or_default(),
                embedded_twat: twat
                    .embedded_twat_id
                    .and_then(|id| embedded_by_id.get(&id).cloned()),
                author,
                twat,
            }
        })
        .collect())
}
