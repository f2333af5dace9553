use super::StoreResult;
use sqlx::PgPool;
use uuid::Uuid;

/// Idempotent follow; returns true if a new edge was inserted.
pub(super) async fn insert(
    pool: &PgPool,
    follower_id: Uuid,
    following_id: Uuid,
) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO follows (follower_id, following_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, following_id) DO NOTHING
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Idempotent unfollow; returns true if an edge was removed.
pub(super) async fn delete(
    pool: &PgPool,
    follower_id: Uuid,
    following_id: Uuid,
) -> StoreResult<bool> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND following_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(following_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}
