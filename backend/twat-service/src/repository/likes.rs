use super::StoreResult;
use sqlx::PgPool;
use uuid::Uuid;

/// Delete a like (idempotent); returns true if a row was removed.
pub(super) async fn delete(pool: &PgPool, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM likes
        WHERE user_id = $1 AND twat_id = $2
        "#,
    )
    .bind(user_id)
    .bind(twat_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Insert a like (idempotent); returns true if a new row was inserted.
pub(super) async fn insert(pool: &PgPool, user_id: Uuid, twat_id: Uuid) -> StoreResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO likes (user_id, twat_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, twat_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(twat_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
