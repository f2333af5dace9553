use super::StoreResult;
use crate::domain::models::{Profile, ProfileUpdate, User, UserSummary};
use sqlx::PgPool;
use uuid::Uuid;

pub(super) async fn find_profile(pool: &PgPool, user_id: Uuid) -> StoreResult<Option<Profile>> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, image, bio, banner, level, xp, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        return Ok(None);
    };

    let followers = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.image
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.following_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let following = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT u.id, u.name, u.image
        FROM follows f
        JOIN users u ON u.id = f.following_id
        WHERE f.follower_id = $1
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let twat_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM twats
        WHERE author_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(Some(Profile {
        user,
        followers,
        following,
        twat_count,
    }))
}

pub(super) async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    update: ProfileUpdate,
) -> StoreResult<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET name = COALESCE($2, name),
            bio = COALESCE($3, bio),
            image = COALESCE($4, image),
            banner = COALESCE($5, banner)
        WHERE id = $1
        RETURNING id, name, image, bio, banner, level, xp, created_at
        "#,
    )
    .bind(user_id)
    .bind(update.name)
    .bind(update.bio)
    .bind(update.image)
    .bind(update.banner)
    .fetch_optional(pool)
    .await
}
