//! User procedures: follow/unfollow, profile read and profile edit.
use super::parse_id;
use crate::domain::models::{Profile, ProfileUpdate, User};
use crate::error::{Result, ServiceError};
use crate::rpc::RpcContext;
use serde::{Deserialize, Serialize};
use session_auth::Session;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowAction {
    Follow,
    Unfollow,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowingInput {
    pub target_id: Uuid,
    pub action: FollowAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowOutcome {
    pub following: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInput {
    pub user_id: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 50))]
    #[serde(default)]
    pub name: Option<String>,
    #[validate(length(max = 160))]
    #[serde(default)]
    pub bio: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(default)]
    pub image: Option<String>,
    #[validate(length(max = 2048))]
    #[serde(default)]
    pub banner: Option<String>,
}

/// Follow or unfollow `target_id`; both directions are idempotent.
pub async fn following(
    ctx: &RpcContext,
    caller: &Session,
    input: FollowingInput,
) -> Result<FollowOutcome> {
    let user_id = caller.user_id();
    if input.target_id == user_id {
        return Err(ServiceError::InvalidInput(
            "You cannot follow yourself".to_string(),
        ));
    }

    let following = match input.action {
        FollowAction::Follow => {
            let created = ctx.store.insert_follow(user_id, input.target_id).await?;
            if created {
                info!(%user_id, target_id = %input.target_id, "user followed");
            }
            true
        }
        FollowAction::Unfollow => {
            let removed = ctx.store.delete_follow(user_id, input.target_id).await?;
            if removed {
                info!(%user_id, target_id = %input.target_id, "user unfollowed");
            }
            false
        }
    };

    Ok(FollowOutcome { following })
}

pub async fn profile(ctx: &RpcContext, _caller: &Session, input: ProfileInput) -> Result<Profile> {
    let profile = match parse_id(&input.user_id) {
        Some(user_id) => ctx.store.find_profile(user_id).await?,
        None => None,
    };
    profile.ok_or_else(|| ServiceError::NotFound(format!("user {}", input.user_id)))
}

/// Edit the caller's own profile; absent fields are left unchanged.
pub async fn update(ctx: &RpcContext, caller: &Session, input: UpdateProfileInput) -> Result<User> {
    let update = ProfileUpdate {
        name: input.name,
        bio: input.bio,
        image: input.image,
        banner: input.banner,
    };

    ctx.store
        .update_profile(caller.user_id(), update)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("user {}", caller.user_id())))
}
