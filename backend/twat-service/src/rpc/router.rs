use super::{Procedure, RpcContext};
use crate::error::{Result, ServiceError};
use crate::procedures::{twats, users};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use session_auth::Session;
use validator::Validate;

/// Run `procedure` for the given session.
///
/// The session guard runs first: without a session nothing else (decoding, store, upload)
/// is touched. Input is then decoded and validated before the procedure body runs.
pub async fn call(
    ctx: &RpcContext,
    session: Option<&Session>,
    procedure: Procedure,
    input: Value,
) -> Result<Value> {
    let caller = session.ok_or(ServiceError::Unauthorized)?;

    match procedure {
        Procedure::TwatsGet => encode(twats::get(ctx, caller, decode(input)?).await?),
        Procedure::TwatsCreate => {
            encode(twats::create(ctx, caller, decode_validated(input)?).await?)
        }
        Procedure::TwatsRetwat => {
            encode(twats::retwat(ctx, caller, decode_validated(input)?).await?)
        }
        Procedure::TwatsLike => encode(twats::like(ctx, caller, decode(input)?).await?),
        Procedure::TwatsFeed => {
            let input: twats::FeedInput = if input.is_null() {
                twats::FeedInput::default()
            } else {
                decode_validated(input)?
            };
            encode(twats::feed(ctx, caller, input).await?)
        }
        Procedure::UserFollowing => encode(users::following(ctx, caller, decode(input)?).await?),
        Procedure::UserUpdate => encode(users::update(ctx, caller, decode_validated(input)?).await?),
        Procedure::Profile => encode(users::profile(ctx, caller, decode(input)?).await?),
    }
}

fn decode<T: DeserializeOwned>(input: Value) -> Result<T> {
    serde_json::from_value(input).map_err(|e| ServiceError::InvalidInput(e.to_string()))
}

fn decode_validated<T: DeserializeOwned + Validate>(input: Value) -> Result<T> {
    let value: T = decode(input)?;
    value.validate()?;
    Ok(value)
}

fn encode<T: Serialize>(output: T) -> Result<Value> {
    Ok(serde_json::to_value(output)?)
}
