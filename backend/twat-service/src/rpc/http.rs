use super::envelope::{RpcError, RpcErrorCode, RpcSuccess};
use super::{call, Procedure, ProcedureKind, RpcContext};
use crate::metrics::{RPC_REQUESTS_TOTAL, RPC_REQUEST_DURATION_SECONDS};
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::Value;
use session_auth::MaybeSession;
use std::time::Instant;
use tracing::{debug, error};

#[derive(Debug, Deserialize)]
pub struct QueryParams {
    #[serde(default)]
    input: Option<String>,
}

/// Mount the RPC endpoint: `GET` for queries, `POST` for mutations.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/trpc/{procedure}")
            .route(web::get().to(handle_query))
            .route(web::post().to(handle_mutation)),
    );
}

async fn handle_query(
    ctx: web::Data<RpcContext>,
    session: MaybeSession,
    path: web::Path<String>,
    params: web::Query<QueryParams>,
) -> Result<HttpResponse, RpcError> {
    let input = match params.into_inner().input {
        Some(raw) if !raw.is_empty() => serde_json::from_str(&raw).map_err(|e| {
            RpcError::new(RpcErrorCode::ParseError, format!("Invalid input: {}", e))
        }),
        _ => Ok(Value::Null),
    };

    dispatch(&ctx, session, &path.into_inner(), ProcedureKind::Query, input).await
}

async fn handle_mutation(
    ctx: web::Data<RpcContext>,
    session: MaybeSession,
    path: web::Path<String>,
    body: web::Bytes,
) -> Result<HttpResponse, RpcError> {
    let input = if body.is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            RpcError::new(RpcErrorCode::ParseError, format!("Invalid input: {}", e))
        })
    };

    dispatch(&ctx, session, &path.into_inner(), ProcedureKind::Mutation, input).await
}

async fn dispatch(
    ctx: &RpcContext,
    session: MaybeSession,
    path: &str,
    method: ProcedureKind,
    input: Result<Value, RpcError>,
) -> Result<HttpResponse, RpcError> {
    let procedure = resolve(path, method).map_err(|e| e.with_path(path))?;
    let timer = Instant::now();

    // An anonymous caller is rejected by the guard before the input is looked at.
    let outcome = match (session.as_ref(), input) {
        (Some(_), Err(parse_error)) => Err(parse_error),
        (Some(_), Ok(input)) => call(ctx, session.as_ref(), procedure, input)
            .await
            .map_err(|err| {
                if err.is_internal() {
                    error!(procedure = path, error = %err, "procedure failed");
                } else {
                    debug!(procedure = path, error = %err, "procedure rejected");
                }
                RpcError::from(err)
            }),
        (None, _) => call(ctx, None, procedure, Value::Null)
            .await
            .map_err(RpcError::from),
    };

    RPC_REQUEST_DURATION_SECONDS
        .with_label_values(&[path])
        .observe(timer.elapsed().as_secs_f64());

    match outcome {
        Ok(data) => {
            RPC_REQUESTS_TOTAL.with_label_values(&[path, "OK"]).inc();
            Ok(HttpResponse::Ok().json(RpcSuccess::new(data)))
        }
        Err(err) => {
            RPC_REQUESTS_TOTAL
                .with_label_values(&[path, err.code.as_str()])
                .inc();
            Err(err.with_path(path))
        }
    }
}

fn resolve(path: &str, method: ProcedureKind) -> Result<Procedure, RpcError> {
    let label = match method {
        ProcedureKind::Query => "query",
        ProcedureKind::Mutation => "mutation",
    };

    let procedure = Procedure::from_path(path).ok_or_else(|| {
        RpcError::new(
            RpcErrorCode::NotFound,
            format!("No \"{}\"-procedure on path \"{}\"", label, path),
        )
    })?;

    if procedure.kind() != method {
        let verb = match method {
            ProcedureKind::Query => "GET",
            ProcedureKind::Mutation => "POST",
        };
        return Err(RpcError::new(
            RpcErrorCode::MethodNotSupported,
            format!("Unsupported {} request to procedure at path \"{}\"", verb, path),
        ));
    }

    Ok(procedure)
}
