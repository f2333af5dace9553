use crate::error::ServiceError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Client-facing message for every internal failure.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something Went Wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorCode {
    ParseError,
    BadRequest,
    Unauthorized,
    NotFound,
    MethodNotSupported,
    InternalServerError,
}

impl RpcErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcErrorCode::ParseError => "PARSE_ERROR",
            RpcErrorCode::BadRequest => "BAD_REQUEST",
            RpcErrorCode::Unauthorized => "UNAUTHORIZED",
            RpcErrorCode::NotFound => "NOT_FOUND",
            RpcErrorCode::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            RpcErrorCode::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// JSON-RPC 2.0 style numeric code used by tRPC clients.
    pub fn json_rpc_code(&self) -> i32 {
        match self {
            RpcErrorCode::ParseError => -32700,
            RpcErrorCode::BadRequest => -32600,
            RpcErrorCode::Unauthorized => -32001,
            RpcErrorCode::NotFound => -32004,
            RpcErrorCode::MethodNotSupported => -32005,
            RpcErrorCode::InternalServerError => -32603,
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            RpcErrorCode::ParseError | RpcErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            RpcErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            RpcErrorCode::NotFound => StatusCode::NOT_FOUND,
            RpcErrorCode::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            RpcErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Structured error returned over the RPC channel
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: RpcErrorCode,
    pub message: String,
    pub path: Option<String>,
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl RpcError {
    pub fn new(code: RpcErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            field_errors: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    fn body(&self) -> serde_json::Value {
        json!({
            "error": {
                "message": self.message,
                "code": self.code.json_rpc_code(),
                "data": {
                    "code": self.code.as_str(),
                    "httpStatus": self.code.http_status().as_u16(),
                    "path": self.path,
                    "validationError": self.field_errors.as_ref().map(|fields| json!({
                        "fieldErrors": fields,
                    })),
                },
            }
        })
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl ResponseError for RpcError {
    fn status_code(&self) -> StatusCode {
        self.code.http_status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self.body())
    }
}

impl From<ServiceError> for RpcError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unauthorized => {
                RpcError::new(RpcErrorCode::Unauthorized, RpcErrorCode::Unauthorized.as_str())
            }
            ServiceError::InvalidInput(msg) => RpcError::new(RpcErrorCode::BadRequest, msg),
            ServiceError::Validation(errors) => {
                let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
                for (field, errs) in errors.field_errors() {
                    fields.entry(field.to_string()).or_default().extend(errs.iter().map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    }));
                }
                RpcError {
                    field_errors: Some(fields),
                    ..RpcError::new(RpcErrorCode::BadRequest, "Invalid input")
                }
            }
            ServiceError::NotFound(what) => {
                RpcError::new(RpcErrorCode::NotFound, format!("Not found: {}", what))
            }
            ServiceError::Upload(_) | ServiceError::Database(_) | ServiceError::Serialization(_) => {
                RpcError::new(RpcErrorCode::BadRequest, GENERIC_FAILURE_MESSAGE)
            }
        }
    }
}

/// Successful RPC response body
#[derive(Debug, Serialize)]
pub struct RpcSuccess<T: Serialize> {
    result: RpcResult<T>,
}

#[derive(Debug, Serialize)]
struct RpcResult<T: Serialize> {
    data: T,
}

impl<T: Serialize> RpcSuccess<T> {
    pub fn new(data: T) -> Self {
        Self {
            result: RpcResult { data },
        }
    }
}
