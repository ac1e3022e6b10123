//! HTTP surface speaking the tRPC wire format: queries over `GET /{procedure}?input=<json>`,
//! mutations over `POST /{procedure}` with the input as the request body.

use crate::rpc::{self, RpcError};
use crate::store::EmailStore;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use intramail_types::ValidationError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Procedure {
    Healthcheck,
    CreateEmail,
    GetAllEmails,
    GetEmailsByRecipient,
    GetEmailById,
}

impl Procedure {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "healthcheck" => Some(Self::Healthcheck),
            "createEmail" => Some(Self::CreateEmail),
            "getAllEmails" => Some(Self::GetAllEmails),
            "getEmailsByRecipient" => Some(Self::GetEmailsByRecipient),
            "getEmailById" => Some(Self::GetEmailById),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Healthcheck => "healthcheck",
            Self::CreateEmail => "createEmail",
            Self::GetAllEmails => "getAllEmails",
            Self::GetEmailsByRecipient => "getEmailsByRecipient",
            Self::GetEmailById => "getEmailById",
        }
    }

    pub fn is_mutation(self) -> bool {
        matches!(self, Self::CreateEmail)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    ParseError,
    BadRequest,
    NotFound,
    MethodNotSupported,
    InternalServerError,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::ParseError => "PARSE_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotSupported => "METHOD_NOT_SUPPORTED",
            Self::InternalServerError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// JSON-RPC 2.0 error number carried next to the symbolic code.
    fn json_rpc(self) -> i32 {
        match self {
            Self::ParseError => -32700,
            Self::BadRequest => -32600,
            Self::NotFound => -32004,
            Self::MethodNotSupported => -32005,
            Self::InternalServerError => -32603,
        }
    }

    fn status(self) -> StatusCode {
        match self {
            Self::ParseError | Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotSupported => StatusCode::METHOD_NOT_ALLOWED,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct Success<T> {
    result: SuccessData<T>,
}

#[derive(Serialize)]
struct SuccessData<T> {
    data: T,
}

fn success<T: Serialize>(data: T) -> Response {
    Json(Success {
        result: SuccessData { data },
    })
    .into_response()
}

#[derive(Serialize)]
struct Failure {
    error: FailureBody,
}

#[derive(Serialize)]
struct FailureBody {
    message: String,
    code: i32,
    data: FailureData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FailureData {
    code: &'static str,
    http_status: u16,
    path: String,
}

#[derive(Debug)]
struct RpcFailure {
    code: ErrorCode,
    message: String,
    path: String,
}

impl RpcFailure {
    fn new(code: ErrorCode, message: impl Into<String>, path: &str) -> Self {
        Self {
            code,
            message: message.into(),
            path: path.to_string(),
        }
    }

    fn from_rpc(err: RpcError, path: &str) -> Self {
        match err {
            RpcError::Validation(err) => Self::new(ErrorCode::BadRequest, err.to_string(), path),
            RpcError::Storage(err) => {
                tracing::error!(procedure = path, error = %err, "procedure failed");
                Self::new(ErrorCode::InternalServerError, "Internal server error", path)
            }
        }
    }
}

impl IntoResponse for RpcFailure {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = Failure {
            error: FailureBody {
                message: self.message,
                code: self.code.json_rpc(),
                data: FailureData {
                    code: self.code.as_str(),
                    http_status: status.as_u16(),
                    path: self.path,
                },
            },
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct QueryParams {
    input: Option<String>,
}

fn resolve(name: &str, mutation_request: bool) -> Result<Procedure, RpcFailure> {
    let kind = if mutation_request { "mutation" } else { "query" };
    let procedure = Procedure::from_name(name).ok_or_else(|| {
        RpcFailure::new(
            ErrorCode::NotFound,
            format!("No \"{kind}\"-procedure on path \"{name}\""),
            name,
        )
    })?;

    if procedure.is_mutation() != mutation_request {
        let method = if mutation_request { "POST" } else { "GET" };
        let expected = if procedure.is_mutation() { "mutation" } else { "query" };
        return Err(RpcFailure::new(
            ErrorCode::MethodNotSupported,
            format!("Unsupported {method}-request to {expected} procedure at path \"{name}\""),
            name,
        ));
    }

    Ok(procedure)
}

fn parse_input(raw: &[u8], path: &str) -> Result<Value, RpcFailure> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(raw).map_err(|e| {
        RpcFailure::new(
            ErrorCode::ParseError,
            format!("Input is not valid JSON: {e}"),
            path,
        )
    })
}

/// Inputs are JSON objects; serde would otherwise also accept a positional array.
fn decode<T: DeserializeOwned>(input: Value) -> Result<T, ValidationError> {
    if !input.is_object() {
        return Err(ValidationError::Malformed("expected an object as input".to_string()));
    }
    serde_json::from_value(input).map_err(|e| ValidationError::Malformed(e.to_string()))
}

async fn dispatch<S: EmailStore>(
    store: &S,
    procedure: Procedure,
    input: Value,
) -> Result<Response, RpcError> {
    let response = match procedure {
        Procedure::Healthcheck => success(rpc::healthcheck()),
        Procedure::CreateEmail => success(rpc::create_email(store, decode(input)?).await?),
        Procedure::GetAllEmails => success(rpc::get_all_emails(store).await?),
        Procedure::GetEmailsByRecipient => {
            success(rpc::get_emails_by_recipient(store, decode(input)?).await?)
        }
        Procedure::GetEmailById => success(rpc::get_email_by_id(store, decode(input)?).await?),
    };
    Ok(response)
}

async fn call<S: EmailStore>(
    store: &S,
    name: &str,
    mutation_request: bool,
    raw_input: &[u8],
) -> Result<Response, RpcFailure> {
    let procedure = resolve(name, mutation_request)?;
    let input = parse_input(raw_input, name)?;
    tracing::debug!(procedure = procedure.name(), "dispatching");
    dispatch(store, procedure, input)
        .await
        .map_err(|err| RpcFailure::from_rpc(err, name))
}

async fn query<S: EmailStore>(
    State(store): State<S>,
    Path(name): Path<String>,
    Query(params): Query<QueryParams>,
) -> Response {
    let raw = params.input.unwrap_or_default();
    call(&store, &name, false, raw.as_bytes())
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

async fn mutation<S: EmailStore>(
    State(store): State<S>,
    Path(name): Path<String>,
    body: Bytes,
) -> Response {
    call(&store, &name, true, &body)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

pub fn router<S: EmailStore>(store: S) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/readyz", get(|| async { "OK" }))
        .route("/livez", get(|| async { "OK" }))
        .route("/{procedure}", get(query::<S>).post(mutation::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(store)
}
