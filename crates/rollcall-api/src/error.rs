//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// The request clashes with stored data; `details` carries the ids
  /// involved and is merged into the response body.
  #[error("conflict: {message}")]
  Conflict { message: String, details: Value },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }
}

impl From<rollcall_core::Error> for ApiError {
  fn from(e: rollcall_core::Error) -> Self {
    use rollcall_core::Error as E;

    let message = e.to_string();
    match e {
      E::NoActiveClass { .. }
      | E::NoScheduledClass { .. }
      | E::SlotNotFound(_)
      | E::ClassNotFound(_) => ApiError::NotFound(message),
      E::MultipleActiveClasses { class_ids, .. } => ApiError::Conflict {
        message,
        details: json!({ "class_ids": class_ids }),
      },
      E::AmbiguousSlot { slot_ids, .. } => ApiError::Conflict {
        message,
        details: json!({ "slot_ids": slot_ids }),
      },
      E::ScheduleConflict { conflicting } => ApiError::Conflict {
        message,
        details: json!({ "conflicting_slot_ids": conflicting }),
      },
      E::Validation { .. } => ApiError::BadRequest(message),
      E::Store(inner) => ApiError::Store(inner),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "error": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "error": m })),
      ApiError::Conflict { message, details } => {
        let mut body = json!({ "error": message });
        if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), details) {
          body.extend(extra);
        }
        (StatusCode::CONFLICT, body)
      }
      ApiError::Store(e) => {
        tracing::error!(error = %e, "request failed with store error");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": e.to_string() }))
      }
    };
    (status, Json(body)).into_response()
  }
}
