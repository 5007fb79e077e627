//! Handlers for `/entries` endpoints.
//!
//! | Method   | Path            | Notes |
//! |----------|-----------------|-------|
//! | `GET`    | `/entries`      | Optional `start_date`, `end_date`, `subject`; returns [`Listing`] |
//! | `POST`   | `/entries`      | Body: [`EntryInput`]; 201 when created, 200 when updated |
//! | `GET`    | `/entries/{id}` | Single entry; 404 if not found |
//! | `DELETE` | `/entries/{id}` | 200 when deleted, 404 when there was nothing to delete |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, QueryRejection},
  },
  http::StatusCode,
  response::{IntoResponse, Response},
};
use pawlog_core::{
  entry::{EntryId, EntryInput, WeightEntry},
  filter::FilterParams,
  service::{self, DeleteOutcome, Listing},
  store::{UpsertOutcome, WeightStore},
};
use serde_json::json;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /entries[?start_date=...][&end_date=...][&subject=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<FilterParams>, QueryRejection>,
) -> Result<Json<Listing>, ApiError>
where
  S: WeightStore,
{
  let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let listing = service::list_entries(store.as_ref(), &params).await?;
  Ok(Json(listing))
}

// ─── Submit ───────────────────────────────────────────────────────────────────

/// `POST /entries`: insert, or update the weight already recorded for the
/// same cat on the same date.
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  body: Result<Json<EntryInput>, JsonRejection>,
) -> Result<Response, ApiError>
where
  S: WeightStore,
{
  let Json(input) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
  let upserted = service::submit_entry(store.as_ref(), &input).await?;

  tracing::info!(
    id = %upserted.entry.id,
    subject = %upserted.entry.subject,
    date = %upserted.entry.date,
    outcome = ?upserted.outcome,
    "entry submitted"
  );

  let status = match upserted.outcome {
    UpsertOutcome::Created => StatusCode::CREATED,
    UpsertOutcome::Updated => StatusCode::OK,
  };
  let body = json!({
    "status":  upserted.outcome,
    "message": upserted.message(),
    "entry":   upserted.entry,
  });
  Ok((status, Json(body)).into_response())
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /entries/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Json<WeightEntry>, ApiError>
where
  S: WeightStore,
{
  let id = EntryId::parse(&raw_id)?;
  let entry = service::get_entry(store.as_ref(), id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("No entry with id {id}.")))?;
  Ok(Json(entry))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /entries/{id}`. A missing row is a status, not an error.
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(raw_id): Path<String>,
) -> Result<Response, ApiError>
where
  S: WeightStore,
{
  let id = EntryId::parse(&raw_id)?;
  let outcome = service::delete_entry(store.as_ref(), id).await?;

  tracing::info!(%id, ?outcome, "entry delete requested");

  let status = match outcome {
    DeleteOutcome::Deleted => StatusCode::OK,
    DeleteOutcome::NotFound => StatusCode::NOT_FOUND,
  };
  let body = json!({
    "status":  outcome,
    "message": outcome.message(id),
    "id":      id,
  });
  Ok((status, Json(body)).into_response())
}
