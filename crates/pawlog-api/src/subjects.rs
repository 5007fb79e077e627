//! Handler for `GET /subjects`: every cat with at least one entry.

use std::sync::Arc;

use axum::{Json, extract::State};
use pawlog_core::{entry::CatName, service, store::WeightStore};

use crate::error::ApiError;

/// `GET /subjects`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<Json<Vec<CatName>>, ApiError>
where
  S: WeightStore,
{
  let subjects = service::list_subjects(store.as_ref()).await?;
  Ok(Json(subjects))
}
