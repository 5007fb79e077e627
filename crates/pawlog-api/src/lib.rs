//! JSON REST API for pawlog.
//!
//! Exposes an axum [`Router`] backed by any [`pawlog_core::store::WeightStore`].
//! Transport, TLS and presentation concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pawlog_api::api_router(store.clone()))
//! ```

pub mod entries;
pub mod error;
pub mod subjects;

use std::sync::Arc;

use axum::{Router, routing::get};
use pawlog_core::store::WeightStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: WeightStore + 'static,
{
  Router::new()
    .route("/entries", get(entries::list::<S>).post(entries::submit::<S>))
    .route("/entries/{id}", get(entries::get_one::<S>).delete(entries::delete_one::<S>))
    .route("/subjects", get(subjects::list::<S>))
    .with_state(store)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use pawlog_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  async fn make_store() -> Arc<SqliteStore> {
    Arc::new(SqliteStore::open_in_memory().await.unwrap())
  }

  async fn send(
    store:  Arc<SqliteStore>,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(store).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
  }

  async fn submit(store: &Arc<SqliteStore>, subject: &str, weight: Value, date: &str) -> (StatusCode, Value) {
    send(
      store.clone(),
      "POST",
      "/entries",
      Some(json!({ "subject": subject, "weight": weight, "date": date })),
    )
    .await
  }

  // ── Submit ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn submit_creates_then_updates() {
    let store = make_store().await;

    let (status, body) = submit(&store, "Tom", json!(4.2), "2024-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "created");
    let id = body["entry"]["id"].as_i64().unwrap();

    let (status, body) = submit(&store, "Tom", json!("4.6"), "2024-01-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "updated");
    assert_eq!(body["entry"]["id"].as_i64().unwrap(), id);
    assert_eq!(body["entry"]["weight"], 4.6);

    let (_, listing) = send(store, "GET", "/entries", None).await;
    assert_eq!(listing["entries"].as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn submit_invalid_input_returns_422_and_writes_nothing() {
    let store = make_store().await;
    for (subject, weight, date) in [
      ("", json!(5.0), "2024-01-01"),
      ("Tom", json!(-1), "2024-01-01"),
      ("Tom", json!(5.0), ""),
    ] {
      let (status, body) = submit(&store, subject, weight, date).await;
      assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
      assert_eq!(body["status"], "error");
      assert!(!body["message"].as_str().unwrap().is_empty());
    }

    let (_, listing) = send(store, "GET", "/entries", None).await;
    assert!(listing["entries"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn submit_malformed_json_returns_400() {
    let store = make_store().await;
    let req = Request::builder()
      .method("POST")
      .uri("/entries")
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from("{not json"))
      .unwrap();
    let resp = api_router(store).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  }

  // ── Delete ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn delete_then_delete_again() {
    let store = make_store().await;
    let (_, body) = submit(&store, "Tom", json!(4.2), "2024-01-01").await;
    let id = body["entry"]["id"].as_i64().unwrap();

    let (status, body) = send(store.clone(), "DELETE", &format!("/entries/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "deleted");

    let (status, body) = send(store, "DELETE", &format!("/entries/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "not_found");
  }

  #[tokio::test]
  async fn delete_rejects_non_positive_id() {
    let store = make_store().await;
    for uri in ["/entries/0", "/entries/-4", "/entries/abc"] {
      let (status, body) = send(store.clone(), "DELETE", uri, None).await;
      assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
      assert_eq!(body["status"], "error");
    }
  }

  // ── Reads ───────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn get_one_returns_entry_or_404() {
    let store = make_store().await;
    let (_, body) = submit(&store, "Tom", json!(4.2), "2024-01-01").await;
    let id = body["entry"]["id"].as_i64().unwrap();

    let (status, entry) = send(store.clone(), "GET", &format!("/entries/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry, json!({ "id": id, "subject": "Tom", "weight": 4.2, "date": "2024-01-01" }));

    let (status, _) = send(store, "GET", "/entries/99999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn list_filters_and_projects() {
    let store = make_store().await;
    submit(&store, "A", json!(4.0), "2024-01-01").await;
    submit(&store, "B", json!(5.0), "2024-01-01").await;
    submit(&store, "A", json!(4.2), "2024-02-01").await;

    let (status, body) =
      send(store.clone(), "GET", "/entries?subject=A&start_date=2024-01-15", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
    assert_eq!(body["entries"][0]["date"], "2024-02-01");
    assert_eq!(body["subjects"], json!(["A", "B"]));
    assert_eq!(body["chart"]["date_axis"], json!(["2024-02-01"]));
    assert_eq!(body["filter"]["subject"], "A");

    let (_, body) = send(store, "GET", "/entries", None).await;
    assert_eq!(body["chart"]["date_axis"], json!(["2024-01-01", "2024-02-01"]));
    assert_eq!(
      body["chart"]["series"],
      json!([
        { "subject": "A", "points": [4.0, 4.2] },
        { "subject": "B", "points": [5.0, null] },
      ])
    );
  }

  #[tokio::test]
  async fn list_rejects_malformed_dates() {
    let store = make_store().await;
    let (status, body) = send(store, "GET", "/entries?end_date=01/02/2024", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["message"].as_str().unwrap().contains("end date"));
  }

  // ── Backend failures ────────────────────────────────────────────────────────

  mod failing {
    use pawlog_core::{
      entry::{CatName, EntryDate, EntryId, NewEntry, Weight, WeightEntry},
      filter::EntryFilter,
      store::{StoreError, WeightStore},
    };
    use thiserror::Error;

    pub const SECRET: &str = "/var/lib/pawlog/secret.db";

    #[derive(Debug, Error)]
    pub enum FailingError {
      #[error("UNIQUE constraint failed: weights.subject, weights.date")]
      Duplicate,
      #[error("disk I/O error at /var/lib/pawlog/secret.db")]
      Offline,
    }

    impl StoreError for FailingError {
      fn is_conflict(&self) -> bool { matches!(self, Self::Duplicate) }
    }

    /// Never finds an existing row; every write fails with the configured
    /// error.
    pub struct FailingStore {
      pub conflict: bool,
    }

    impl FailingStore {
      fn fail(&self) -> FailingError {
        if self.conflict { FailingError::Duplicate } else { FailingError::Offline }
      }
    }

    impl WeightStore for FailingStore {
      type Error = FailingError;

      async fn find_entry(
        &self,
        _subject: &CatName,
        _date: EntryDate,
      ) -> Result<Option<WeightEntry>, FailingError> {
        if self.conflict { Ok(None) } else { Err(FailingError::Offline) }
      }

      async fn get_entry(&self, _id: EntryId) -> Result<Option<WeightEntry>, FailingError> {
        Err(self.fail())
      }

      async fn insert_entry(&self, _entry: NewEntry) -> Result<WeightEntry, FailingError> {
        Err(self.fail())
      }

      async fn update_weight(
        &self,
        _id: EntryId,
        _weight: Weight,
      ) -> Result<Option<WeightEntry>, FailingError> {
        Err(self.fail())
      }

      async fn delete_entry(&self, _id: EntryId) -> Result<bool, FailingError> {
        Err(FailingError::Offline)
      }

      async fn list_entries(
        &self,
        _filter: &EntryFilter,
      ) -> Result<Vec<WeightEntry>, FailingError> {
        Err(FailingError::Offline)
      }

      async fn list_subjects(&self) -> Result<Vec<CatName>, FailingError> {
        Err(FailingError::Offline)
      }
    }
  }

  use failing::{FailingStore, SECRET};

  async fn send_to(
    store:  FailingStore,
    method: &str,
    uri:    &str,
    body:   Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(v) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(v.to_string())
      }
      None => Body::empty(),
    };
    let resp = api_router(Arc::new(store)).oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
  }

  #[tokio::test]
  async fn lost_insert_race_returns_409() {
    let (status, body) = send_to(
      FailingStore { conflict: true },
      "POST",
      "/entries",
      Some(json!({ "subject": "Tom", "weight": 4.2, "date": "2024-01-01" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Tom"), "{message}");
    assert!(message.contains("update it instead"), "{message}");
    assert!(!message.contains("UNIQUE"), "{message}");
  }

  #[tokio::test]
  async fn storage_failures_return_500_without_detail() {
    let submit = json!({ "subject": "Tom", "weight": 4.2, "date": "2024-01-01" });
    for (method, uri, body) in [
      ("POST", "/entries", Some(submit)),
      ("GET", "/entries", None),
      ("GET", "/entries/1", None),
      ("DELETE", "/entries/1", None),
      ("GET", "/subjects", None),
    ] {
      let (status, body) = send_to(FailingStore { conflict: false }, method, uri, body).await;
      assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
      assert_eq!(body["status"], "error");
      assert_eq!(body["message"], error::STORAGE_FAILURE_MESSAGE);
      assert!(!body.to_string().contains(SECRET), "{method} {uri}");
    }
  }

  #[tokio::test]
  async fn null_or_mistyped_fields_are_validation_errors() {
    let store = make_store().await;
    for body in [
      json!({ "subject": "Tom", "weight": null, "date": "2024-01-01" }),
      json!({ "subject": null, "weight": 4.0, "date": "2024-01-01" }),
      json!({ "subject": "Tom", "weight": true, "date": "2024-01-01" }),
      json!({ "subject": "Tom", "weight": 4.0, "date": 20240101 }),
    ] {
      let (status, resp) = send(store.clone(), "POST", "/entries", Some(body.clone())).await;
      assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{body}");
      assert_eq!(resp["status"], "error");
    }
    let (_, listing) = send(store, "GET", "/entries", None).await;
    assert!(listing["entries"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn subjects_lists_distinct_names() {
    let store = make_store().await;
    submit(&store, "Luna", json!(3.1), "2024-01-01").await;
    submit(&store, "Tom", json!(4.2), "2024-01-01").await;
    submit(&store, "Luna", json!(3.2), "2024-01-02").await;

    let (status, body) = send(store, "GET", "/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Luna", "Tom"]));
  }
}
