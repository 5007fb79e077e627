//! HTML handlers: the index page and its two form actions.
//!
//! Mutations render the page directly with a flash banner and the same status
//! codes the JSON API uses.

use axum::{
  Form,
  extract::{Path, Query, State, rejection::FormRejection},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use chrono::Local;
use pawlog_api::error::STORAGE_FAILURE_MESSAGE;
use pawlog_core::{
  Error,
  entry::{EntryDate, EntryId, EntryInput},
  filter::FilterParams,
  service::{self, DeleteOutcome, Listing},
  store::WeightStore,
};
use serde::Deserialize;

use crate::{
  AppState,
  ui::{self, Flash, FormValues, Page},
};

/// Query string accepted by `GET /`.
#[derive(Debug, Default, Deserialize)]
pub struct IndexParams {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
  pub subject:    Option<String>,
  /// Entry id to prefill the form with.
  pub edit:       Option<String>,
}

impl IndexParams {
  fn filter(&self) -> FilterParams {
    FilterParams {
      start_date: self.start_date.clone(),
      end_date:   self.end_date.clone(),
      subject:    self.subject.clone(),
    }
  }
}

/// The filter in effect when a form was posted, echoed back as hidden
/// `keep_*` inputs.
#[derive(Debug, Default, Deserialize)]
pub struct KeptFilter {
  pub keep_start_date: Option<String>,
  pub keep_end_date:   Option<String>,
  pub keep_subject:    Option<String>,
}

impl KeptFilter {
  fn filter(&self) -> FilterParams {
    FilterParams {
      start_date: self.keep_start_date.clone(),
      end_date:   self.keep_end_date.clone(),
      subject:    self.keep_subject.clone(),
    }
  }
}

/// Body of `POST /entries`: the entry fields plus the kept filter.
#[derive(Debug, Default, Deserialize)]
pub struct EntryForm {
  #[serde(default)]
  pub subject:         String,
  #[serde(default)]
  pub weight:          String,
  #[serde(default)]
  pub date:            String,
  pub keep_start_date: Option<String>,
  pub keep_end_date:   Option<String>,
  pub keep_subject:    Option<String>,
}

impl EntryForm {
  fn split(self) -> (EntryInput, FilterParams) {
    let params = FilterParams {
      start_date: self.keep_start_date,
      end_date:   self.keep_end_date,
      subject:    self.keep_subject,
    };
    (EntryInput::new(self.subject, self.weight.as_str(), self.date), params)
  }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

pub async fn index<S: WeightStore>(
  State(state): State<AppState<S>>,
  Query(params): Query<IndexParams>,
) -> Response {
  let mut flash = None;
  let mut form = blank_form();

  if let Some(raw) = params.edit.as_deref().filter(|s| !s.trim().is_empty()) {
    match EntryId::parse(raw) {
      Ok(id) => match service::get_entry(state.store.as_ref(), id).await {
        Ok(Some(entry)) => form = FormValues::from_entry(&entry),
        Ok(None) => flash = Some(Flash::info(format!("No entry with id {id} to edit."))),
        Err(e) => return storage_page(&state, &e),
      },
      Err(e) => flash = Some(Flash::error(e.to_string())),
    }
  }

  render(&state, StatusCode::OK, &params.filter(), flash, &form).await
}

pub async fn submit<S: WeightStore>(
  State(state): State<AppState<S>>,
  form: Result<Form<EntryForm>, FormRejection>,
) -> Response {
  let Form(form) = match form {
    Ok(form) => form,
    Err(rejection) => {
      let flash = Flash::error(format!("Could not read the submitted form: {rejection}"));
      let params = FilterParams::default();
      return render(&state, StatusCode::BAD_REQUEST, &params, Some(flash), &blank_form()).await;
    }
  };

  let (input, params) = form.split();

  match service::submit_entry(state.store.as_ref(), &input).await {
    Ok(upserted) => {
      tracing::info!(
        id = %upserted.entry.id,
        outcome = ?upserted.outcome,
        "entry submitted from form"
      );
      let flash = Flash::success(upserted.message());
      render(&state, StatusCode::OK, &params, Some(flash), &blank_form()).await
    }
    Err(err) => {
      let (status, flash) = failure(&err);
      let form = FormValues::from_input(&input);
      render(&state, status, &params, Some(flash), &form).await
    }
  }
}

pub async fn delete<S: WeightStore>(
  State(state): State<AppState<S>>,
  Path(raw): Path<String>,
  kept: Result<Form<KeptFilter>, FormRejection>,
) -> Response {
  let params = kept.map(|Form(kept)| kept.filter()).unwrap_or_default();
  let (status, flash) = match EntryId::parse(&raw) {
    Ok(id) => match service::delete_entry(state.store.as_ref(), id).await {
      Ok(outcome @ DeleteOutcome::Deleted) => {
        tracing::info!(%id, "entry deleted from form");
        (StatusCode::OK, Flash::success(outcome.message(id)))
      }
      Ok(outcome @ DeleteOutcome::NotFound) => {
        (StatusCode::NOT_FOUND, Flash::info(outcome.message(id)))
      }
      Err(err) => failure(&err),
    },
    Err(e) => failure(&Error::Validation(e)),
  };

  render(&state, status, &params, Some(flash), &blank_form()).await
}

// ─── Rendering ───────────────────────────────────────────────────────────────

async fn render<S: WeightStore>(
  state:  &AppState<S>,
  status: StatusCode,
  params: &FilterParams,
  flash:  Option<Flash>,
  form:   &FormValues,
) -> Response {
  let (listing, filter_flash) = match load_listing(state.store.as_ref(), params).await {
    Ok(loaded) => loaded,
    Err(e) => return storage_page(state, &e),
  };

  let flash = flash.or(filter_flash);
  let page = Page {
    title:   &state.config.title,
    listing: &listing,
    flash:   flash.as_ref(),
    form,
  };
  (status, Html(ui::render_index(&page))).into_response()
}

/// Run the filtered listing; a malformed filter falls back to everything.
async fn load_listing<S: WeightStore>(
  store:  &S,
  params: &FilterParams,
) -> Result<(Listing, Option<Flash>), Error> {
  match service::list_entries(store, params).await {
    Ok(listing) => Ok((listing, None)),
    Err(Error::Validation(e)) => {
      let listing = service::list_entries(store, &FilterParams::default()).await?;
      Ok((listing, Some(Flash::error(format!("Filter ignored: {e}")))))
    }
    Err(e) => Err(e),
  }
}

fn storage_page<S: WeightStore>(state: &AppState<S>, err: &Error) -> Response {
  tracing::error!(error = %err, "storage failure while rendering page");
  let body = ui::render_failure(&state.config.title, STORAGE_FAILURE_MESSAGE);
  (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
}

fn failure(err: &Error) -> (StatusCode, Flash) {
  match err {
    Error::Validation(e) => (
      StatusCode::UNPROCESSABLE_ENTITY,
      Flash::error(format!("Please fill in all fields correctly: {e}")),
    ),
    Error::Conflict { .. } => (StatusCode::CONFLICT, Flash::error(err.to_string())),
    Error::Storage(e) => {
      tracing::error!(error = %e, "storage failure");
      (StatusCode::INTERNAL_SERVER_ERROR, Flash::error(STORAGE_FAILURE_MESSAGE))
    }
  }
}

fn blank_form() -> FormValues {
  EntryDate::new(Local::now().date_naive())
    .map(FormValues::blank)
    .unwrap_or_default()
}
