//! HTTP binding of the reordering routes.

pub mod seed;

use axum::{
    Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use sortable_core::{
    ControllerResponse, FetchEntriesParams, SortError, SortablePlugin, UpdateSortOrderBody,
};
use std::sync::Arc;
use tracing::warn;

pub use seed::{SeedEntry, SeedFile};

type PluginState = State<Arc<SortablePlugin>>;

fn into_response(response: ControllerResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    match response.body {
        Some(body) => (status, Json(body)).into_response(),
        None => status.into_response(),
    }
}

/// Malformed query strings and bodies get the same error shape as the
/// controller's own validation failures.
fn rejected(route: &str, message: String) -> Response {
    warn!(route, %message, "Malformed request");
    into_response(ControllerResponse::from_error(&SortError::Validation(message)))
}

async fn fetch_entries(
    State(plugin): PluginState,
    Path(uid): Path<String>,
    params: Result<Query<FetchEntriesParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => into_response(plugin.controller().fetch_entries(&uid, params).await),
        Err(rejection) => rejected("fetch-entries", rejection.body_text()),
    }
}

async fn fetch_entries_scoped(
    State(plugin): PluginState,
    Path(uid): Path<String>,
    params: Result<Query<FetchEntriesParams>, QueryRejection>,
) -> Response {
    match params {
        Ok(Query(params)) => {
            into_response(plugin.controller().fetch_entries_scoped(&uid, params).await)
        }
        Err(rejection) => rejected("fetch-entries-scoped", rejection.body_text()),
    }
}

async fn update_sort_order(
    State(plugin): PluginState,
    Path(uid): Path<String>,
    body: Result<Json<UpdateSortOrderBody>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => into_response(plugin.controller().update_sort_order(&uid, body).await),
        Err(rejection) => rejected("update-sort-order", rejection.body_text()),
    }
}

async fn update_sort_order_scoped(
    State(plugin): PluginState,
    Path(uid): Path<String>,
    body: Result<Json<UpdateSortOrderBody>, JsonRejection>,
) -> Response {
    match body {
        Ok(Json(body)) => {
            into_response(plugin.controller().update_sort_order_scoped(&uid, body).await)
        }
        Err(rejection) => rejected("update-sort-order-scoped", rejection.body_text()),
    }
}

/// Build the HTTP router serving the reorder routes for `plugin`.
pub fn build_router(plugin: Arc<SortablePlugin>) -> Router {
    Router::new()
        .route("/fetch-entries/{uid}", get(fetch_entries))
        .route("/update-sort-order/{uid}", post(update_sort_order))
        .route("/fetch-entries-scoped/{uid}", get(fetch_entries_scoped))
        .route("/update-sort-order-scoped/{uid}", post(update_sort_order_scoped))
        .with_state(plugin)
}
