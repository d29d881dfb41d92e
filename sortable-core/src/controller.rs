//! Request/response contract of the admin routes, independent of any web
//! framework. Transports parse the path, query and body into these types
//! and write back the returned status and JSON body.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/fetch-entries/:uid` | [`Controller::fetch_entries`] |
//! | POST | `/update-sort-order/:uid` | [`Controller::update_sort_order`] |
//! | GET | `/fetch-entries-scoped/:uid` | [`Controller::fetch_entries_scoped`] |
//! | POST | `/update-sort-order-scoped/:uid` | [`Controller::update_sort_order_scoped`] |

use crate::error::{SortError, SortResult};
use crate::reconciler::{FetchRequest, ReconcileReport, ReorderRequest, SortOrderService};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sortable_types::{ContentTypeUid, DocumentId, Locale};
use tracing::{error, warn};

/// Query string of the fetch routes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchEntriesParams {
    pub main_field: Option<String>,
    /// JSON-encoded filter object.
    pub filters: Option<String>,
    pub locale: Option<String>,
    /// Comma-separated relation attributes to populate.
    pub relation_fields: Option<String>,
}

/// Body of the update routes: `{"data": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSortOrderBody {
    #[serde(default)]
    pub data: UpdateSortOrderData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSortOrderData {
    pub sorted_document_ids: Option<Vec<DocumentId>>,
    #[serde(default)]
    pub filters: Option<Value>,
    pub locale: Option<String>,
}

/// Status and optional JSON body to send back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl ControllerResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    pub fn from_error(err: &SortError) -> Self {
        let status = err.status_code();
        Self {
            status,
            body: Some(json!({
                "error": {
                    "status": status,
                    "name": err.name(),
                    "message": err.to_string(),
                }
            })),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct Controller<'a> {
    service: &'a SortOrderService,
}

impl<'a> Controller<'a> {
    pub fn new(service: &'a SortOrderService) -> Self {
        Self { service }
    }

    pub async fn fetch_entries(&self, uid: &str, params: FetchEntriesParams) -> ControllerResponse {
        let result = self.fetch(uid, params, false).await;
        respond("fetch-entries", result.map(|entries| ControllerResponse::ok(Value::Array(entries))))
    }

    pub async fn fetch_entries_scoped(&self, uid: &str, params: FetchEntriesParams) -> ControllerResponse {
        let result = self.fetch(uid, params, true).await;
        respond(
            "fetch-entries-scoped",
            result.map(|entries| ControllerResponse::ok(Value::Array(entries))),
        )
    }

    pub async fn update_sort_order(&self, uid: &str, body: UpdateSortOrderBody) -> ControllerResponse {
        let result = self.update(uid, body, false).await;
        respond("update-sort-order", result.map(|_| ControllerResponse::no_content()))
    }

    pub async fn update_sort_order_scoped(&self, uid: &str, body: UpdateSortOrderBody) -> ControllerResponse {
        let result = self.update(uid, body, true).await;
        respond(
            "update-sort-order-scoped",
            result.map(|_| ControllerResponse::no_content()),
        )
    }

    async fn fetch(&self, uid: &str, params: FetchEntriesParams, scoped: bool) -> SortResult<Vec<Value>> {
        let request = fetch_request(params)?;
        let uid = parse_uid(uid)?;
        if scoped {
            self.service.fetch_entries_scoped(&uid, request).await
        } else {
            self.service.fetch_entries(&uid, request).await
        }
    }

    async fn update(&self, uid: &str, body: UpdateSortOrderBody, scoped: bool) -> SortResult<ReconcileReport> {
        let request = reorder_request(body)?;
        let uid = parse_uid(uid)?;
        if scoped {
            self.service.update_sort_order_scoped(&uid, request).await
        } else {
            self.service.update_sort_order(&uid, request).await
        }
    }
}

fn respond(route: &str, result: SortResult<ControllerResponse>) -> ControllerResponse {
    match result {
        Ok(response) => response,
        Err(err) => {
            if err.is_client_error() {
                warn!(route, error = %err, "Request rejected");
            } else {
                error!(route, error = %err, "Request failed");
            }
            ControllerResponse::from_error(&err)
        }
    }
}

fn parse_uid(uid: &str) -> SortResult<ContentTypeUid> {
    ContentTypeUid::parse(uid).map_err(|e| SortError::Validation(e.to_string()))
}

/// An absent locale stays absent; a blank one is rejected.
fn parse_locale(locale: Option<String>) -> SortResult<Option<Locale>> {
    locale
        .map(|l| Locale::parse(&l).map_err(|e| SortError::Validation(e.to_string())))
        .transpose()
}

/// `null` and `{}` mean "no filter"; anything else must be an object.
fn normalize_filters(filters: Option<Value>) -> SortResult<Option<Value>> {
    match filters {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) if map.is_empty() => Ok(None),
        Some(filters @ Value::Object(_)) => Ok(Some(filters)),
        Some(other) => Err(SortError::Validation(format!(
            "filters must be a JSON object, got {other}"
        ))),
    }
}

fn fetch_request(params: FetchEntriesParams) -> SortResult<FetchRequest> {
    let main_field = params
        .main_field
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| SortError::Validation("mainField is required".into()))?;

    let filters = match params.filters.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(serde_json::from_str::<Value>(raw).map_err(|e| {
            SortError::Validation(format!("filters must be a JSON object: {e}"))
        })?),
    };

    let relation_fields = params
        .relation_fields
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(FetchRequest {
        main_field,
        filters: normalize_filters(filters)?,
        locale: parse_locale(params.locale)?,
        relation_fields,
    })
}

fn reorder_request(body: UpdateSortOrderBody) -> SortResult<ReorderRequest> {
    let data = body.data;
    let sorted_document_ids = data
        .sorted_document_ids
        .ok_or_else(|| SortError::Validation("sortedDocumentIds is required".into()))?;

    Ok(ReorderRequest {
        sorted_document_ids,
        filters: normalize_filters(data.filters)?,
        locale: parse_locale(data.locale)?,
    })
}
