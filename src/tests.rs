use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use httpmock::prelude::*;
use serde_json::{json, Value};
use tokio::sync::oneshot;

use crate::config::{figment, ApiConfig, AppConfig};
use crate::domain::entities::aggregate::{DetailTab, NestedCollection, PackageAggregate};
use crate::domain::entities::catalog::{ListEndpoint, PaginationMode, ResourceKind};
use crate::domain::entities::list_query::{
    FilterValue, ListQuery, PageSize, QueryChange, SortDirection,
};
use crate::domain::entities::notice::{Notice, NoticeLevel};
use crate::domain::entities::resource::{Row, RowKey};
use crate::domain::entities::user::Role;
use crate::infra::http::client::HttpApiClient;
use crate::infra::session::token_store::{FileTokenStore, MemoryTokenStore};
use crate::ui::state::app_state::Route;
use crate::usecase::ports::api::{
    ApiError, Mutation, ResourceApi, GENERIC_ERROR_MESSAGE, TRANSPORT_ERROR_MESSAGE,
};
use crate::usecase::ports::token_store::TokenStore;
use crate::usecase::services::auth_session::{AuthSession, LoginError, NO_ACCESS_MESSAGE};
use crate::usecase::services::confirmable_action::{
    ActionPhase, ActionPrompt, ConfirmableAction, MutationKind, MutationReport, PendingAction,
    RefreshTarget,
};
use crate::usecase::services::create_form::{CreateDraft, CreateError};
use crate::usecase::services::detail_service::PackageDetailController;
use crate::usecase::services::list_controller::{LoadOutcome, ResourceListController};
use crate::usecase::services::list_request::{build_params, interpret, parse_envelope};
use crate::usecase::services::navigation_notice::{NoticeChannel, NoticeLatch};

fn unique_test_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("umrah-admin-{prefix}-{nanos}"))
}

#[derive(Debug, Clone, PartialEq)]
struct Call {
    method: &'static str,
    path: String,
    params: Vec<(String, String)>,
    body: Option<Value>,
}

impl Call {
    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

type Responder = Box<dyn Fn(&Call) -> Result<Value, ApiError>>;

/// In-process backend. Each call may be held open by a gate until the test releases it.
struct FakeApi {
    respond: Responder,
    gates: RefCell<VecDeque<Option<oneshot::Receiver<()>>>>,
    calls: RefCell<Vec<Call>>,
}

impl FakeApi {
    fn new(respond: impl Fn(&Call) -> Result<Value, ApiError> + 'static) -> Rc<Self> {
        Rc::new(Self {
            respond: Box::new(respond),
            gates: RefCell::new(VecDeque::new()),
            calls: RefCell::new(Vec::new()),
        })
    }

    fn gate_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push_back(Some(rx));
        tx
    }

    fn open_next(&self) {
        self.gates.borrow_mut().push_back(None);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn count(&self, method: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.method == method)
            .count()
    }

    async fn answer(&self, call: Call) -> Result<Value, ApiError> {
        let response = (self.respond)(&call);
        self.calls.borrow_mut().push(call);
        let gate = self.gates.borrow_mut().pop_front().flatten();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        response
    }
}

#[async_trait(?Send)]
impl ResourceApi for FakeApi {
    async fn get(&self, path: &str, params: &[(String, String)]) -> Result<Value, ApiError> {
        self.answer(Call {
            method: "GET",
            path: path.to_string(),
            params: params.to_vec(),
            body: None,
        })
        .await
    }

    async fn send(
        &self,
        method: Mutation,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.answer(Call {
            method: method.as_str(),
            path: path.to_string(),
            params: Vec::new(),
            body,
        })
        .await
    }
}

/// Server-paginated `packages` collection with working DELETE and PATCH.
struct PackageBackend {
    rows: RefCell<Vec<Value>>,
    fail_patches: Cell<bool>,
}

impl PackageBackend {
    fn with_rows(count: i64) -> Rc<Self> {
        let rows = (1..=count)
            .map(|id| {
                json!({
                    "id": id,
                    "name": format!("Package {id:02}"),
                    "status": "published",
                    "is_featured": false,
                })
            })
            .collect();
        Rc::new(Self {
            rows: RefCell::new(rows),
            fail_patches: Cell::new(false),
        })
    }

    fn respond(&self, call: &Call) -> Result<Value, ApiError> {
        match call.method {
            "GET" if call.path == "packages" => {
                let page: usize = call.param("page").and_then(|v| v.parse().ok()).unwrap_or(1);
                let per_page: usize = call
                    .param("per_page")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10);
                let rows = self.rows.borrow();
                let data: Vec<Value> = rows
                    .iter()
                    .skip((page - 1) * per_page)
                    .take(per_page)
                    .cloned()
                    .collect();
                Ok(json!({ "data": data, "meta": { "total": rows.len() } }))
            }
            "DELETE" => {
                let id = call.path.trim_start_matches("packages/").to_string();
                self.rows
                    .borrow_mut()
                    .retain(|row| row["id"].to_string() != id);
                Ok(Value::Null)
            }
            "PATCH" => {
                if self.fail_patches.get() {
                    return Err(ApiError::from_status(
                        500,
                        Some("Could not update package.".to_string()),
                    ));
                }
                let id = call.path.trim_start_matches("packages/").to_string();
                let patch = call.body.clone().unwrap_or(Value::Null);
                let mut rows = self.rows.borrow_mut();
                if let (Some(row), Value::Object(fields)) = (
                    rows.iter_mut().find(|row| row["id"].to_string() == id),
                    patch,
                ) {
                    for (field, value) in fields {
                        row[field] = value;
                    }
                }
                Ok(Value::Null)
            }
            _ => Err(ApiError::from_status(404, None)),
        }
    }
}

fn package_controller(backend: &Rc<PackageBackend>) -> (Rc<FakeApi>, ResourceListController) {
    let backend = backend.clone();
    let api = FakeApi::new(move |call| backend.respond(call));
    let controller = ResourceListController::new(
        api.clone(),
        ResourceKind::Packages.endpoint(),
        PageSize::Ten,
    );
    (api, controller)
}

fn row(value: Value) -> Row {
    Row::from_value(value).expect("fixture should be an object")
}

fn names(rows: &[Row]) -> Vec<String> {
    rows.iter().map(|row| row.text("name")).collect()
}

// ---------------------------------------------------------------- list query

#[test]
fn query_changes_reset_page_except_sort_and_paging() {
    let mut query = ListQuery::new(PageSize::Ten);
    query.set_page(4);
    query.set_search("umrah");
    assert_eq!(query.page(), 1, "search should reset page");

    query.set_page(4);
    query.set_filter("status", FilterValue::Choice("published".to_string()));
    assert_eq!(query.page(), 1, "filter should reset page");

    query.set_page(4);
    query.clear_filter("status");
    assert_eq!(query.page(), 1, "clearing a filter should reset page");

    query.set_page(4);
    query.set_page_size(PageSize::Fifty);
    assert_eq!(query.page(), 1, "page size should reset page");

    query.set_page(4);
    query.toggle_sort("name");
    assert_eq!(query.page(), 4, "sorting should keep the current page");
}

#[test]
fn toggle_sort_alternates_on_same_key_and_restarts_on_new_key() {
    let mut query = ListQuery::default();
    query.toggle_sort("name");
    assert_eq!(query.sort().key.as_deref(), Some("name"));
    assert_eq!(query.sort().direction, SortDirection::Asc);

    query.toggle_sort("name");
    assert_eq!(query.sort().direction, SortDirection::Desc);

    query.toggle_sort("name");
    assert_eq!(query.sort().direction, SortDirection::Asc);

    query.toggle_sort("name");
    query.toggle_sort("price");
    assert_eq!(query.sort().key.as_deref(), Some("price"));
    assert_eq!(
        query.sort().direction,
        SortDirection::Asc,
        "a new key should start ascending"
    );
}

#[test]
fn sentinel_filter_values_remove_the_filter() {
    let mut query = ListQuery::default();
    query.set_filter("status", FilterValue::Choice("draft".to_string()));
    assert!(query.filter("status").is_some());

    query.set_filter("status", FilterValue::Choice("all".to_string()));
    assert!(query.filter("status").is_none(), "'all' should drop the filter");

    query.set_filter("city", FilterValue::Text("  ".to_string()));
    assert!(query.filters().is_empty(), "blank text should not be stored");
}

#[test]
fn paging_changes_stay_within_range() {
    let mut query = ListQuery::new(PageSize::Ten);
    query.apply(QueryChange::PrevPage);
    assert_eq!(query.page(), 1, "previous page should floor at 1");

    query.apply(QueryChange::NextPage { total_count: 25 });
    query.apply(QueryChange::NextPage { total_count: 25 });
    query.apply(QueryChange::NextPage { total_count: 25 });
    assert_eq!(query.page(), 3, "next page should stop at the last page");

    query.apply(QueryChange::Page(0));
    assert_eq!(query.page(), 1);

    assert_eq!(query.page_count(0), 1, "an empty list still has one page");
    assert_eq!(query.page_count(21), 3);
}

#[test]
fn clear_all_restores_defaults_but_keeps_page_size() {
    let mut query = ListQuery::new(PageSize::TwentyFive);
    query.set_search("hajj");
    query.set_filter("type", FilterValue::Choice("hajj".to_string()));
    query.toggle_sort("price");
    query.set_page(2);

    query.apply(QueryChange::ClearAll);

    assert_eq!(query.search_text(), "");
    assert!(query.filters().is_empty());
    assert_eq!(query.sort().key, None);
    assert_eq!(query.page(), 1);
    assert_eq!(query.page_size(), PageSize::TwentyFive);
}

// ------------------------------------------------------------- list request

#[test]
fn server_params_carry_paging_sort_and_real_filters() {
    let mut query = ListQuery::new(PageSize::TwentyFive);
    query.set_search("  umrah ");
    query.set_filter("status", FilterValue::Choice("all".to_string()));
    query.set_filter("type", FilterValue::Choice("hajj".to_string()));
    query.toggle_sort("name");
    query.toggle_sort("name");
    query.set_page(2);

    let params = build_params(&ResourceKind::Packages.endpoint(), &query);

    let expected: Vec<(String, String)> = [
        ("search", "umrah"),
        ("type", "hajj"),
        ("page", "2"),
        ("per_page", "25"),
        ("sort_by", "name"),
        ("sort_dir", "desc"),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value.to_string()))
    .collect();
    assert_eq!(params, expected);
}

#[test]
fn client_params_omit_paging_and_sort() {
    let mut query = ListQuery::default();
    let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 1).expect("should be a valid date");
    query.set_filter("created_from", FilterValue::Date(date));
    query.toggle_sort("name");

    let params = build_params(&ResourceKind::Hotels.endpoint(), &query);

    assert_eq!(
        params,
        vec![("created_from".to_string(), "2026-03-01".to_string())]
    );
}

#[test]
fn envelope_shapes_are_all_accepted() {
    let bare = parse_envelope(&json!([{ "id": 1 }, { "id": 2 }])).expect("bare array should parse");
    assert_eq!(bare.rows.len(), 2);
    assert_eq!(bare.reported_total, None);

    let flat = parse_envelope(&json!({ "data": [{ "id": 1 }], "meta": { "total": "40" } }))
        .expect("flat envelope should parse");
    assert_eq!(flat.reported_total, Some(40));

    let nested = parse_envelope(&json!({
        "data": { "data": [{ "id": 1 }, { "id": 2 }], "meta": { "total": 12 } }
    }))
    .expect("nested envelope should parse");
    assert_eq!(nested.rows.len(), 2);
    assert_eq!(nested.reported_total, Some(12));

    let err = parse_envelope(&json!({ "data": "nope" })).expect_err("string data should fail");
    assert!(matches!(err, ApiError::Decode(_)));
}

#[test]
fn server_page_larger_than_requested_is_truncated() {
    let query = ListQuery::new(PageSize::Ten);
    let rows: Vec<Value> = (1..=12).map(|id| json!({ "id": id })).collect();
    let envelope = parse_envelope(&json!({ "data": rows, "meta": { "total": 90 } }))
        .expect("envelope should parse");

    let page = interpret(&ResourceKind::Packages.endpoint(), &query, envelope);

    assert_eq!(page.rows.len(), 10);
    assert_eq!(page.total_count, 90);
    assert!(!page.truncated);
}

#[test]
fn client_fetch_short_of_reported_total_is_flagged() {
    let query = ListQuery::new(PageSize::Ten);
    let rows: Vec<Value> = (1..=20).map(|id| json!({ "id": id })).collect();
    let envelope = parse_envelope(&json!({ "data": rows, "meta": { "total": 30 } }))
        .expect("envelope should parse");

    let page = interpret(&ResourceKind::Hotels.endpoint(), &query, envelope);

    assert_eq!(page.total_count, 20, "total should reflect rows received");
    assert!(page.truncated, "short fetch should be flagged");
    assert_eq!(page.rows.len(), 10);
}

#[test]
fn local_sort_handles_numbers_dates_and_missing_values() {
    let endpoint = ResourceKind::Packages.endpoint();
    let rows = || {
        vec![
            json!({ "id": 1, "name": "B", "price": "100", "departure_date": "2026-05-01" }),
            json!({ "id": 2, "name": "A", "price": 20 }),
            json!({ "id": 3, "name": "C", "price": 5.5, "departure_date": "2026-01-15T08:00:00Z" }),
        ]
    };

    let mut by_price = ListQuery::new(PageSize::Ten);
    by_price.toggle_sort("price");
    let page = interpret(
        &ListEndpoint {
            pagination: PaginationMode::Client,
            ..endpoint.clone()
        },
        &by_price,
        parse_envelope(&json!(rows())).expect("rows should parse"),
    );
    assert_eq!(names(&page.rows), vec!["C", "A", "B"]);

    let mut by_date = ListQuery::new(PageSize::Ten);
    by_date.toggle_sort("departure_date");
    by_date.toggle_sort("departure_date");
    let page = interpret(
        &ListEndpoint {
            pagination: PaginationMode::Client,
            ..endpoint
        },
        &by_date,
        parse_envelope(&json!(rows())).expect("rows should parse"),
    );
    assert_eq!(
        names(&page.rows),
        vec!["B", "C", "A"],
        "missing dates should sort last when descending"
    );
}

#[test]
fn local_sort_is_stable_for_equal_keys() {
    let endpoint = ListEndpoint {
        pagination: PaginationMode::Client,
        ..ResourceKind::Packages.endpoint()
    };
    let body = json!([
        { "id": 1, "name": "first", "type": "umrah" },
        { "id": 2, "name": "second", "type": "umrah" },
        { "id": 3, "name": "third", "type": "hajj" },
    ]);

    let mut query = ListQuery::default();
    query.toggle_sort("type");
    query.toggle_sort("type");
    let page = interpret(
        &endpoint,
        &query,
        parse_envelope(&body).expect("rows should parse"),
    );

    assert_eq!(names(&page.rows), vec!["first", "second", "third"]);
}

#[tokio::test]
async fn client_paginated_search_filter_sort_yields_first_page() {
    let mut body = Vec::new();
    for n in (1..=25).rev() {
        body.push(json!({ "id": n, "name": format!("Umrah Package {n:02}"), "status": "published" }));
    }
    for n in 1..=5 {
        body.push(json!({ "id": 100 + n, "name": format!("Umrah Draft {n}"), "status": "draft" }));
    }
    body.push(json!({ "id": 200, "name": "Hajj Premium", "status": "published" }));
    let body = Value::Array(body);

    let api = FakeApi::new(move |_| Ok(json!({ "data": body.clone() })));
    let endpoint = ListEndpoint {
        pagination: PaginationMode::Client,
        local_filtering: true,
        ..ResourceKind::Packages.endpoint()
    };
    let controller = ResourceListController::new(api.clone(), endpoint, PageSize::Ten);

    let mut query = ListQuery::new(PageSize::Ten);
    query.set_search("umrah");
    query.set_filter("status", FilterValue::Choice("published".to_string()));
    query.toggle_sort("name");

    let outcome = controller.load(query).await;

    assert_eq!(outcome, LoadOutcome::Applied);
    let view = controller.snapshot();
    assert_eq!(view.page.total_count, 25);
    assert_eq!(view.page.rows.len(), 10);
    assert_eq!(view.page_count, 3);
    let expected: Vec<String> = (1..=10).map(|n| format!("Umrah Package {n:02}")).collect();
    assert_eq!(names(&view.page.rows), expected);
    assert_eq!(
        api.calls()[0].param("page"),
        None,
        "client mode should not send paging params"
    );
}

// ---------------------------------------------------------- list controller

#[tokio::test]
async fn latest_query_wins_when_earlier_fetch_settles_last() {
    let api = FakeApi::new(|call| {
        let search = call.param("search").unwrap_or("").to_string();
        Ok(json!({
            "data": [{ "id": 1, "name": format!("result for {search}") }],
            "meta": { "total": 1 }
        }))
    });
    let controller =
        ResourceListController::new(api.clone(), ResourceKind::Packages.endpoint(), PageSize::Ten);

    let release_first = api.gate_next();
    api.open_next();

    let mut first = ListQuery::default();
    first.set_search("first");
    let mut second = ListQuery::default();
    second.set_search("second");

    let (first_outcome, second_outcome) = tokio::join!(controller.load(first), async {
        let outcome = controller.load(second).await;
        let _ = release_first.send(());
        outcome
    });

    assert_eq!(first_outcome, LoadOutcome::Discarded);
    assert_eq!(second_outcome, LoadOutcome::Applied);
    let view = controller.snapshot();
    assert_eq!(view.query.search_text(), "second");
    assert_eq!(names(&view.page.rows), vec!["result for second"]);
    assert!(!view.is_loading);
}

#[tokio::test]
async fn loading_same_query_twice_is_idempotent() {
    let backend = PackageBackend::with_rows(15);
    let (api, controller) = package_controller(&backend);

    controller.load(ListQuery::default()).await;
    let first = controller.page();
    controller.refetch().await;
    let second = controller.page();

    assert_eq!(first, second);
    assert_eq!(api.count("GET"), 2);
}

#[tokio::test]
async fn results_after_unmount_are_dropped() {
    let backend = PackageBackend::with_rows(3);
    let (_api, controller) = package_controller(&backend);

    let ticket = controller.begin_load(ListQuery::default());
    controller.unmount();
    let outcome = controller.complete(ticket).await;

    assert_eq!(outcome, LoadOutcome::Discarded);
    assert!(controller.page().rows.is_empty());
}

#[tokio::test]
async fn failed_fetch_clears_rows_and_shows_server_message() {
    let fail = Rc::new(Cell::new(false));
    let fail_flag = fail.clone();
    let api = FakeApi::new(move |_| {
        if fail_flag.get() {
            Err(ApiError::from_status(500, Some("Database is down.".to_string())))
        } else {
            Ok(json!({ "data": [{ "id": 1 }], "meta": { "total": 1 } }))
        }
    });
    let controller =
        ResourceListController::new(api, ResourceKind::Packages.endpoint(), PageSize::Ten);

    controller.load(ListQuery::default()).await;
    assert_eq!(controller.page().rows.len(), 1);

    fail.set(true);
    let outcome = controller.refetch().await;

    assert_eq!(outcome, LoadOutcome::Failed);
    let view = controller.snapshot();
    assert!(view.page.rows.is_empty());
    assert_eq!(view.page.total_count, 0);
    let notice = view.notice.expect("failure should leave a notice");
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Database is down.");
}

#[tokio::test]
async fn successful_reload_clears_fetch_error_but_keeps_success_notice() {
    let fail = Rc::new(Cell::new(true));
    let fail_flag = fail.clone();
    let api = FakeApi::new(move |_| {
        if fail_flag.get() {
            Err(ApiError::Transport("connection refused".to_string()))
        } else {
            Ok(json!({ "data": [{ "id": 1, "name": "Umrah Plus" }], "meta": { "total": 1 } }))
        }
    });
    let controller =
        ResourceListController::new(api, ResourceKind::Packages.endpoint(), PageSize::Ten);

    assert_eq!(controller.load(ListQuery::default()).await, LoadOutcome::Failed);
    assert!(controller.notice().is_some_and(|notice| notice.is_error()));

    fail.set(false);
    let outcome = controller.update(QueryChange::Search("a".to_string())).await;

    assert_eq!(outcome, LoadOutcome::Applied);
    let view = controller.snapshot();
    assert_eq!(view.page.rows.len(), 1);
    assert!(view.notice.is_none(), "stale error should be gone: {:?}", view.notice);

    controller.set_notice(Notice::success("Package created successfully."));
    controller.refetch().await;
    assert_eq!(
        controller.notice().map(|notice| notice.level),
        Some(NoticeLevel::Success),
        "a reload should not drop a success notice"
    );
}

#[tokio::test]
async fn update_applies_change_before_fetching() {
    let backend = PackageBackend::with_rows(25);
    let (api, controller) = package_controller(&backend);

    controller.load(ListQuery::default()).await;
    controller
        .update(QueryChange::NextPage { total_count: 25 })
        .await;

    assert_eq!(controller.query().page(), 2);
    let last = api.calls().pop().expect("should have fetched");
    assert_eq!(last.param("page"), Some("2"));
    assert_eq!(controller.page().rows[0].text("name"), "Package 11");
}

#[tokio::test]
async fn toggle_failure_rolls_back_to_server_value() {
    let backend = PackageBackend::with_rows(10);
    backend.fail_patches.set(true);
    let (api, controller) = package_controller(&backend);
    controller.load(ListQuery::default()).await;
    let key = RowKey::from(7);

    let result = controller.toggle(&key, "is_featured").await;

    assert!(result.is_err(), "toggle should surface the failure");
    let page = controller.page();
    let row = page.find("id", &key).expect("row 7 should still be listed");
    assert!(!row.flag("is_featured"), "row should show the pre-toggle value");
    let notice = controller.notice().expect("failure should leave a notice");
    assert_eq!(notice.message, "Could not update package.");

    let patch = api
        .calls()
        .into_iter()
        .find(|call| call.method == "PATCH")
        .expect("should have sent a PATCH");
    assert_eq!(patch.path, "packages/7");
    assert_eq!(patch.body, Some(json!({ "is_featured": true })));
    assert_eq!(api.count("GET"), 2, "failure should reload the page");
}

#[tokio::test]
async fn toggle_success_keeps_patch_without_refetch() {
    let backend = PackageBackend::with_rows(10);
    let (api, controller) = package_controller(&backend);
    controller.load(ListQuery::default()).await;
    let key = RowKey::from(3);

    controller
        .toggle(&key, "is_featured")
        .await
        .expect("toggle should succeed");

    let page = controller.page();
    assert!(page.find("id", &key).expect("row 3").flag("is_featured"));
    assert_eq!(api.count("GET"), 1);
}

#[tokio::test]
async fn deleting_sole_row_on_last_page_returns_to_first_page() {
    let backend = PackageBackend::with_rows(21);
    let (api, controller) = package_controller(&backend);
    let mut query = ListQuery::new(PageSize::Ten);
    query.set_page(3);
    controller.load(query).await;
    assert_eq!(controller.page().rows.len(), 1);

    let action = ConfirmableAction::new();
    assert!(action.request(controller.delete_action(RowKey::from(21), "Package 21", "Package")));
    let outcome = action.confirm(&controller).await;

    assert_eq!(outcome, Some(Ok(())));
    let view = controller.snapshot();
    assert_eq!(view.query.page(), 1);
    assert_eq!(view.page.total_count, 20);
    assert_eq!(view.page.rows.len(), 10);
    let notice = view.notice.expect("delete should leave a notice");
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Package deleted successfully.");
    assert!(api
        .calls()
        .iter()
        .any(|call| call.method == "DELETE" && call.path == "packages/21"));
}

#[tokio::test]
async fn status_change_patches_status_endpoint_and_refetches() {
    let api = FakeApi::new(|call| match call.method {
        "GET" => Ok(json!({ "data": [{ "id": 4, "status": "draft" }], "meta": { "total": 1 } })),
        _ => Ok(Value::Null),
    });
    let controller =
        ResourceListController::new(api.clone(), ResourceKind::Packages.endpoint(), PageSize::Ten);
    controller.load(ListQuery::default()).await;

    let action = ConfirmableAction::new();
    action.request(controller.status_action(RowKey::from(4), "Package 4", "published", "Publish"));
    action.confirm(&controller).await;

    let patch = api
        .calls()
        .into_iter()
        .find(|call| call.method == "PATCH")
        .expect("should have sent a PATCH");
    assert_eq!(patch.path, "packages/4/status");
    assert_eq!(patch.body, Some(json!({ "status": "published" })));
    assert_eq!(api.count("GET"), 2);
    assert_eq!(
        controller.notice().map(|notice| notice.message),
        Some("Status updated to published.".to_string())
    );
}

#[tokio::test]
async fn failed_delete_keeps_row_and_reports_error() {
    let api = FakeApi::new(|call| match call.method {
        "GET" => Ok(json!({ "data": [{ "id": 1 }, { "id": 2 }], "meta": { "total": 2 } })),
        _ => Err(ApiError::from_status(409, Some("Package has bookings.".to_string()))),
    });
    let controller =
        ResourceListController::new(api, ResourceKind::Packages.endpoint(), PageSize::Ten);
    controller.load(ListQuery::default()).await;

    let action = ConfirmableAction::new();
    action.request(controller.delete_action(RowKey::from(1), "Package 1", "Package"));
    let outcome = action.confirm(&controller).await;

    assert!(matches!(outcome, Some(Err(ApiError::Status { status: 409, .. }))));
    assert_eq!(controller.page().rows.len(), 2);
    assert_eq!(
        controller.notice().map(|notice| notice.message),
        Some("Package has bookings.".to_string())
    );
    assert_eq!(action.phase(), ActionPhase::Idle);
}

// -------------------------------------------------------- confirmable action

#[derive(Default)]
struct RecordingTarget {
    log: Rc<RefCell<Vec<String>>>,
    action: Option<Rc<ConfirmableAction>>,
    reports: RefCell<Vec<MutationReport>>,
}

#[async_trait(?Send)]
impl RefreshTarget for RecordingTarget {
    async fn after_mutation(&self, report: MutationReport) {
        let phase = self.action.as_ref().map(|action| action.phase());
        self.log.borrow_mut().push(format!("refresh {phase:?}"));
        self.reports.borrow_mut().push(report);
    }
}

fn logging_action(log: &Rc<RefCell<Vec<String>>>, name: &str) -> PendingAction {
    let log = log.clone();
    let entry = format!("execute {name}");
    PendingAction::new(
        ActionPrompt::new(name, format!("Run {name}?"), "Run"),
        MutationKind::Update(RowKey::from(name)),
        move || async move {
            log.borrow_mut().push(entry);
            Ok(())
        },
    )
}

#[tokio::test]
async fn later_request_replaces_pending_action() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let action = ConfirmableAction::new();
    let target = RecordingTarget {
        log: log.clone(),
        ..RecordingTarget::default()
    };

    assert!(action.request(logging_action(&log, "first")));
    assert!(action.request(logging_action(&log, "second")));
    assert_eq!(action.prompt().map(|prompt| prompt.title), Some("second".to_string()));

    action.confirm(&target).await;

    assert_eq!(log.borrow()[0], "execute second");
    assert!(!log.borrow().iter().any(|entry| entry == "execute first"));
}

#[tokio::test]
async fn cancel_returns_to_idle_without_executing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let action = ConfirmableAction::new();
    let target = RecordingTarget::default();

    action.request(logging_action(&log, "delete"));
    assert_eq!(action.phase(), ActionPhase::Pending);
    assert!(action.cancel());

    assert_eq!(action.phase(), ActionPhase::Idle);
    assert_eq!(action.prompt(), None);
    assert_eq!(action.confirm(&target).await, None);
    assert!(log.borrow().is_empty());
    assert!(target.reports.borrow().is_empty());
}

#[tokio::test]
async fn requests_are_refused_while_executing() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let action = ConfirmableAction::new();
    let target = RecordingTarget::default();
    let (release, gate) = oneshot::channel::<()>();

    action.request(PendingAction::new(
        ActionPrompt::new("Delete", "Delete it?", "Delete"),
        MutationKind::Delete(RowKey::from(1)),
        move || async move {
            let _ = gate.await;
            Ok(())
        },
    ));

    let (outcome, (accepted, phase, cancelled)) = tokio::join!(action.confirm(&target), async {
        let accepted = action.request(logging_action(&log, "intruder"));
        let phase = action.phase();
        let cancelled = action.cancel();
        let _ = release.send(());
        (accepted, phase, cancelled)
    });

    assert_eq!(outcome, Some(Ok(())));
    assert!(!accepted, "a second request should be refused");
    assert!(!cancelled, "an executing action cannot be cancelled");
    assert_eq!(phase, ActionPhase::Executing);
    assert!(log.borrow().is_empty());
    assert_eq!(action.phase(), ActionPhase::Idle);
}

#[tokio::test]
async fn operation_settles_before_refresh_runs() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let action = Rc::new(ConfirmableAction::new());
    let target = RecordingTarget {
        log: log.clone(),
        action: Some(action.clone()),
        ..RecordingTarget::default()
    };

    action.request(logging_action(&log, "save").with_success_message("Saved."));
    action.confirm(&target).await;

    assert_eq!(
        *log.borrow(),
        vec!["execute save".to_string(), "refresh Some(Idle)".to_string()]
    );
    let reports = target.reports.borrow();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].outcome, Ok(()));
    assert_eq!(reports[0].success_message.as_deref(), Some("Saved."));
}

// ------------------------------------------------------- navigation notices

#[test]
fn navigation_notice_is_consumed_once_across_remounts() {
    let channel = NoticeChannel::default();
    channel.push("Package created successfully.");

    let first_mount = NoticeLatch::default();
    let second_mount = NoticeLatch::default();

    let shown = first_mount.fire(&channel);
    assert_eq!(
        shown.map(|notice| notice.message),
        Some("Package created successfully.".to_string())
    );
    assert_eq!(first_mount.fire(&channel), None, "re-render should not show it again");
    assert_eq!(second_mount.fire(&channel), None, "second mount should find nothing");
    assert!(first_mount.has_fired());
    assert!(channel.is_empty());
}

#[test]
fn latch_fires_once_even_when_notice_arrives_later() {
    let channel = NoticeChannel::default();
    let latch = NoticeLatch::default();

    assert_eq!(latch.fire(&channel), None);
    channel.push("Hotel created successfully.");
    assert_eq!(latch.fire(&channel), None, "latch is spent after first fire");
    assert!(!channel.is_empty());

    channel.clear();
    assert!(channel.is_empty());
}

#[test]
fn channel_clones_share_one_slot() {
    let channel = NoticeChannel::default();
    let producer = channel.clone();
    producer.push("Tag created successfully.");

    assert!(channel == producer, "clones should share the slot");
    assert_eq!(
        channel.take().map(|notice| notice.message),
        Some("Tag created successfully.".to_string())
    );
    assert!(producer.is_empty());
}

// -------------------------------------------------------------- create form

#[tokio::test]
async fn create_form_posts_trimmed_non_blank_fields() {
    let api = FakeApi::new(|_| Ok(json!({ "data": { "id": 9 } })));
    let mut draft = CreateDraft::default();
    draft.set("name", "  Ramadan Umrah ".to_string());
    draft.set("type", String::new());
    draft.set("price", "1500".to_string());

    let message = draft
        .submit(&*api, ResourceKind::Packages)
        .await
        .expect("create should succeed");

    assert_eq!(message, "Package created successfully.");
    let call = api.calls().pop().expect("should have posted");
    assert_eq!(call.method, "POST");
    assert_eq!(call.path, "packages");
    assert_eq!(
        call.body,
        Some(json!({ "name": "Ramadan Umrah", "price": "1500" }))
    );
}

#[tokio::test]
async fn create_form_rejects_empty_draft_without_request() {
    let api = FakeApi::new(|_| Ok(Value::Null));
    let draft = CreateDraft::default();

    let err = draft
        .submit(&*api, ResourceKind::Hotels)
        .await
        .expect_err("empty draft should fail");

    assert_eq!(err, CreateError::Empty);
    assert!(api.calls().is_empty());
}

#[test]
fn create_form_offers_only_editable_columns() {
    let keys: Vec<&str> = CreateDraft::fields(ResourceKind::Packages)
        .map(|column| column.key)
        .collect();
    assert_eq!(keys, vec!["name", "type", "price", "departure_date"]);
}

#[tokio::test]
async fn created_record_notice_reaches_next_list_mount_once() {
    let api = FakeApi::new(|_| Ok(Value::Null));
    let channel = NoticeChannel::default();
    let mut draft = CreateDraft::default();
    draft.set("name", "Makkah Tower".to_string());

    let message = draft
        .submit(&*api, ResourceKind::Hotels)
        .await
        .expect("create should succeed");
    channel.push(message);

    let controller =
        ResourceListController::new(api.clone(), ResourceKind::Hotels.endpoint(), PageSize::Ten);
    let latch = NoticeLatch::default();
    if let Some(notice) = latch.fire(&channel) {
        controller.set_notice(notice.into());
    }
    let again = NoticeLatch::default();

    let notice = controller.notice().expect("list should show the notice");
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Hotel created successfully.");
    assert_eq!(again.fire(&channel), None);
}

// -------------------------------------------------------------- auth session

fn user_json(role: &str) -> Value {
    json!({ "id": 5, "name": "Aminah", "email": "aminah@example.com", "role": role })
}

#[tokio::test]
async fn login_stores_token_for_backoffice_roles() {
    let api = FakeApi::new(|_| Ok(json!({ "data": { "token": "tok-1", "user": user_json("travel_agent") } })));
    let tokens = Rc::new(MemoryTokenStore::default());
    let session = AuthSession::new(api.clone(), tokens.clone());

    let user = session
        .login(" aminah@example.com ", "secret")
        .await
        .expect("login should succeed");

    assert_eq!(user.role, Role::TravelAgent);
    assert_eq!(tokens.load().as_deref(), Some("tok-1"));
    assert!(session.is_authenticated());
    assert_eq!(session.role(), Some(Role::TravelAgent));
    let call = api.calls().pop().expect("should have posted");
    assert_eq!(call.path, "auth/login");
    assert_eq!(
        call.body,
        Some(json!({ "email": "aminah@example.com", "password": "secret" }))
    );
}

#[tokio::test]
async fn login_refuses_accounts_without_backoffice_access() {
    let api = FakeApi::new(|_| Ok(json!({ "token": "tok-2", "user": user_json("user") })));
    let tokens = Rc::new(MemoryTokenStore::default());
    let session = AuthSession::new(api, tokens.clone());

    let err = session
        .login("aminah@example.com", "secret")
        .await
        .expect_err("plain users should be refused");

    assert!(matches!(err, LoginError::NoAccess));
    assert_eq!(err.user_message(), NO_ACCESS_MESSAGE);
    assert_eq!(tokens.load(), None);
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn login_failure_shows_server_message() {
    let api = FakeApi::new(|_| {
        Err(ApiError::from_status(
            401,
            Some("These credentials do not match our records.".to_string()),
        ))
    });
    let session = AuthSession::new(api, Rc::new(MemoryTokenStore::default()));

    let err = session
        .login("aminah@example.com", "wrong")
        .await
        .expect_err("login should fail");

    assert_eq!(
        err.user_message(),
        "These credentials do not match our records."
    );
}

#[tokio::test]
async fn init_without_token_makes_no_request() {
    let api = FakeApi::new(|_| Ok(user_json("admin")));
    let session = AuthSession::new(api.clone(), Rc::new(MemoryTokenStore::default()));

    assert_eq!(session.init().await, None);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn init_restores_user_and_rejected_token_is_forgotten() {
    let api = FakeApi::new(|_| Ok(json!({ "data": user_json("admin") })));
    let tokens = Rc::new(MemoryTokenStore::with_token("tok-3"));
    let session = AuthSession::new(api.clone(), tokens.clone());

    let user = session.init().await.expect("session should restore");
    assert!(user.is_admin());
    assert_eq!(api.calls()[0].path, "auth/me");

    let expired = FakeApi::new(|_| Err(ApiError::from_status(401, None)));
    let tokens = Rc::new(MemoryTokenStore::with_token("tok-4"));
    let session = AuthSession::new(expired, tokens.clone());

    assert_eq!(session.init().await, None);
    assert_eq!(tokens.load(), None, "rejected token should be cleared");
}

#[tokio::test]
async fn logout_clears_local_session_even_when_server_fails() {
    let api = FakeApi::new(|call| match call.path.as_str() {
        "auth/login" => Ok(json!({ "token": "tok-5", "user": user_json("admin") })),
        _ => Err(ApiError::Transport("connection reset".to_string())),
    });
    let tokens = Rc::new(MemoryTokenStore::default());
    let session = AuthSession::new(api.clone(), tokens.clone());
    session
        .login("aminah@example.com", "secret")
        .await
        .expect("login should succeed");

    session.logout().await;

    assert!(!session.is_authenticated());
    assert_eq!(tokens.load(), None);
    assert!(api.calls().iter().any(|call| call.path == "auth/logout"));
}

#[test]
fn role_home_and_visibility() {
    assert_eq!(Route::home_for(Role::Admin), Route::List(ResourceKind::Packages));
    assert_eq!(
        Route::home_for(Role::TravelAgent),
        Route::List(ResourceKind::Packages)
    );
    assert_eq!(Route::home_for(Role::User), Route::Login);
    assert!(ResourceKind::Orders.visible_to(Role::TravelAgent));
    assert!(!ResourceKind::Users.visible_to(Role::TravelAgent));
    assert!(!ResourceKind::Orders.can_create());
}

// ----------------------------------------------------------- package detail

fn package_detail_body() -> Value {
    json!({
        "data": {
            "id": 3,
            "name": "Ramadan Umrah",
            "images": [{ "id": 1, "url": "a.jpg" }],
            "flights": [{ "id": 1, "flight_number": "SV 123" }],
            "hotels": [{ "id": 1, "name": "Makkah Tower" }, { "id": 2, "name": "Madinah Inn" }]
        }
    })
}

#[test]
fn aggregate_parses_nested_collections_and_defaults_missing_ones() {
    let aggregate =
        PackageAggregate::from_value(package_detail_body()).expect("body should parse");

    assert_eq!(aggregate.package.text("name"), "Ramadan Umrah");
    assert!(aggregate.package.get("hotels").is_none(), "nested arrays move out of the row");
    assert_eq!(aggregate.collection(NestedCollection::Hotels).len(), 2);
    assert_eq!(aggregate.collection(NestedCollection::Flights).len(), 1);
    assert!(aggregate.collection(NestedCollection::Itinerary).is_empty());

    let bare = PackageAggregate::from_value(json!({ "id": 4 })).expect("bare object should parse");
    assert!(bare.images.is_empty());
    assert_eq!(PackageAggregate::from_value(json!([1, 2])), None);
}

#[tokio::test]
async fn detail_tabs_and_expansion_are_tracked_per_collection() {
    let api = FakeApi::new(|_| Ok(package_detail_body()));
    let controller = PackageDetailController::new(api, RowKey::from(3));

    assert_eq!(controller.load().await, LoadOutcome::Applied);
    controller.select_tab(DetailTab::Nested(NestedCollection::Hotels));
    controller.toggle_expanded(NestedCollection::Hotels, RowKey::from(1));

    let view = controller.snapshot();
    assert_eq!(view.view.active_tab, DetailTab::Nested(NestedCollection::Hotels));
    assert!(view.view.is_expanded(NestedCollection::Hotels, &RowKey::from(1)));
    assert!(
        !view.view.is_expanded(NestedCollection::Flights, &RowKey::from(1)),
        "same id in another collection is independent"
    );

    controller.toggle_expanded(NestedCollection::Hotels, RowKey::from(1));
    assert!(!controller
        .snapshot()
        .view
        .is_expanded(NestedCollection::Hotels, &RowKey::from(1)));
}

#[tokio::test]
async fn nested_delete_reloads_the_aggregate() {
    let deleted = Rc::new(Cell::new(false));
    let deleted_flag = deleted.clone();
    let api = FakeApi::new(move |call| match call.method {
        "DELETE" => {
            deleted_flag.set(true);
            Ok(Value::Null)
        }
        _ if deleted_flag.get() => Ok(json!({
            "data": { "id": 3, "name": "Ramadan Umrah", "hotels": [{ "id": 2, "name": "Madinah Inn" }] }
        })),
        _ => Ok(package_detail_body()),
    });
    let controller = PackageDetailController::new(api.clone(), RowKey::from(3));
    controller.load().await;

    let action = ConfirmableAction::new();
    action.request(controller.delete_nested_action(
        NestedCollection::Hotels,
        RowKey::from(1),
        "Makkah Tower",
    ));
    action.confirm(&controller).await;

    assert!(deleted.get());
    let delete = api
        .calls()
        .into_iter()
        .find(|call| call.method == "DELETE")
        .expect("should have sent a DELETE");
    assert_eq!(delete.path, "packages/3/hotels/1");
    let view = controller.snapshot();
    let aggregate = view.aggregate.expect("aggregate should reload");
    assert_eq!(aggregate.collection(NestedCollection::Hotels).len(), 1);
    assert_eq!(
        view.notice.map(|notice| notice.message),
        Some("Removed from hotels.".to_string())
    );
}

#[tokio::test]
async fn detail_reload_after_failure_clears_error_notice() {
    let fail = Rc::new(Cell::new(true));
    let fail_flag = fail.clone();
    let api = FakeApi::new(move |_| {
        if fail_flag.get() {
            Err(ApiError::from_status(500, None))
        } else {
            Ok(package_detail_body())
        }
    });
    let controller = PackageDetailController::new(api, RowKey::from(3));

    assert_eq!(controller.load().await, LoadOutcome::Failed);
    assert!(controller.snapshot().notice.is_some());

    fail.set(false);
    assert_eq!(controller.load().await, LoadOutcome::Applied);

    let view = controller.snapshot();
    assert!(view.aggregate.is_some());
    assert!(view.notice.is_none());
}

// ------------------------------------------------------------------- errors

#[test]
fn api_error_user_messages_fall_back_to_fixed_text() {
    assert!(matches!(
        ApiError::from_status(403, None),
        ApiError::Unauthorized { message: None }
    ));
    assert_eq!(
        ApiError::from_status(500, Some("   ".to_string())).user_message(),
        GENERIC_ERROR_MESSAGE
    );
    assert_eq!(
        ApiError::from_status(422, Some("Name is required.".to_string())).user_message(),
        "Name is required."
    );
    assert_eq!(
        ApiError::Transport("refused".to_string()).user_message(),
        TRANSPORT_ERROR_MESSAGE
    );
    assert_eq!(
        ApiError::Decode("bad json".to_string()).user_message(),
        GENERIC_ERROR_MESSAGE
    );
}

#[test]
fn row_accessors_tolerate_mixed_backend_types() {
    let row = row(json!({
        "id": 12,
        "slug": "travel-tips",
        "is_featured": "1",
        "is_active": 0,
        "price": "99.5",
        "note": null
    }));

    assert_eq!(row.key("id"), Some(RowKey::from(12)));
    assert_eq!(row.key("slug"), Some(RowKey::from("travel-tips")));
    assert!(row.flag("is_featured"));
    assert!(!row.flag("is_active"));
    assert_eq!(row.number("price"), 99.5);
    assert_eq!(row.text("note"), "");
    assert_eq!(row.key("note"), None);
}

// ------------------------------------------------------------------- http

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        timeout_secs: 5,
    }
}

#[tokio::test]
async fn http_client_sends_bearer_token_and_query() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/packages")
                .query_param("search", "umrah")
                .query_param("page", "1")
                .header("authorization", "Bearer tok-9")
                .header("accept", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "data": [{ "id": 1 }], "meta": { "total": 1 } }));
        })
        .await;

    let client = HttpApiClient::new(
        &api_config(server.url("/api")),
        Rc::new(MemoryTokenStore::with_token("tok-9")),
    )
    .expect("should build client");
    let params = vec![
        ("search".to_string(), "umrah".to_string()),
        ("page".to_string(), "1".to_string()),
    ];

    let body = client
        .get("packages", &params)
        .await
        .expect("request should succeed");

    assert_eq!(body["meta"]["total"], json!(1));
    mock.assert_async().await;
}

#[tokio::test]
async fn http_client_posts_json_and_maps_error_message() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/hotels")
                .json_body(json!({ "name": "" }));
            then.status(422)
                .header("content-type", "application/json")
                .json_body(json!({ "message": "The name field is required." }));
        })
        .await;

    let client = HttpApiClient::new(
        &api_config(format!("{}/", server.url("/api"))),
        Rc::new(MemoryTokenStore::default()),
    )
    .expect("should build client");

    let err = client
        .send(Mutation::Post, "hotels", Some(json!({ "name": "" })))
        .await
        .expect_err("422 should be an error");

    assert_eq!(
        err,
        ApiError::Status {
            status: 422,
            message: Some("The name field is required.".to_string())
        }
    );
    assert_eq!(err.user_message(), "The name field is required.");
    mock.assert_async().await;
}

#[tokio::test]
async fn http_client_treats_empty_success_body_as_null() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/api/packages/7");
            then.status(204);
        })
        .await;

    let client = HttpApiClient::new(
        &api_config(server.url("/api")),
        Rc::new(MemoryTokenStore::default()),
    )
    .expect("should build client");

    let body = client
        .send(Mutation::Delete, "packages/7", None)
        .await
        .expect("delete should succeed");

    assert_eq!(body, Value::Null);
    mock.assert_async().await;
}

#[tokio::test]
async fn http_client_maps_401_to_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/auth/me");
            then.status(401).body("not json");
        })
        .await;

    let client = HttpApiClient::new(
        &api_config(server.url("/api")),
        Rc::new(MemoryTokenStore::with_token("stale")),
    )
    .expect("should build client");

    let err = client
        .get("auth/me", &[])
        .await
        .expect_err("401 should be an error");

    assert_eq!(err, ApiError::Unauthorized { message: None });
}

#[tokio::test]
async fn http_client_reports_unreachable_server_as_transport_error() {
    let client = HttpApiClient::new(
        &api_config("http://127.0.0.1:1/api".to_string()),
        Rc::new(MemoryTokenStore::default()),
    )
    .expect("should build client");

    let err = client
        .get("packages", &[])
        .await
        .expect_err("connection should be refused");

    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
    assert_eq!(err.user_message(), TRANSPORT_ERROR_MESSAGE);
}

// ---------------------------------------------------------------- storage

#[test]
fn file_token_store_round_trips_and_clears() {
    let temp_dir = unique_test_dir("session");
    let store = FileTokenStore::new(temp_dir.join("nested").join("session.json"));

    assert_eq!(store.load(), None);
    store.save("tok-file").expect("should save token");
    assert_eq!(store.load().as_deref(), Some("tok-file"));
    assert!(store.path().exists());

    store.clear().expect("should clear token");
    assert_eq!(store.load(), None);
    store.clear().expect("clearing twice should be fine");

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

#[test]
fn file_token_store_ignores_corrupt_file() {
    let temp_dir = unique_test_dir("session-corrupt");
    fs::create_dir_all(&temp_dir).expect("should create temp dir");
    let path = temp_dir.join("session.json");
    fs::write(&path, "{ not json").expect("should write fixture");

    assert_eq!(FileTokenStore::new(path).load(), None);

    fs::remove_dir_all(&temp_dir).expect("should cleanup temp dir");
}

// ----------------------------------------------------------------- config

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default();
    assert_eq!(config.api.base_url, "http://localhost:8000/api");
    assert_eq!(config.api.timeout_secs, 30);
    assert_eq!(config.list.page_size(), PageSize::Ten);
    assert_eq!(config.logging.tracing_level(), tracing::Level::INFO);
}

#[test]
fn config_layers_file_then_environment() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [api]
                base_url = "https://admin.example.com/api/"
                timeout_secs = 10

                [list]
                default_page_size = 25
            "#,
        )?;
        jail.set_env("UMRAH_ADMIN_API__TIMEOUT_SECS", "5");
        jail.set_env("UMRAH_ADMIN_LOGGING__LEVEL", "DEBUG");

        let config = AppConfig::from_figment(figment(Some(Path::new("config.toml"))));

        assert_eq!(config.api.base_url, "https://admin.example.com/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert_eq!(config.list.page_size(), PageSize::TwentyFive);
        assert_eq!(config.logging.level, "debug");
        Ok(())
    });
}

#[test]
fn invalid_config_values_fall_back_to_defaults() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                [list]
                default_page_size = 7

                [logging]
                level = "chatty"
            "#,
        )?;

        let config = AppConfig::from_figment(figment(Some(Path::new("config.toml"))));

        assert_eq!(config.list.default_page_size, 10);
        assert_eq!(config.logging.level, "info");
        Ok(())
    });
}

#[test]
fn missing_config_file_uses_defaults() {
    figment::Jail::expect_with(|_jail| {
        let config = AppConfig::from_figment(figment(Some(Path::new("absent.toml"))));
        assert_eq!(config, AppConfig::default());
        Ok(())
    });
}
