use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::domain::entities::catalog::ListEndpoint;
use crate::domain::entities::list_query::{ListQuery, PageSize, QueryChange};
use crate::domain::entities::notice::Notice;
use crate::domain::entities::resource::{ResourcePage, RowKey};
use crate::usecase::ports::api::{ApiError, Mutation, ResourceApi};
use crate::usecase::services::confirmable_action::{
    ActionPrompt, MutationKind, MutationReport, PendingAction, RefreshTarget,
};
use crate::usecase::services::list_request::{build_params, interpret, parse_envelope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    Failed,
    /// A newer request was issued, or the screen went away, before this one settled.
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    seq: u64,
    query: ListQuery,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListView {
    pub query: ListQuery,
    pub page: ResourcePage,
    pub page_count: u32,
    pub is_loading: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Default)]
struct ListState {
    query: ListQuery,
    page: ResourcePage,
    is_loading: bool,
    notice: Option<Notice>,
}

pub struct ResourceListController {
    api: Rc<dyn ResourceApi>,
    endpoint: ListEndpoint,
    state: RefCell<ListState>,
    latest_seq: Cell<u64>,
    mounted: Cell<bool>,
}

impl ResourceListController {
    pub fn new(api: Rc<dyn ResourceApi>, endpoint: ListEndpoint, page_size: PageSize) -> Self {
        Self {
            api,
            endpoint,
            state: RefCell::new(ListState {
                query: ListQuery::new(page_size),
                ..ListState::default()
            }),
            latest_seq: Cell::new(0),
            mounted: Cell::new(true),
        }
    }

    pub fn query(&self) -> ListQuery {
        self.state.borrow().query.clone()
    }

    pub fn page(&self) -> ResourcePage {
        self.state.borrow().page.clone()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.state.borrow().notice.clone()
    }

    pub fn set_notice(&self, notice: Notice) {
        self.state.borrow_mut().notice = Some(notice);
    }

    pub fn dismiss_notice(&self) {
        self.state.borrow_mut().notice = None;
    }

    pub fn snapshot(&self) -> ListView {
        let state = self.state.borrow();
        ListView {
            query: state.query.clone(),
            page: state.page.clone(),
            page_count: state.query.page_count(state.page.total_count),
            is_loading: state.is_loading,
            notice: state.notice.clone(),
        }
    }

    /// Results that settle after this are dropped.
    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    /// Records `query` as current and tags the request that will serve it.
    pub fn begin_load(&self, query: ListQuery) -> LoadTicket {
        let seq = self.latest_seq.get() + 1;
        self.latest_seq.set(seq);

        let mut state = self.state.borrow_mut();
        state.query = query.clone();
        state.is_loading = true;
        LoadTicket { seq, query }
    }

    pub fn begin_update(&self, change: QueryChange) -> LoadTicket {
        let mut query = self.query();
        query.apply(change);
        self.begin_load(query)
    }

    pub async fn complete(&self, ticket: LoadTicket) -> LoadOutcome {
        let result = self.fetch_page(&ticket.query).await;
        self.settle(&ticket, result)
    }

    pub async fn load(&self, query: ListQuery) -> LoadOutcome {
        let ticket = self.begin_load(query);
        self.complete(ticket).await
    }

    pub async fn update(&self, change: QueryChange) -> LoadOutcome {
        let ticket = self.begin_update(change);
        self.complete(ticket).await
    }

    pub async fn refetch(&self) -> LoadOutcome {
        self.load(self.query()).await
    }

    async fn fetch_page(&self, query: &ListQuery) -> Result<ResourcePage, ApiError> {
        let params = build_params(&self.endpoint, query);
        debug!(path = self.endpoint.path, ?params, "fetching list");
        let body = self.api.get(self.endpoint.path, &params).await?;
        let envelope = parse_envelope(&body)?;
        Ok(interpret(&self.endpoint, query, envelope))
    }

    /// Applies a settled fetch unless a newer request has been issued since.
    pub fn settle(&self, ticket: &LoadTicket, result: Result<ResourcePage, ApiError>) -> LoadOutcome {
        if !self.mounted.get() {
            debug!(path = self.endpoint.path, "screen unmounted; dropping response");
            return LoadOutcome::Discarded;
        }
        if ticket.seq != self.latest_seq.get() {
            debug!(
                path = self.endpoint.path,
                seq = ticket.seq,
                latest = self.latest_seq.get(),
                "stale response discarded"
            );
            return LoadOutcome::Discarded;
        }

        let mut state = self.state.borrow_mut();
        state.is_loading = false;
        match result {
            Ok(page) => {
                state.page = page;
                if state.notice.as_ref().is_some_and(Notice::is_error) {
                    state.notice = None;
                }
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(path = self.endpoint.path, error = %err, "list fetch failed");
                state.page = ResourcePage::empty();
                state.notice = Some(Notice::error(err.user_message()));
                LoadOutcome::Failed
            }
        }
    }

    /// Overwrites fields on the visible row without a round trip.
    pub fn patch_row(&self, key: &RowKey, partial: &Map<String, Value>) -> bool {
        let key_field = self.endpoint.key_field;
        let mut state = self.state.borrow_mut();
        match state
            .page
            .rows
            .iter_mut()
            .find(|row| row.key(key_field).as_ref() == Some(key))
        {
            Some(row) => {
                row.patch(partial);
                true
            }
            None => false,
        }
    }

    pub fn remove_row(&self, key: &RowKey) -> bool {
        let key_field = self.endpoint.key_field;
        let mut state = self.state.borrow_mut();
        let before = state.page.rows.len();
        state
            .page
            .rows
            .retain(|row| row.key(key_field).as_ref() != Some(key));
        let removed = state.page.rows.len() < before;
        if removed {
            state.page.total_count = state.page.total_count.saturating_sub(1);
        }
        removed
    }

    /// Flips a boolean column optimistically; a failed PATCH reloads the page.
    pub async fn toggle(&self, key: &RowKey, field: &str) -> Result<(), ApiError> {
        let current = {
            let state = self.state.borrow();
            match state.page.find(self.endpoint.key_field, key) {
                Some(row) => row.flag(field),
                None => {
                    return Err(ApiError::Build(format!("row {key} is not on this page")));
                }
            }
        };

        let mut partial = Map::new();
        partial.insert(field.to_string(), Value::Bool(!current));
        self.patch_row(key, &partial);

        let path = self.endpoint.item_path(key);
        match self
            .api
            .send(Mutation::Patch, &path, Some(Value::Object(partial)))
            .await
        {
            Ok(_) => {
                info!(path = %path, field, value = !current, "toggle saved");
                Ok(())
            }
            Err(err) => {
                warn!(path = %path, field, error = %err, "toggle failed; reloading");
                self.refetch().await;
                self.set_notice(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    pub fn delete_action(&self, key: RowKey, label: &str, noun: &str) -> PendingAction {
        let api = self.api.clone();
        let path = self.endpoint.item_path(&key);
        PendingAction::new(
            ActionPrompt::new(
                format!("Delete {noun}"),
                format!("Are you sure you want to delete \"{label}\"? This cannot be undone."),
                "Delete",
            ),
            MutationKind::Delete(key),
            move || async move { api.send(Mutation::Delete, &path, None).await.map(|_| ()) },
        )
        .with_success_message(format!("{noun} deleted successfully."))
    }

    pub fn status_action(
        &self,
        key: RowKey,
        label: &str,
        status: &str,
        verb: &str,
    ) -> PendingAction {
        let api = self.api.clone();
        let path = format!("{}/status", self.endpoint.item_path(&key));
        let body = serde_json::json!({ "status": status });
        PendingAction::new(
            ActionPrompt::new(
                verb.to_string(),
                format!("Change the status of \"{label}\" to {status}?"),
                verb.to_string(),
            ),
            MutationKind::Update(key),
            move || async move {
                api.send(Mutation::Patch, &path, Some(body))
                    .await
                    .map(|_| ())
            },
        )
        .with_success_message(format!("Status updated to {status}."))
    }
}

#[async_trait(?Send)]
impl RefreshTarget for ResourceListController {
    async fn after_mutation(&self, report: MutationReport) {
        if let (Ok(()), MutationKind::Delete(key)) = (&report.outcome, &report.kind) {
            self.remove_row(key);
            let emptied = self.state.borrow().page.rows.is_empty();
            let mut query = self.query();
            if emptied && query.page() > 1 {
                query.set_page(1);
            }
            let outcome = self.load(query).await;

            let (rows_empty, total) = {
                let state = self.state.borrow();
                (state.page.rows.is_empty(), state.page.total_count)
            };
            if outcome == LoadOutcome::Applied && rows_empty && total > 0 && self.query().page() > 1 {
                let mut query = self.query();
                query.set_page(1);
                self.load(query).await;
            }
        } else {
            self.refetch().await;
        }

        match report.outcome {
            Ok(()) => {
                if let Some(message) = report.success_message {
                    self.set_notice(Notice::success(message));
                }
            }
            Err(err) => self.set_notice(Notice::error(err.user_message())),
        }
    }
}
