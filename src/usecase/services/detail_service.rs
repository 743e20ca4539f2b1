use std::cell::{Cell, RefCell};
use std::rc::Rc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::entities::aggregate::{
    DetailTab, DetailViewState, NestedCollection, PackageAggregate,
};
use crate::domain::entities::notice::Notice;
use crate::domain::entities::resource::RowKey;
use crate::usecase::ports::api::{ApiError, Mutation, ResourceApi};
use crate::usecase::services::confirmable_action::{
    ActionPrompt, MutationKind, MutationReport, PendingAction, RefreshTarget,
};
use crate::usecase::services::list_controller::LoadOutcome;

const PACKAGES_PATH: &str = "packages";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DetailView {
    pub aggregate: Option<PackageAggregate>,
    pub view: DetailViewState,
    pub is_loading: bool,
    pub notice: Option<Notice>,
}

/// Read-only package page with its nested collections.
///
/// Nested deletes reload the whole aggregate rather than patching it.
pub struct PackageDetailController {
    api: Rc<dyn ResourceApi>,
    package_id: RowKey,
    state: RefCell<DetailView>,
    latest_seq: Cell<u64>,
    mounted: Cell<bool>,
}

impl PackageDetailController {
    pub fn new(api: Rc<dyn ResourceApi>, package_id: RowKey) -> Self {
        Self {
            api,
            package_id,
            state: RefCell::new(DetailView::default()),
            latest_seq: Cell::new(0),
            mounted: Cell::new(true),
        }
    }

    pub fn snapshot(&self) -> DetailView {
        self.state.borrow().clone()
    }

    pub fn unmount(&self) {
        self.mounted.set(false);
    }

    pub fn select_tab(&self, tab: DetailTab) {
        self.state.borrow_mut().view.select_tab(tab);
    }

    pub fn toggle_expanded(&self, collection: NestedCollection, key: RowKey) {
        self.state.borrow_mut().view.toggle_expanded(collection, key);
    }

    pub fn dismiss_notice(&self) {
        self.state.borrow_mut().notice = None;
    }

    fn path(&self) -> String {
        format!("{PACKAGES_PATH}/{}", self.package_id)
    }

    pub async fn load(&self) -> LoadOutcome {
        let seq = self.latest_seq.get() + 1;
        self.latest_seq.set(seq);
        self.state.borrow_mut().is_loading = true;

        let path = self.path();
        let result = match self.api.get(&path, &[]).await {
            Ok(body) => PackageAggregate::from_value(body)
                .ok_or_else(|| ApiError::Decode("package body is not an object".to_string())),
            Err(err) => Err(err),
        };

        if !self.mounted.get() || seq != self.latest_seq.get() {
            debug!(path = %path, seq, "stale detail response discarded");
            return LoadOutcome::Discarded;
        }

        let mut state = self.state.borrow_mut();
        state.is_loading = false;
        match result {
            Ok(aggregate) => {
                state.aggregate = Some(aggregate);
                if state.notice.as_ref().is_some_and(Notice::is_error) {
                    state.notice = None;
                }
                LoadOutcome::Applied
            }
            Err(err) => {
                warn!(path = %path, error = %err, "package detail fetch failed");
                state.aggregate = None;
                state.notice = Some(Notice::error(err.user_message()));
                LoadOutcome::Failed
            }
        }
    }

    pub fn delete_nested_action(
        &self,
        collection: NestedCollection,
        item: RowKey,
        label: &str,
    ) -> PendingAction {
        let api = self.api.clone();
        let path = format!("{}/{}/{}", self.path(), collection.field(), item);
        PendingAction::new(
            ActionPrompt::new(
                format!("Remove from {}", collection.label().to_lowercase()),
                format!("Remove \"{label}\" from this package?"),
                "Remove",
            ),
            MutationKind::Delete(item),
            move || async move { api.send(Mutation::Delete, &path, None).await.map(|_| ()) },
        )
        .with_success_message(format!("Removed from {}.", collection.label().to_lowercase()))
    }
}

#[async_trait(?Send)]
impl RefreshTarget for PackageDetailController {
    async fn after_mutation(&self, report: MutationReport) {
        self.load().await;
        let notice = match report.outcome {
            Ok(()) => report.success_message.map(Notice::success),
            Err(err) => Some(Notice::error(err.user_message())),
        };
        if let Some(notice) = notice {
            self.state.borrow_mut().notice = Some(notice);
        }
    }
}
