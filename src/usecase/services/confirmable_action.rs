use std::cell::RefCell;
use std::future::Future;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::domain::entities::resource::RowKey;
use crate::usecase::ports::api::ApiError;

pub type ActionFuture = LocalBoxFuture<'static, Result<(), ApiError>>;
pub type ActionFn = Box<dyn FnOnce() -> ActionFuture>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPrompt {
    pub title: String,
    pub message: String,
    pub confirm_text: String,
}

impl ActionPrompt {
    pub fn new(
        title: impl Into<String>,
        message: impl Into<String>,
        confirm_text: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_text: confirm_text.into(),
        }
    }
}

/// What the follow-up refresh needs to know about a settled mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind {
    Delete(RowKey),
    Update(RowKey),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub kind: MutationKind,
    pub outcome: Result<(), ApiError>,
    pub success_message: Option<String>,
}

/// Whatever owns the data a confirmed mutation touched.
#[async_trait(?Send)]
pub trait RefreshTarget {
    async fn after_mutation(&self, report: MutationReport);
}

pub struct PendingAction {
    pub prompt: ActionPrompt,
    pub kind: MutationKind,
    pub success_message: Option<String>,
    execute: ActionFn,
}

impl std::fmt::Debug for PendingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingAction")
            .field("prompt", &self.prompt)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PendingAction {
    pub fn new<F, Fut>(prompt: ActionPrompt, kind: MutationKind, execute: F) -> Self
    where
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<(), ApiError>> + 'static,
    {
        Self {
            prompt,
            kind,
            success_message: None,
            execute: Box::new(move || -> ActionFuture { Box::pin(execute()) }),
        }
    }

    pub fn with_success_message(mut self, message: impl Into<String>) -> Self {
        self.success_message = Some(message.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Idle,
    Pending,
    Executing,
}

enum Phase {
    Idle,
    Pending(PendingAction),
    Executing(ActionPrompt),
}

/// Confirm-then-execute guard for one screen. At most one action is live.
pub struct ConfirmableAction {
    phase: RefCell<Phase>,
}

impl Default for ConfirmableAction {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfirmableAction {
    pub fn new() -> Self {
        Self {
            phase: RefCell::new(Phase::Idle),
        }
    }

    pub fn phase(&self) -> ActionPhase {
        match &*self.phase.borrow() {
            Phase::Idle => ActionPhase::Idle,
            Phase::Pending(_) => ActionPhase::Pending,
            Phase::Executing(_) => ActionPhase::Executing,
        }
    }

    pub fn is_busy(&self) -> bool {
        self.phase() == ActionPhase::Executing
    }

    pub fn prompt(&self) -> Option<ActionPrompt> {
        match &*self.phase.borrow() {
            Phase::Idle => None,
            Phase::Pending(pending) => Some(pending.prompt.clone()),
            Phase::Executing(prompt) => Some(prompt.clone()),
        }
    }

    /// Replaces any pending action wholesale. Refused while one is executing.
    pub fn request(&self, action: PendingAction) -> bool {
        let mut phase = self.phase.borrow_mut();
        if matches!(*phase, Phase::Executing(_)) {
            debug!(title = %action.prompt.title, "action requested while another is executing; ignored");
            return false;
        }
        *phase = Phase::Pending(action);
        true
    }

    pub fn cancel(&self) -> bool {
        let mut phase = self.phase.borrow_mut();
        if matches!(*phase, Phase::Pending(_)) {
            *phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// Runs the pending operation to completion, then hands the result to `target`.
    ///
    /// Returns `None` when nothing was pending.
    pub async fn confirm(&self, target: &dyn RefreshTarget) -> Option<Result<(), ApiError>> {
        let pending = {
            let mut phase = self.phase.borrow_mut();
            match std::mem::replace(&mut *phase, Phase::Idle) {
                Phase::Pending(pending) => {
                    *phase = Phase::Executing(pending.prompt.clone());
                    pending
                }
                other => {
                    *phase = other;
                    return None;
                }
            }
        };

        let PendingAction {
            prompt,
            kind,
            success_message,
            execute,
        } = pending;

        let outcome = execute().await;
        match &outcome {
            Ok(()) => debug!(title = %prompt.title, "confirmed action succeeded"),
            Err(err) => warn!(title = %prompt.title, error = %err, "confirmed action failed"),
        }

        *self.phase.borrow_mut() = Phase::Idle;

        target
            .after_mutation(MutationReport {
                kind,
                outcome: outcome.clone(),
                success_message,
            })
            .await;

        Some(outcome)
    }
}
