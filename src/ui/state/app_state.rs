use std::rc::Rc;

use dioxus::prelude::*;

use crate::domain::entities::catalog::ResourceKind;
use crate::domain::entities::list_query::PageSize;
use crate::domain::entities::resource::RowKey;
use crate::domain::entities::user::{AuthenticatedUser, Role};
use crate::usecase::ports::api::ResourceApi;
use crate::usecase::services::auth_session::AuthSession;
use crate::usecase::services::confirmable_action::ActionPrompt;
use crate::usecase::services::detail_service::DetailView;
use crate::usecase::services::list_controller::ListView;
use crate::usecase::services::navigation_notice::NoticeChannel;

#[derive(Clone, Debug, PartialEq)]
pub enum Route {
    Login,
    List(ResourceKind),
    Detail(RowKey),
    Create(ResourceKind),
}

impl Route {
    pub fn home_for(role: Role) -> Route {
        ResourceKind::ALL
            .into_iter()
            .find(|kind| kind.visible_to(role))
            .map(Route::List)
            .unwrap_or(Route::Login)
    }
}

/// Shared by every screen; built once at startup.
#[derive(Clone)]
pub struct Services {
    pub api: Rc<dyn ResourceApi>,
    pub session: Rc<AuthSession>,
    pub notices: NoticeChannel,
    pub page_size: PageSize,
}

#[derive(Clone, Copy)]
pub struct AppState {
    pub route: Signal<Route>,
    pub user: Signal<Option<AuthenticatedUser>>,
    pub booting: Signal<bool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            route: use_signal(|| Route::Login),
            user: use_signal(|| None::<AuthenticatedUser>),
            booting: use_signal(|| true),
        }
    }

    pub fn navigate(mut self, to: Route) {
        self.route.set(to);
    }

    /// Attaches a one-shot message to the transition, then navigates.
    pub fn navigate_with_notice(mut self, notices: &NoticeChannel, to: Route, message: String) {
        notices.push(message);
        self.route.set(to);
    }
}

pub struct ListScreenState {
    pub view: Signal<ListView>,
    pub search_input: Signal<String>,
    pub open_dropdown: Signal<Option<&'static str>>,
    pub dropdown_pos: Signal<Option<(f64, f64)>>,
    pub prompt: Signal<Option<ActionPrompt>>,
    pub action_busy: Signal<bool>,
}

impl ListScreenState {
    pub fn new() -> Self {
        Self {
            view: use_signal(ListView::default),
            search_input: use_signal(String::new),
            open_dropdown: use_signal(|| None::<&'static str>),
            dropdown_pos: use_signal(|| None::<(f64, f64)>),
            prompt: use_signal(|| None::<ActionPrompt>),
            action_busy: use_signal(|| false),
        }
    }
}

pub struct DetailScreenState {
    pub view: Signal<DetailView>,
    pub prompt: Signal<Option<ActionPrompt>>,
    pub action_busy: Signal<bool>,
}

impl DetailScreenState {
    pub fn new() -> Self {
        Self {
            view: use_signal(DetailView::default),
            prompt: use_signal(|| None::<ActionPrompt>),
            action_busy: use_signal(|| false),
        }
    }
}
