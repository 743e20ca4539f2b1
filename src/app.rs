use std::rc::Rc;

use anyhow::{Context, Result};
use dioxus::prelude::*;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::entities::catalog::ResourceKind;
use crate::domain::entities::user::Role;
use crate::infra::http::client::HttpApiClient;
#[cfg(not(target_arch = "wasm32"))]
use crate::infra::session::token_store::{default_session_path, FileTokenStore};
use crate::infra::session::token_store::MemoryTokenStore;
use crate::ui::screens::detail_screen::DetailScreen;
use crate::ui::screens::form_screen::FormScreen;
use crate::ui::screens::list_screen::ListScreen;
use crate::ui::screens::login_screen::LoginScreen;
use crate::ui::state::app_state::{AppState, Route, Services};
use crate::usecase::ports::api::ResourceApi;
use crate::usecase::ports::token_store::TokenStore;
use crate::usecase::services::auth_session::AuthSession;
use crate::usecase::services::navigation_notice::NoticeChannel;

#[cfg(not(target_arch = "wasm32"))]
fn token_store() -> Rc<dyn TokenStore> {
    match default_session_path() {
        Ok(path) => Rc::new(FileTokenStore::new(path)),
        Err(err) => {
            warn!(error = %err, "no session directory; sign-in will not persist");
            Rc::new(MemoryTokenStore::default())
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn token_store() -> Rc<dyn TokenStore> {
    Rc::new(MemoryTokenStore::default())
}

fn build_services(config: &AppConfig) -> Result<Services> {
    let tokens = token_store();
    let client = HttpApiClient::new(&config.api, tokens.clone())
        .context("failed to create API client")?;
    let api: Rc<dyn ResourceApi> = Rc::new(client);
    Ok(Services {
        session: Rc::new(AuthSession::new(api.clone(), tokens)),
        api,
        notices: NoticeChannel::default(),
        page_size: config.list.page_size(),
    })
}

/// Route after access checks: signed-in users never see the login page or a
/// screen their role cannot open.
fn resolve_route(route: Route, role: Role) -> Route {
    let allowed = match &route {
        Route::Login => false,
        Route::List(kind) => kind.visible_to(role),
        Route::Create(kind) => kind.visible_to(role) && kind.can_create(),
        Route::Detail(_) => ResourceKind::Packages.visible_to(role),
    };
    if allowed {
        route
    } else {
        Route::home_for(role)
    }
}

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let mut app = AppState::new();
    let services = use_hook(move || build_services(&config).map_err(|err| format!("{err:#}")));

    let services = match services {
        Ok(services) => services,
        Err(err) => {
            return rsx! {
                div {
                    p { "Unable to start: {err}" }
                }
            };
        }
    };

    use_context_provider(|| services.clone());
    use_context_provider(|| app);

    let session_for_init = services.session.clone();
    use_effect(move || {
        let session = session_for_init.clone();
        spawn(async move {
            match session.init().await {
                Some(user) => {
                    let home = Route::home_for(user.role);
                    app.user.set(Some(user));
                    app.navigate(home);
                }
                None => app.navigate(Route::Login),
            }
            app.booting.set(false);
        });
    });

    if (app.booting)() {
        return rsx! {
            div { style: "padding: 24px; color: #666;", "Loading…" }
        };
    }

    let Some(user) = (app.user)() else {
        return rsx! { LoginScreen {} };
    };

    let route = resolve_route((app.route)(), user.role);
    let nav_kinds: Vec<ResourceKind> = ResourceKind::ALL
        .into_iter()
        .filter(|kind| kind.visible_to(user.role))
        .collect();
    let active_kind = match &route {
        Route::List(kind) | Route::Create(kind) => Some(*kind),
        Route::Detail(_) => Some(ResourceKind::Packages),
        Route::Login => None,
    };

    let session_for_logout = services.session.clone();
    let notices = services.notices.clone();
    let logout = move |_: MouseEvent| {
        let session = session_for_logout.clone();
        let notices = notices.clone();
        spawn(async move {
            session.logout().await;
            notices.clear();
            app.user.set(None);
            app.navigate(Route::Login);
            info!("returned to sign-in");
        });
    };

    let body = match route {
        Route::List(kind) => rsx! { ListScreen { key: "{kind:?}", kind } },
        Route::Create(kind) => rsx! { FormScreen { key: "new-{kind:?}", kind } },
        Route::Detail(id) => rsx! { DetailScreen { key: "{id}", package_id: id.clone() } },
        Route::Login => rsx! {
            p { style: "padding: 24px;", "This account has no screens to show." }
        },
    };

    rsx! {
        div { style: "display: flex; min-height: 100vh; font-family: sans-serif;",
            nav { style: "width: 200px; padding: 12px; background: #f5f5f5; border-right: 1px solid #ddd;",
                div { style: "font-weight: 600; margin-bottom: 12px;", "Umrah Admin" }
                {nav_kinds.into_iter().map(|kind| {
                    let weight = if active_kind == Some(kind) { "600" } else { "400" };
                    let title = kind.title();
                    rsx! {
                        div {
                            key: "{kind:?}",
                            style: "padding: 4px 0; cursor: pointer; font-weight: {weight};",
                            onclick: move |_| app.navigate(Route::List(kind)),
                            "{title}"
                        }
                    }
                })}
                div { style: "margin-top: 24px; font-size: 13px; color: #555;", "{user.name}" }
                button { style: "margin-top: 6px;", onclick: logout, "Sign out" }
            }
            main { style: "flex: 1; padding: 16px;", {body} }
        }
    }
}
