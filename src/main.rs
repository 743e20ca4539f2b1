mod app;
mod config;

mod domain {
    pub mod entities {
        pub mod aggregate;
        pub mod catalog;
        pub mod list_query;
        pub mod notice;
        pub mod resource;
        pub mod user;
    }
}

mod usecase {
    pub mod ports {
        pub mod api;
        pub mod token_store;
    }
    pub mod services {
        pub mod auth_session;
        pub mod confirmable_action;
        pub mod create_form;
        pub mod detail_service;
        pub mod list_controller;
        pub mod list_request;
        pub mod navigation_notice;
    }
}

mod infra {
    pub mod http {
        pub mod client;
    }
    pub mod session {
        pub mod token_store;
    }
}

#[cfg(feature = "desktop")]
mod platform {
    pub mod desktop {
        pub mod webview;
    }
}

mod ui {
    pub mod components;
    pub mod screens {
        pub mod detail_screen;
        pub mod form_screen;
        pub mod list_screen;
        pub mod login_screen;
    }
    pub mod state {
        pub mod app_state;
    }
}

#[cfg(test)]
mod tests;

use config::AppConfig;

#[cfg(feature = "desktop")]
fn desktop_config() -> dioxus::desktop::Config {
    let config = dioxus::desktop::Config::new()
        .with_window(dioxus::desktop::WindowBuilder::new().with_title("Umrah Admin"));
    match platform::desktop::webview::default_webview_data_dir() {
        Ok(dir) => config.with_data_directory(dir),
        Err(err) => {
            tracing::warn!(error = %err, "using the default webview data directory");
            config
        }
    }
}

fn main() {
    let config = AppConfig::load();
    if let Err(err) = dioxus::logger::init(config.logging.tracing_level()) {
        eprintln!("Failed to initialise logging: {err}");
    }
    tracing::info!(base_url = %config.api.base_url, "starting umrah admin");

    let builder = dioxus::LaunchBuilder::new().with_context(config);
    #[cfg(feature = "desktop")]
    let builder = builder.with_cfg(desktop_config());
    builder.launch(app::App);
}
