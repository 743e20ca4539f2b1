use dioxus::prelude::*;

use crate::domain::entities::notice::Notice;
use crate::ui::components::NoticeBanner;
use crate::ui::state::app_state::{AppState, Route, Services};

#[component]
pub fn LoginScreen() -> Element {
    let services = use_context::<Services>();
    let mut app = use_context::<AppState>();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut notice = use_signal(|| None::<Notice>);
    let mut submitting = use_signal(|| false);

    let button_label = if submitting() { "Signing in…" } else { "Sign in" };

    let submit = move |_: MouseEvent| {
        if submitting() {
            return;
        }
        if email().trim().is_empty() || password().is_empty() {
            notice.set(Some(Notice::error("Enter your email and password.")));
            return;
        }
        submitting.set(true);
        notice.set(None);
        let session = services.session.clone();
        spawn(async move {
            match session.login(&email(), &password()).await {
                Ok(user) => {
                    password.set(String::new());
                    let home = Route::home_for(user.role);
                    app.user.set(Some(user));
                    app.navigate(home);
                }
                Err(err) => {
                    notice.set(Some(Notice::error(err.user_message())));
                }
            }
            submitting.set(false);
        });
    };

    rsx! {
        div { style: "max-width: 360px; margin: 80px auto; padding: 24px; border: 1px solid #ddd; border-radius: 8px;",
            h2 { "Back-office sign in" }

            NoticeBanner {
                notice: notice(),
                on_dismiss: move |_| notice.set(None),
            }

            label { style: "display: block; margin-bottom: 8px;",
                div { style: "font-size: 13px; color: #555;", "Email" }
                input {
                    r#type: "email",
                    style: "width: 100%; padding: 4px 6px;",
                    value: "{email}",
                    disabled: submitting(),
                    oninput: move |event| email.set(event.value()),
                }
            }
            label { style: "display: block; margin-bottom: 12px;",
                div { style: "font-size: 13px; color: #555;", "Password" }
                input {
                    r#type: "password",
                    style: "width: 100%; padding: 4px 6px;",
                    value: "{password}",
                    disabled: submitting(),
                    oninput: move |event| password.set(event.value()),
                }
            }
            button {
                disabled: submitting(),
                onclick: submit,
                "{button_label}"
            }
        }
    }
}
