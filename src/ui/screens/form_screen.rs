use dioxus::prelude::*;

use crate::domain::entities::catalog::ResourceKind;
use crate::domain::entities::notice::Notice;
use crate::ui::components::NoticeBanner;
use crate::ui::state::app_state::{AppState, Route, Services};
use crate::usecase::services::create_form::CreateDraft;

#[component]
pub fn FormScreen(kind: ResourceKind) -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();
    let mut draft = use_signal(CreateDraft::default);
    let mut notice = use_signal(|| None::<Notice>);
    let mut saving = use_signal(|| false);

    let title = format!("New {}", kind.singular().to_lowercase());
    let save_label = if saving() { "Saving…" } else { "Save" };

    let submit = move |_: MouseEvent| {
        if saving() {
            return;
        }
        saving.set(true);
        notice.set(None);
        let api = services.api.clone();
        let notices = services.notices.clone();
        let current = draft();
        spawn(async move {
            match current.submit(&*api, kind).await {
                Ok(message) => {
                    app.navigate_with_notice(&notices, Route::List(kind), message);
                }
                Err(err) => {
                    notice.set(Some(Notice::error(err.user_message())));
                    saving.set(false);
                }
            }
        });
    };

    rsx! {
        div { style: "max-width: 480px;",
            h2 { "{title}" }

            NoticeBanner {
                notice: notice(),
                on_dismiss: move |_| notice.set(None),
            }

            {CreateDraft::fields(kind).map(|column| {
                let key = column.key;
                let value = draft.read().value(key).to_string();
                rsx! {
                    label { key: "{key}", style: "display: block; margin-bottom: 8px;",
                        div { style: "font-size: 13px; color: #555;", "{column.label}" }
                        input {
                            style: "width: 100%; padding: 4px 6px;",
                            value: "{value}",
                            disabled: saving(),
                            oninput: move |event| draft.write().set(key, event.value()),
                        }
                    }
                }
            })}

            div { style: "display: flex; gap: 8px; margin-top: 12px;",
                button {
                    disabled: saving(),
                    onclick: move |_| app.navigate(Route::List(kind)),
                    "Cancel"
                }
                button {
                    disabled: saving(),
                    onclick: submit,
                    "{save_label}"
                }
            }
        }
    }
}
