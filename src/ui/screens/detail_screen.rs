use std::rc::Rc;

use dioxus::prelude::*;

use crate::domain::entities::aggregate::{DetailTab, NestedCollection};
use crate::domain::entities::catalog::ResourceKind;
use crate::domain::entities::resource::{Row, RowKey};
use crate::ui::components::{ConfirmModal, NoticeBanner};
use crate::ui::state::app_state::{AppState, DetailScreenState, Route, Services};
use crate::usecase::services::confirmable_action::ConfirmableAction;
use crate::usecase::services::detail_service::PackageDetailController;

fn nested_title(collection: NestedCollection, row: &Row) -> String {
    let candidates: &[&str] = match collection {
        NestedCollection::Images => &["caption", "url"],
        NestedCollection::Flights => &["flight_number", "airline_name"],
        NestedCollection::Hotels => &["name", "city"],
        NestedCollection::Itinerary => &["title", "day"],
    };
    candidates
        .iter()
        .map(|field| row.text(field))
        .find(|text| !text.is_empty())
        .unwrap_or_else(|| "(untitled)".to_string())
}

#[component]
pub fn DetailScreen(package_id: RowKey) -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();
    let DetailScreenState {
        mut view,
        mut prompt,
        mut action_busy,
    } = DetailScreenState::new();

    let api = services.api.clone();
    let controller = use_hook(move || Rc::new(PackageDetailController::new(api, package_id)));
    let action = use_hook(|| Rc::new(ConfirmableAction::new()));

    let controller_for_init = controller.clone();
    use_effect(move || {
        let controller = controller_for_init.clone();
        view.set(controller.snapshot());
        spawn(async move {
            controller.load().await;
            view.set(controller.snapshot());
        });
    });

    let controller_for_drop = controller.clone();
    use_drop(move || controller_for_drop.unmount());

    let current = view();
    let controller_for_dismiss = controller.clone();
    let controller_for_confirm = controller.clone();
    let action_for_confirm = action.clone();
    let action_for_cancel = action.clone();

    let body = match &current.aggregate {
        None if current.is_loading => rsx! { p { "Loading…" } },
        None => rsx! { p { "Package not available." } },
        Some(aggregate) => {
            let package = &aggregate.package;
            let package_name = package.text("name");
            let active = current.view.active_tab;
            let tabs = std::iter::once(DetailTab::Overview)
                .chain(NestedCollection::ALL.into_iter().map(DetailTab::Nested));

            let tab_body = match active {
                DetailTab::Overview => rsx! {
                    table {
                        {package.fields.iter().filter(|(_, value)| !value.is_object() && !value.is_array()).map(|(field, _)| {
                            let text = package.text(field);
                            rsx! {
                                tr { key: "{field}",
                                    th { style: "text-align: left; padding: 4px 12px 4px 0;", "{field}" }
                                    td { "{text}" }
                                }
                            }
                        })}
                    }
                },
                DetailTab::Nested(collection) => {
                    let rows = aggregate.collection(collection);
                    rsx! {
                        if rows.is_empty() {
                            p { style: "color: #666;", "Nothing here yet." }
                        }
                        ul { style: "list-style: none; padding: 0;",
                            {rows.iter().enumerate().map(|(idx, row)| {
                                let Some(item_key) = row.key("id") else {
                                    return rsx! {};
                                };
                                let title = nested_title(collection, row);
                                let expanded = current.view.is_expanded(collection, &item_key);
                                let details: Vec<(String, String)> = row
                                    .fields
                                    .keys()
                                    .map(|field| (field.clone(), row.text(field)))
                                    .collect();
                                let controller_for_toggle = controller.clone();
                                let controller_for_delete = controller.clone();
                                let action = action.clone();
                                let key_for_toggle = item_key.clone();
                                let title_for_delete = title.clone();
                                let arrow = if expanded { "▾" } else { "▸" };
                                rsx! {
                                    li { key: "{idx}-{item_key}", style: "border-bottom: 1px solid #eee; padding: 6px 0;",
                                        div { style: "display: flex; gap: 8px; align-items: center;",
                                            button {
                                                style: "border: none; background: transparent; cursor: pointer;",
                                                onclick: move |_| {
                                                    controller_for_toggle.toggle_expanded(collection, key_for_toggle.clone());
                                                    view.set(controller_for_toggle.snapshot());
                                                },
                                                "{arrow}"
                                            }
                                            span { style: "flex: 1;", "{title}" }
                                            button {
                                                style: "color: #c62828;",
                                                disabled: action_busy(),
                                                onclick: move |_| {
                                                    let pending = controller_for_delete.delete_nested_action(
                                                        collection,
                                                        item_key.clone(),
                                                        &title_for_delete,
                                                    );
                                                    if action.request(pending) {
                                                        prompt.set(action.prompt());
                                                    }
                                                },
                                                "Remove"
                                            }
                                        }
                                        if expanded {
                                            dl { style: "margin: 6px 0 0 24px;",
                                                {details.into_iter().map(|(field, text)| rsx! {
                                                    div { key: "{field}", style: "display: flex; gap: 8px;",
                                                        dt { style: "color: #666;", "{field}" }
                                                        dd { style: "margin: 0;", "{text}" }
                                                    }
                                                })}
                                            }
                                        }
                                    }
                                }
                            })}
                        }
                    }
                }
            };

            rsx! {
                h2 { "{package_name}" }
                div { style: "display: flex; gap: 4px; border-bottom: 1px solid #ccc; margin-bottom: 8px;",
                    {tabs.map(|tab| {
                        let controller = controller.clone();
                        let (label, count) = match tab {
                            DetailTab::Overview => ("Overview".to_string(), None),
                            DetailTab::Nested(collection) => (
                                collection.label().to_string(),
                                Some(aggregate.collection(collection).len()),
                            ),
                        };
                        let weight = if tab == active { "600" } else { "400" };
                        let caption = match count {
                            Some(count) => format!("{label} ({count})"),
                            None => label,
                        };
                        rsx! {
                            button {
                                key: "{caption}",
                                style: "border: none; background: transparent; padding: 6px 10px; cursor: pointer; font-weight: {weight};",
                                onclick: move |_| {
                                    controller.select_tab(tab);
                                    view.set(controller.snapshot());
                                },
                                "{caption}"
                            }
                        }
                    })}
                }

                {tab_body}
            }
        }
    };

    rsx! {
        div {
            button {
                onclick: move |_| app.navigate(Route::List(ResourceKind::Packages)),
                "← Back to packages"
            }

            NoticeBanner {
                notice: current.notice.clone(),
                on_dismiss: move |_| {
                    controller_for_dismiss.dismiss_notice();
                    view.set(controller_for_dismiss.snapshot());
                },
            }

            {body}

            ConfirmModal {
                prompt: prompt(),
                busy: action_busy(),
                on_confirm: move |_| {
                    if action_for_confirm.is_busy() {
                        return;
                    }
                    action_busy.set(true);
                    let controller = controller_for_confirm.clone();
                    let action = action_for_confirm.clone();
                    spawn(async move {
                        action.confirm(&*controller).await;
                        action_busy.set(false);
                        prompt.set(action.prompt());
                        view.set(controller.snapshot());
                    });
                },
                on_cancel: move |_| {
                    action_for_cancel.cancel();
                    prompt.set(action_for_cancel.prompt());
                },
            }
        }
    }
}
