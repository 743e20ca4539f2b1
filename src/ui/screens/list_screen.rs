use std::rc::Rc;

use chrono::NaiveDate;
use dioxus::prelude::*;
use tracing::debug;

use crate::domain::entities::catalog::{FilterKind, ResourceKind, RowAction};
use crate::domain::entities::list_query::{FilterValue, PageSize, QueryChange, SortDirection};
use crate::domain::entities::resource::Row;
use crate::ui::components::{ConfirmModal, DropdownOption, DropdownSelect, NoticeBanner, Pager};
use crate::ui::state::app_state::{AppState, ListScreenState, Route, Services};
use crate::usecase::services::confirmable_action::{
    ActionPrompt, ConfirmableAction, PendingAction,
};
use crate::usecase::services::list_controller::{ListView, ResourceListController};
use crate::usecase::services::navigation_notice::NoticeLatch;

const PAGE_SIZE_DROPDOWN: &str = "__page_size__";

/// Starts the request synchronously so the loading state renders at once.
fn dispatch(controller: &Rc<ResourceListController>, mut view: Signal<ListView>, change: QueryChange) {
    let ticket = controller.begin_update(change);
    view.set(controller.snapshot());
    let controller = controller.clone();
    spawn(async move {
        controller.complete(ticket).await;
        view.set(controller.snapshot());
    });
}

fn request_action(
    action: &Rc<ConfirmableAction>,
    mut prompt: Signal<Option<ActionPrompt>>,
    pending: PendingAction,
) {
    if action.request(pending) {
        prompt.set(action.prompt());
    }
}

fn row_label(row: &Row, kind: ResourceKind) -> String {
    let endpoint = kind.endpoint();
    endpoint
        .columns
        .first()
        .map(|column| row.text(column.key))
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| {
            row.key(endpoint.key_field)
                .map(|key| format!("#{key}"))
                .unwrap_or_default()
        })
}

fn cell_text(row: &Row, key: &str) -> String {
    match row.get(key) {
        Some(serde_json::Value::Bool(flag)) => if *flag { "Yes" } else { "No" }.to_string(),
        _ if key.starts_with("is_") => if row.flag(key) { "Yes" } else { "No" }.to_string(),
        _ => row.text(key),
    }
}

#[component]
pub fn ListScreen(kind: ResourceKind) -> Element {
    let services = use_context::<Services>();
    let app = use_context::<AppState>();
    let ListScreenState {
        mut view,
        mut search_input,
        mut open_dropdown,
        dropdown_pos,
        mut prompt,
        mut action_busy,
    } = ListScreenState::new();

    let api = services.api.clone();
    let page_size = services.page_size;
    let controller =
        use_hook(move || Rc::new(ResourceListController::new(api, kind.endpoint(), page_size)));
    let action = use_hook(|| Rc::new(ConfirmableAction::new()));

    let controller_for_notice = controller.clone();
    let notices = services.notices.clone();
    use_hook(move || {
        let latch = NoticeLatch::default();
        if let Some(notice) = latch.fire(&notices) {
            controller_for_notice.set_notice(notice.into());
        }
        Rc::new(latch)
    });

    let controller_for_init = controller.clone();
    use_effect(move || {
        let ticket = controller_for_init.begin_load(controller_for_init.query());
        view.set(controller_for_init.snapshot());
        let controller = controller_for_init.clone();
        spawn(async move {
            controller.complete(ticket).await;
            view.set(controller.snapshot());
        });
    });

    let controller_for_drop = controller.clone();
    use_drop(move || controller_for_drop.unmount());

    let current = view();
    let endpoint = kind.endpoint();
    let busy = current.is_loading || action_busy();
    let sort_key = current.query.sort().key.clone();
    let sort_arrow = match current.query.sort().direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    };

    let controller_for_search = controller.clone();
    let controller_for_page_size = controller.clone();
    let controller_for_prev = controller.clone();
    let controller_for_next = controller.clone();
    let controller_for_dismiss = controller.clone();
    let controller_for_confirm = controller.clone();
    let action_for_confirm = action.clone();
    let action_for_cancel = action.clone();
    let total_count = current.page.total_count;
    let column_span = endpoint.columns.len() + 1;
    let title = kind.title();
    let new_label = format!("New {}", kind.singular().to_lowercase());

    let page_size_options: Vec<DropdownOption> = PageSize::ALL
        .iter()
        .map(|size| DropdownOption::new(size.get().to_string(), format!("{} / page", size.get())))
        .collect();

    rsx! {
        div {
            onclick: move |_| open_dropdown.set(None),
            div { style: "display: flex; justify-content: space-between; align-items: center;",
                h2 { "{title}" }
                if kind.can_create() {
                    button {
                        onclick: move |_| app.navigate(Route::Create(kind)),
                        "{new_label}"
                    }
                }
            }

            NoticeBanner {
                notice: current.notice.clone(),
                on_dismiss: move |_| {
                    controller_for_dismiss.dismiss_notice();
                    view.set(controller_for_dismiss.snapshot());
                },
            }

            if current.page.truncated {
                div { style: "color: #8a6d3b; margin: 4px 0;",
                    "Only the first {total_count} records returned by the server are shown."
                }
            }

            nav {
                style: "display: flex; gap: 12px; align-items: center; flex-wrap: wrap; padding: 8px 0;",
                input {
                    placeholder: "Search…",
                    value: search_input(),
                    oninput: move |event| {
                        let text = event.value();
                        search_input.set(text.clone());
                        dispatch(&controller_for_search, view, QueryChange::Search(text));
                    }
                }

                {endpoint.filters.iter().map(|filter| {
                    let name = filter.name;
                    let controller = controller.clone();
                    match filter.kind {
                        FilterKind::Choice(choices) => {
                            let options: Vec<DropdownOption> = choices
                                .iter()
                                .map(|(value, label)| DropdownOption::new(*value, *label))
                                .collect();
                            let selected = current
                                .query
                                .filter(name)
                                .map(FilterValue::as_param)
                                .unwrap_or_else(|| "all".to_string());
                            rsx! {
                                DropdownSelect {
                                    key: "{name}",
                                    id: name,
                                    label: filter.label.to_string(),
                                    options,
                                    selected: Some(selected),
                                    disabled: action_busy(),
                                    open_dropdown,
                                    dropdown_pos,
                                    on_select: move |value: String| {
                                        dispatch(
                                            &controller,
                                            view,
                                            QueryChange::Filter(name.to_string(), FilterValue::Choice(value)),
                                        );
                                    },
                                }
                            }
                        }
                        FilterKind::Date => rsx! {
                            label { key: "{name}",
                                "{filter.label} "
                                input {
                                    r#type: "date",
                                    oninput: move |event| {
                                        let text = event.value();
                                        let change = match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                                            Ok(date) => QueryChange::Filter(name.to_string(), FilterValue::Date(date)),
                                            Err(_) => QueryChange::ClearFilter(name.to_string()),
                                        };
                                        dispatch(&controller, view, change);
                                    }
                                }
                            }
                        },
                        FilterKind::Text => rsx! {
                            input {
                                key: "{name}",
                                placeholder: "{filter.label}",
                                oninput: move |event| {
                                    dispatch(
                                        &controller,
                                        view,
                                        QueryChange::Filter(name.to_string(), FilterValue::Text(event.value())),
                                    );
                                }
                            }
                        },
                    }
                })}

                DropdownSelect {
                    id: PAGE_SIZE_DROPDOWN,
                    label: "Show".to_string(),
                    options: page_size_options,
                    selected: Some(current.query.page_size().get().to_string()),
                    disabled: action_busy(),
                    open_dropdown,
                    dropdown_pos,
                    on_select: move |value: String| {
                        if let Some(size) = value.parse().ok().and_then(PageSize::from_value) {
                            dispatch(&controller_for_page_size, view, QueryChange::PageSize(size));
                        }
                    },
                }

                if current.is_loading {
                    span { style: "color: #666;", "Loading…" }
                }
            }

            table { style: "border-collapse: collapse; width: 100%;",
                thead {
                    tr {
                        {endpoint.columns.iter().map(|column| {
                            let key = column.key;
                            let sortable = column.sort.is_some();
                            let arrow = if sort_key.as_deref() == Some(key) { sort_arrow } else { "" };
                            let controller = controller.clone();
                            rsx! {
                                th {
                                    key: "{key}",
                                    style: "text-align: left; border-bottom: 1px solid #ccc; padding: 6px; cursor: pointer;",
                                    onclick: move |_| {
                                        if sortable {
                                            dispatch(&controller, view, QueryChange::ToggleSort(key.to_string()));
                                        }
                                    },
                                    "{column.label} {arrow}"
                                }
                            }
                        })}
                        th { style: "border-bottom: 1px solid #ccc; padding: 6px;", "Actions" }
                    }
                }
                tbody {
                    if current.page.rows.is_empty() && !current.is_loading {
                        tr {
                            td { colspan: "{column_span}", style: "padding: 12px; color: #666;",
                                "No records found."
                            }
                        }
                    }
                    {current.page.rows.iter().enumerate().map(|(idx, row)| {
                        let Some(row_key) = row.key(endpoint.key_field) else {
                            return rsx! {};
                        };
                        let label = row_label(row, kind);
                        let status = row.text("status");
                        let cells: Vec<(&'static str, String)> = endpoint
                            .columns
                            .iter()
                            .map(|column| (column.key, cell_text(row, column.key)))
                            .collect();
                        rsx! {
                            tr { key: "{idx}-{row_key}",
                                {cells.into_iter().map(|(key, text)| rsx! {
                                    td { key: "{key}", style: "padding: 6px; border-bottom: 1px solid #eee;", "{text}" }
                                })}
                                td { style: "padding: 6px; border-bottom: 1px solid #eee; display: flex; gap: 6px;",
                                    {endpoint.actions.iter().enumerate().map(|(action_idx, row_action)| {
                                        let row_key = row_key.clone();
                                        let label = label.clone();
                                        let controller = controller.clone();
                                        let action = action.clone();
                                        match *row_action {
                                            RowAction::ViewDetail => rsx! {
                                                button {
                                                    key: "{action_idx}",
                                                    onclick: move |_| app.navigate(Route::Detail(row_key.clone())),
                                                    "View"
                                                }
                                            },
                                            RowAction::ToggleFlag { field, label: flag_label } => {
                                                let caption = if row.flag(field) {
                                                    format!("Unset {flag_label}")
                                                } else {
                                                    format!("Set {flag_label}")
                                                };
                                                rsx! {
                                                    button {
                                                        key: "{action_idx}",
                                                        disabled: busy,
                                                        onclick: move |_| {
                                                            let controller = controller.clone();
                                                            let row_key = row_key.clone();
                                                            spawn(async move {
                                                                if let Err(err) = controller.toggle(&row_key, field).await {
                                                                    debug!(error = %err, field, "toggle reverted");
                                                                }
                                                                view.set(controller.snapshot());
                                                            });
                                                        },
                                                        "{caption}"
                                                    }
                                                }
                                            }
                                            RowAction::SetStatus { value, label: verb } => {
                                                if status == value {
                                                    return rsx! {};
                                                }
                                                rsx! {
                                                    button {
                                                        key: "{action_idx}",
                                                        disabled: busy,
                                                        onclick: move |_| {
                                                            let pending = controller.status_action(row_key.clone(), &label, value, verb);
                                                            request_action(&action, prompt, pending);
                                                        },
                                                        "{verb}"
                                                    }
                                                }
                                            }
                                            RowAction::Delete => rsx! {
                                                button {
                                                    key: "{action_idx}",
                                                    disabled: busy,
                                                    style: "color: #c62828;",
                                                    onclick: move |_| {
                                                        let pending = controller.delete_action(row_key.clone(), &label, kind.singular());
                                                        request_action(&action, prompt, pending);
                                                    },
                                                    "Delete"
                                                }
                                            },
                                        }
                                    })}
                                }
                            }
                        }
                    })}
                }
            }

            Pager {
                page: current.query.page(),
                page_count: current.page_count,
                total_count,
                disabled: busy,
                on_prev: move |_| dispatch(&controller_for_prev, view, QueryChange::PrevPage),
                on_next: move |_| dispatch(&controller_for_next, view, QueryChange::NextPage { total_count }),
            }

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
