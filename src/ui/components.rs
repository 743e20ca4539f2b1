use dioxus::prelude::*;

use crate::domain::entities::notice::{Notice, NoticeLevel};
use crate::usecase::services::confirmable_action::ActionPrompt;

#[derive(Clone, Debug, PartialEq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

fn dropdown_label(options: &[DropdownOption], selected: Option<&str>) -> String {
    selected
        .and_then(|value| options.iter().find(|opt| opt.value == value))
        .or_else(|| options.first())
        .map(|opt| opt.label.clone())
        .unwrap_or_else(|| "(none)".to_string())
}

/// One menu open per screen; `open_dropdown` holds which.
#[component]
pub fn DropdownSelect(
    id: &'static str,
    label: String,
    options: Vec<DropdownOption>,
    selected: Option<String>,
    disabled: bool,
    mut open_dropdown: Signal<Option<&'static str>>,
    mut dropdown_pos: Signal<Option<(f64, f64)>>,
    on_select: EventHandler<String>,
) -> Element {
    let is_open = open_dropdown() == Some(id);
    let selected_label = dropdown_label(&options, selected.as_deref());
    let (left, top) = dropdown_pos().unwrap_or((0.0, 0.0));

    rsx! {
        div {
            style: "position: relative; display: inline-flex; align-items: center; gap: 6px;",
            span { "{label}" }
            button {
                style: "border: 1px solid #bbb; background: #fff; padding: 4px 10px; border-radius: 6px; cursor: pointer;",
                disabled,
                onclick: move |event| {
                    event.stop_propagation();
                    if open_dropdown() == Some(id) {
                        open_dropdown.set(None);
                        return;
                    }
                    let point = event.client_coordinates();
                    dropdown_pos.set(Some((point.x, point.y + 24.0)));
                    open_dropdown.set(Some(id));
                },
                "{selected_label}"
            }
        }

        if is_open {
            div {
                style: "position: fixed; left: {left}px; top: {top}px; min-width: 180px; max-height: 320px; overflow-y: auto; background: #fff; border: 1px solid #bbb; border-radius: 8px; box-shadow: 0 10px 24px rgba(0,0,0,0.15); z-index: 1200;",
                onclick: move |event| event.stop_propagation(),
                {options.iter().map(|opt| {
                    let value = opt.value.clone();
                    let label = opt.label.clone();
                    let is_selected = selected.as_deref() == Some(value.as_str());
                    let background = if is_selected { "#eef4ff" } else { "transparent" };
                    rsx!(
                        div {
                            key: "{value}",
                            style: "padding: 8px 10px; cursor: pointer; background: {background};",
                            onclick: move |_| {
                                on_select.call(value.clone());
                                open_dropdown.set(None);
                            },
                            "{label}"
                        }
                    )
                })}
            }
        }
    }
}

#[component]
pub fn NoticeBanner(notice: Option<Notice>, on_dismiss: EventHandler<()>) -> Element {
    let Some(notice) = notice else {
        return rsx! {};
    };
    let (background, border) = match notice.level {
        NoticeLevel::Success => ("#edf7ed", "#4caf50"),
        NoticeLevel::Error => ("#fdecea", "#e53935"),
    };

    rsx! {
        div {
            style: "display: flex; justify-content: space-between; align-items: center; padding: 8px 12px; margin: 8px 0; background: {background}; border-left: 4px solid {border};",
            span { "{notice.message}" }
            button {
                style: "border: none; background: transparent; cursor: pointer;",
                onclick: move |_| on_dismiss.call(()),
                "×"
            }
        }
    }
}

/// Controls stay disabled while the action executes; the text cannot be cleared then.
#[component]
pub fn ConfirmModal(
    prompt: Option<ActionPrompt>,
    busy: bool,
    on_confirm: EventHandler<()>,
    on_cancel: EventHandler<()>,
) -> Element {
    let Some(prompt) = prompt else {
        return rsx! {};
    };

    rsx! {
        div {
            style: "position: fixed; inset: 0; background: rgba(0,0,0,0.35); display: flex; align-items: center; justify-content: center; z-index: 1300;",
            div {
                style: "background: #fff; padding: 16px; border: 1px solid #999; min-width: 300px; max-width: 420px;",
                div { style: "margin-bottom: 8px; font-weight: 600;", "{prompt.title}" }
                div { style: "margin-bottom: 12px;", "{prompt.message}" }
                if busy {
                    div { style: "margin-bottom: 8px; color: #666;", "Working…" }
                }
                div { style: "display: flex; gap: 8px; justify-content: flex-end;",
                    button {
                        disabled: busy,
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        disabled: busy,
                        style: "background: #c62828; color: #fff; border: none; padding: 4px 12px;",
                        onclick: move |_| on_confirm.call(()),
                        "{prompt.confirm_text}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn Pager(
    page: u32,
    page_count: u32,
    total_count: u64,
    disabled: bool,
    on_prev: EventHandler<()>,
    on_next: EventHandler<()>,
) -> Element {
    rsx! {
        div { style: "display: flex; gap: 8px; align-items: center; margin-top: 12px;",
            button {
                disabled: disabled || page <= 1,
                onclick: move |_| on_prev.call(()),
                "Previous"
            }
            button {
                disabled: disabled || page >= page_count,
                onclick: move |_| on_next.call(()),
                "Next"
            }
            span { "Page {page} of {page_count} ({total_count} total)" }
        }
    }
}
