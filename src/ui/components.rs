/// Reusable popup components

use crate::export::ExportAction;
use crate::highlight::HighlightRecord;
use crate::query::{DateRange, Query};
use crate::ui::{is_outside, set_timeout, DocumentClick};
use crate::view::{CopyFormat, HighlightView};
use crate::platform;
use chrono::NaiveDate;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// How long copy feedback stays on the button
const COPY_FEEDBACK_MS: i32 = 2000;

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
    pub query: Query,
    pub tags: Vec<String>,
    pub on_search: Callback<String>,
    pub on_range: Callback<DateRange>,
    pub on_tag: Callback<Option<String>>,
}

#[function_component(FilterBar)]
pub fn filter_bar(props: &FilterBarProps) -> Html {
    let on_input = props.on_search.reform(|e: InputEvent| {
        e.target_dyn_into::<HtmlInputElement>()
            .map(|input| input.value())
            .unwrap_or_default()
    });

    let on_clear = props.on_search.reform(|_: MouseEvent| String::new());

    let on_tag_change = props.on_tag.reform(|e: Event| {
        e.target_dyn_into::<HtmlSelectElement>()
            .map(|select| select.value())
            .filter(|value| !value.is_empty())
    });

    html! {
        <div class="filter-bar">
            <div class="search-container">
                <input
                    type="text"
                    class="search-input"
                    placeholder="Search highlights, sources, or dates..."
                    value={props.query.search.clone()}
                    oninput={on_input}
                />
                if !props.query.search.is_empty() {
                    <button class="clear-search-btn visible" onclick={on_clear}>{"×"}</button>
                }
            </div>

            <div class="filter-buttons">
                {for DateRange::ALL.iter().map(|range| {
                    let range = *range;
                    let class = if props.query.date_range == range { "filter-btn active" } else { "filter-btn" };
                    html! {
                        <button class={class} onclick={props.on_range.reform(move |_: MouseEvent| range)}>
                            {range.label()}
                        </button>
                    }
                })}
            </div>

            if !props.tags.is_empty() {
                <select class="tag-filter" onchange={on_tag_change}>
                    <option value="" selected={props.query.tag.is_none()}>{"All tags"}</option>
                    {for props.tags.iter().map(|tag| html! {
                        <option
                            value={tag.clone()}
                            selected={props.query.tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case(tag))}
                        >
                            {tag.clone()}
                        </option>
                    })}
                </select>
            }
        </div>
    }
}

#[derive(Clone, PartialEq)]
enum CopyFeedback {
    None,
    Copied,
    Failed,
}

#[derive(Properties, PartialEq)]
pub struct HighlightCardProps {
    pub highlight: HighlightRecord,
    pub search: String,
    pub today: NaiveDate,
    pub on_delete: Callback<String>,
}

#[function_component(HighlightCard)]
pub fn highlight_card(props: &HighlightCardProps) -> Html {
    let feedback = use_state(|| CopyFeedback::None);
    let options_open = use_state(|| false);
    let view = HighlightView::new(&props.highlight, props.today, &props.search);

    let on_copy = {
        let feedback = feedback.clone();
        let options_open = options_open.clone();
        let highlight = props.highlight.clone();

        Callback::from(move |format: CopyFormat| {
            let feedback = feedback.clone();
            let text = format.render(&highlight);
            options_open.set(false);

            spawn_local(async move {
                match platform::copy_to_clipboard(&text).await {
                    Ok(_) => feedback.set(CopyFeedback::Copied),
                    Err(e) => {
                        log::error!("{}", e);
                        feedback.set(CopyFeedback::Failed);
                    }
                }
                let feedback = feedback.clone();
                set_timeout(COPY_FEEDBACK_MS, move || feedback.set(CopyFeedback::None));
            });
        })
    };

    let toggle_options = {
        let options_open = options_open.clone();
        Callback::from(move |_: MouseEvent| options_open.set(!*options_open))
    };

    let on_delete = props.on_delete.reform({
        let id = view.id.clone();
        move |_: MouseEvent| id.clone()
    });

    html! {
        <div class="highlight-item fade-in">
            if view.is_new {
                <div class="new-badge">{"NEW"}</div>
            }
            <div class="highlight-text">
                {"\""}
                {for view.preview.iter().map(|segment| if segment.matched {
                    html! { <mark>{segment.text.clone()}</mark> }
                } else {
                    html! { {segment.text.clone()} }
                })}
                {"\""}
            </div>
            <div class="highlight-meta">
                <a href={view.source.clone()} target="_blank" class="highlight-source">{view.domain.clone()}</a>
                <span class="highlight-date">{view.date.clone()}</span>
            </div>
            <div class="highlight-actions">
                <div class="copy-group">
                    <Button
                        onclick={on_copy.reform(|_: MouseEvent| CopyFormat::TextOnly)}
                        variant={ButtonVariant::Secondary}
                        size={ButtonSize::Small}
                    >
                        {match *feedback {
                            CopyFeedback::Copied => "✓ Copied",
                            _ => "Copy",
                        }}
                    </Button>
                    <Button onclick={toggle_options} variant={ButtonVariant::Plain} size={ButtonSize::Small}>
                        {"▾"}
                    </Button>
                    if *feedback == CopyFeedback::Failed {
                        <div class="copy-tooltip show error">{"Failed to copy"}</div>
                    }
                    if *options_open {
                        <div class="copy-options show">
                            {for CopyFormat::ALL.iter().map(|format| {
                                let format = *format;
                                html! {
                                    <div class="copy-option-item" onclick={on_copy.reform(move |_: MouseEvent| format)}>
                                        {format.label()}
                                    </div>
                                }
                            })}
                        </div>
                    }
                </div>
                <Button onclick={on_delete} variant={ButtonVariant::Danger} size={ButtonSize::Small}>
                    {"Delete"}
                </Button>
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ExportMenuProps {
    pub open: bool,
    pub actions: Vec<ExportAction>,
    pub pdf_ready: bool,
    pub busy: bool,
    pub on_toggle: Callback<()>,
    /// Fired by a click anywhere outside the button and the open menu
    pub on_dismiss: Callback<()>,
    pub on_select: Callback<ExportAction>,
}

#[function_component(ExportMenu)]
pub fn export_menu(props: &ExportMenuProps) -> Html {
    let container = use_node_ref();

    {
        let container = container.clone();
        let on_dismiss = props.on_dismiss.clone();
        use_effect_with(props.open, move |open| {
            let listener = open
                .then(|| {
                    DocumentClick::listen(move |e: Event| {
                        let Some(node) = container.cast::<web_sys::Node>() else {
                            return;
                        };
                        if is_outside(&node, e.target()) {
                            on_dismiss.emit(());
                        }
                    })
                })
                .flatten();
            move || drop(listener)
        });
    }

    html! {
        <div class="export-import" ref={container}>
            <Button
                onclick={props.on_toggle.reform(|_: MouseEvent| ())}
                variant={ButtonVariant::Secondary}
                disabled={props.busy}
            >
                {"Export / Import ▾"}
            </Button>
            if props.open {
                <div class="export-import-menu">
                    {for props.actions.iter().map(|action| {
                        let action = *action;
                        let pending = action == ExportAction::ExportPdf && !props.pdf_ready;
                        html! {
                            <button
                                class={if pending { "menu-item pending" } else { "menu-item" }}
                                onclick={props.on_select.reform(move |_: MouseEvent| action)}
                            >
                                {action.label()}
                            </button>
                        }
                    })}
                </div>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub info: Option<String>,
    pub label: AttrValue,
    pub has_more: bool,
    pub on_load_more: Callback<()>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let Some(info) = props.info.clone() else {
        return html! {};
    };

    html! {
        <div class="pagination-container">
            <p class="pagination-info">{info}</p>
            <Button
                onclick={props.on_load_more.reform(|_: MouseEvent| ())}
                disabled={!props.has_more}
                variant={ButtonVariant::Secondary}
            >
                {props.label.clone()}
            </Button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct EmptyStateProps {
    pub filtered: bool,
}

#[function_component(EmptyState)]
pub fn empty_state(props: &EmptyStateProps) -> Html {
    if props.filtered {
        html! {
            <div class="no-highlights">
                <div class="icon">{"🔍"}</div>
                <h3>{"No Results Found"}</h3>
                <p>{"Try adjusting your search or filter criteria. Clear filters to see all highlights."}</p>
            </div>
        }
    } else {
        html! {
            <div class="no-highlights">
                <div class="icon">{"📚"}</div>
                <h3>{"No Highlights Yet"}</h3>
                <p>{"Select text on any webpage, right-click, and choose \"Save Highlight\" to save your first highlight!"}</p>
            </div>
        }
    }
}
