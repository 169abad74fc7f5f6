/// Popup UI: highlight list, filters, export/import

use crate::document::build_document;
use crate::domain::unique_links;
use crate::error::{HighlightError, Result};
use crate::export::{self, ExportAction, MenuState};
use crate::highlight::HighlightRecord;
use crate::platform::{self, HIGHLIGHT_SAVED};
use crate::query::{DateRange, Query};
use crate::settings::Settings;
use crate::state::{PopupState, Toast};
use crate::storage::HighlightStore;
use crate::ui::components::{EmptyState, ExportMenu, FilterBar, HighlightCard, Pagination};
use crate::ui::{alert, apply_dark_mode, confirm, set_timeout, Interval};
use chrono::{Local, Utc};
use patternfly_yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Delay before probing for the PDF library
const PDF_PROBE_DELAY_MS: i32 = 100;

/// How long the "highlight saved" toast stays up
const TOAST_DISMISS_MS: i32 = 3000;

pub enum PopupAction {
    Loaded(Vec<HighlightRecord>),
    Search(String),
    Range(DateRange),
    Tag(Option<String>),
    LoadMore,
}

impl Reducible for PopupState {
    type Action = PopupAction;

    fn reduce(self: Rc<Self>, action: PopupAction) -> Rc<Self> {
        let now = Local::now().naive_local();
        let mut next = (*self).clone();

        match action {
            PopupAction::Loaded(snapshot) => {
                if !next.replace_snapshot(snapshot, now) {
                    return self;
                }
                log::info!("Highlights have changed, reloading...");
            }
            PopupAction::Search(search) => {
                let query = Query { search, ..next.query.clone() };
                next.set_query(query, now);
            }
            PopupAction::Range(date_range) => {
                let query = Query { date_range, ..next.query.clone() };
                next.set_query(query, now);
            }
            PopupAction::Tag(tag) => {
                let query = Query { tag, ..next.query.clone() };
                next.set_query(query, now);
            }
            PopupAction::LoadMore => {
                next.load_more();
            }
        }
        Rc::new(next)
    }
}

#[derive(Clone, PartialEq)]
enum PopupStatus {
    Idle,
    Working(String),
    Error(String),
}

fn reload(dispatcher: UseReducerDispatcher<PopupState>) {
    spawn_local(async move {
        match platform::load_highlights().await {
            Ok(store) => dispatcher.dispatch(PopupAction::Loaded(store.highlights)),
            // Leave the list as it is; the next poll tries again
            Err(e) => log::error!("{}", e),
        }
    });
}

/// Persist `store` then refresh the list
fn save_and_reload(store: HighlightStore, dispatcher: UseReducerDispatcher<PopupState>, status: UseStateHandle<PopupStatus>) {
    spawn_local(async move {
        match platform::save_highlights(&store).await {
            Ok(_) => reload(dispatcher),
            Err(e) => {
                log::error!("{}", e);
                status.set(PopupStatus::Error(e.to_string()));
            }
        }
    });
}

fn export_json(highlights: &[HighlightRecord]) -> Result<()> {
    let json = export::to_json(highlights)?;
    platform::download(&json, &export::json_filename(Utc::now()), "application/json")
}

fn export_csv(highlights: &[HighlightRecord]) -> Result<()> {
    let csv = export::to_csv(highlights)?;
    platform::download(&csv, &export::csv_filename(Utc::now()), "text/csv")
}

/// Lay out and render the PDF; returns the success message
fn export_pdf(highlights: &[HighlightRecord]) -> Result<String> {
    let export_date = Local::now().format("%B %-d, %Y, %I:%M %p").to_string();
    let layout = build_document(highlights, &export_date);
    let filename = export::pdf_filename(Utc::now());

    platform::render_pdf(&layout, &filename)?;
    log::info!("Exported {} highlights to {}", highlights.len(), filename);

    Ok(format!(
        "✓ PDF exported successfully!\n\nFilename: {}\nHighlights: {}\nPages: {}",
        filename,
        highlights.len(),
        layout.page_count()
    ))
}

async fn import_json() -> Result<Option<String>> {
    let Some(contents) = platform::pick_json_file().await? else {
        return Ok(None);
    };

    // The file dialog can stay open across captures; merge into what is stored now
    let mut store = platform::load_highlights().await?;
    let summary = export::import_into(&mut store, &contents)?;
    platform::save_highlights(&store).await?;

    log::info!("Import merged {} of {} highlights", summary.added, summary.presented);
    Ok(Some(summary.message()))
}

#[function_component(App)]
pub fn app() -> Html {
    let state = use_reducer_eq(PopupState::default);
    let settings = use_state(Settings::default);
    let status = use_state(|| PopupStatus::Idle);
    let menu = use_state(MenuState::default);
    let pdf_ready = use_state(|| false);
    let toast = use_mut_ref(Toast::default);
    let rerender = use_force_update();

    // Settings, first load and the PDF readiness probe on mount
    {
        let settings = settings.clone();
        let dispatcher = state.dispatcher();
        let pdf_ready = pdf_ready.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match platform::load_settings().await {
                    Ok(loaded) => {
                        apply_dark_mode(loaded.dark_mode);
                        settings.set(loaded);
                    }
                    Err(e) => log::warn!("Using default settings: {}", e),
                }
            });

            reload(dispatcher);

            set_timeout(PDF_PROBE_DELAY_MS, move || {
                let ready = platform::pdf_library_ready();
                if ready {
                    log::info!("PDF library loaded successfully");
                } else {
                    log::error!("PDF library not loaded");
                }
                pdf_ready.set(ready);
            });
            || ()
        });
    }

    // Poll the store while the popup is open
    {
        let dispatcher = state.dispatcher();
        use_effect_with(settings.refresh_millis(), move |millis| {
            let interval = millis.and_then(|ms| Interval::new(ms, move || reload(dispatcher.clone())));
            move || drop(interval)
        });
    }

    // Captures made while the popup is open show up immediately
    {
        let dispatcher = state.dispatcher();
        let toast = toast.clone();
        let rerender = rerender.clone();
        use_effect_with((), move |_| {
            let subscription = platform::listen(HIGHLIGHT_SAVED, move |data| {
                let text = serde_wasm_bindgen::from_value::<HighlightRecord>(data)
                    .map(|record| crate::view::saved_message(&record))
                    .unwrap_or_else(|_| "Highlight saved".to_string());
                let generation = toast.borrow_mut().show(text);
                rerender.force_update();

                let toast = toast.clone();
                let rerender = rerender.clone();
                set_timeout(TOAST_DISMISS_MS, move || {
                    if toast.borrow_mut().dismiss(generation) {
                        rerender.force_update();
                    }
                });
                reload(dispatcher.clone());
            });
            move || drop(subscription)
        });
    }

    let on_search = {
        let dispatcher = state.dispatcher();
        Callback::from(move |search: String| dispatcher.dispatch(PopupAction::Search(search)))
    };

    let on_range = {
        let dispatcher = state.dispatcher();
        Callback::from(move |range: DateRange| dispatcher.dispatch(PopupAction::Range(range)))
    };

    let on_tag = {
        let dispatcher = state.dispatcher();
        Callback::from(move |tag: Option<String>| dispatcher.dispatch(PopupAction::Tag(tag)))
    };

    let on_load_more = {
        let dispatcher = state.dispatcher();
        Callback::from(move |_: ()| dispatcher.dispatch(PopupAction::LoadMore))
    };

    // Delete by id against the full snapshot
    let on_delete = {
        let state = state.clone();
        let status = status.clone();
        Callback::from(move |id: String| {
            let mut store = HighlightStore::from_records(state.snapshot.clone());
            if store.remove(&id).is_some() {
                save_and_reload(store, state.dispatcher(), status.clone());
            }
        })
    };

    let on_clear_all = {
        let state = state.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let count = state.snapshot.len();
            if count == 0 {
                alert("No highlights to clear!");
                return;
            }
            let message = format!(
                "Are you sure you want to delete all {} highlights? This action cannot be undone.",
                count
            );
            if confirm(&message) {
                let mut store = HighlightStore::from_records(state.snapshot.clone());
                store.clear();
                save_and_reload(store, state.dispatcher(), status.clone());
            }
        })
    };

    let on_open_all = {
        let state = state.clone();
        Callback::from(move |_: MouseEvent| {
            let targets = state.link_targets();
            if targets.is_empty() {
                alert("No highlights with links to open!");
                return;
            }

            let links = unique_links(targets.iter().map(|h| h.source.as_str()));
            let narrowed = state.result.filtered() > 0 && state.result.filtered() < state.snapshot.len();
            let message = if narrowed {
                format!("Open all {} unique links from filtered results in new tabs?", links.len())
            } else {
                format!("Open all {} unique links in new tabs?", links.len())
            };

            if confirm(&message) {
                if let Err(e) = platform::open_tabs(&links) {
                    alert(&e.to_string());
                }
            }
        })
    };

    let on_menu_toggle = {
        let menu = menu.clone();
        Callback::from(move |_: ()| menu.set(menu.toggle()))
    };

    let on_menu_dismiss = {
        let menu = menu.clone();
        Callback::from(move |_: ()| menu.set(MenuState::Idle))
    };

    let on_menu_select = {
        let state = state.clone();
        let menu = menu.clone();
        let pdf_ready = pdf_ready.clone();
        let status = status.clone();

        Callback::from(move |action: ExportAction| {
            let snapshot = state.snapshot.clone();
            if action != ExportAction::ImportJson && snapshot.is_empty() {
                menu.set(MenuState::Idle);
                alert(&HighlightError::NothingToExport.to_string());
                return;
            }

            let (next, chosen) = menu.select(action, *pdf_ready);
            menu.set(next);
            let action = match chosen {
                Ok(action) => action,
                Err(e) => {
                    log::warn!("{}", e);
                    alert(&e.to_string());
                    return;
                }
            };

            match action {
                ExportAction::ExportJson => {
                    if let Err(e) = export_json(&snapshot) {
                        alert(&e.to_string());
                    }
                }
                ExportAction::ExportCsv => {
                    if let Err(e) = export_csv(&snapshot) {
                        alert(&e.to_string());
                    }
                }
                ExportAction::ExportPdf => {
                    status.set(PopupStatus::Working("Generating PDF...".to_string()));
                    let status = status.clone();
                    spawn_local(async move {
                        let result = export_pdf(&snapshot);
                        status.set(PopupStatus::Idle);
                        match result {
                            Ok(message) => alert(&message),
                            Err(e) => {
                                log::error!("PDF export error: {}", e);
                                alert(&e.to_string());
                            }
                        }
                    });
                }
                ExportAction::ImportJson => {
                    let dispatcher = state.dispatcher();
                    spawn_local(async move {
                        match import_json().await {
                            Ok(Some(message)) => {
                                reload(dispatcher);
                                alert(&message);
                            }
                            Ok(None) => {}
                            Err(e) => {
                                log::warn!("Import failed: {}", e);
                                alert(&e.to_string());
                            }
                        }
                    });
                }
            }
        })
    };

    let today = Local::now().date_naive();
    let visible = state.visible();
    let tags = HighlightStore::from_records(state.snapshot.clone()).tags();
    let busy = matches!(*status, PopupStatus::Working(_));

    html! {
        <div class="popup">
            <div class="header">
                <h1 class="popup-title">{"MarkIt"}</h1>
                <div class="stats">
                    <span class="total-count">{state.stats.total_label()}</span>
                    <span class="today-count">{state.stats.today_label()}</span>
                </div>
            </div>

            if let Some(message) = toast.borrow().message().map(str::to_string) {
                <Alert r#type={AlertType::Success} title={"Highlight Saved!"} inline={true}>
                    {message}
                </Alert>
            }

            {match &*status {
                PopupStatus::Working(msg) => html! {
                    <div class="loading-text-center">
                        <Spinner />
                        <p class="loading-text">{msg.clone()}</p>
                    </div>
                },
                PopupStatus::Error(err) => html! {
                    <div class="message-top-margin">
                        <Alert r#type={AlertType::Danger} title={"Error"} inline={true}>
                            {err.clone()}
                        </Alert>
                    </div>
                },
                PopupStatus::Idle => html! {}
            }}

            <FilterBar
                query={state.query.clone()}
                tags={tags}
                on_search={on_search}
                on_range={on_range}
                on_tag={on_tag}
            />

            if let Some(summary) = state.result.summary(&state.query) {
                <p class="search-results-info">{summary}</p>
            }

            <div class="actions">
                <ExportMenu
                    open={menu.is_open()}
                    actions={ExportAction::menu(settings.export_format)}
                    pdf_ready={*pdf_ready}
                    busy={busy}
                    on_toggle={on_menu_toggle}
                    on_dismiss={on_menu_dismiss}
                    on_select={on_menu_select}
                />
                <Button onclick={on_open_all} variant={ButtonVariant::Secondary}>
                    {"Open All Links"}
                </Button>
                <Button onclick={on_clear_all} variant={ButtonVariant::Danger}>
                    {"Clear All"}
                </Button>
            </div>

            <div class="highlights-container">
                if state.loaded && visible.is_empty() {
                    <EmptyState filtered={state.query.is_active()} />
                } else {
                    {for visible.iter().map(|highlight| html! {
                        <HighlightCard
                            key={highlight.id.clone()}
                            highlight={highlight.clone()}
                            search={state.query.search.clone()}
                            today={today}
                            on_delete={on_delete.clone()}
                        />
                    })}
                }
            </div>

            <Pagination
                info={state.pager.info(state.result.filtered())}
                label={state.pager.button_label(state.result.filtered())}
                has_more={state.has_more()}
                on_load_more={on_load_more}
            />
        </div>
    }
}
