/// Options page: theme, refresh interval and preferred export format

use crate::platform;
use crate::settings::{ExportFormat, Settings};
use crate::ui::{apply_dark_mode, set_timeout};
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// How long the "Saved!" confirmation stays visible
const STATUS_CLEAR_MS: i32 = 1500;

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let settings = use_state(Settings::default);
    let status = use_state(String::new);

    // Restore saved settings on mount
    {
        let settings = settings.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match platform::load_settings().await {
                    Ok(loaded) => {
                        apply_dark_mode(loaded.dark_mode);
                        settings.set(loaded);
                    }
                    Err(e) => log::error!("{}", e),
                }
            });
            || ()
        });
    }

    let on_dark_mode = {
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                settings.set(Settings {
                    dark_mode: input.checked(),
                    ..(*settings).clone()
                });
            }
        })
    };

    let on_refresh = {
        let settings = settings.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                // Blank or invalid input means polling off
                let refresh_interval = input.value().trim().parse().unwrap_or(0);
                settings.set(Settings {
                    refresh_interval,
                    ..(*settings).clone()
                });
            }
        })
    };

    let on_format = {
        let settings = settings.clone();
        Callback::from(move |e: Event| {
            let format = e
                .target_dyn_into::<HtmlSelectElement>()
                .and_then(|select| ExportFormat::from_key(&select.value()));
            if let Some(export_format) = format {
                settings.set(Settings {
                    export_format,
                    ..(*settings).clone()
                });
            }
        })
    };

    let on_save = {
        let settings = settings.clone();
        let status = status.clone();
        Callback::from(move |_: MouseEvent| {
            let settings = (*settings).clone();
            let status = status.clone();
            spawn_local(async move {
                match platform::save_settings(&settings).await {
                    Ok(_) => {
                        apply_dark_mode(settings.dark_mode);
                        status.set("Saved!".to_string());
                        let status = status.clone();
                        set_timeout(STATUS_CLEAR_MS, move || status.set(String::new()));
                    }
                    Err(e) => {
                        log::error!("{}", e);
                        status.set(e.to_string());
                    }
                }
            });
        })
    };

    html! {
        <div class="options">
            <h1 class="main-title">{"MarkIt Settings"}</h1>

            <label class="option-row">
                <input type="checkbox" checked={settings.dark_mode} onchange={on_dark_mode} />
                {"Dark mode"}
            </label>

            <label class="option-row">
                {"Refresh interval (seconds, 0 = off)"}
                <input
                    type="number"
                    min="0"
                    value={settings.refresh_interval.to_string()}
                    oninput={on_refresh}
                />
            </label>

            <label class="option-row">
                {"Preferred export format"}
                <select onchange={on_format}>
                    {for ExportFormat::ALL.iter().map(|format| html! {
                        <option value={format.key()} selected={*format == settings.export_format}>
                            {format.label()}
                        </option>
                    })}
                </select>
            </label>

            <Button onclick={on_save} variant={ButtonVariant::Primary}>
                {"Save"}
            </Button>
            <span class="status">{(*status).clone()}</span>
        </div>
    }
}
