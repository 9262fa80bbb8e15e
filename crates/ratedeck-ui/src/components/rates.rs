use std::cell::Cell;
use std::rc::Rc;

use crate::components::toast::use_toast;
use crate::core::rates::{DEFAULT_BASE, Trend, format_rate, load_summary};
use crate::services::api::ApiClient;
use ratedeck_api_models::{Currency, CurrencyRate};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

#[derive(Clone, Debug, PartialEq)]
enum LoadState {
    Loading,
    Ready(Vec<CurrencyRate>),
    Failed(String),
}

#[derive(Properties, PartialEq)]
pub(crate) struct RatesPanelProps {
    pub client: ApiClient,
}

#[function_component(RatesPanel)]
pub(crate) fn rates_panel(props: &RatesPanelProps) -> Html {
    let base = use_state(|| DEFAULT_BASE);
    let load = use_state(|| LoadState::Loading);
    let toast = use_toast();
    {
        let load = load.clone();
        let client = props.client.clone();
        use_effect_with_deps(
            move |base: &Currency| {
                let base = *base;
                let stale = Rc::new(Cell::new(false));
                load.set(LoadState::Loading);
                {
                    let stale = stale.clone();
                    spawn_local(async move {
                        let result = client.fetch_rates(base).await;
                        if stale.get() {
                            return;
                        }
                        match result {
                            Ok(rows) => {
                                if let Some(toast) = &toast {
                                    let (kind, message) = load_summary(base, &rows);
                                    toast.show(message, kind);
                                }
                                load.set(LoadState::Ready(rows));
                            }
                            Err(err) => {
                                let message = err.to_string();
                                if let Some(toast) = &toast {
                                    toast.error(message.clone());
                                }
                                load.set(LoadState::Failed(message));
                            }
                        }
                    });
                }
                move || stale.set(true)
            },
            *base,
        );
    }

    let on_change = {
        let base = base.clone();
        Callback::from(move |event: Event| {
            if let Some(select) = event.target_dyn_into::<HtmlSelectElement>()
                && let Ok(currency) = select.value().parse::<Currency>()
            {
                base.set(currency);
            }
        })
    };

    let body = match &*load {
        LoadState::Loading => html! {
            <p class="rates__status"><i class="fa fa-spinner fa-spin" aria-hidden="true"></i>{" Loading rates\u{2026}"}</p>
        },
        LoadState::Failed(message) => html! {
            <p class="rates__status rates__status--error">{message.clone()}</p>
        },
        LoadState::Ready(rows) => html! {
            <table class="rates__table">
                <thead>
                    <tr>
                        <th>{"Pair"}</th>
                        <th>{"Spot"}</th>
                        <th>{"Month avg"}</th>
                        <th>{"Year avg"}</th>
                    </tr>
                </thead>
                <tbody>{for rows.iter().map(render_row)}</tbody>
            </table>
        },
    };

    html! {
        <main class="rates">
            <header class="rates__header">
                <h1><i class="fa fa-line-chart" aria-hidden="true"></i>{" Ratedeck"}</h1>
                <label class="rates__picker">
                    {"Base currency "}
                    <select onchange={on_change}>
                        {for Currency::ALL.iter().map(|currency| html! {
                            <option value={currency.code()} selected={*currency == *base}>
                                {currency.code().to_uppercase()}
                            </option>
                        })}
                    </select>
                </label>
            </header>
            {body}
        </main>
    }
}

fn render_row(row: &CurrencyRate) -> Html {
    let trend = Trend::between(row.rate, row.mtd);
    html! {
        <tr>
            <td>{format!("{}/{}", row.from.to_uppercase(), row.to.to_uppercase())}</td>
            <td><i class={trend.icon()} aria-hidden="true"></i>{" "}{format_rate(row.rate)}</td>
            <td>{format_rate(row.mtd)}</td>
            <td>{format_rate(row.ytd)}</td>
        </tr>
    }
}
