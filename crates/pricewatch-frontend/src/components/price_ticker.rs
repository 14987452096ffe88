use yew::prelude::*;

use pricewatch::data::format_price;

use crate::providers::{FeedStatus, use_prices};

fn format_updated_at(updated_at: f64) -> String {
    let date = js_sys::Date::new(&updated_at.into());
    String::from(date.to_locale_time_string("default"))
}

#[function_component(PriceTicker)]
pub fn price_ticker() -> Html {
    let context = use_prices();

    let on_refresh = {
        let refresh = context.refresh.clone();
        Callback::from(move |_: MouseEvent| refresh.emit(()))
    };

    let status = match &context.status {
        FeedStatus::Loading => html! {
            <span class="text-yellow-600">{ "Loading..." }</span>
        },
        FeedStatus::Ready { updated_at } => html! {
            <span class="text-green-600">{ format!("Updated {}", format_updated_at(*updated_at)) }</span>
        },
        FeedStatus::Error(err) => html! {
            <span class="text-red-600" title={err.clone()}>{ "Showing last known prices" }</span>
        },
    };

    html! {
        <div class="p-4 border border-gray-200 rounded">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">{ "Spot prices" }</h2>
                <button
                    class="bg-blue-600 text-white px-4 py-2 rounded hover:bg-blue-700 cursor-pointer"
                    onclick={on_refresh}
                >
                    { "Refresh" }
                </button>
            </div>

            <table class="w-full text-left">
                <tbody>
                    {
                        context.prices.iter().map(|(currency, price)| {
                            html! {
                                <tr key={currency.to_string()}>
                                    <td class="py-1 font-medium uppercase">{ currency }</td>
                                    <td class="py-1 font-mono text-right">{ format_price(price, currency) }</td>
                                </tr>
                            }
                        }).collect::<Html>()
                    }
                </tbody>
            </table>

            <div class="mt-4 text-sm">{ status }</div>
        </div>
    }
}
