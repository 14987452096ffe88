mod components;
mod providers;

use yew::prelude::*;

use pricewatch::config::PricesConfig;
use pricewatch::log::error;

use components::PriceTicker;
use providers::PricesProvider;

const CONFIG_JSON: &str = include_str!("../pricewatch.json");

fn load_config() -> PricesConfig {
    PricesConfig::from_json(CONFIG_JSON).unwrap_or_else(|err| {
        error!(error = %err, "Invalid pricewatch.json, using defaults");
        PricesConfig::default()
    })
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: PricesConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    html! {
        <PricesProvider config={props.config.clone()}>
            <div class="p-8 max-w-md mx-auto">
                <h1 class="text-2xl font-bold mb-4">{ "pricewatch" }</h1>
                <PriceTicker />
            </div>
        </PricesProvider>
    }
}

fn main() {
    pricewatch::log::setup().expect("Failed to setup logging");
    let config = load_config();
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_is_valid() {
        let config = PricesConfig::from_json(CONFIG_JSON).unwrap();
        assert_eq!(config.currencies, vec!["eur", "usd", "eth", "btc"]);
        assert_eq!(config.refresh_interval_millis(), 120_000);
    }
}
