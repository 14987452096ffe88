//! Polls the price feed and shares the last-known prices with the component tree.

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable};
use gloo_events::EventListener;
use gloo_storage::{LocalStorage, Storage};
use gloo_timers::callback::Interval;
use yew::prelude::*;

use pricewatch::async_callback;
use pricewatch::config::PricesConfig;
use pricewatch::data::Prices;
use pricewatch::feed::PriceFeed;
use pricewatch::log::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum FeedStatus {
    Loading,
    /// Last refresh succeeded at `updated_at` (ms since the epoch).
    Ready { updated_at: f64 },
    /// Last refresh failed; prices are the last known values.
    Error(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricesContext {
    pub prices: Prices,
    pub status: FeedStatus,
    pub refresh: Callback<()>,
}

#[derive(Properties, PartialEq)]
pub struct PricesProviderProps {
    pub children: Children,
    #[prop_or_default]
    pub config: PricesConfig,
}

fn initial_prices(config: &PricesConfig) -> Prices {
    let mut prices = Prices::initial(config.currencies.as_slice());
    if config.persist {
        if let Ok(cached) = LocalStorage::get::<Prices>(config.storage_key()) {
            debug!(entries = cached.len(), "[prices] Restored cached prices");
            prices.merge(cached);
        }
    }
    prices
}

#[function_component(PricesProvider)]
pub fn prices_provider(props: &PricesProviderProps) -> Html {
    let feed = use_memo(props.config.clone(), |config| {
        PriceFeed::coingecko(config.clone())
    });
    let prices = use_state(|| initial_prices(&props.config));
    let status = use_state(|| FeedStatus::Loading);

    // Read by the refresh task, which outlives the render that spawned it.
    let latest = use_mut_ref(|| (*prices).clone());
    let in_flight = use_mut_ref(|| false);
    let abort: Rc<RefCell<Option<AbortHandle>>> = use_mut_ref(|| None);

    let refresh: Callback<()> = async_callback!([feed, prices, status, latest, in_flight, abort] {
        if *in_flight.borrow() {
            debug!("[prices] Refresh already in flight");
            return;
        }
        *in_flight.borrow_mut() = true;

        let (handle, registration) = AbortHandle::new_pair();
        *abort.borrow_mut() = Some(handle);

        let previous = latest.borrow().clone();
        let cycle = {
            let feed = feed.clone();
            async move { feed.fetch(&previous).await }
        };

        let result = match Abortable::new(cycle, registration).await {
            Ok(result) => result,
            Err(_) => {
                debug!("[prices] Refresh aborted");
                return;
            }
        };

        match result {
            Ok(next) => {
                let config = feed.config();
                if config.persist {
                    if let Err(err) = LocalStorage::set(config.storage_key(), &next) {
                        warn!(error = %err, "[prices] Could not cache prices");
                    }
                }
                *latest.borrow_mut() = next.clone();
                prices.set(next);
                status.set(FeedStatus::Ready {
                    updated_at: js_sys::Date::now(),
                });
            }
            Err(err) => {
                warn!(error = %err, "[prices] Refresh failed, keeping last known prices");
                status.set(FeedStatus::Error(err.to_string()));
            }
        }

        *abort.borrow_mut() = None;
        *in_flight.borrow_mut() = false;
    });

    use_effect_with(props.config.clone(), {
        let refresh = refresh.clone();
        let in_flight = in_flight.clone();
        let abort = abort.clone();

        move |config: &PricesConfig| {
            refresh.emit(());

            let interval = {
                let refresh = refresh.clone();
                Interval::new(config.refresh_interval_millis(), move || refresh.emit(()))
            };

            let focus_listener = config
                .revalidate_on_focus
                .then(web_sys::window)
                .flatten()
                .map(|window| {
                    let refresh = refresh.clone();
                    EventListener::new(&window, "focus", move |_| refresh.emit(()))
                });

            // Cleanup function
            move || {
                drop(interval);
                drop(focus_listener);
                if let Some(handle) = abort.borrow_mut().take() {
                    handle.abort();
                }
                *in_flight.borrow_mut() = false;
            }
        }
    });

    let context = PricesContext {
        prices: (*prices).clone(),
        status: (*status).clone(),
        refresh,
    };

    html! {
        <ContextProvider<PricesContext> context={context}>
            {props.children.clone()}
        </ContextProvider<PricesContext>>
    }
}

/// Access the prices published by the nearest [`PricesProvider`].
#[hook]
pub fn use_prices() -> PricesContext {
    use_context::<PricesContext>().expect("use_prices must be used within a PricesProvider")
}
