#[macro_export]
/// Defines a Yew callback that clones the listed handles and runs an async body
/// on the local executor.
///
/// Without an event parameter:
/// ```compile_fail
/// let refresh: Callback<()> = async_callback!([feed, prices, status] {
///     match feed.fetch(&Prices::new()).await {
///         Ok(next) => prices.set(next),
///         Err(err) => status.set(FeedStatus::Error(err.to_string())),
///     }
/// });
/// ```
///
/// With an event parameter:
/// ```compile_fail
/// let on_click = async_callback!([feed, prices] |event| {
///     event.prevent_default();
///     if let Ok(next) = feed.fetch(&Prices::new()).await {
///         prices.set(next);
///     }
/// });
/// ```
///
/// Each listed variable is cloned once when the callback is built and again
/// on every invocation, so the async block owns its own handles.
macro_rules! async_callback {
    // Version without event parameter
    ([$($var:ident),* $(,)?] $body:expr) => {
        {
            $(let $var = $var.clone();)*
            Callback::from(move |_| {
                $(let $var = $var.clone();)*
                wasm_bindgen_futures::spawn_local(async move {
                    $body
                });
            })
        }
    };

    // Version with event parameter
    ([$($var:ident),* $(,)?] |$event:ident| $body:expr) => {
        {
            $(let $var = $var.clone();)*
            Callback::from(move |$event| {
                $(let $var = $var.clone();)*
                wasm_bindgen_futures::spawn_local(async move {
                    $body
                });
            })
        }
    };
}
