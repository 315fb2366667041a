//! Browser bindings: the `navigator.geolocation` provider, the input sinks, and the functions
//! exported to JavaScript.

use std::{cell::RefCell, rc::Rc, str::FromStr};

use js_sys::Function;
use serde::Serialize;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};
use wasm_bindgen::{prelude::*, JsCast};

use crate::{
    Capability, Coordinates, FixResolver, InputSink, LocationProvider, LocationRequest,
    LocationResult, PositionError, PositionErrorCode, PositionOptions, SinkError,
};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = Shiny, js_name = setInputValue)]
    fn shiny_set_input_value(name: &str, value: &JsValue) -> Result<(), JsValue>;
}

/// The browser's `navigator.geolocation`.
pub struct BrowserGeolocation {
    geolocation: web_sys::Geolocation,
}

impl BrowserGeolocation {
    /// Look up `navigator.geolocation`, treating a missing window, navigator or property as
    /// unavailable.
    pub fn detect() -> Capability<Self> {
        let Some(window) = web_sys::window() else {
            return Capability::Unavailable;
        };

        match js_sys::Reflect::get(&window.navigator(), &JsValue::from_str("geolocation")) {
            Ok(value) if !value.is_undefined() && !value.is_null() => {
                Capability::Available(Self {
                    geolocation: value.unchecked_into(),
                })
            }
            _ => Capability::Unavailable,
        }
    }
}

impl LocationProvider for BrowserGeolocation {
    fn get_fix(&self, options: &PositionOptions, resolver: FixResolver) {
        // Whichever callback runs first takes the resolver. The other closure is never called
        // and stays allocated on the JS side.
        let resolver = Rc::new(RefCell::new(Some(resolver)));

        let on_success = Closure::once_into_js({
            let resolver = resolver.clone();
            move |position: web_sys::Position| {
                if let Some(resolver) = resolver.borrow_mut().take() {
                    let coords = position.coords();
                    resolver.succeed(Coordinates::new(coords.latitude(), coords.longitude()));
                }
            }
        });

        let on_error = Closure::once_into_js({
            let resolver = resolver.clone();
            move |error: web_sys::PositionError| {
                if let Some(resolver) = resolver.borrow_mut().take() {
                    resolver.fail(PositionError::new(error.code(), error.message()));
                }
            }
        });

        let js_options = web_sys::PositionOptions::new();
        js_options.set_enable_high_accuracy(options.enable_high_accuracy);
        js_options.set_maximum_age(options.maximum_age_millis());
        js_options.set_timeout(options.timeout_millis());

        if let Err(err) = self.geolocation.get_current_position_with_error_callback_and_options(
            on_success.unchecked_ref::<Function>(),
            Some(on_error.unchecked_ref::<Function>()),
            &js_options,
        ) {
            if let Some(resolver) = resolver.borrow_mut().take() {
                resolver.fail(PositionError::new(
                    PositionErrorCode::PositionUnavailable,
                    describe(&err),
                ));
            }
        }
    }
}

/// Sends results to a Shiny app with `Shiny.setInputValue`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShinyInput;

impl InputSink for ShinyInput {
    fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError> {
        let value = to_js(name, value)?;
        shiny_set_input_value(name, &value).map_err(|err| SinkError::new(name, describe(&err)))
    }
}

/// Sends results to an arbitrary JS function called as `callback(name, value)`.
#[derive(Debug, Clone)]
pub struct CallbackInput {
    callback: Function,
}

impl CallbackInput {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl InputSink for CallbackInput {
    fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError> {
        let value = to_js(name, value)?;
        self.callback
            .call2(&JsValue::NULL, &JsValue::from_str(name), &value)
            .map(|_| ())
            .map_err(|err| SinkError::new(name, describe(&err)))
    }
}

fn to_js(name: &str, value: &LocationResult) -> Result<JsValue, SinkError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| SinkError::new(name, err.to_string()))
}

fn describe(err: &JsValue) -> String {
    if let Some(error) = err.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// Request a fresh, high-accuracy fix and send it to the Shiny input `geolocation`.
///
/// Returns immediately; the result arrives through `Shiny.setInputValue`.
#[wasm_bindgen(js_name = requestAccurateLocation)]
pub fn request_accurate_location() {
    let request = LocationRequest::new(BrowserGeolocation::detect(), ShinyInput);
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = request.send().await;
        tracing::trace!("location request finished: {outcome:?}");
    });
}

/// Like [`request_accurate_location`], but delivers to `callback(name, value)` instead of Shiny.
#[wasm_bindgen(js_name = requestAccurateLocationWith)]
pub fn request_accurate_location_with(callback: Function) {
    let request = LocationRequest::new(BrowserGeolocation::detect(), CallbackInput::new(callback));
    wasm_bindgen_futures::spawn_local(async move {
        let outcome = request.send().await;
        tracing::trace!("location request finished: {outcome:?}");
    });
}

/// Route `tracing` output to the browser console.
///
/// `level` is a level name such as `"debug"`; anything unrecognized means `info`. Calling this
/// more than once keeps the first subscriber.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: Option<String>) {
    let level = level
        .as_deref()
        .and_then(|level| Level::from_str(level).ok())
        .unwrap_or(Level::INFO);

    let layer = WASMLayer::new(WASMLayerConfigBuilder::new().set_max_level(level).build());
    let subscriber = tracing_subscriber::registry().with(layer);

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::trace!("logging was already initialized");
    }
}
