use chrono::{DateTime, Utc};

use crate::{
    Capability, Config, FixResolver, InputSink, LocateError, LocationProvider, LocationResult,
    SinkError,
};

/// The wall clock used to stamp fixes when they arrive.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system time. In the browser this is `Date.now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// How a [`LocationRequest`] ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The input channel accepted the message.
    Delivered(LocationResult),

    /// A message was produced but the input channel refused it.
    Rejected {
        result: LocationResult,
        error: SinkError,
    },

    /// No message was produced: the capability was missing or the provider never answered.
    Skipped(LocateError),
}

impl Outcome {
    /// The message this request produced, whether or not it was accepted.
    pub fn result(&self) -> Option<&LocationResult> {
        match self {
            Self::Delivered(result) | Self::Rejected { result, .. } => Some(result),
            Self::Skipped(_) => None,
        }
    }
}

/// One fire-and-forget location request.
///
/// A request asks its provider for a single fresh fix and pushes exactly one
/// [`LocationResult`] to its sink. The exception is a missing provider: that is logged
/// and the sink hears nothing.
///
/// ```rust
/// # use geolocation_input::*;
/// # use futures::executor::block_on;
/// struct Fixed;
/// impl LocationProvider for Fixed {
///     fn get_fix(&self, _: &PositionOptions, resolver: FixResolver) {
///         resolver.succeed(Coordinates::new(37.42199999999, -122.084));
///     }
/// }
///
/// struct Print;
/// impl InputSink for Print {
///     fn send(&self, name: &str, value: &LocationResult) -> Result<(), SinkError> {
///         println!("{name}: {value:?}");
///         Ok(())
///     }
/// }
///
/// let outcome = block_on(LocationRequest::new(Capability::Available(Fixed), Print).send());
/// assert!(matches!(outcome, Outcome::Delivered(LocationResult::Fix { .. })));
/// ```
pub struct LocationRequest<P, S, C = SystemClock> {
    capability: Capability<P>,
    sink: S,
    clock: C,
    config: Config,
}

impl<P, S> LocationRequest<P, S> {
    pub fn new(capability: Capability<P>, sink: S) -> Self {
        Self {
            capability,
            sink,
            clock: SystemClock,
            config: Config::default(),
        }
    }
}

impl<P, S, C> LocationRequest<P, S, C> {
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Stamp fixes with a different clock.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> LocationRequest<P, S, C2> {
        LocationRequest {
            capability: self.capability,
            sink: self.sink,
            clock,
            config: self.config,
        }
    }
}

impl<P, S, C> LocationRequest<P, S, C>
where
    P: LocationProvider,
    S: InputSink,
    C: Clock,
{
    /// Run the request to completion.
    pub async fn send(self) -> Outcome {
        let provider = match self.capability {
            Capability::Available(provider) => provider,
            Capability::Unavailable => {
                let error = LocateError::Unavailable;
                tracing::error!("{error}");
                return Outcome::Skipped(error);
            }
        };

        let (resolver, receiver) = FixResolver::channel();
        provider.get_fix(&self.config.options, resolver);

        let result = match receiver.await {
            Ok(Ok(coordinates)) => {
                let result = LocationResult::fix(
                    coordinates,
                    self.clock.now(),
                    self.config.fraction_digits,
                );
                if let LocationResult::Fix { lat, long, .. } = &result {
                    tracing::info!("Latitude: {lat}, Longitude: {long}");
                }
                result
            }
            Ok(Err(error)) => {
                let result = LocationResult::error(&error);
                tracing::error!("{}", LocateError::FixFailed(error));
                result
            }
            Err(_canceled) => {
                let error = LocateError::Abandoned;
                tracing::warn!("{error}");
                return Outcome::Skipped(error);
            }
        };

        // keep the provider alive until it has answered
        drop(provider);

        match self.sink.send(&self.config.input_name, &result) {
            Ok(()) => Outcome::Delivered(result),
            Err(error) => {
                tracing::error!("{error}");
                Outcome::Rejected { result, error }
            }
        }
    }
}
