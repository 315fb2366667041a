use std::time::Duration;

/// The input name location results are published under.
pub const DEFAULT_INPUT_NAME: &str = "geolocation";

/// Digits kept after the decimal point when formatting coordinates.
pub const DEFAULT_FRACTION_DIGITS: usize = 12;

/// Options handed to the location provider for a single fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    /// Ask for the most precise positioning technology available.
    pub enable_high_accuracy: bool,
    /// Oldest cached fix the provider may answer with. Zero forces a fresh reading.
    pub maximum_age: Duration,
    /// How long the provider may take before failing with a timeout.
    pub timeout: Duration,
}

impl PositionOptions {
    /// High accuracy, no cached fixes, fail after five seconds.
    pub const ACCURATE: Self = Self {
        enable_high_accuracy: true,
        maximum_age: Duration::ZERO,
        timeout: Duration::from_millis(5000),
    };

    /// The maximum age in whole milliseconds, saturating at `u32::MAX`.
    pub fn maximum_age_millis(&self) -> u32 {
        saturating_millis(self.maximum_age)
    }

    /// The timeout in whole milliseconds, saturating at `u32::MAX`.
    pub fn timeout_millis(&self) -> u32 {
        saturating_millis(self.timeout)
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self::ACCURATE
    }
}

fn saturating_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// Configuration for a [`LocationRequest`](crate::LocationRequest).
///
/// The defaults are the values the exported browser entry points use. Embedders can override
/// them with the builder methods.
///
/// # Example
///
/// ```rust
/// use geolocation_input::Config;
///
/// let config = Config::new().input_name("device_location").fraction_digits(6);
/// assert_eq!(config.name(), "device_location");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub(crate) input_name: String,
    pub(crate) options: PositionOptions,
    pub(crate) fraction_digits: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_name: DEFAULT_INPUT_NAME.to_string(),
            options: PositionOptions::ACCURATE,
            fraction_digits: DEFAULT_FRACTION_DIGITS,
        }
    }
}

impl Config {
    /// Create a new config with the default input name and options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the input channel results are sent to.
    pub fn input_name(mut self, name: impl Into<String>) -> Self {
        self.input_name = name.into();
        self
    }

    /// Set the options passed to the location provider.
    pub fn options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Set how many digits are kept after the decimal point of each coordinate.
    pub fn fraction_digits(mut self, digits: usize) -> Self {
        self.fraction_digits = digits;
        self
    }

    /// The name of the input channel.
    pub fn name(&self) -> &str {
        &self.input_name
    }

    /// The options passed to the provider.
    pub fn position_options(&self) -> &PositionOptions {
        &self.options
    }
}
