use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub booking: BookingRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookingRules {
    /// How many times a booking attempt is re-run when the store reports
    /// a concurrent write conflict before the error is surfaced.
    #[serde(default = "default_booking_attempts")]
    pub max_booking_attempts: u32,
}

fn default_booking_attempts() -> u32 {
    3
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            max_booking_attempts: default_booking_attempts(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .set_default("booking.max_booking_attempts", default_booking_attempts() as i64)?
            // Optional configuration files, layered lowest to highest
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // Environment overrides, e.g. SKYBOOK__BOOKING__MAX_BOOKING_ATTEMPTS=5
            .add_source(config::Environment::with_prefix("SKYBOOK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
