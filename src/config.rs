use crate::handle::{DsnChunks, Handle};
use crate::route::Route;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// The environment variable that carries the broker host. This is the only
/// required piece of configuration.
pub const ENV_HOST: &str = "RABBITMQ_HOST";

/// The environment variable that carries the broker port.
pub const ENV_PORT: &str = "RABBITMQ_PORT";

/// The environment variable that carries the broker username.
pub const ENV_USER: &str = "RABBITMQ_USER";

/// The environment variable that carries the broker password.
pub const ENV_PASSWORD: &str = "RABBITMQ_PASSWORD";

/// The environment variable that carries the broker virtual host.
pub const ENV_VHOST: &str = "RABBITMQ_VHOST";

/// The environment variable that carries the queue name.
pub const ENV_QUEUE: &str = "RABBITMQ_QUEUE";

/// The environment variable that enables publishing the seed message before
/// entering the consume loop. Recognizes a case-insensitive `"true"`.
pub const ENV_START_WITH_MESSAGE: &str = "START_WITH_MESSAGE";

/// The environment variable that overrides the simulated per-message work
/// delay. Accepts human-readable durations (e.g. `2s`, `150ms`).
pub const ENV_WORK_DELAY: &str = "WORK_DELAY";

const DEFAULT_QUEUE: &str = "test_queue";
const DEFAULT_WORK_DELAY: Duration = Duration::from_secs(2);

/// Represents the complete application configuration, assembled once at
/// startup from the environment and passed by reference from there on.
///
/// There is deliberately no global or lazily initialized instance of this
/// struct: the entrypoint owns it.
#[derive(Debug)]
pub struct AppConfig {
    handle: Handle,
    route: Route,
    start_with_message: bool,
    work_delay: Duration,
}

/// Represents a configuration value that is either missing while required, or
/// present but malformed.
///
/// Every variant is fatal: the process reports it and exits with status 1
/// before attempting any connection.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The required broker host variable is not set.
    #[error("environment variable '{ENV_HOST}' is not set")]
    MissingHost,

    /// The broker port variable is set but does not parse as a port number.
    #[error("environment variable '{ENV_PORT}' does not hold a valid port: '{0}'")]
    MalformedPort(String),

    /// The work delay variable is set but does not parse as a duration.
    #[error("environment variable '{ENV_WORK_DELAY}' does not hold a valid duration: '{0}'")]
    MalformedWorkDelay(String),
}

impl AppConfig {
    /// Assembles the [`AppConfig`] from the process environment.
    ///
    /// The broker host is required; everything else falls back on a default.
    /// Malformed optional values are still reported as errors, rather than
    /// silently replaced with defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(ENV_HOST).map_err(|_| ConfigError::MissingHost)?;
        let port = Self::read_port()?;
        let user = env::var(ENV_USER).unwrap_or_else(|_| Handle::default_user().to_string());
        let password =
            env::var(ENV_PASSWORD).unwrap_or_else(|_| Handle::default_password().to_string());
        let vhost = env::var(ENV_VHOST).unwrap_or_else(|_| Handle::default_vhost().to_string());

        let handle = Handle::new(DsnChunks {
            host,
            port,
            user,
            password,
            vhost,
        });

        let queue = env::var(ENV_QUEUE).unwrap_or_else(|_| DEFAULT_QUEUE.to_string());
        let route = Route::new(queue);

        let start_with_message = Self::read_start_with_message();
        let work_delay = Self::read_work_delay()?;

        Ok(Self {
            handle,
            route,
            start_with_message,
            work_delay,
        })
    }

    /// Reads the broker port, falling back on the protocol default.
    fn read_port() -> Result<u16, ConfigError> {
        match env::var(ENV_PORT) {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::MalformedPort(raw)),
            Err(_) => Ok(Handle::default_port()),
        }
    }

    /// Reads the seed-message flag. Only a case-insensitive `"true"` enables
    /// it; anything else (including absence) leaves it off.
    fn read_start_with_message() -> bool {
        env::var(ENV_START_WITH_MESSAGE)
            .map(|raw| raw.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Reads the simulated work delay, falling back on the stock two seconds.
    fn read_work_delay() -> Result<Duration, ConfigError> {
        match env::var(ENV_WORK_DELAY) {
            Ok(raw) => humantime::parse_duration(&raw)
                .map_err(|_| ConfigError::MalformedWorkDelay(raw)),
            Err(_) => Ok(DEFAULT_WORK_DELAY),
        }
    }
}

impl AppConfig {
    /// Exposes the connection [`Handle`] for this configuration.
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Exposes the self-addressed [`Route`] for this configuration.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// Reports whether a seed message should be published before the consume
    /// loop starts.
    pub fn start_with_message(&self) -> bool {
        self.start_with_message
    }

    /// Reports the fixed simulated-work delay applied to every consumed
    /// message.
    pub fn work_delay(&self) -> Duration {
        self.work_delay
    }
}

impl AsRef<AppConfig> for AppConfig {
    fn as_ref(&self) -> &AppConfig {
        self
    }
}
