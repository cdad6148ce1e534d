#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![cfg_attr(test, deny(warnings))]

/// Exposes the environment-driven application configuration.
mod config;
pub use self::config::{
    AppConfig, ConfigError, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_QUEUE, ENV_START_WITH_MESSAGE,
    ENV_USER, ENV_VHOST, ENV_WORK_DELAY,
};

/// Exposes a handle for defining a set of connection credentials.
mod handle;
pub use self::handle::{DsnChunks, Handle};

/// Exposes the single self-addressed message route.
mod route;
pub use self::route::Route;

/// Exposes the connect-once broker session.
mod session;
pub use self::session::{Session, SessionError};

/// Exposes machinery for transporting incoming and outgoing messages.
mod transport {
    pub mod dispatch;
    pub mod envelope;
    pub mod publisher;
    pub mod subscriber;
}

// Re-export outbound types
pub use self::transport::dispatch::Dispatch;
pub use self::transport::publisher::{PublishError, Publisher};

// Re-export inbound types
pub use self::transport::envelope::{DecodeError, Envelope};
pub use self::transport::subscriber::{SubscribeError, Subscriber};

/// Exposes the receive-respond loop.
mod responder;
pub use self::responder::{compose_response, compose_seed, Responder, ResponderError};
