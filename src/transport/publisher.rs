use crate::transport::dispatch::Dispatch;
use crate::Route;
use lapin::options::BasicPublishOptions;
use lapin::{BasicProperties, Channel, Error as LapinError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Publishes outgoing [`Dispatch`]es to the queue behind the [`Route`].
///
/// Messages go to the default exchange with the routing key equal to the
/// queue name, without any message properties — the minimal wire contract.
/// Publishing awaits network transmission only; broker-side confirmation is
/// out of scope, and a transmission failure is fatal to the process.
pub struct Publisher {
    /// The globally unique name of this publisher, for logging/debugging
    /// purposes.
    name: Arc<str>,
    /// The [`Route`] used by this publisher to transport outgoing dispatches.
    route: Route,
    /// The channel of the process-wide session.
    channel: Channel,
}

/// Represents a failure to transmit an outgoing message to the broker.
#[derive(Error, Debug)]
#[error("failed to publish a message from '{publisher}': {source}")]
pub struct PublishError {
    publisher: String,
    #[source]
    source: LapinError,
}

impl Publisher {
    /// Creates and returns a new [`Publisher`] on the given channel.
    pub fn new(channel: Channel, route: Route) -> Self {
        let name = Self::compose_name(&route);

        Self {
            name,
            route,
            channel,
        }
    }

    /// Composes a globally unique, human-readable name for this [`Publisher`].
    fn compose_name(route: &Route) -> Arc<str> {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        Arc::from(format!(
            "rabbitmq:pub:{}:{}",
            route.queue(),
            COUNTER.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// Reports the name of this [`Publisher`].
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Publisher {
    /// Publishes a single [`Dispatch`] to the route's queue and awaits its
    /// transmission over the network.
    pub async fn publish(&self, dispatch: impl Into<Dispatch>) -> Result<(), PublishError> {
        let dispatch = dispatch.into();

        // Publish the message
        let result = self
            .channel
            .basic_publish(
                self.route.exchange(),
                self.route.routing_key(),
                BasicPublishOptions::default(),
                dispatch.bytes(),
                BasicProperties::default(),
            )
            .await;

        // Inspect whether the message was pushed successfully
        match result {
            Ok(_confirm) => {
                info!(
                    publisher = self.name.as_ref(),
                    payload = String::from_utf8_lossy(dispatch.bytes()).as_ref(),
                    "Sent a message",
                );

                Ok(())
            }
            Err(error) => {
                error!(
                    publisher = self.name.as_ref(),
                    ?error,
                    error_message = %error,
                    byte_preview = String::from_utf8_lossy(dispatch.bytes()).as_ref(),
                    "Failed to publish a message (did not transmit over network)",
                );

                Err(PublishError {
                    publisher: self.name.to_string(),
                    source: error,
                })
            }
        }
    }
}
