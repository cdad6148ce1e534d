use crate::transport::envelope::{DecodeError, Envelope};
use crate::Route;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::{Channel, Consumer as LapinConsumer, Error as LapinError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Receives incoming [`Envelope`]s from the queue behind the [`Route`].
///
/// Consumes in **auto-acknowledge** mode (`no_ack: true`): the broker
/// considers a message delivered the moment it is handed over, before any
/// processing happens. A crash mid-processing therefore loses the in-flight
/// message with no redelivery. This mirrors the source system's behavior and
/// is preserved deliberately.
pub struct Subscriber {
    /// The globally unique name of this subscriber, for logging/debugging
    /// purposes. Doubles as the consumer tag.
    name: Arc<str>,
    /// The [`Route`] this subscriber consumes from.
    route: Route,
    /// The channel of the process-wide session.
    channel: Channel,
    /// The consumer, present once [`subscribe`](Subscriber::subscribe) has
    /// been called.
    consumer: Option<LapinConsumer>,
}

/// Represents failure on the inbound side of the transport.
#[derive(Error, Debug)]
pub enum SubscribeError {
    /// The queue declaration failed (e.g., a queue by that name already
    /// exists with conflicting options).
    #[error("failed to declare the queue from '{subscriber}': {source}")]
    Declaration {
        /// The subscriber that issued the declaration.
        subscriber: String,
        /// The underlying broker error.
        #[source]
        source: LapinError,
    },

    /// The `basic_consume` call failed.
    #[error("failed to start consuming from '{subscriber}': {source}")]
    Consume {
        /// The subscriber that tried to start consuming.
        subscriber: String,
        /// The underlying broker error.
        #[source]
        source: LapinError,
    },

    /// The consumer delivered a broker error instead of a message.
    #[error("received an error from the consumer of '{subscriber}': {source}")]
    Delivery {
        /// The subscriber that polled the delivery.
        subscriber: String,
        /// The underlying broker error.
        #[source]
        source: LapinError,
    },

    /// The consumer stream ended, which means the channel or connection is
    /// gone.
    #[error("the consumer of '{subscriber}' ran out of messages permanently")]
    Closed {
        /// The subscriber whose consumer dried out.
        subscriber: String,
    },

    /// A delivery arrived but its payload is not text.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// [`receive`](Subscriber::receive) was called before
    /// [`subscribe`](Subscriber::subscribe).
    #[error("attempted to receive on '{subscriber}' before subscribing")]
    NotSubscribed {
        /// The offending subscriber.
        subscriber: String,
    },
}

impl Subscriber {
    /// Creates and returns a new [`Subscriber`] on the given channel.
    ///
    /// The subscriber does not touch the broker until
    /// [`declare`](Subscriber::declare) and
    /// [`subscribe`](Subscriber::subscribe) are called.
    pub fn new(channel: Channel, route: Route) -> Self {
        let name = Self::compose_name(&route);

        Self {
            name,
            route,
            channel,
            consumer: None,
        }
    }

    /// Composes a globally unique, human-readable name for this
    /// [`Subscriber`].
    fn compose_name(route: &Route) -> Arc<str> {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);

        Arc::from(format!(
            "rabbitmq:sub:{}:{}",
            route.queue(),
            COUNTER.fetch_add(1, Ordering::Relaxed),
        ))
    }

    /// Reports the name of this [`Subscriber`].
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Subscriber {
    /// Declares the route's queue.
    ///
    /// The declaration is idempotent (non-passive, matching options), so it
    /// is safe to repeat across process restarts: an existing queue is reused
    /// with its contents intact.
    pub async fn declare(&self) -> Result<(), SubscribeError> {
        self.channel
            .queue_declare(
                self.route.queue(),
                QueueDeclareOptions {
                    passive: false,
                    durable: false,
                    exclusive: false,
                    auto_delete: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| SubscribeError::Declaration {
                subscriber: self.name.to_string(),
                source,
            })?;

        info!(
            subscriber = self.name.as_ref(),
            queue = self.route.queue(),
            "Declared the queue",
        );

        Ok(())
    }

    /// Initiates consuming of messages in auto-acknowledge mode.
    pub async fn subscribe(&mut self) -> Result<(), SubscribeError> {
        let consumer = self
            .channel
            .basic_consume(
                self.route.queue(),
                &self.name,
                BasicConsumeOptions {
                    no_local: false,
                    no_ack: true, // acknowledged on delivery, before processing
                    exclusive: false,
                    nowait: false,
                },
                FieldTable::default(),
            )
            .await
            .map_err(|source| SubscribeError::Consume {
                subscriber: self.name.to_string(),
                source,
            })?;

        self.consumer = Some(consumer);

        Ok(())
    }

    /// Receives a single message from the broker, blocking the calling task
    /// for as long as it takes for one to arrive. There is no timeout.
    ///
    /// Any delivery-level failure — a consumer error, a permanently closed
    /// stream, a non-text payload — is reported to the caller as-is. None of
    /// them is recoverable within this process.
    pub async fn receive(&mut self) -> Result<Envelope, SubscribeError> {
        let name = self.name.clone();

        let consumer = self
            .consumer
            .as_mut()
            .ok_or_else(|| SubscribeError::NotSubscribed {
                subscriber: name.to_string(),
            })?;

        // Block until the consumer yields
        let delivery = match consumer.next().await {
            Some(Ok(delivery)) => delivery,
            Some(Err(source)) => {
                return Err(SubscribeError::Delivery {
                    subscriber: name.to_string(),
                    source,
                });
            }
            None => {
                return Err(SubscribeError::Closed {
                    subscriber: name.to_string(),
                });
            }
        };

        // Decode the payload to text
        let envelope = Envelope::decode(delivery.data)?;

        info!(
            subscriber = name.as_ref(),
            payload = envelope.payload(),
            "Received a message",
        );

        Ok(envelope)
    }
}
