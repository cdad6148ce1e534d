use crate::transport::publisher::{PublishError, Publisher};
use crate::transport::subscriber::{SubscribeError, Subscriber};
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// Drives the receive-respond loop: block until a message arrives, pause for
/// the fixed simulated-work delay, compose a response embedding the original
/// text and a fresh random identifier, publish the response back to the same
/// queue.
///
/// Because the route is self-addressed, every response this process sends
/// will later be re-consumed and re-responded-to — by this instance or by a
/// peer pointed at the same queue. That unbounded ping-pong is the point of
/// the program, not an accident.
///
/// The loop owns the only consumer of the session, so processing is strictly
/// serialized: a second message is not even polled until the response to the
/// first has been published.
pub struct Responder {
    publisher: Publisher,
    subscriber: Subscriber,
    work_delay: Duration,
}

/// Represents a fatal failure inside the receive-respond loop. Nothing in
/// here is retried; the error propagates and kills the process.
#[derive(Error, Debug)]
pub enum ResponderError {
    /// The inbound side failed (declaration, consumption, or decoding).
    #[error(transparent)]
    Inbound(#[from] SubscribeError),

    /// The outbound side failed (transmission of a message).
    #[error(transparent)]
    Outbound(#[from] PublishError),
}

impl Responder {
    /// Creates a new [`Responder`] over the given transport pair.
    pub fn new(publisher: Publisher, subscriber: Subscriber, work_delay: Duration) -> Self {
        Self {
            publisher,
            subscriber,
            work_delay,
        }
    }

    /// Prepares the broker side and optionally publishes the seed message.
    ///
    /// The queue declaration comes first, so the seed message has somewhere
    /// to land; the seed (when enabled) is published before consumption
    /// starts.
    pub async fn prepare(&mut self, start_with_message: bool) -> Result<(), ResponderError> {
        self.subscriber.declare().await?;

        if start_with_message {
            info!("Starting with an initial message");

            self.publisher.publish(compose_seed()).await?;
        }

        self.subscriber.subscribe().await?;

        Ok(())
    }

    /// Runs the receive-respond loop until a fatal error occurs.
    ///
    /// This future never completes successfully; interruption comes from the
    /// outside, by dropping it when the process receives a shutdown signal.
    pub async fn run(&mut self) -> Result<(), ResponderError> {
        loop {
            self.step().await?;
        }
    }

    /// Performs a single iteration of the loop: block until a message
    /// arrives, pause for the simulated work, publish the response.
    pub async fn step(&mut self) -> Result<(), ResponderError> {
        // Block until a message arrives
        let envelope = self.subscriber.receive().await?;

        // Simulate some processing time
        tokio::time::sleep(self.work_delay).await;

        // Respond to the same queue
        let response = compose_response(envelope.payload());
        self.publisher.publish(response).await?;

        Ok(())
    }
}

/// Composes the one-off seed message, embedding a fresh random identifier.
pub fn compose_seed() -> String {
    format!("Initial message from {}", fresh_identifier())
}

/// Composes a response to the given received text, embedding both the
/// original text and a fresh random identifier.
pub fn compose_response(received: &str) -> String {
    format!("Response to '{}' from {}", received, fresh_identifier())
}

/// Generates a fresh random identifier for an outgoing message. UUIDv4
/// collisions are improbable enough that consecutive messages can be assumed
/// pairwise distinct.
fn fresh_identifier() -> Uuid {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn response_embeds_original_text() {
        // Given
        let received = "Initial message from 42";

        // When
        let response = compose_response(received);

        // Then
        assert!(response.contains(received));
        assert!(response.starts_with("Response to 'Initial message from 42' from "));
    }

    #[test]
    fn response_embeds_original_response() {
        // Given: a response can itself be responded to (self-addressed queue)
        let first = compose_response("ping");

        // When
        let second = compose_response(&first);

        // Then
        assert!(second.contains(&first));
    }

    #[test]
    fn seed_message_has_expected_shape() {
        // When
        let seed = compose_seed();

        // Then
        assert!(seed.starts_with("Initial message from "));
    }

    #[test]
    fn identifiers_are_distinct_across_messages() {
        // Given
        let mut identifiers = HashSet::new();

        // When
        for _ in 0..100 {
            let response = compose_response("payload");
            let identifier = response
                .rsplit(' ')
                .next()
                .expect("response ends with an identifier")
                .to_string();

            identifiers.insert(identifier);
        }

        // Then
        assert_eq!(identifiers.len(), 100);
    }

    #[test]
    fn identifier_parses_as_uuid() {
        // Given
        let seed = compose_seed();

        // When
        let identifier = seed.rsplit(' ').next().unwrap();

        // Then
        Uuid::parse_str(identifier).expect("identifier is a UUID");
    }
}
