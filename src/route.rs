use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Defines the single, self-addressed message route of this application.
///
/// Both directions of traffic go through the same queue: messages are
/// published to the default exchange with the routing key equal to the queue
/// name, and consumed from that same queue. This is why every consumed
/// message is a candidate to be responded to — nothing distinguishes
/// "messages this process sent" from "messages to respond to".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    queue: Arc<str>,
}

impl Route {
    /// Creates a new [`Route`] around the given queue name.
    pub fn new(queue: impl AsRef<str>) -> Self {
        Self {
            queue: Arc::from(queue.as_ref()),
        }
    }

    /// Reports the queue name of this route.
    pub fn queue(&self) -> &str {
        &self.queue
    }

    /// Reports the exchange to publish into. The wire contract uses the
    /// default (nameless) exchange.
    pub fn exchange(&self) -> &str {
        ""
    }

    /// Reports the routing key to publish with. On the default exchange the
    /// routing key is the destination queue name.
    pub fn routing_key(&self) -> &str {
        &self.queue
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.write_str(&self.queue)
    }
}

impl AsRef<Route> for Route {
    fn as_ref(&self) -> &Route {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn routing_key_matches_queue() {
        // Given
        let route = Route::new("test_queue");

        // Then
        assert_eq!(route.queue(), "test_queue");
        assert_eq!(route.routing_key(), route.queue());
        assert_eq!(route.exchange(), "");
    }
}
