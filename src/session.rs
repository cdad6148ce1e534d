use crate::Handle;
use lapin::{Channel, Connection, ConnectionProperties, Error as LapinError};
use thiserror::Error;
use tracing::{info, warn};

/// Holds the one live connection of this process to the RabbitMQ broker,
/// along with the one channel created on it.
///
/// A session is established exactly once at startup. There is deliberately no
/// reconnection state machine: if the connection cannot be established, or
/// drops later, the resulting error propagates and the process dies. A
/// surrounding supervisor owns restarts.
pub struct Session {
    connection: Connection,
    channel: Channel,
}

/// Represents a failure to establish the broker session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The connection to the broker could not be established.
    #[error("failed to establish a RabbitMQ connection: {0}")]
    Connection(#[source] LapinError),

    /// The connection was established, but a channel could not be created on
    /// it.
    #[error("failed to create a RabbitMQ channel: {0}")]
    Channel(#[source] LapinError),
}

impl Session {
    /// Establishes a [`Session`] for the given [`Handle`]: one connection,
    /// one channel, with the current Tokio context wired in as the executor
    /// and reactor.
    pub async fn establish(handle: impl AsRef<Handle>) -> Result<Self, SessionError> {
        let handle = handle.as_ref();

        // Set up the connection properties to use the current Tokio context
        let connection_properties = ConnectionProperties::default()
            .with_executor(tokio_executor_trait::Tokio::current())
            .with_reactor(tokio_reactor_trait::Tokio);

        // Establish the connection
        let connection = Connection::connect(handle.dsn().unsecure(), connection_properties)
            .await
            .map_err(SessionError::Connection)?;

        info!(
            identifier = handle.identifier(),
            "Established a RabbitMQ connection",
        );

        // Create the channel
        let channel = connection
            .create_channel()
            .await
            .map_err(SessionError::Channel)?;

        Ok(Self {
            connection,
            channel,
        })
    }

    /// Exposes the channel of this session.
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// Closes the underlying connection, best-effort. In-flight messages are
    /// not drained.
    pub async fn close(self) {
        let result = self.connection.close(0, "Process shutting down").await;

        match result {
            Ok(_) => info!("Closed the RabbitMQ connection"),
            Err(LapinError::InvalidConnectionState(_)) => {
                info!("Discarded a previously lost RabbitMQ connection")
            }
            Err(error) => warn!(
                ?error,
                error_message = %error,
                "Failed to cleanly close the RabbitMQ connection",
            ),
        }
    }
}
