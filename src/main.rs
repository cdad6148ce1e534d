use pingback::{
    AppConfig, Publisher, Responder, ResponderError, Session, SessionError, Subscriber,
};
use std::process;
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Lumps together every runtime failure that kills the process. None of these
/// are retried; a surrounding supervisor owns restarts.
#[derive(Error, Debug)]
enum FatalError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Responder(#[from] ResponderError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Pick up a local .env file, if any
    let _ = dotenvy::dotenv();

    // Install logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Assemble the configuration; a configuration fault exits with status 1
    // before any connection attempt is made
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!(?error, error_message = %error, "Invalid configuration");
            process::exit(1);
        }
    };

    info!(
        broker = config.handle().identifier(),
        queue = config.route().queue(),
        start_with_message = config.start_with_message(),
        "Starting the echo-responder",
    );

    // Run until interrupted; any runtime fault is fatal
    if let Err(error) = run(&config).await {
        error!(?error, error_message = %error, "Fatal runtime failure");
        process::exit(2);
    }
}

/// Establishes the session, prepares the queue (and the optional seed
/// message), then races the receive-respond loop against an interrupt signal.
async fn run(config: &AppConfig) -> Result<(), FatalError> {
    // Connect exactly once
    let session = Session::establish(config.handle()).await?;

    // Wire both directions of the self-addressed route onto the one channel
    let publisher = Publisher::new(session.channel().clone(), config.route().clone());
    let subscriber = Subscriber::new(session.channel().clone(), config.route().clone());
    let mut responder = Responder::new(publisher, subscriber, config.work_delay());

    // Declare the queue, optionally seed, start consuming
    responder.prepare(config.start_with_message()).await?;

    info!("Waiting for messages; interrupt to exit");

    // The loop runs until a fatal error or an interrupt, whichever comes
    // first. There is no graceful drain of in-flight messages.
    let outcome = tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupt received; shutting down");
            Ok(())
        }
        result = responder.run() => result.map_err(FatalError::from),
    };

    session.close().await;

    outcome
}
