use pingback::{DsnChunks, Handle, Publisher, Responder, Route, Session, Subscriber};
use std::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Builds a connection handle for the live test broker. Defaults to a stock
/// local broker; the coordinates can be overridden through the same
/// environment variables the application itself reads.
pub fn make_handle() -> Handle {
    let host = std::env::var("RABBITMQ_HOST").unwrap_or_else(|_| "localhost".to_string());
    let port = std::env::var("RABBITMQ_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5672);
    let user = std::env::var("RABBITMQ_USER").unwrap_or_else(|_| "guest".to_string());
    let password = std::env::var("RABBITMQ_PASSWORD").unwrap_or_else(|_| "guest".to_string());

    Handle::new(DsnChunks {
        host,
        port,
        user,
        password,
        vhost: "/".to_string(),
    })
}

/// Builds the transport pair for the given route on a fresh session.
pub async fn make_transports(route: &Route) -> (Session, Publisher, Subscriber) {
    let session = Session::establish(make_handle())
        .await
        .expect("live broker is reachable");

    let publisher = Publisher::new(session.channel().clone(), route.clone());
    let subscriber = Subscriber::new(session.channel().clone(), route.clone());

    (session, publisher, subscriber)
}

/// Builds a full responder for the given route and work delay on a fresh
/// session.
pub async fn make_responder(route: &Route, work_delay: Duration) -> (Session, Responder) {
    let (session, publisher, subscriber) = make_transports(route).await;

    (session, Responder::new(publisher, subscriber, work_delay))
}

/// Generates a random 6-character token to use as a globally unique name or
/// value.
pub fn random_token() -> String {
    use rand::Rng;

    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(6)
        .map(char::from)
        .collect()
}

/// Adds a randomized suffix to the given name to make it globally unique.
pub fn mangle(name: &str) -> String {
    format!(
        "{}.{}.{}",
        name,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
        random_token(),
    )
}
