use std::string::FromUtf8Error;
use thiserror::Error;

/// Represents an **incoming** message, decoded to text.
///
/// The subscriber consumes in auto-acknowledge mode, so by the time an
/// envelope exists the broker has already considered the message delivered.
/// There is consequently nothing to finalize on an envelope.
#[derive(Debug, PartialEq, Eq)]
pub struct Envelope {
    payload: String,
}

/// Represents a payload that could not be interpreted as UTF-8 text.
///
/// Unlike brokers-facing errors, this one carries a lossy preview of the
/// offending bytes for the log line. It is fatal: the wire contract promises
/// text payloads, and nothing else is meaningful to respond to.
#[derive(Error, Debug)]
#[error("failed to decode an inbound payload as UTF-8 (preview: '{preview}'): {source}")]
pub struct DecodeError {
    preview: String,
    #[source]
    source: FromUtf8Error,
}

impl Envelope {
    /// Decodes the given delivery bytes into an [`Envelope`], or reports a
    /// [`DecodeError`] for non-text payloads.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        match String::from_utf8(bytes) {
            Ok(payload) => Ok(Self { payload }),
            Err(source) => {
                let preview = String::from_utf8_lossy(source.as_bytes()).into_owned();

                Err(DecodeError { preview, source })
            }
        }
    }

    /// Exposes the decoded text payload of this message.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Destructs this envelope into the owned payload.
    pub fn into_payload(self) -> String {
        self.payload
    }
}
