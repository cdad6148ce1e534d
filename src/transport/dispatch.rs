use std::borrow::Cow;

/// Represents an **outgoing** message.
///
/// This dispatch owns only the encoded bytes of the outgoing payload. The
/// wire contract sets no message properties, headers, or per-message routing
/// overrides, so none are representable here.
#[derive(Debug)]
pub struct Dispatch {
    bytes: Vec<u8>,
}

impl Dispatch {
    /// Shorthand for creating a [`Dispatch`] with the payload set to the given
    /// bytes.
    ///
    /// This method is specifically made to take an owned `Vec<u8>`, to make
    /// sure no copying occurs and the bytes are simply moved into this
    /// dispatch.
    ///
    /// When copying of bytes is acceptable or desired, use
    /// [`from_byte_ref`](Dispatch::from_byte_ref).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Shorthand for creating a [`Dispatch`] by copying the given bytes to the
    /// payload.
    pub fn from_byte_ref(bytes: impl AsRef<[u8]>) -> Self {
        Self::from_bytes(bytes.as_ref().to_vec())
    }

    /// Exposes the encoded content of this message.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Convenience implementations of [`From`] for [`Dispatch`].
const _: () = {
    impl From<String> for Dispatch {
        fn from(value: String) -> Self {
            Dispatch::from_bytes(value.into_bytes())
        }
    }

    impl From<&str> for Dispatch {
        fn from(value: &str) -> Self {
            Dispatch::from_byte_ref(value.as_bytes())
        }
    }

    impl From<Vec<u8>> for Dispatch {
        fn from(value: Vec<u8>) -> Self {
            Dispatch::from_bytes(value)
        }
    }

    impl<'a> From<Cow<'a, str>> for Dispatch {
        fn from(value: Cow<'a, str>) -> Self {
            Dispatch::from_bytes(value.into_owned().into_bytes())
        }
    }
};
