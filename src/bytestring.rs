use std::fmt::{self, Display};

/// Whether a byte string payload is readable text or opaque binary data.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StringKind {
    Text,
    Binary,
}

/// Raw payload of a bencoded string.
///
/// The bytes are kept exactly as they appeared on the wire so that binary
/// payloads (piece hashes, node ids) survive a decode/encode round trip.
/// Text is a view over the bytes, never a conversion of them.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ByteString(bytes.into())
    }

    pub fn kind(&self) -> StringKind {
        match std::str::from_utf8(&self.0) {
            Ok(_) => StringKind::Text,
            Err(_) => StringKind::Binary,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind() == StringKind::Text
    }

    /// The payload as `&str`, or `None` when it is not valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<&str> for ByteString {
    fn from(s: &str) -> Self {
        ByteString(s.as_bytes().to_vec())
    }
}

impl From<String> for ByteString {
    fn from(s: String) -> Self {
        ByteString(s.into_bytes())
    }
}

impl From<&[u8]> for ByteString {
    fn from(bytes: &[u8]) -> Self {
        ByteString(bytes.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for ByteString {
    fn from(bytes: &[u8; N]) -> Self {
        ByteString(bytes.to_vec())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        ByteString(bytes)
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Binary payloads are shown as hex, text as is.
impl Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(s) => write!(f, "{}", s),
            None => write!(f, "0x{}", self.to_hex()),
        }
    }
}
