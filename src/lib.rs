//! Bencode encoding and decoding.
//!
//! | Type | Format | Example |
//! |------|--------|---------|
//! | Integer | `i<number>e` | `i42e` |
//! | String | `<length>:<bytes>` | `4:spam` |
//! | List | `l<items>e` | `l4:spami42ee` |
//! | Dictionary | `d<key><value>...e` | `d3:foo3:bare` |
//!
//! Dictionaries keep the order their keys were inserted or read in, and string
//! payloads keep their raw bytes whether or not they are valid UTF-8, so a
//! decoded value always encodes back to the bytes it came from.
//!
//! ```
//! use domenec::{decode, encode, Value};
//!
//! let (value, consumed) = decode(b"d3:sysi39eetrailing").unwrap();
//! assert_eq!(consumed, 11);
//! assert_eq!(value.get("sys"), Some(&Value::Integer(39)));
//! assert_eq!(encode(&value).unwrap(), b"d3:sysi39ee");
//! ```

pub mod api;
mod bdecode;
mod bencode;
mod bytestring;
mod error;
mod json;
mod options;
mod value;

pub use bdecode::{decode, decode_all, decode_at, decode_with, BDecoder};
pub use bencode::{encode, BEncoder};
pub use bytestring::{ByteString, StringKind};
pub use error::{DecodeError, EncodeError, Error, Result, Snippet};
pub use json::encode_json;
pub use options::{DecodeOptions, DuplicateKeys, EncodeOptions, DEFAULT_MAX_DEPTH};
pub use value::{Dictionary, Key, Value};
