//! File and buffer helpers in the style of `load`/`dump`.
//!
//! ```no_run
//! use domenec::{api, Value};
//!
//! let meta = api::load("ubuntu.torrent")?;
//! let announce = meta.get("announce").and_then(Value::as_str);
//! api::dump(&meta, "copy.torrent")?;
//! # Ok::<(), domenec::Error>(())
//! ```

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use log::debug;

use crate::bdecode::decode;
use crate::bencode::{encode, BEncoder};
use crate::error::{DecodeError, EncodeError, Error, Result};
use crate::value::Value;

/// Decodes the first value in `encoded`.
pub fn loads(encoded: &[u8]) -> std::result::Result<Value, DecodeError> {
    decode(encoded).map(|(value, _)| value)
}

pub fn dumps(value: &Value) -> std::result::Result<Vec<u8>, EncodeError> {
    encode(value)
}

/// Reads and decodes a bencoded file. An empty path or a path that is not a
/// regular file is reported as [`Error::FilePath`].
pub fn load<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() || !path.is_file() {
        return Err(Error::FilePath(path.to_path_buf()));
    }
    debug!("loading {}", path.display());
    let data = fs::read(path)?;
    Ok(loads(&data)?)
}

pub fn load_from<R: Read>(reader: &mut R) -> Result<Value> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(loads(&data)?)
}

/// Encodes `value` into a new file at `path`, replacing any existing one.
pub fn dump<P: AsRef<Path>>(value: &Value, path: P) -> Result<()> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::FilePath(path.to_path_buf()));
    }
    debug!("dumping {} to {}", value.type_name(), path.display());
    let mut file = File::create(path)?;
    dump_to(value, &mut file)?;
    file.flush()?;
    Ok(())
}

pub fn dump_to<W: Write>(value: &Value, writer: &mut W) -> Result<()> {
    BEncoder::new().encode_to(value, writer)
}

pub fn load_json<P: AsRef<Path>>(path: P) -> Result<serde_json::Value> {
    load(path).map(|value| value.to_json())
}

pub fn loads_json(encoded: &[u8]) -> std::result::Result<serde_json::Value, DecodeError> {
    loads(encoded).map(|value| value.to_json())
}

/// Human readable rendering of a value, as indented JSON.
pub fn show(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(&value.to_json())?)
}

pub fn show_bytes(encoded: &[u8]) -> Result<String> {
    show(&loads(encoded)?)
}

pub fn show_file<P: AsRef<Path>>(path: P) -> Result<String> {
    show(&load(path)?)
}
