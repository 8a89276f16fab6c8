use std::io::Write;

use log::debug;

use crate::error::{self, EncodeError};
use crate::options::EncodeOptions;
use crate::value::{Dictionary, Key, Value};

type Result<T> = std::result::Result<T, EncodeError>;

/// Encoder producing canonical bencode.
///
/// Dictionaries are written in their iteration order. Nothing is re-sorted, so
/// a decoded value encodes back to the exact bytes it was read from; call
/// [`Value::sort_keys`] first when sorted output is needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BEncoder {
    options: EncodeOptions,
}

impl BEncoder {
    pub fn new() -> BEncoder {
        BEncoder::default()
    }

    pub fn with_options(options: EncodeOptions) -> BEncoder {
        BEncoder { options }
    }

    pub fn encode(&self, value: &Value) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode_type(value, &mut buf, 0)?;
        debug!("encoded {} into {} bytes", value.type_name(), buf.len());
        Ok(buf)
    }

    pub fn encode_to<W: Write>(&self, value: &Value, writer: &mut W) -> error::Result<()> {
        let buf = self.encode(value)?;
        writer.write_all(&buf)?;
        Ok(())
    }

    fn encode_type(&self, value: &Value, buf: &mut Vec<u8>, depth: usize) -> Result<()> {
        match value {
            Value::Integer(int) => encode_int(*int, buf),
            Value::String(bs) => encode_bytestring(bs.as_bytes(), buf),
            Value::List(list) => self.encode_list(list, buf, depth)?,
            Value::Dictionary(dict) => self.encode_dict(dict, buf, depth)?,
        };
        Ok(())
    }

    fn encode_dict(&self, dict: &Dictionary, buf: &mut Vec<u8>, depth: usize) -> Result<()> {
        self.enter(depth)?;
        buf.push(b'd');
        for (key, val) in dict.iter() {
            encode_key(key, buf);
            self.encode_type(val, buf, depth + 1)?;
        }
        buf.push(b'e');
        Ok(())
    }

    fn encode_list(&self, list: &[Value], buf: &mut Vec<u8>, depth: usize) -> Result<()> {
        self.enter(depth)?;
        buf.push(b'l');
        for item in list {
            self.encode_type(item, buf, depth + 1)?;
        }
        buf.push(b'e');
        Ok(())
    }

    fn enter(&self, depth: usize) -> Result<()> {
        if depth >= self.options.max_depth {
            return Err(EncodeError::NestingTooDeep { limit: self.options.max_depth });
        }
        Ok(())
    }
}

fn encode_key(key: &Key, buf: &mut Vec<u8>) {
    match key {
        Key::Integer(int) => encode_int(*int, buf),
        Key::String(bs) => encode_bytestring(bs.as_bytes(), buf),
    }
}

// Length is the byte length, not the character count.
fn encode_bytestring(bytes: &[u8], buf: &mut Vec<u8>) {
    encode_num(bytes.len(), buf);
    buf.push(b':');
    buf.extend_from_slice(bytes);
}

fn encode_int(int: i64, buf: &mut Vec<u8>) {
    buf.push(b'i');
    encode_num(int, buf);
    buf.push(b'e');
}

fn encode_num<N: ToString>(num: N, buf: &mut Vec<u8>) {
    buf.extend_from_slice(num.to_string().as_bytes());
}

/// Encodes `value` with the default options.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    BEncoder::new().encode(value)
}
