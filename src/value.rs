use std::fmt;

use linked_hash_map::LinkedHashMap;

use crate::bytestring::ByteString;
use crate::error::EncodeError;

/// Dictionary whose iteration order is the order entries are written out in.
pub type Dictionary = LinkedHashMap<Key, Value>;

/// A dictionary key. Textual keys are the common case, integer keys are accepted
/// because nothing in the grammar forbids them.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Key {
    Integer(i64),
    String(ByteString),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Value {
    Integer(i64),
    String(ByteString),
    List(Vec<Value>),
    Dictionary(Dictionary),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Dictionary(_) => "dictionary",
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::String(bs) => Some(bs.as_bytes()),
            _ => None,
        }
    }

    pub fn as_byte_string(&self) -> Option<&ByteString> {
        match self {
            Value::String(bs) => Some(bs),
            _ => None,
        }
    }

    /// The string payload as text. `None` for binary payloads and non strings.
    pub fn as_str(&self) -> Option<&str> {
        self.as_byte_string().and_then(ByteString::as_text)
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn into_dictionary(self) -> Option<Dictionary> {
        match self {
            Value::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Looks `key` up if this value is a dictionary.
    pub fn get<K: Into<Key>>(&self, key: K) -> Option<&Value> {
        self.as_dictionary()?.get(&key.into())
    }

    /// Recursively reorders every dictionary by key, which is what BitTorrent
    /// expects before hashing an info dictionary.
    pub fn sort_keys(&mut self) {
        match self {
            Value::List(list) => list.iter_mut().for_each(Value::sort_keys),
            Value::Dictionary(dict) => {
                let mut entries: Vec<(Key, Value)> = std::mem::take(dict).into_iter().collect();
                entries.sort_by(|(a, _), (b, _)| a.cmp(b));
                for (key, mut value) in entries {
                    value.sort_keys();
                    dict.insert(key, value);
                }
            }
            Value::Integer(_) | Value::String(_) => {}
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Integer(i) => write!(f, "{}", i),
            Key::String(bs) => write!(f, "{}", bs),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(s.into())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(s.into())
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Self {
        Key::String(bytes.into())
    }
}

impl<const N: usize> From<&[u8; N]> for Key {
    fn from(bytes: &[u8; N]) -> Self {
        Key::String(bytes.into())
    }
}

impl From<ByteString> for Key {
    fn from(bs: ByteString) -> Self {
        Key::String(bs)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Integer(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Integer(i64::from(i))
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        match key {
            Key::Integer(i) => Value::Integer(i),
            Key::String(bs) => Value::String(bs),
        }
    }
}

/// Only integers and strings can be used as keys; containers are handed back.
impl TryFrom<Value> for Key {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Integer(i) => Ok(Key::Integer(i)),
            Value::String(bs) => Ok(Key::String(bs)),
            other => Err(other),
        }
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl TryFrom<u64> for Value {
    type Error = EncodeError;

    fn try_from(i: u64) -> Result<Self, Self::Error> {
        i64::try_from(i)
            .map(Value::Integer)
            .map_err(|_| EncodeError::UnsupportedType { type_name: "u64 above i64::MAX" })
    }
}

impl TryFrom<usize> for Value {
    type Error = EncodeError;

    fn try_from(i: usize) -> Result<Self, Self::Error> {
        i64::try_from(i)
            .map(Value::Integer)
            .map_err(|_| EncodeError::UnsupportedType { type_name: "usize above i64::MAX" })
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s.into())
    }
}

impl From<&[u8]> for Value {
    fn from(bytes: &[u8]) -> Self {
        Value::String(bytes.into())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::String(bytes.into())
    }
}

impl From<ByteString> for Value {
    fn from(bs: ByteString) -> Self {
        Value::String(bs)
    }
}

impl From<Vec<Value>> for Value {
    fn from(list: Vec<Value>) -> Self {
        Value::List(list)
    }
}

impl From<Dictionary> for Value {
    fn from(dict: Dictionary) -> Self {
        Value::Dictionary(dict)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::List(iter.into_iter().collect())
    }
}

impl FromIterator<(Key, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (Key, Value)>>(iter: I) -> Self {
        Value::Dictionary(iter.into_iter().collect())
    }
}

// Tuples are fixed size sequences and encode as lists.
macro_rules! tuple_into_list {
    ($($ty:ident $var:ident),+) => {
        impl<$($ty: Into<Value>),+> From<($($ty,)+)> for Value {
            fn from(($($var,)+): ($($ty,)+)) -> Self {
                Value::List(vec![$($var.into()),+])
            }
        }
    };
}

tuple_into_list!(A a);
tuple_into_list!(A a, B b);
tuple_into_list!(A a, B b, C c);
tuple_into_list!(A a, B b, C c, D d);
