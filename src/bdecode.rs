use std::str::FromStr;

use log::{debug, trace};
use nom::character::complete::{char, digit1};
use nom::combinator::{map_opt, opt, recognize};
use nom::multi::length_data;
use nom::sequence::{delimited, pair, terminated};
use nom::IResult;

use crate::bytestring::ByteString;
use crate::error::{DecodeError, Snippet};
use crate::options::{DecodeOptions, DuplicateKeys};
use crate::value::{Dictionary, Key, Value};

type Result<T> = std::result::Result<T, DecodeError>;

/// `i(-?[0-9]+)e`, yielding the signed digits.
fn integer_literal(inp: &[u8]) -> IResult<&[u8], &[u8]> {
    delimited(
        char('i'),
        recognize(pair(opt(char('-')), digit1)),
        char('e'),
    )(inp)
}

/// `(\d+):` followed by that many payload bytes, yielding the payload.
fn string_literal(inp: &[u8]) -> IResult<&[u8], &[u8]> {
    length_data(map_opt(
        terminated(digit1, char(':')),
        parse_decimal::<usize>,
    ))(inp)
}

fn parse_decimal<T: FromStr>(digits: &[u8]) -> Option<T> {
    std::str::from_utf8(digits).ok()?.parse().ok()
}

// No zero padding and no negative zero.
fn is_canonical(digits: &[u8]) -> bool {
    !matches!(digits, [b'-', b'0', ..] | [b'0', _, ..])
}

/// Cursor based decoder over a complete buffer.
///
/// Each call to [`BDecoder::decode_next`] reads exactly one value and leaves the
/// cursor on the first byte after it, so concatenated values can be read one
/// after the other. Bytes after the last value are never looked at.
pub struct BDecoder<'a> {
    bytes: &'a [u8],
    cursor: usize,
    options: DecodeOptions,
}

impl<'a> BDecoder<'a> {
    pub fn new(bytes: &'a [u8]) -> BDecoder<'a> {
        BDecoder::with_options(bytes, DecodeOptions::default())
    }

    pub fn with_options(bytes: &'a [u8], options: DecodeOptions) -> BDecoder<'a> {
        BDecoder { bytes, cursor: 0, options }
    }

    pub fn starting_at(mut self, offset: usize) -> BDecoder<'a> {
        self.cursor = offset;
        self
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.bytes.len()
    }

    /// Decodes the value at the cursor. On error the cursor is left where the
    /// problem was found and nothing decoded so far is returned.
    pub fn decode_next(&mut self) -> Result<Value> {
        self.parse_type(0)
    }

    fn parse_type(&mut self, depth: usize) -> Result<Value> {
        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd { offset: self.cursor }),
            Some(b'i') => self.parse_int().map(Value::Integer),
            Some(b'0'..=b'9') => self.parse_str().map(Value::String),
            Some(b'l') => self.parse_list(depth).map(Value::List),
            Some(b'd') => self.parse_dict(depth).map(Value::Dictionary),
            Some(tag) => Err(DecodeError::UnrecognizedTag {
                offset: self.cursor,
                tag,
                snippet: self.snippet(self.cursor),
            }),
        }
    }

    fn parse_int(&mut self) -> Result<i64> {
        let start = self.cursor;
        let (rest, digits) = integer_literal(self.remaining())
            .map_err(|_| self.malformed_integer(start))?;
        if self.options.strict_integers && !is_canonical(digits) {
            return Err(self.malformed_integer(start));
        }
        let value = parse_decimal::<i64>(digits).ok_or_else(|| self.malformed_integer(start))?;
        self.advance_to(rest);
        Ok(value)
    }

    fn parse_str(&mut self) -> Result<ByteString> {
        let start = self.cursor;
        let (rest, payload) = string_literal(self.remaining()).map_err(|_| {
            DecodeError::MalformedString { offset: start, snippet: self.snippet(start) }
        })?;
        let bs = ByteString::from(payload);
        if !bs.is_text() {
            trace!("binary string of {} bytes at offset {}", bs.len(), start);
        }
        self.advance_to(rest);
        Ok(bs)
    }

    fn parse_list(&mut self, depth: usize) -> Result<Vec<Value>> {
        let start = self.enter(depth)?;
        let mut list = Vec::new();
        while self.peek().filter(|&c| c != b'e').is_some() {
            list.push(self.parse_type(depth + 1)?);
        }
        self.expect_terminator(start, "unterminated list")?;
        Ok(list)
    }

    fn parse_dict(&mut self, depth: usize) -> Result<Dictionary> {
        let start = self.enter(depth)?;
        let mut dict = Dictionary::new();
        while self.peek().filter(|&c| c != b'e').is_some() {
            let key_offset = self.cursor;
            let key = Key::try_from(self.parse_type(depth + 1)?).map_err(|_| {
                self.malformed_container(key_offset, "dictionary key must be a string or an integer")
            })?;
            if self.peek().filter(|&c| c != b'e').is_none() {
                return Err(self.malformed_container(start, "dictionary key without value"));
            }
            let value = self.parse_type(depth + 1)?;
            self.insert_entry(&mut dict, key, value, key_offset)?;
        }
        self.expect_terminator(start, "unterminated dictionary")?;
        Ok(dict)
    }

    fn insert_entry(&self, dict: &mut Dictionary, key: Key, value: Value, offset: usize) -> Result<()> {
        if let Some(slot) = dict.get_mut(&key) {
            if self.options.duplicate_keys == DuplicateKeys::Reject {
                return Err(DecodeError::DuplicateKey { offset, key: key.to_string() });
            }
            trace!("duplicate key '{}' at offset {} replaces earlier value", key, offset);
            *slot = value;
        } else {
            dict.insert(key, value);
        }
        Ok(())
    }

    // Consumes the container tag and returns its offset.
    fn enter(&mut self, depth: usize) -> Result<usize> {
        let start = self.cursor;
        if depth >= self.options.max_depth {
            return Err(DecodeError::NestingTooDeep { offset: start, limit: self.options.max_depth });
        }
        self.cursor += 1;
        Ok(start)
    }

    fn expect_terminator(&mut self, start: usize, reason: &'static str) -> Result<()> {
        match self.peek() {
            Some(b'e') => {
                self.cursor += 1;
                Ok(())
            }
            _ => Err(self.malformed_container(start, reason)),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.cursor).cloned()
    }

    fn remaining(&self) -> &'a [u8] {
        self.bytes.get(self.cursor..).unwrap_or(&[])
    }

    // `rest` is always a suffix of `bytes` handed back by a leaf parser.
    fn advance_to(&mut self, rest: &[u8]) {
        self.cursor = self.bytes.len() - rest.len();
    }

    fn snippet(&self, offset: usize) -> Snippet {
        Snippet::at(self.bytes, offset)
    }

    fn malformed_integer(&self, offset: usize) -> DecodeError {
        DecodeError::MalformedInteger { offset, snippet: self.snippet(offset) }
    }

    fn malformed_container(&self, offset: usize, reason: &'static str) -> DecodeError {
        DecodeError::MalformedContainer { offset, reason, snippet: self.snippet(offset) }
    }
}

/// Decodes the value at the start of `bytes`, returning it with the number of
/// bytes it occupied. Anything after it is ignored.
pub fn decode(bytes: &[u8]) -> Result<(Value, usize)> {
    decode_at(bytes, 0)
}

/// Decodes the value starting at `offset`. The returned length is counted from
/// `offset`, so the next value starts at `offset + consumed`.
pub fn decode_at(bytes: &[u8], offset: usize) -> Result<(Value, usize)> {
    decode_with(bytes, offset, DecodeOptions::default())
}

pub fn decode_with(bytes: &[u8], offset: usize, options: DecodeOptions) -> Result<(Value, usize)> {
    debug!("decoding {} bytes from offset {}", bytes.len().saturating_sub(offset), offset);
    let mut decoder = BDecoder::with_options(bytes, options).starting_at(offset);
    let value = decoder.decode_next()?;
    Ok((value, decoder.position() - offset))
}

/// Decodes a buffer holding several bencoded values back to back.
pub fn decode_all(bytes: &[u8]) -> Result<Vec<Value>> {
    let mut decoder = BDecoder::new(bytes);
    let mut values = Vec::new();
    while !decoder.is_exhausted() {
        values.push(decoder.decode_next()?);
    }
    Ok(values)
}

#[cfg(test)]
mod test {
    use super::*;

    fn text(s: &str) -> Value {
        Value::from(s)
    }

    fn dict(entries: Vec<(Key, Value)>) -> Value {
        entries.into_iter().collect()
    }

    #[test]
    pub fn test_parse_integer() {
        let parse_int = |inp: &str| {
            let mut decoder = BDecoder::new(inp.as_bytes());
            (decoder.parse_int(), decoder.cursor)
        };

        assert_eq!((Ok(123), 5), parse_int("i123e"));
        assert_eq!((Ok(-123), 6), parse_int("i-123e"));
        assert_eq!((Ok(0), 3), parse_int("i0e"));
        assert_eq!((Ok(i64::MAX), 21), parse_int("i9223372036854775807e"));
        assert!(matches!(parse_int("iabc"), (Err(DecodeError::MalformedInteger { offset: 0, .. }), 0)));
        assert!(matches!(parse_int("i-e"), (Err(DecodeError::MalformedInteger { .. }), 0)));
        assert!(matches!(parse_int("ie"), (Err(DecodeError::MalformedInteger { .. }), 0)));
        assert!(matches!(parse_int("i+5e"), (Err(DecodeError::MalformedInteger { .. }), 0)));
        assert!(matches!(parse_int("i23abc"), (Err(DecodeError::MalformedInteger { .. }), 0)));
        assert!(matches!(parse_int("i12"), (Err(DecodeError::MalformedInteger { .. }), 0)));
        assert!(matches!(
            parse_int("i9223372036854775808e"),
            (Err(DecodeError::MalformedInteger { .. }), 0)
        ));
    }

    #[test]
    pub fn test_parse_integer_canonical_form() {
        assert_eq!(Ok((Value::Integer(3), 4)), decode(b"i03e"));
        assert_eq!(Ok((Value::Integer(0), 4)), decode(b"i-0e"));

        let strict = DecodeOptions::default().with_strict_integers(true);
        assert!(matches!(decode_with(b"i03e", 0, strict), Err(DecodeError::MalformedInteger { .. })));
        assert!(matches!(decode_with(b"i-0e", 0, strict), Err(DecodeError::MalformedInteger { .. })));
        assert!(matches!(decode_with(b"i-05e", 0, strict), Err(DecodeError::MalformedInteger { .. })));
        assert_eq!(Ok((Value::Integer(0), 3)), decode_with(b"i0e", 0, strict));
        assert_eq!(Ok((Value::Integer(-10), 5)), decode_with(b"i-10e", 0, strict));
    }

    #[test]
    pub fn test_parse_string() {
        let parse_string = |inp: &[u8]| {
            let mut decoder = BDecoder::new(inp);
            (decoder.parse_str(), decoder.cursor)
        };

        assert_eq!((Ok(ByteString::from("abc")), 5), parse_string(b"3:abc"));
        assert_eq!((Ok(ByteString::from("")), 2), parse_string(b"0:"));
        assert_eq!((Ok(ByteString::from("foo:bar")), 9), parse_string(b"7:foo:bar"));
        assert_eq!((Ok(ByteString::from("测试")), 8), parse_string("6:测试".as_bytes()));
        assert!(matches!(parse_string(b"3abc"), (Err(DecodeError::MalformedString { offset: 0, .. }), 0)));
        assert!(matches!(parse_string(b"5:ab"), (Err(DecodeError::MalformedString { .. }), 0)));
        assert!(matches!(
            parse_string(b"99999999999999999999999:ab"),
            (Err(DecodeError::MalformedString { .. }), 0)
        ));
    }

    #[test]
    pub fn test_parse_binary_string() {
        let (value, consumed) = decode(b"4:\xde\xad\xbe\xef").unwrap();
        assert_eq!(6, consumed);
        assert_eq!(None, value.as_str());
        assert_eq!(Some(&[0xde, 0xad, 0xbe, 0xef][..]), value.as_bytes());
    }

    #[test]
    pub fn test_parse_list() {
        let parse_list = |inp: &str| {
            let mut decoder = BDecoder::new(inp.as_bytes());
            (decoder.parse_list(0), decoder.cursor)
        };

        assert_eq!((Ok(vec![]), 2), parse_list("le"));
        assert_eq!((Ok(vec![Value::Integer(123)]), 7), parse_list("li123ee"));
        assert_eq!((Ok(vec![text("abc")]), 7), parse_list("l3:abce"));
        assert_eq!((Ok(vec![text("abc"), text("defg")]), 13), parse_list("l3:abc4:defge"));
        assert_eq!((Ok(vec![Value::List(vec![])]), 4), parse_list("llee"));
        assert_eq!((Ok(vec![
            Value::List(vec![Value::List(vec![])]),
            Value::List(vec![Value::List(vec![])]),
        ]), 10), parse_list("llleelleee"));
        assert!(matches!(
            parse_list("l3:abc"),
            (Err(DecodeError::MalformedContainer { offset: 0, .. }), 6)
        ));
        assert!(matches!(parse_list("l"), (Err(DecodeError::MalformedContainer { .. }), 1)));
        assert!(matches!(parse_list("lxe"), (Err(DecodeError::UnrecognizedTag { offset: 1, tag: b'x', .. }), 1)));
    }

    #[test]
    pub fn test_parse_dictionary() {
        let parse_dictionary = |inp: &str| {
            let mut decoder = BDecoder::new(inp.as_bytes());
            (decoder.parse_dict(0).map(Value::Dictionary), decoder.cursor)
        };

        assert_eq!((Ok(dict(vec![])), 2), parse_dictionary("de"));
        assert_eq!(
            (Ok(dict(vec![(Key::from("a"), Value::Integer(123))])), 10),
            parse_dictionary("d1:ai123ee")
        );
        assert_eq!(
            (Ok(dict(vec![
                (Key::from("a"), Value::List(vec![text("hey")])),
                (Key::from("b"), Value::List(vec![])),
            ])), 17),
            parse_dictionary("d1:al3:heye1:blee")
        );
        assert_eq!(
            (Ok(dict(vec![
                (Key::from("inner"), dict(vec![
                    (Key::from("a"), Value::Integer(345)),
                    (Key::from("b"), text("wow")),
                ])),
                (Key::from("inner2"), dict(vec![])),
            ])), 37),
            parse_dictionary("d5:innerd1:ai345e1:b3:wowe6:inner2dee")
        );

        assert!(matches!(
            parse_dictionary("d4:iteme"),
            (Err(DecodeError::MalformedContainer { reason: "dictionary key without value", .. }), 7)
        ));
        assert!(matches!(
            parse_dictionary("d1:a2:bc"),
            (Err(DecodeError::MalformedContainer { reason: "unterminated dictionary", .. }), 8)
        ));
        assert!(matches!(
            parse_dictionary("dlei1ee"),
            (Err(DecodeError::MalformedContainer { offset: 1, .. }), 3)
        ));
    }

    #[test]
    pub fn test_dictionary_keeps_encounter_order() {
        let (value, _) = decode(b"d1:zi1e1:ai2e1:mi3ee").unwrap();
        let keys: Vec<String> = value.as_dictionary().unwrap().keys().map(Key::to_string).collect();
        assert_eq!(vec!["z", "a", "m"], keys);
    }

    #[test]
    pub fn test_duplicate_keys() {
        let (value, consumed) = decode(b"d1:ai1e1:bi2e1:ai3ee").unwrap();
        assert_eq!(20, consumed);
        assert_eq!(
            dict(vec![(Key::from("a"), Value::Integer(3)), (Key::from("b"), Value::Integer(2))]),
            value
        );

        let reject = DecodeOptions::default().with_duplicate_keys(DuplicateKeys::Reject);
        assert_eq!(
            Err(DecodeError::DuplicateKey { offset: 13, key: "a".to_string() }),
            decode_with(b"d1:ai1e1:bi2e1:ai3ee", 0, reject)
        );
    }

    #[test]
    pub fn test_integer_keys() {
        let (value, consumed) = decode(b"di1234el5:helloi99876eee").unwrap();
        assert_eq!(24, consumed);
        assert_eq!(
            dict(vec![(Key::Integer(1234), Value::List(vec![text("hello"), Value::Integer(99876)]))]),
            value
        );
    }

    #[test]
    pub fn test_unrecognized_tag() {
        assert!(matches!(decode(b"xyz"), Err(DecodeError::UnrecognizedTag { offset: 0, tag: b'x', .. })));
        assert!(matches!(decode(b"-1"), Err(DecodeError::UnrecognizedTag { tag: b'-', .. })));
        assert_eq!(Err(DecodeError::UnexpectedEnd { offset: 0 }), decode(b""));
    }

    #[test]
    pub fn test_trailing_bytes_are_ignored() {
        assert_eq!(Ok((Value::Integer(18), 4)), decode(b"i18egarbage"));
        assert_eq!(Ok((Value::List(vec![]), 2)), decode(b"lei1e"));
    }

    #[test]
    pub fn test_decode_at_offset() {
        let buf = b"i1e3:abcli2ee";
        assert_eq!(Ok((Value::Integer(1), 3)), decode_at(buf, 0));
        assert_eq!(Ok((text("abc"), 5)), decode_at(buf, 3));
        assert_eq!(Ok((Value::List(vec![Value::Integer(2)]), 5)), decode_at(buf, 8));
        assert_eq!(Err(DecodeError::UnexpectedEnd { offset: 13 }), decode_at(buf, 13));
        assert_eq!(Err(DecodeError::UnexpectedEnd { offset: 50 }), decode_at(buf, 50));
    }

    #[test]
    pub fn test_decode_all() {
        assert_eq!(
            Ok(vec![Value::Integer(1), text("abc"), Value::List(vec![])]),
            decode_all(b"i1e3:abcle")
        );
        assert_eq!(Ok(vec![]), decode_all(b""));
        assert!(decode_all(b"i1ei2").is_err());
    }

    #[test]
    pub fn test_nesting_limit() {
        let options = DecodeOptions::default().with_max_depth(2);
        assert!(decode_with(b"llee", 0, options).is_ok());
        assert_eq!(
            Err(DecodeError::NestingTooDeep { offset: 2, limit: 2 }),
            decode_with(b"llleee", 0, options)
        );

        let deep = "l".repeat(10_000);
        assert!(matches!(decode(deep.as_bytes()), Err(DecodeError::NestingTooDeep { .. })));
    }
}
