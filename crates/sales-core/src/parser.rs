//! # Parser Module
//!
//! Hand-written scanner for the order document dialect, a fixed subset of
//! JSON.
//!
//! ## Grammar
//! ```text
//! document  = ws "[" ws [ order *( ws "," ws order ) ] ws "]" ws EOF
//! order     = "{" ws [ field *( ws "," ws field ) ] ws "}"
//! item      = "{" ws [ field *( ws "," ws field ) ] ws "}"
//! field     = string ws ":" ws value
//!
//! order fields:  "id" string │ "ts" string │ "items" "[" item,* "]"
//! item fields:   "sku" string │ "qty" number │ "price" number
//! anything else: value is scanned and discarded
//!
//! string    = '"' *( char │ '\' escaped ) '"'      \" \\ \n \t, others literal
//! number    = [ "-" ] *( digit │ "." )             at most one ".", no exponent
//! ws        = *( ' ' │ '\t' │ '\n' │ '\r' )
//! ```
//!
//! ## Bounds Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cursor { text, pos }                                                   │
//! │                                                                         │
//! │  peek()  ──► Option<u8>     None at end, never indexes past len         │
//! │  expect(b)                                                              │
//! │     ├── None          → ParseError::UnexpectedEnd   { pos, expected }   │
//! │     ├── Some(other)   → ParseError::UnexpectedToken { pos, expected }   │
//! │     └── Some(b)       → advance                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//! A truncated document therefore fails with `UnexpectedEnd` instead of
//! reading past the buffer. Any error aborts the whole document.
//!
//! ## Usage
//! ```rust
//! use sales_core::parser::parse;
//!
//! let orders = parse(r#"[{"id":"ORD1","ts":"2024-01-01T10:00:00Z",
//!                        "items":[{"sku":"A","qty":2,"price":9.5}]}]"#).unwrap();
//! assert_eq!(orders[0].items[0].quantity, 2);
//! ```

use crate::error::{Expected, ParseError};
use crate::types::{Item, Order};

/// Maximum nesting of skipped arrays/objects.
pub const MAX_SKIP_DEPTH: usize = 64;

/// Parses a whole document into orders.
///
/// Pure function. Returns every order in document order, or the first
/// structural error; never a partial list.
pub fn parse(text: &str) -> Result<Vec<Order>, ParseError> {
    let mut cursor = Cursor::new(text);
    let orders = cursor.document()?;
    cursor.skip_ws();
    cursor.end()?;
    Ok(orders)
}

// =============================================================================
// Cursor
// =============================================================================

/// Byte cursor over a bounded buffer.
///
/// All structural tokens are ASCII, so `pos` always sits on a UTF-8 char
/// boundary when a slice is taken.
struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Cursor { text, pos: 0 }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    /// Character at the cursor, for error reporting.
    fn current_char(&self) -> char {
        self.text[self.pos..].chars().next().unwrap_or('\0')
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        if self.pos >= self.text.len() {
            ParseError::UnexpectedEnd {
                position: self.pos,
                expected,
            }
        } else {
            ParseError::UnexpectedToken {
                position: self.pos,
                expected,
                found: self.current_char(),
            }
        }
    }

    fn expect(&mut self, byte: u8, expected: Expected) -> Result<(), ParseError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn end(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected(Expected::EndOfInput)),
        }
    }

    // =========================================================================
    // Sequences
    // =========================================================================

    /// Walks a `open elem (, elem)* close` sequence, calling `elem` with the
    /// cursor on the first non-whitespace byte of each element.
    fn sequence<F>(
        &mut self,
        open: (u8, Expected),
        close: (u8, Expected),
        mut elem: F,
    ) -> Result<(), ParseError>
    where
        F: FnMut(&mut Self) -> Result<(), ParseError>,
    {
        self.expect(open.0, open.1)?;
        self.skip_ws();
        if self.peek() == Some(close.0) {
            self.pos += 1;
            return Ok(());
        }

        loop {
            elem(self)?;
            self.skip_ws();
            match self.peek() {
                Some(b',') => {
                    self.pos += 1;
                    self.skip_ws();
                }
                Some(b) if b == close.0 => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.unexpected(close.1)),
            }
        }
    }

    /// Walks an object, handing each key to `field` with the cursor on the
    /// first byte of the value.
    fn object<F>(&mut self, mut field: F) -> Result<(), ParseError>
    where
        F: FnMut(&mut Self, String) -> Result<(), ParseError>,
    {
        self.sequence(
            (b'{', Expected::OpenBrace),
            (b'}', Expected::CloseBraceOrComma),
            |cursor| {
                let key = cursor.string()?;
                cursor.skip_ws();
                cursor.expect(b':', Expected::Colon)?;
                cursor.skip_ws();
                field(cursor, key)
            },
        )
    }

    // =========================================================================
    // Records
    // =========================================================================

    fn document(&mut self) -> Result<Vec<Order>, ParseError> {
        let mut orders = Vec::new();
        self.skip_ws();
        self.sequence(
            (b'[', Expected::OpenBracket),
            (b']', Expected::CloseBracketOrComma),
            |cursor| {
                orders.push(cursor.order()?);
                Ok(())
            },
        )?;
        Ok(orders)
    }

    fn order(&mut self) -> Result<Order, ParseError> {
        let mut order = Order::default();
        self.object(|cursor, key| {
            match key.as_str() {
                "id" => order.id = cursor.string()?,
                "ts" => order.timestamp = cursor.string()?,
                "items" => order.items = cursor.items()?,
                _ => cursor.skip_value(0)?,
            }
            Ok(())
        })?;
        Ok(order)
    }

    fn items(&mut self) -> Result<Vec<Item>, ParseError> {
        let mut items = Vec::new();
        self.sequence(
            (b'[', Expected::OpenBracket),
            (b']', Expected::CloseBracketOrComma),
            |cursor| {
                items.push(cursor.item()?);
                Ok(())
            },
        )?;
        Ok(items)
    }

    fn item(&mut self) -> Result<Item, ParseError> {
        let mut item = Item::default();
        self.object(|cursor, key| {
            match key.as_str() {
                "sku" => item.sku = cursor.string()?,
                "qty" => item.quantity = truncate_quantity(cursor.number()?),
                "price" => item.price = cursor.number()?,
                _ => cursor.skip_value(0)?,
            }
            Ok(())
        })?;
        Ok(item)
    }

    // =========================================================================
    // Scalars
    // =========================================================================

    /// Reads a string literal, resolving escapes.
    fn string(&mut self) -> Result<String, ParseError> {
        self.expect(b'"', Expected::Quote)?;

        let mut out = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.unexpected(Expected::StringContent)),
                Some(b'"') => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&self.text[run_start..self.pos]);
                    self.pos += 1;
                    let escaped = match self.text[self.pos..].chars().next() {
                        Some(c) => c,
                        None => return Err(self.unexpected(Expected::StringContent)),
                    };
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        other => other,
                    });
                    self.pos += escaped.len_utf8();
                    run_start = self.pos;
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Reads `-? [0-9.]*` and converts it to `f64`.
    fn number(&mut self) -> Result<f64, ParseError> {
        let start = self.pos;
        match self.peek() {
            Some(b'-' | b'.' | b'0'..=b'9') => {}
            _ => return Err(self.unexpected(Expected::Number)),
        }

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        let mut dots = 0;
        while let Some(b) = self.peek() {
            match b {
                b'0'..=b'9' => {}
                b'.' => dots += 1,
                _ => break,
            }
            self.pos += 1;
        }

        let literal = &self.text[start..self.pos];
        if dots > 1 {
            return Err(invalid_number(start, literal));
        }
        literal
            .parse::<f64>()
            .map_err(|_| invalid_number(start, literal))
    }

    /// Scans and discards one value of an unrecognized field.
    fn skip_value(&mut self, depth: usize) -> Result<(), ParseError> {
        if depth >= MAX_SKIP_DEPTH {
            return Err(ParseError::NestingTooDeep {
                position: self.pos,
                limit: MAX_SKIP_DEPTH,
            });
        }

        match self.peek() {
            Some(b'"') => self.string().map(drop),
            Some(b'-' | b'.' | b'0'..=b'9') => self.number().map(drop),
            Some(b'[') => self.sequence(
                (b'[', Expected::OpenBracket),
                (b']', Expected::CloseBracketOrComma),
                |cursor| cursor.skip_value(depth + 1),
            ),
            Some(b'{') => self.object(|cursor, _key| cursor.skip_value(depth + 1)),
            Some(b't' | b'f' | b'n') => self.literal(),
            _ => Err(self.unexpected(Expected::Value)),
        }
    }

    fn literal(&mut self) -> Result<(), ParseError> {
        let rest = &self.text[self.pos..];
        for word in ["true", "false", "null"] {
            if rest.starts_with(word) {
                self.pos += word.len();
                return Ok(());
            }
            // Truncated inside the literal
            if word.starts_with(rest) {
                return Err(ParseError::UnexpectedEnd {
                    position: self.text.len(),
                    expected: Expected::Value,
                });
            }
        }
        Err(self.unexpected(Expected::Value))
    }
}

fn invalid_number(position: usize, literal: &str) -> ParseError {
    ParseError::InvalidNumber {
        position,
        literal: literal.to_string(),
    }
}

/// `qty` is carried as a number on the wire; the fraction is dropped.
#[inline]
fn truncate_quantity(value: f64) -> i64 {
    // `as` truncates toward zero and saturates at the i64 range
    value as i64
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("[]").unwrap(), vec![]);
        assert_eq!(parse(" \n\t[ \r\n ] \n").unwrap(), vec![]);
    }

    #[test]
    fn test_single_order() {
        let orders = parse(
            r#"[{"id":"ORD000001","ts":"2024-01-01T10:00:00Z",
                "items":[{"sku":"PROD-100A","qty":2,"price":10.5},
                         {"sku":"ART-999Z","qty":1,"price":0}]}]"#,
        )
        .unwrap();

        assert_eq!(
            orders,
            vec![Order::new(
                "ORD000001",
                "2024-01-01T10:00:00Z",
                vec![
                    Item::new("PROD-100A", 2, 10.5),
                    Item::new("ART-999Z", 1, 0.0),
                ],
            )]
        );
    }

    #[test]
    fn test_field_order_is_free() {
        let orders = parse(r#"[{"items":[{"price":3,"qty":4,"sku":"X"}],"ts":"2024-01-01","id":"A"}]"#)
            .unwrap();
        assert_eq!(orders[0].id, "A");
        assert_eq!(orders[0].timestamp, "2024-01-01");
        assert_eq!(orders[0].items[0], Item::new("X", 4, 3.0));
    }

    #[test]
    fn test_unknown_fields_are_skipped() {
        let orders = parse(
            r#"[{"id":"A","note":"hi \"there\"","meta":{"tags":["x",1,-2.5,true,null],"n":{}},
                "items":[{"sku":"S","discount":false,"qty":1,"price":2}],"extra":[]}]"#,
        )
        .unwrap();
        assert_eq!(orders[0].id, "A");
        assert_eq!(orders[0].items, vec![Item::new("S", 1, 2.0)]);
    }

    #[test]
    fn test_repeated_key_last_wins() {
        let orders = parse(r#"[{"id":"first","id":"second"}]"#).unwrap();
        assert_eq!(orders[0].id, "second");
    }

    #[test]
    fn test_empty_objects_yield_defaults() {
        let orders = parse(r#"[{},{"items":[{}]}]"#).unwrap();
        assert_eq!(orders[0], Order::default());
        assert_eq!(orders[1].items, vec![Item::default()]);
    }

    #[test]
    fn test_string_escapes() {
        let orders = parse(r#"[{"id":"a\"b\\c\nd\te\/f\rg"}]"#).unwrap();
        assert_eq!(orders[0].id, "a\"b\\c\nd\te/frg");
    }

    #[test]
    fn test_unicode_passthrough() {
        let orders = parse(r#"[{"id":"Заказ-№1","items":[{"sku":"товар\ё"}]}]"#).unwrap();
        assert_eq!(orders[0].id, "Заказ-№1");
        assert_eq!(orders[0].items[0].sku, "товарё");
    }

    #[test]
    fn test_numbers() {
        let orders = parse(
            r#"[{"items":[{"qty":-3,"price":-0.5},{"qty":2.9,"price":.25},{"qty":7.,"price":12}]}]"#,
        )
        .unwrap();
        let items = &orders[0].items;
        assert_eq!((items[0].quantity, items[0].price), (-3, -0.5));
        assert_eq!((items[1].quantity, items[1].price), (2, 0.25));
        assert_eq!((items[2].quantity, items[2].price), (7, 12.0));
    }

    #[test]
    fn test_negative_fractional_qty_truncates_toward_zero() {
        let orders = parse(r#"[{"items":[{"qty":-1.7}]}]"#).unwrap();
        assert_eq!(orders[0].items[0].quantity, -1);
    }

    #[test]
    fn test_truncated_document_is_unexpected_end() {
        let err = parse(r#"[{"id":"A""#).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEnd { position: 10, .. }));
    }

    #[test]
    fn test_every_prefix_fails_cleanly() {
        let doc = r#"[{"id":"A\"1","ts":"2024-01-01T10:00:00Z","items":[{"sku":"S","qty":1,"price":2.5}],"x":[{"y":null}]}]"#;
        for end in 0..doc.len() {
            let err = parse(&doc[..end]).unwrap_err();
            assert!(
                matches!(
                    err,
                    ParseError::UnexpectedEnd { .. } | ParseError::InvalidNumber { .. }
                ),
                "prefix {:?} gave {:?}",
                &doc[..end],
                err
            );
            assert!(err.position() <= end);
        }
        assert!(parse(doc).is_ok());
    }

    #[test]
    fn test_unterminated_escape() {
        let err = parse(r#"[{"id":"abc\"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedEnd {
                expected: Expected::StringContent,
                ..
            }
        ));
    }

    #[test]
    fn test_unexpected_tokens() {
        let err = parse(r#"{"id":"A"}"#).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                position: 0,
                expected: Expected::OpenBracket,
                found: '{',
            }
        );

        let err = parse(r#"[{"id" "A"}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                position: 7,
                expected: Expected::Colon,
                found: '"',
            }
        ));

        let err = parse(r#"[{"id":"A"} {"id":"B"}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::CloseBracketOrComma,
                found: '{',
                ..
            }
        ));
    }

    #[test]
    fn test_wrong_value_kind_for_known_field() {
        let err = parse(r#"[{"id":5}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Quote,
                found: '5',
                ..
            }
        ));

        let err = parse(r#"[{"items":[{"qty":"2"}]}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Number,
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let err = parse("[] x").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                position: 3,
                expected: Expected::EndOfInput,
                found: 'x',
            }
        ));
    }

    #[test]
    fn test_trailing_comma_rejected() {
        assert!(parse(r#"[{"id":"A"},]"#).is_err());
        assert!(parse(r#"[{"id":"A",}]"#).is_err());
    }

    #[test]
    fn test_invalid_numbers() {
        for (doc, literal) in [
            (r#"[{"items":[{"price":-}]}]"#, "-"),
            (r#"[{"items":[{"price":.}]}]"#, "."),
            (r#"[{"items":[{"price":1.2.3}]}]"#, "1.2.3"),
        ] {
            match parse(doc) {
                Err(ParseError::InvalidNumber { literal: got, .. }) => assert_eq!(got, literal),
                other => panic!("{doc}: expected InvalidNumber, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_exponent_not_supported() {
        let err = parse(r#"[{"items":[{"price":1e5}]}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::CloseBraceOrComma,
                found: 'e',
                ..
            }
        ));
    }

    #[test]
    fn test_bad_literal_in_skipped_value() {
        let err = parse(r#"[{"flag":nope}]"#).unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Value,
                ..
            }
        ));
    }

    #[test]
    fn test_skip_depth_limit() {
        let deep = format!(
            r#"[{{"x":{}{}}}]"#,
            "[".repeat(MAX_SKIP_DEPTH + 1),
            "]".repeat(MAX_SKIP_DEPTH + 1)
        );
        assert!(matches!(
            parse(&deep).unwrap_err(),
            ParseError::NestingTooDeep { .. }
        ));

        let shallow = format!(r#"[{{"x":{}{}}}]"#, "[".repeat(8), "]".repeat(8));
        assert!(parse(&shallow).is_ok());
    }
}
