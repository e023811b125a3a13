use std::fmt;
use std::str::FromStr;

use crate::descriptor::{PrimitiveKind, TypeDescriptor, UdtField, UserType};

/// Nesting deeper than this is rejected instead of recursing further.
const MAX_DEPTH: usize = 64;

/// Error from parsing descriptor text. `offset` is a byte offset into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at offset {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ParseError {}

impl FromStr for TypeDescriptor {
    type Err = ParseError;

    /// Parse CQL-style type text, e.g. `map<decimal, frozen<tuple<int, text>>>`.
    ///
    /// User types are written inline as `name{field: type, ...}`; custom
    /// classes as a single-quoted string.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { input: s, pos: 0 };
        let ty = parser.parse_type(0)?;
        parser.skip_ws();
        if parser.pos != s.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(ty)
    }
}

// ═══════════════════════════════════════════════════════════════
//  Recursive descent parser
// ═══════════════════════════════════════════════════════════════

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError { offset: self.pos, message: msg.into() }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace, then consume `c` if it is next.
    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{c}'")))
        }
    }

    fn ident(&mut self) -> Result<&'a str, ParseError> {
        self.skip_ws();
        let start = self.pos;
        while let Some(c) = self.peek() {
            let ok = if self.pos == start {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '.'
            };
            if !ok {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a type name"));
        }
        Ok(&self.input[start..self.pos])
    }

    fn parse_type(&mut self, depth: usize) -> Result<TypeDescriptor, ParseError> {
        if depth > MAX_DEPTH {
            return Err(self.error(format!("type nested deeper than {MAX_DEPTH} levels")));
        }
        self.skip_ws();
        if self.peek() == Some('\'') {
            return self.parse_custom();
        }

        let start = self.pos;
        let name = self.ident()?;
        match name.to_ascii_lowercase().as_str() {
            "frozen" => {
                self.expect('<')?;
                let inner = self.parse_type(depth + 1)?;
                self.expect('>')?;
                Ok(inner)
            }
            "list" => {
                self.expect('<')?;
                let elem = self.parse_type(depth + 1)?;
                self.expect('>')?;
                Ok(TypeDescriptor::list(elem))
            }
            "set" => {
                self.expect('<')?;
                let elem = self.parse_type(depth + 1)?;
                self.expect('>')?;
                Ok(TypeDescriptor::set(elem))
            }
            "map" => {
                self.expect('<')?;
                let key = self.parse_type(depth + 1)?;
                self.expect(',')?;
                let value = self.parse_type(depth + 1)?;
                self.expect('>')?;
                Ok(TypeDescriptor::map(key, value))
            }
            "tuple" => {
                self.expect('<')?;
                let mut fields = vec![self.parse_type(depth + 1)?];
                while self.eat(',') {
                    fields.push(self.parse_type(depth + 1)?);
                }
                self.expect('>')?;
                Ok(TypeDescriptor::Tuple(fields))
            }
            _ if self.eat('{') => self.parse_udt_body(name, depth),
            lower => PrimitiveKind::from_name(lower)
                .map(TypeDescriptor::Primitive)
                .ok_or(ParseError { offset: start, message: format!("unknown type '{name}'") }),
        }
    }

    fn parse_udt_body(&mut self, name: &str, depth: usize) -> Result<TypeDescriptor, ParseError> {
        let mut udt = UserType::new(name);
        loop {
            let field = self.ident()?.to_string();
            self.expect(':')?;
            let ty = self.parse_type(depth + 1)?;
            udt.fields.push(UdtField { name: field, ty });
            if !self.eat(',') {
                break;
            }
        }
        self.expect('}')?;
        Ok(TypeDescriptor::UserDefined(udt))
    }

    fn parse_custom(&mut self) -> Result<TypeDescriptor, ParseError> {
        let open = self.pos;
        self.pos += 1;
        let rest = &self.input[self.pos..];
        let Some(len) = rest.find('\'') else {
            return Err(ParseError { offset: open, message: "unterminated quoted type".into() });
        };
        let class = rest[..len].to_string();
        self.pos += len + 1;
        Ok(TypeDescriptor::Custom(class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn parse(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn parses_nested_composites() {
        let ty = parse("map<decimal, tuple<int,text>>");
        assert_eq!(
            ty,
            TypeDescriptor::map(
                PrimitiveKind::Decimal.into(),
                TypeDescriptor::tuple([PrimitiveKind::Int.into(), PrimitiveKind::Text.into()]),
            )
        );
    }

    #[test]
    fn frozen_is_unwrapped_and_case_ignored() {
        assert_eq!(parse(" FROZEN< List<VarChar> > "), TypeDescriptor::list(PrimitiveKind::Text.into()));
    }

    #[test]
    fn parses_udt_and_custom() {
        let ty = parse("set<address{street: text, zip: int}>");
        let TypeDescriptor::Set(inner) = ty else { panic!("expected set") };
        let TypeDescriptor::UserDefined(udt) = *inner else { panic!("expected udt") };
        assert_eq!(udt.name, "address");
        assert_eq!(udt.fields.len(), 2);
        assert_eq!(udt.fields[1].name, "zip");

        assert_eq!(
            parse("'org.apache.cassandra.db.marshal.DynamicCompositeType'"),
            TypeDescriptor::Custom("org.apache.cassandra.db.marshal.DynamicCompositeType".into())
        );
    }

    #[test]
    fn display_round_trips() {
        for text in [
            "map<int, list<timestamp>>",
            "tuple<int, text, set<uuid>>",
            "address{street: text, tags: list<text>}",
            "'com.example.Custom'",
        ] {
            assert_eq!(parse(text).to_string(), text);
        }
    }

    #[test]
    fn reports_offsets() {
        let err = "map<int text>".parse::<TypeDescriptor>().unwrap_err();
        assert_eq!(err.offset, 8);
        assert_eq!(err.message, "expected ','");

        let err = "list<strng>".parse::<TypeDescriptor>().unwrap_err();
        assert_eq!(err.offset, 5);
        assert_eq!(err.message, "unknown type 'strng'");

        let err = "int>".parse::<TypeDescriptor>().unwrap_err();
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn rejects_runaway_nesting() {
        let text = format!("{}int{}", "list<".repeat(100), ">".repeat(100));
        let err = text.parse::<TypeDescriptor>().unwrap_err();
        assert!(err.message.contains("nested deeper"));
    }

    proptest! {
        #[test]
        fn arbitrary_text_never_panics(text in "[a-zA-Z<>{},:' ]{0,32}") {
            if let Ok(ty) = text.parse::<TypeDescriptor>() {
                prop_assert_eq!(ty.to_string().parse::<TypeDescriptor>().unwrap(), ty);
            }
        }
    }
}
