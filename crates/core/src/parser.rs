//! Parser for textual source type descriptors.
//!
//! Accepts the spelling produced by `SourceType`'s `Display` plus common
//! engine aliases. Keywords are case-insensitive; struct field names keep
//! their case.

use std::str::FromStr;

use crate::descriptor::{PrimitiveKind, SourceType, StructField, TemporalKind};
use crate::error::ConversionError;
use crate::lexer::{lex, malformed, Token};

/// Precision and scale of a bare `DECIMAL` with no parameter list.
const DEFAULT_DECIMAL: (u8, u8) = (18, 3);

/// Deepest type nesting a descriptor may spell. `Display`, `depth` and
/// `Drop` on `SourceType` recurse once per level.
pub const MAX_NESTING_DEPTH: usize = 64;

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    text: &'a str,
    /// Type levels open on the current path, `[]` suffixes included.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token], text: &'a str) -> Self {
        Parser {
            tokens,
            pos: 0,
            text,
            depth: 0,
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let t = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: impl Into<String>) -> ConversionError {
        malformed(self.text, msg)
    }

    fn expect(&mut self, expected: Token, shown: &str) -> Result<(), ConversionError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', got {:?}", shown, self.peek())))
        }
    }

    fn expect_lparen(&mut self) -> Result<(), ConversionError> {
        self.expect(Token::LParen, "(")
    }

    fn expect_rparen(&mut self) -> Result<(), ConversionError> {
        self.expect(Token::RParen, ")")
    }

    fn is_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Token::Word(w) if w.eq_ignore_ascii_case(kw))
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<(), ConversionError> {
        if self.is_keyword(kw) {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', got {:?}", kw, self.peek())))
        }
    }

    fn take_word(&mut self) -> Result<String, ConversionError> {
        if let Token::Word(w) = self.peek().clone() {
            self.advance();
            Ok(w)
        } else {
            Err(self.err(format!("expected type name, got {:?}", self.peek())))
        }
    }

    fn take_u8(&mut self) -> Result<u8, ConversionError> {
        if let Token::Int(n) = self.peek().clone() {
            self.advance();
            n.parse::<u8>()
                .map_err(|_| self.err(format!("'{}' is not an integer between 0 and 255", n)))
        } else {
            Err(self.err(format!("expected integer, got {:?}", self.peek())))
        }
    }

    fn take_field_name(&mut self) -> Result<String, ConversionError> {
        match self.peek().clone() {
            Token::Word(w) | Token::Quoted(w) => {
                self.advance();
                Ok(w)
            }
            other => Err(self.err(format!("expected field name, got {:?}", other))),
        }
    }

    // -- Types --------------------------------------------------

    fn parse_type(&mut self) -> Result<SourceType, ConversionError> {
        self.enter()?;
        let mut t = self.parse_base()?;
        let mut suffixes = 0;
        while self.peek() == &Token::LBracket {
            self.advance();
            self.expect(Token::RBracket, "]")?;
            suffixes += 1;
            if self.depth + suffixes > MAX_NESTING_DEPTH {
                return Err(self.too_deep());
            }
            t = SourceType::list(t);
        }
        self.depth -= 1;
        Ok(t)
    }

    fn enter(&mut self) -> Result<(), ConversionError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        self.depth += 1;
        Ok(())
    }

    fn too_deep(&self) -> ConversionError {
        self.err(format!("type nesting exceeds {} levels", MAX_NESTING_DEPTH))
    }

    fn parse_base(&mut self) -> Result<SourceType, ConversionError> {
        let name = self.take_word()?;
        let upper = name.to_ascii_uppercase();
        let primitive = match upper.as_str() {
            "TINYINT" | "INT1" => Some(PrimitiveKind::Int8),
            "SMALLINT" | "INT2" => Some(PrimitiveKind::Int16),
            "INTEGER" | "INT" | "INT4" => Some(PrimitiveKind::Int32),
            "BIGINT" | "INT8" => Some(PrimitiveKind::Int64),
            "HUGEINT" | "INT128" => Some(PrimitiveKind::Int128),
            "UTINYINT" => Some(PrimitiveKind::UInt8),
            "USMALLINT" => Some(PrimitiveKind::UInt16),
            "UINTEGER" => Some(PrimitiveKind::UInt32),
            "UBIGINT" => Some(PrimitiveKind::UInt64),
            "FLOAT" | "REAL" | "FLOAT4" => Some(PrimitiveKind::Float32),
            "DOUBLE" | "FLOAT8" => Some(PrimitiveKind::Float64),
            "VARCHAR" | "TEXT" | "STRING" => Some(PrimitiveKind::Text),
            "BLOB" | "BYTEA" | "BINARY" => Some(PrimitiveKind::Binary),
            "BOOLEAN" | "BOOL" => Some(PrimitiveKind::Boolean),
            _ => None,
        };
        if let Some(kind) = primitive {
            return Ok(kind.into());
        }

        match upper.as_str() {
            "DATE" => self.parse_temporal(TemporalKind::Date),
            "TIME" => self.parse_temporal(TemporalKind::Time),
            "TIMESTAMP" | "DATETIME" => self.parse_temporal(TemporalKind::Timestamp),
            "TIMETZ" => Ok(SourceType::Temporal {
                kind: TemporalKind::Time,
                has_timezone: true,
            }),
            "TIMESTAMPTZ" => Ok(SourceType::timestamp(true)),
            "DECIMAL" | "NUMERIC" => self.parse_decimal(),
            "LIST" => {
                self.expect_lparen()?;
                let elem = self.parse_type()?;
                self.expect_rparen()?;
                Ok(SourceType::list(elem))
            }
            "STRUCT" => self.parse_struct(),
            "MAP" => {
                self.expect_lparen()?;
                let key = self.parse_type()?;
                self.expect(Token::Comma, ",")?;
                let value = self.parse_type()?;
                self.expect_rparen()?;
                Ok(SourceType::map(key, value))
            }
            "UNION" => {
                self.expect_lparen()?;
                let mut variants = vec![self.parse_type()?];
                while self.peek() == &Token::Comma {
                    self.advance();
                    variants.push(self.parse_type()?);
                }
                self.expect_rparen()?;
                Ok(SourceType::union(variants))
            }
            _ => Err(self.err(format!("unknown type name '{}'", name))),
        }
    }

    fn parse_temporal(&mut self, kind: TemporalKind) -> Result<SourceType, ConversionError> {
        let has_timezone = if self.is_keyword("WITH") {
            self.advance();
            self.expect_keyword("TIME")?;
            self.expect_keyword("ZONE")?;
            true
        } else if self.is_keyword("WITHOUT") {
            self.advance();
            self.expect_keyword("TIME")?;
            self.expect_keyword("ZONE")?;
            false
        } else {
            false
        };
        Ok(SourceType::Temporal { kind, has_timezone })
    }

    fn parse_decimal(&mut self) -> Result<SourceType, ConversionError> {
        if self.peek() != &Token::LParen {
            let (p, s) = DEFAULT_DECIMAL;
            return Ok(SourceType::decimal(p, s));
        }
        self.advance();
        let precision = self.take_u8()?;
        let scale = if self.peek() == &Token::Comma {
            self.advance();
            self.take_u8()?
        } else {
            0
        };
        self.expect_rparen()?;
        Ok(SourceType::decimal(precision, scale))
    }

    fn parse_struct(&mut self) -> Result<SourceType, ConversionError> {
        self.expect_lparen()?;
        let mut fields = Vec::new();
        if self.peek() != &Token::RParen {
            loop {
                let name = self.take_field_name()?;
                let field_type = self.parse_type()?;
                fields.push(StructField::new(name, field_type));
                if self.peek() == &Token::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect_rparen()?;
        Ok(SourceType::Struct(fields))
    }
}

impl FromStr for SourceType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = lex(s)?;
        let mut parser = Parser::new(&tokens, s);
        let t = parser.parse_type()?;
        if parser.peek() != &Token::Eof {
            return Err(parser.err(format!("unexpected trailing {:?}", parser.peek())));
        }
        Ok(t)
    }
}
