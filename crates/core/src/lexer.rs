use crate::error::ConversionError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifiers and keywords, distinguished in the parser
    Word(String),
    /// Double-quoted identifier (quotes removed, `""` unescaped)
    Quoted(String),
    /// Unsigned integer literal, kept as text until the parser picks a width
    Int(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Eof,
}

/// Tokenize a textual source type descriptor such as
/// `STRUCT(name VARCHAR, tags VARCHAR[])`.
pub fn lex(src: &str) -> Result<Vec<Token>, ConversionError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = src.chars().collect();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        match c {
            '(' => {
                tokens.push(Token::LParen);
                pos += 1;
                continue;
            }
            ')' => {
                tokens.push(Token::RParen);
                pos += 1;
                continue;
            }
            '[' => {
                tokens.push(Token::LBracket);
                pos += 1;
                continue;
            }
            ']' => {
                tokens.push(Token::RBracket);
                pos += 1;
                continue;
            }
            ',' => {
                tokens.push(Token::Comma);
                pos += 1;
                continue;
            }
            _ => {}
        }

        // Quoted identifier
        if c == '"' {
            pos += 1;
            let mut s = String::new();
            loop {
                if pos >= chars.len() {
                    return Err(malformed(src, "unterminated quoted identifier"));
                }
                if chars[pos] == '"' {
                    if pos + 1 < chars.len() && chars[pos + 1] == '"' {
                        s.push('"');
                        pos += 2;
                        continue;
                    }
                    pos += 1;
                    break;
                }
                s.push(chars[pos]);
                pos += 1;
            }
            tokens.push(Token::Quoted(s));
            continue;
        }

        if c.is_ascii_digit() {
            let start = pos;
            while pos < chars.len() && chars[pos].is_ascii_digit() {
                pos += 1;
            }
            tokens.push(Token::Int(chars[start..pos].iter().collect()));
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            tokens.push(Token::Word(chars[start..pos].iter().collect()));
            continue;
        }

        return Err(malformed(src, format!("unexpected character '{}'", c)));
    }

    tokens.push(Token::Eof);
    Ok(tokens)
}

pub(crate) fn malformed(text: &str, detail: impl Into<String>) -> ConversionError {
    ConversionError::MalformedSourceType {
        text: text.to_owned(),
        detail: detail.into(),
    }
}
