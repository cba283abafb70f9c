//! Parameter-list parsing for `NUMBER(p[,s])` and `decimal128(p,s)`.

use crate::error::{ConversionError, ConversionResult};

/// Parse the parenthesized, comma-separated integer list that follows a
/// keyword.
///
/// `text` is the whole input (used in error messages) and `rest` is what
/// follows the keyword. Returns `None` when `rest` does not open a
/// parameter list at all, so the caller can treat the input as some other
/// keyword (`NUMBERS` is not `NUMBER`).
pub(crate) fn parse_params(text: &str, rest: &str) -> Option<ConversionResult<Vec<u8>>> {
    let inner = rest.trim_start().strip_prefix('(')?;
    Some(parse_inner(text, inner))
}

fn parse_inner(text: &str, inner: &str) -> ConversionResult<Vec<u8>> {
    let close = inner
        .find(')')
        .ok_or_else(|| ConversionError::malformed_params(text, "missing closing parenthesis"))?;
    let trailing = inner[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(ConversionError::malformed_params(
            text,
            format!("unexpected text after ')': '{}'", trailing),
        ));
    }

    let body = &inner[..close];
    if body.trim().is_empty() {
        return Err(ConversionError::malformed_params(text, "empty parameter list"));
    }

    body.split(',')
        .map(|raw| {
            let param = raw.trim();
            if param.is_empty() {
                return Err(ConversionError::malformed_params(text, "empty parameter"));
            }
            let not_a_u8 = || {
                ConversionError::malformed_params(
                    text,
                    format!("'{}' is not an integer between 0 and 255", param),
                )
            };
            // `u8::from_str` also takes a leading '+'.
            if !param.bytes().all(|b| b.is_ascii_digit()) {
                return Err(not_a_u8());
            }
            param.parse::<u8>().map_err(|_| not_a_u8())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn parse(text: &str, keyword: &str) -> Option<ConversionResult<Vec<u8>>> {
        parse_params(text, &text[keyword.len()..])
    }

    #[test]
    fn parses_one_and_two_params() {
        assert_eq!(parse("NUMBER(10,0)", "NUMBER"), Some(Ok(vec![10, 0])));
        assert_eq!(parse("NUMBER(7)", "NUMBER"), Some(Ok(vec![7])));
    }

    #[test]
    fn tolerates_whitespace() {
        assert_eq!(parse("NUMBER( 12 , 4 )", "NUMBER"), Some(Ok(vec![12, 4])));
        assert_eq!(parse("NUMBER (5,1)", "NUMBER"), Some(Ok(vec![5, 1])));
    }

    #[test]
    fn no_paren_is_not_a_param_list() {
        assert!(parse("NUMBERS", "NUMBER").is_none());
        assert!(parse("NUMBER", "NUMBER").is_none());
    }

    #[test]
    fn malformed_lists_are_errors() {
        for text in [
            "NUMBER(abc,0)",
            "NUMBER(10",
            "NUMBER()",
            "NUMBER(10,)",
            "NUMBER(-1,0)",
            "NUMBER(+5)",
            "NUMBER(10,+2)",
            "NUMBER(300,0)",
            "NUMBER(10,2)x",
        ] {
            let err = parse(text, "NUMBER").unwrap().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedParameterList, "{}", text);
        }
    }

    #[test]
    fn missing_paren_message_is_descriptive() {
        let err = parse("NUMBER(10", "NUMBER").unwrap().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed parameter list in 'NUMBER(10': missing closing parenthesis"
        );
    }
}
