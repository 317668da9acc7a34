//! Shell-style argument tokenizer.
//!
//! Splits a command's argument remainder into tokens:
//! - Runs of unquoted whitespace separate tokens
//! - Single quotes preserve everything up to the closing quote
//! - Double quotes preserve whitespace; `\"` and `\\` escape inside them
//! - A backslash outside quotes makes the next character literal
//!
//! `""` and `''` produce an empty token.

use thiserror::Error;

/// Tokenization failure. Callers treat this as "no arguments", never as
/// a failed command match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated quote in argument list")]
    UnterminatedQuote,

    #[error("dangling escape at end of argument list")]
    DanglingEscape,
}

/// Split an argument string into tokens.
pub fn split_args(input: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes "no token yet" from an explicit empty token ("").
    let mut in_token = false;

    let mut chars = input.chars();
    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnterminatedQuote),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            // Only the quote and the backslash are escapable
                            // inside double quotes; anything else keeps the
                            // backslash literal.
                            Some(e @ ('"' | '\\')) => current.push(e),
                            Some(e) => {
                                current.push('\\');
                                current.push(e);
                            }
                            None => return Err(TokenizeError::UnterminatedQuote),
                        },
                        Some(c) => current.push(c),
                        None => return Err(TokenizeError::UnterminatedQuote),
                    }
                }
            }
            '\\' => {
                in_token = true;
                match chars.next() {
                    Some(e) => current.push(e),
                    None => return Err(TokenizeError::DanglingEscape),
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_whitespace_split() {
        assert_eq!(split_args("a b  c").unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_input_yields_no_tokens() {
        assert_eq!(split_args("").unwrap(), Vec::<String>::new());
        assert_eq!(split_args("   ").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn double_quotes_group() {
        assert_eq!(split_args(r#"a "b c" d"#).unwrap(), vec!["a", "b c", "d"]);
    }

    #[test]
    fn single_quotes_group() {
        assert_eq!(split_args("a 'b  c'").unwrap(), vec!["a", "b  c"]);
    }

    #[test]
    fn quotes_join_with_adjacent_text() {
        assert_eq!(split_args(r#"foo"bar baz"qux"#).unwrap(), vec!["foobar bazqux"]);
    }

    #[test]
    fn explicit_empty_token() {
        assert_eq!(split_args(r#"a "" b"#).unwrap(), vec!["a", "", "b"]);
        assert_eq!(split_args("''").unwrap(), vec![""]);
    }

    #[test]
    fn escape_outside_quotes() {
        assert_eq!(split_args(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(split_args(r#"\"quoted\""#).unwrap(), vec![r#""quoted""#]);
    }

    #[test]
    fn escape_inside_double_quotes() {
        assert_eq!(split_args(r#""say \"hi\"""#).unwrap(), vec![r#"say "hi""#]);
        assert_eq!(split_args(r#""back\\slash""#).unwrap(), vec![r"back\slash"]);
        // Other escapes keep the backslash.
        assert_eq!(split_args(r#""a\b""#).unwrap(), vec![r"a\b"]);
    }

    #[test]
    fn unterminated_quote_errors() {
        assert_eq!(split_args(r#"a "b c"#), Err(TokenizeError::UnterminatedQuote));
        assert_eq!(split_args("'open"), Err(TokenizeError::UnterminatedQuote));
    }

    #[test]
    fn dangling_escape_errors() {
        assert_eq!(split_args(r"a \"), Err(TokenizeError::DanglingEscape));
    }
}
