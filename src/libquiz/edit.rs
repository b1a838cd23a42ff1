//! Validation of numeric entries typed by the user. Positions are 1-based on
//! input and 0-based in the project.

use crate::libquiz::error::{Error, Result};

pub fn parse_number(field: &'static str, input: &str) -> Result<usize> {
    input
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::validation(field, format!("{input:?} is not a number")))
}

/// Cards per row: a number of at least 1.
pub fn parse_per_row(input: &str) -> Result<usize> {
    match parse_number("cards per row", input)? {
        0 => Err(Error::validation("cards per row", "must be at least 1")),
        n => Ok(n),
    }
}

/// Converts a 1-based position into an index.
pub fn parse_position(field: &'static str, input: &str) -> Result<usize> {
    match parse_number(field, input)? {
        0 => Err(Error::validation(field, "positions start at 1")),
        n => Ok(n - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_per_row() {
        assert_eq!(parse_per_row("4").unwrap(), 4);
        assert_eq!(parse_per_row(" 2 ").unwrap(), 2);
        assert!(matches!(parse_per_row("0"), Err(Error::Validation { .. })));
        assert!(matches!(parse_per_row("three"), Err(Error::Validation { .. })));
        assert!(parse_per_row("-1").is_err());
    }

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("answer", "1").unwrap(), 0);
        assert_eq!(parse_position("answer", "3").unwrap(), 2);
        assert!(parse_position("answer", "0").is_err());
        assert!(parse_position("answer", "").is_err());
    }

    #[test]
    fn test_message_names_field() {
        let err = parse_position("correct answer", "abc").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid correct answer: \"abc\" is not a number"
        );
    }
}
