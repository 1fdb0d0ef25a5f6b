//! Textual codec for integer-list columns.
//!
//! Product lists cross the driver boundary in the flat Postgres array literal
//! form `{1,2,3}` (empty list is `{}`): Postgres casts the text to a native
//! array column, SQLite stores it verbatim in a TEXT column.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ParseArrayError {
    #[error("array text missing enclosing braces: {0:?}")]
    MissingBraces(String),
    #[error("invalid array element: {0:?}")]
    InvalidElement(String),
}

/// Encode an ordered list of integers as `{v1,v2,...,vn}`.
pub fn encode(values: &[i64]) -> String {
    let elements: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("{{{}}}", elements.join(","))
}

/// Decode the textual array form back into a list of integers.
pub fn decode(text: &str) -> Result<Vec<i64>, ParseArrayError> {
    let body = text
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .ok_or_else(|| ParseArrayError::MissingBraces(text.to_string()))?;

    // "{}" must short-circuit here: splitting the empty body on commas would
    // yield one empty token that fails integer parsing.
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(|token| {
            token
                .parse::<i64>()
                .map_err(|_| ParseArrayError::InvalidElement(token.to_string()))
        })
        .collect()
}
