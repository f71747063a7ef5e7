//! Validation of raw descriptor tokens before they may appear in SQL text.
//!
//! Three token families arrive as raw caller strings: table/column names,
//! ORDER BY direction keys, and the row-limit policy. Each gets a fallible
//! `parse`; nothing reaches the statement renderer unvalidated.
//!
//! # Example
//! ```
//! use pgcall::{Ident, IdentKind};
//!
//! let t = Ident::parse("users", IdentKind::Table)?;
//! assert_eq!(t.as_str(), "users");
//! assert!(Ident::parse("users; DROP TABLE users", IdentKind::Table).is_err());
//! # Ok::<(), pgcall::CallError>(())
//! ```

use crate::error::{CallError, CallResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a raw name is claimed to be; reported in validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentKind {
    Table,
    Column,
}

impl fmt::Display for IdentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// A table or column name proven safe for direct SQL text inclusion.
///
/// Accepts only `[A-Za-z0-9_.]+`; the dot serves qualified/aliased names
/// (`t.column`). The validated token is carried unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    name: String,
}

impl Ident {
    /// Validate a raw name.
    ///
    /// Any character outside the identifier alphabet (quotes, semicolons,
    /// whitespace, ...) fails, as does an empty string.
    pub fn parse(name: &str, kind: IdentKind) -> CallResult<Self> {
        let safe = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
        if !safe {
            return Err(CallError::identifier(name, kind));
        }
        Ok(Self {
            name: name.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An ORDER BY direction decoded from a raw descriptor key.
///
/// Raw keys may carry digit suffixes so that repeated directions can coexist
/// in one caller-supplied map (`ASC`, `ASC2`, ...); the digits have no SQL
/// meaning and are stripped, as is the literal token `NULL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Asc,
    Desc,
    /// No explicit direction; the engine default applies.
    Unspecified,
}

impl OrderDirection {
    /// Decode a raw direction key.
    ///
    /// Uppercases, strips ASCII digits and `NULL`, trims whitespace, then
    /// accepts only `ASC`, `DESC`, or the empty string.
    pub fn parse(raw: &str) -> CallResult<Self> {
        let upper: String = raw
            .to_ascii_uppercase()
            .chars()
            .filter(|c| !c.is_ascii_digit())
            .collect();
        let cleaned = upper.replace("NULL", "");
        match cleaned.trim() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            "" => Ok(Self::Unspecified),
            _ => Err(CallError::OrderDirection(raw.to_string())),
        }
    }

    /// SQL token, if any.
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            Self::Asc => Some("ASC"),
            Self::Desc => Some("DESC"),
            Self::Unspecified => None,
        }
    }
}

/// How many rows a SELECT may return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// At most one row; renders `LIMIT 1`.
    One,
    /// Every matching row; renders no LIMIT clause.
    All,
    /// At most `n` rows; renders `LIMIT n`.
    Fixed(u64),
}

impl LimitPolicy {
    /// Decode a raw limit token: `"one"`, `"all"`, or a non-negative integer.
    pub fn parse(raw: &str) -> CallResult<Self> {
        match raw {
            "one" => Ok(Self::One),
            "all" => Ok(Self::All),
            _ => raw
                .parse::<u64>()
                .map(Self::Fixed)
                .map_err(|_| CallError::Limit(raw.to_string())),
        }
    }
}

impl Default for LimitPolicy {
    fn default() -> Self {
        Self::All
    }
}
