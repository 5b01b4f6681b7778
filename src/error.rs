use std::fmt::{Display, Formatter};

/// Failure returned by [`crate::parse_str`]/[`crate::parse_buffer`].
///
/// Mirrors the negative-return-code channel of the original C parser: each
/// variant corresponds 1:1 to one of its `MU_JSON_ERR_*` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonError {
    /// Grammatically invalid input: unexpected byte, malformed number,
    /// invalid escape, stray delimiter, leading zero followed by digits.
    BadFormat,
    /// Input ended mid-string, mid-number, mid-container, or mid-escape.
    Incomplete,
    /// Input contained no JSON element (all whitespace, or empty).
    NoEntities,
    /// Non-whitespace bytes follow the top-level element.
    StrayInput,
    /// The caller-supplied token storage was exhausted mid-parse.
    NotEnoughTokens,
    /// Empty input or empty token storage at the public boundary.
    BadArgument,
    /// Nesting depth exceeded the 11-bit level field.
    TooDeep,
    /// A byte `>= 0x80` appeared outside a `\uXXXX` escape.
    NoMultibyte,
    /// A precondition of a private helper was violated; should not be
    /// reachable from any public entry point.
    Internal,
}

impl JsonError {
    /// Symbolic name matching `mu_json_error_name` in the original C API.
    pub fn name(&self) -> &'static str {
        match self {
            JsonError::BadFormat => "BAD_FORMAT",
            JsonError::Incomplete => "INCOMPLETE",
            JsonError::NoEntities => "NO_ENTITIES",
            JsonError::StrayInput => "STRAY_INPUT",
            JsonError::NotEnoughTokens => "NOT_ENOUGH_TOKENS",
            JsonError::BadArgument => "BAD_ARGUMENT",
            JsonError::TooDeep => "TOO_DEEP",
            JsonError::NoMultibyte => "NO_MULTIBYTE",
            JsonError::Internal => "INTERNAL",
        }
    }
}

impl Display for JsonError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::error::Error for JsonError {}
