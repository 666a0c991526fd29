//! Error types for recipe parsing and expansion

use thiserror::Error;

/// A malformed stack line or recipe block. Any parse failure aborts the
/// whole load; a partial recipe index is never used.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected `<amount> <item>`, found an empty line")]
    EmptyLine,

    #[error("amount {0:?} is missing an item name")]
    MissingItem(String),

    #[error("{0:?} is not a valid integer amount")]
    InvalidAmount(String),

    #[error("expected a material count, found {0:?}")]
    InvalidCount(String),

    #[error("recipe for {item:?} declares {declared} materials but only {found} follow")]
    TruncatedBlock {
        item: String,
        declared: usize,
        found: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpandError {
    #[error(
        "no fixpoint after {passes} substitutions; the recipe graph likely contains a cycle"
    )]
    NonTerminating { passes: usize },
}
