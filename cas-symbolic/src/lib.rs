#![doc = include_str!("../README.md")]

pub mod dictionary;
pub mod engine;
pub mod expr;
pub mod pattern;

pub use expr::Expr;
pub use pattern::{match_expr, substitute, MatchOptions, Substitution};
