// This module defines error types for the tracegen generator using the thiserror
// crate for idiomatic Rust error handling. GenError covers every specification and
// build-time failure class: type expressions referencing unknown or wrongly
// classified arguments, duplicate instruction/argument names, builder symbol
// collisions, unresolved type tokens in a substitution table, fragment name
// collisions between generators, and template rendering defects. Each variant
// carries enough context (instruction name, argument name, offending token, table
// name) to locate the defect in the catalogue configuration. GenResult<T> is the
// convenience alias used throughout the crate.

//! Error types for catalogue validation and fragment generation.
//!
//! Using thiserror for more idiomatic error handling. All of these are
//! build-time errors: the pipeline is all-or-nothing and never emits
//! partial output once any of them is raised.

use thiserror::Error;

/// Main error type for generation runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("instruction {instruction}: no argument named {argument}")]
    UnknownArgument {
        instruction: String,
        argument: String,
    },

    #[error("instruction {instruction}: argument {argument} is not a value reference")]
    NotAValue {
        instruction: String,
        argument: String,
    },

    #[error("instruction {instruction}: argument {argument} is not a scalar")]
    NotAScalar {
        instruction: String,
        argument: String,
    },

    #[error("duplicate instruction name: {name}")]
    DuplicateInstruction {
        name: String,
    },

    #[error("instruction {instruction}: duplicate argument name {argument}")]
    DuplicateArgument {
        instruction: String,
        argument: String,
    },

    #[error("instructions {first} and {second} share the builder symbol {symbol}")]
    SymbolCollision {
        first: String,
        second: String,
        symbol: String,
    },

    #[error("no entry for type token {token} in the {table} substitution table (instruction {instruction}, argument {argument})")]
    UnresolvedToken {
        token: String,
        table: &'static str,
        instruction: String,
        argument: String,
    },

    #[error("fragment {name} emitted by both {first} and {second}")]
    DuplicateFragment {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("template references unknown fragment {name}")]
    MissingFragment {
        name: String,
    },

    #[error("unterminated fragment reference at byte offset {offset}")]
    UnterminatedFragment {
        offset: usize,
    },
}

/// Result type alias for generation operations.
pub type GenResult<T> = Result<T, GenError>;
