//! Core types for the Driftwood world engine.
//!
//! This crate provides:
//! - [`Label`], [`Alias`], [`Tag`], [`WithTerm`] - Typed identifiers with
//!   their naming grammars and reserved-word rules
//! - [`Error`] - Rich error types with field-path context
//! - [`ScriptHost`] - The seam to the external condition/effect evaluator
//!   and template expander

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod script;
pub mod symbol;

pub use error::{Error, ErrorContext, ErrorKind, Result, SymbolClass};
pub use script::{Guard, NoScript, Script, ScriptContext, ScriptHost, ScriptRef, TemplateRef, Text};
pub use symbol::{Alias, Label, Tag, WithTerm, find_reserved_word};
