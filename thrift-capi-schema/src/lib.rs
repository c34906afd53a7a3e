//! # thrift-capi Schema
//!
//! Resolved Thrift program model for the C-API generator.
//!
//! This crate provides:
//! - Immutable declaration types (typedefs, enums, constants, structs, services)
//! - XML schema-document parsing (the front end's `--gen xml` dump)
//! - Reference resolution into a shared, acyclic tree
//! - Program validation

pub mod document;
pub mod error;
pub mod parser;
pub mod program;
pub mod resolve;
pub mod services;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use parser::parse_document;
pub use program::Program;
pub use resolve::resolve_document;
pub use services::{Function, Service};
pub use types::{
    BaseType, ConstDef, ConstValue, EnumDef, EnumValue, Field, Requiredness, StructDef,
    StructKind, Type, TypedefDef,
};
pub use validation::validate_program;

/// Parses and resolves an XML schema document in one step.
///
/// # Errors
/// Returns `SchemaError` if parsing or reference resolution fails.
pub fn load_program(xml: &str) -> Result<Program, SchemaError> {
    let document = parse_document(xml)?;
    resolve_document(&document)
}
