//! # thrift-capi Codegen
//!
//! Generates a flat C API over Thrift service handlers, plus a C# wrapper
//! calling that API through P/Invoke.
//!
//! This crate provides:
//! - An `extern "C"` header with struct/enum declarations and exported
//!   service functions
//! - A C++ source marshaling between C values and the Thrift C++ types,
//!   with one handler registry per service
//! - A C# source with sequential-layout mirrors and a `DirectClient` per
//!   service
//! - Paired free functions for every heap buffer handed to callers

pub mod capi;
pub mod config;
pub mod csharp;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod output;
pub mod writer;

pub use config::GeneratorOptions;
pub use error::CodegenError;
pub use generator::Generator;
pub use mapper::TypeMapper;
pub use naming::ReservedWords;
pub use output::{GeneratedFiles, OutputFile, WriteStatus};

use thrift_capi_schema::Program;

/// Validates a resolved program and generates its artifacts.
///
/// # Errors
/// Returns `CodegenError` if validation or generation fails.
pub fn generate_program(
    program: &Program,
    options: GeneratorOptions,
) -> Result<GeneratedFiles, CodegenError> {
    thrift_capi_schema::validate_program(program)?;
    Generator::with_options(program, options).generate()
}

/// Generates the artifacts for an XML schema document with default options.
///
/// # Arguments
/// * `xml` - Schema document content
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, or generation fails.
pub fn generate_from_xml(xml: &str) -> Result<GeneratedFiles, CodegenError> {
    generate_from_xml_with_options(xml, GeneratorOptions::default())
}

/// Generates the artifacts for an XML schema document.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, or generation fails.
pub fn generate_from_xml_with_options(
    xml: &str,
    options: GeneratorOptions,
) -> Result<GeneratedFiles, CodegenError> {
    let program = thrift_capi_schema::load_program(xml)?;
    generate_program(&program, options)
}

/// Generates the artifacts for an XML schema document file.
///
/// # Arguments
/// * `path` - Path to the schema document
/// * `options` - Generator options
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation, or generation
/// fails.
pub fn generate_from_file(
    path: &std::path::Path,
    options: GeneratorOptions,
) -> Result<GeneratedFiles, CodegenError> {
    let xml = std::fs::read_to_string(path)?;
    generate_from_xml_with_options(&xml, options)
}
