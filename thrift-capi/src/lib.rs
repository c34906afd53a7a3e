//! # thrift-capi
//!
//! Generates a flat C API, a C++ bridge and a C# P/Invoke wrapper for the
//! services of a Thrift program.
//!
//! ## Quick Start
//!
//! ```ignore
//! use thrift_capi::prelude::*;
//!
//! let files = generate_from_xml(&std::fs::read_to_string("tutorial.xml")?)?;
//! files.write_to(std::path::Path::new("gen"))?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Program model, schema-document loading and validation
//! - [`codegen`] - Header, bridge source and managed wrapper generation

pub mod prelude;

/// Program model, loading and validation.
pub mod schema {
    pub use thrift_capi_schema::*;
}

/// Code generation.
pub mod codegen {
    pub use thrift_capi_codegen::*;
}

// Re-export commonly used items at the crate root
pub use thrift_capi_codegen::{
    CodegenError, GeneratedFiles, Generator, GeneratorOptions, WriteStatus, generate_from_file,
    generate_from_xml, generate_from_xml_with_options, generate_program,
};
pub use thrift_capi_schema::{Program, load_program};
