//! Prelude module for convenient imports.
//!
//! ```ignore
//! use thrift_capi::prelude::*;
//! ```

// Schema types
pub use thrift_capi_schema::{
    BaseType, ConstDef, ConstValue, EnumDef, EnumValue, Field, Function, ParseError, Program,
    SchemaError, Service, StructDef, StructKind, Type, TypedefDef, load_program,
    validate_program,
};

// Generator types
pub use thrift_capi_codegen::{
    CodegenError, GeneratedFiles, Generator, GeneratorOptions, OutputFile, ReservedWords,
    TypeMapper, WriteStatus, generate_from_file, generate_from_xml,
    generate_from_xml_with_options, generate_program,
};
