//! Main code generator.

use crate::capi::{HeaderEmitter, SourceEmitter};
use crate::config::GeneratorOptions;
use crate::csharp::BridgeEmitter;
use crate::error::CodegenError;
use crate::mapper::TypeMapper;
use crate::output::{GeneratedFiles, OutputFile};
use crate::writer::CodeWriter;
use thrift_capi_schema::Program;

/// Code generator for one resolved program.
///
/// Generation is a single pass over the program in declaration order:
/// typedefs, enums, constants, struct forward declarations, structs, the
/// free functions, then services. Each visit writes into whichever of the
/// three outputs it concerns. All text is built in memory; nothing is
/// returned unless every declaration could be emitted.
pub struct Generator<'a> {
    program: &'a Program,
    options: GeneratorOptions,
}

impl<'a> Generator<'a> {
    /// Creates a generator with default options.
    #[must_use]
    pub fn new(program: &'a Program) -> Self {
        Self::with_options(program, GeneratorOptions::default())
    }

    /// Creates a generator with explicit options.
    #[must_use]
    pub fn with_options(program: &'a Program, options: GeneratorOptions) -> Self {
        Self { program, options }
    }

    /// Returns the generator options.
    #[must_use]
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Header file name: `<program>_api.h`.
    #[must_use]
    pub fn header_file_name(&self) -> String {
        format!("{}_api.h", self.program.name)
    }

    /// Source file name: `<program>_api.cpp`.
    #[must_use]
    pub fn source_file_name(&self) -> String {
        format!("{}_api.cpp", self.program.name)
    }

    /// Managed bridge file name: `<program>_api.cs`.
    #[must_use]
    pub fn bridge_file_name(&self) -> String {
        format!("{}_api.cs", self.program.name)
    }

    /// Generates all three artifacts.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` when a container crosses the C
    /// boundary as a function argument, return value or struct member
    /// reached by marshaling.
    pub fn generate(&self) -> Result<GeneratedFiles, CodegenError> {
        let program = self.program;
        let mapper = TypeMapper::new(program.namespace(&self.options.native_namespace_lang));
        let managed_ns = program.namespace(&self.options.managed_namespace_lang);
        let header_name = self.header_file_name();

        let mut header = HeaderEmitter::new(&mapper, &self.options);
        let source = SourceEmitter::new(&mapper);
        let mut bridge = BridgeEmitter::new(&mapper, &self.options);

        let mut h = CodeWriter::new();
        let mut cpp = CodeWriter::new();
        let mut cs = CodeWriter::new();

        tracing::debug!(
            program = %program.name,
            prefix = mapper.prefix(),
            managed_namespace = managed_ns,
            "generating C API"
        );

        header.begin(&mut h, &program.name);
        source.begin(&mut cpp, &header_name, program.services.iter().map(AsRef::as_ref));
        bridge.begin(&mut cs, managed_ns);

        for def in &program.typedefs {
            tracing::debug!(typedef = %def.name, "typedef resolved at every use site");
        }

        for def in &program.enums {
            tracing::debug!(name = %def.name, "emitting enum");
            header.enum_decl(&mut h, def);
            bridge.enum_mirror(&mut cs, def);
        }

        for def in &program.consts {
            tracing::debug!(name = %def.name, "emitting constant");
            header.const_comment(&mut h, def);
        }

        for def in &program.structs {
            header.forward_decl(&mut h, def);
        }

        for def in &program.structs {
            tracing::debug!(record = %def.name, "emitting struct");
            header.struct_decl(&mut h, def);
            bridge.struct_mirror(&mut cs, def);
        }

        header.free_prototypes(&mut h, program.structs.iter().map(AsRef::as_ref));
        source.string_free(&mut cpp);
        for def in &program.structs {
            source.struct_free(&mut cpp, def);
        }

        for service in &program.services {
            tracing::debug!(service = %service.name, "emitting service");
            if service.extends.is_some() {
                tracing::debug!(
                    service = %service.name,
                    extends = ?service.extends,
                    "inherited functions are not bridged"
                );
            }
            header.service_prototypes(&mut h, service);
            source.service(&mut cpp, service)?;
            bridge.service(&mut cs, service, program.structs.iter().map(AsRef::as_ref))?;
        }

        header.end(&mut h, &program.name);
        bridge.end(&mut cs, managed_ns);

        Ok(GeneratedFiles {
            header: OutputFile::new(header_name, h.into_string()),
            source: OutputFile::new(self.source_file_name(), cpp.into_string()),
            bridge: OutputFile::new(self.bridge_file_name(), cs.into_string()),
        })
    }
}
