//! Native header emission.

use super::{EXPORT_MACRO, c_signature};
use crate::config::GeneratorOptions;
use crate::mapper::TypeMapper;
use crate::naming::to_upper_case;
use crate::output::AUTOGEN_BANNER;
use crate::writer::CodeWriter;
use thrift_capi_schema::{ConstDef, EnumDef, Service, StructDef};

/// Emits the `extern "C"` header.
///
/// Tracks the separator blank lines between the constant, forward
/// declaration and struct sections.
pub struct HeaderEmitter<'a> {
    mapper: &'a TypeMapper,
    options: &'a GeneratorOptions,
    wrote_const: bool,
    first_forward_decl: bool,
    first_struct: bool,
}

impl<'a> HeaderEmitter<'a> {
    /// Creates a header emitter.
    #[must_use]
    pub fn new(mapper: &'a TypeMapper, options: &'a GeneratorOptions) -> Self {
        Self {
            mapper,
            options,
            wrote_const: false,
            first_forward_decl: true,
            first_struct: true,
        }
    }

    /// Include guard macro for a program: `_<NS_LC_>_<PROGRAM>_H`, where
    /// `NS_LC_` is the upper-cased function prefix (`MyNs` gives `MY_NS_`).
    #[must_use]
    pub fn guard_name(&self, program: &str) -> String {
        let prefix = self.mapper.function_prefix();
        if prefix.is_empty() {
            format!("_{}_H", to_upper_case(program))
        } else {
            format!("_{}_{}_H", to_upper_case(prefix), to_upper_case(program))
        }
    }

    /// Writes the banner, include guard, export macro and opens the
    /// `extern "C"` block.
    pub fn begin(&mut self, w: &mut CodeWriter, program: &str) {
        let guard = self.guard_name(program);
        w.push(AUTOGEN_BANNER);
        w.line(&format!("#ifndef {guard}"));
        w.line(&format!("#define {guard}"));
        w.newline();
        w.line("#include <stdint.h>");
        w.newline();
        w.line(&format!("#ifndef {EXPORT_MACRO}"));
        w.line("#  ifdef _WINDOWS");
        w.line("#    if defined(THRIFT_C_API_COMPILED)");
        w.line(&format!("#      define {EXPORT_MACRO} __declspec(dllexport)"));
        w.line("#    elif defined(THRIFT_C_API_LINKED)");
        w.line(&format!("#      define {EXPORT_MACRO} __declspec(dllimport)"));
        w.line("#    else");
        w.line(&format!("#      define {EXPORT_MACRO}"));
        w.line("#    endif");
        w.line("#  else");
        w.line(&format!("#    define {EXPORT_MACRO}"));
        w.line("#  endif");
        w.line("#endif");
        w.newline();
        w.line("#ifdef __cplusplus");
        w.line("extern \"C\" {");
        w.line("#endif");
        w.newline();
    }

    /// Writes `typedef enum _ns_E { ... } ns_E;` with explicit values.
    pub fn enum_decl(&mut self, w: &mut CodeWriter, def: &EnumDef) {
        let c_name = self.mapper.c_name(&def.name);
        self.doc(w, def.doc.as_deref());
        w.line(&format!("typedef enum _{c_name}"));
        w.open_scope();
        for value in &def.values {
            self.doc(w, value.doc.as_deref());
            w.line(&format!(
                "{} = {},",
                self.mapper.c_enum_value(def, &value.name),
                value.value
            ));
        }
        w.close_scope().push(&format!(" {c_name};\n"));
        w.newline();
    }

    /// Writes a constant as a comment line.
    pub fn const_comment(&mut self, w: &mut CodeWriter, def: &ConstDef) {
        self.wrote_const = true;
        w.line(&format!(
            "// {} {} = {}",
            self.mapper.c_type(&def.ty),
            def.name,
            def.value
        ));
    }

    /// Writes `typedef struct _ns_S ns_S;`.
    pub fn forward_decl(&mut self, w: &mut CodeWriter, def: &StructDef) {
        if self.first_forward_decl {
            self.first_forward_decl = false;
            if self.wrote_const {
                w.newline();
            }
        }
        let c_name = self.mapper.c_name(&def.name);
        w.line(&format!("typedef struct _{c_name} {c_name};"));
    }

    /// Writes the struct declaration, one member per field in id order.
    pub fn struct_decl(&mut self, w: &mut CodeWriter, def: &StructDef) {
        if self.first_struct {
            self.first_struct = false;
            if !self.first_forward_decl {
                w.newline();
            }
        }
        let c_name = self.mapper.c_name(&def.name);
        self.doc(w, def.doc.as_deref());
        w.line(&format!("typedef struct _{c_name}"));
        w.open_scope();
        for field in def.sorted_members() {
            if field.ty.is_container() {
                tracing::warn!(
                    record = %def.name,
                    field = %field.name,
                    ty = %field.ty,
                    "container field has no C representation; emitting placeholder"
                );
            }
            self.doc(w, field.doc.as_deref());
            w.line(&format!("{} {};", self.mapper.c_type(&field.ty), field.name));
        }
        w.close_scope().push(&format!(" {c_name};\n"));
        w.newline();
    }

    /// Writes the shared string free function and one per struct.
    pub fn free_prototypes<'s>(
        &mut self,
        w: &mut CodeWriter,
        structs: impl IntoIterator<Item = &'s StructDef>,
    ) {
        w.line(&format!(
            "{EXPORT_MACRO} void {}(char* value);",
            self.mapper.string_free_function()
        ));
        for def in structs {
            w.line(&format!(
                "{EXPORT_MACRO} void {}({}* value);",
                self.mapper.struct_free_function(&def.name),
                self.mapper.c_name(&def.name)
            ));
        }
        w.newline();
    }

    /// Writes the init/close pair and one prototype per function.
    pub fn service_prototypes(&mut self, w: &mut CodeWriter, service: &Service) {
        self.doc(w, service.doc.as_deref());
        w.line(&format!(
            "{EXPORT_MACRO} void {}();",
            self.mapper.init_function(&service.name)
        ));
        w.line(&format!(
            "{EXPORT_MACRO} void {}();",
            self.mapper.close_function(&service.name)
        ));
        for function in &service.functions {
            w.newline();
            self.doc(w, function.doc.as_deref());
            let (head, params) = c_signature(self.mapper, &service.name, function);
            w.aligned_list(&format!("{EXPORT_MACRO} {head}"), &params, ");");
        }
        w.newline();
    }

    /// Closes the `extern "C"` block and the include guard.
    pub fn end(&mut self, w: &mut CodeWriter, program: &str) {
        w.line("#ifdef __cplusplus");
        w.line("}");
        w.line("#endif");
        w.newline();
        w.line(&format!("#endif // {}", self.guard_name(program)));
    }

    fn doc(&self, w: &mut CodeWriter, doc: Option<&str>) {
        if let Some(doc) = doc.filter(|_| self.options.docs) {
            w.doc_comment(doc);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use thrift_capi_schema::{BaseType, ConstValue, Field, Function, Type};

    fn emitter_output(f: impl FnOnce(&mut HeaderEmitter<'_>, &mut CodeWriter)) -> String {
        let mapper = TypeMapper::new("ns");
        let options = GeneratorOptions::default();
        let mut emitter = HeaderEmitter::new(&mapper, &options);
        let mut w = CodeWriter::new();
        f(&mut emitter, &mut w);
        w.into_string()
    }

    #[test]
    fn test_struct_decl() {
        let point = StructDef::new("Point")
            .with_field(Field::new(1, "x", BaseType::I32))
            .with_field(Field::new(2, "y", BaseType::I32));
        let out = emitter_output(|e, w| e.struct_decl(w, &point));

        assert_eq!(
            out,
            "typedef struct _ns_Point\n{\n\tint32_t x;\n\tint32_t y;\n} ns_Point;\n\n"
        );
    }

    #[test]
    fn test_enum_values_are_explicit() {
        let def = EnumDef::new("Color")
            .with_value("RED", 3)
            .with_value("GREEN", 1)
            .with_value("BLUE", 100);
        let out = emitter_output(|e, w| e.enum_decl(w, &def));

        assert!(out.starts_with("typedef enum _ns_Color\n{\n"));
        assert!(out.contains("\tColor_RED = 3,\n\tColor_GREEN = 1,\n\tColor_BLUE = 100,\n"));
        assert!(out.ends_with("} ns_Color;\n\n"));
    }

    #[test]
    fn test_docs_follow_option() {
        let mut def = EnumDef::new("Color").with_value("RED", 1);
        def.doc = Some("Paint colors".to_string());

        let with_docs = emitter_output(|e, w| e.enum_decl(w, &def));
        assert!(with_docs.starts_with("/**\n * Paint colors\n */\n"));

        let mapper = TypeMapper::new("ns");
        let options = GeneratorOptions::default().with_docs(false);
        let mut emitter = HeaderEmitter::new(&mapper, &options);
        let mut w = CodeWriter::new();
        emitter.enum_decl(&mut w, &def);
        assert!(!w.as_str().contains("Paint colors"));
    }

    #[test]
    fn test_const_and_forward_decl_separator() {
        let limit = ConstDef::new("LIMIT", Type::Base(BaseType::I32), ConstValue::Integer(10));
        let point = StructDef::new("Point");
        let out = emitter_output(|e, w| {
            e.const_comment(w, &limit);
            e.forward_decl(w, &point);
        });

        assert_eq!(out, "// int32_t LIMIT = 10\n\ntypedef struct _ns_Point ns_Point;\n");
    }

    #[test]
    fn test_service_prototypes() {
        let service = Service::new("Svc")
            .with_function(
                Function::new("Echo", BaseType::String)
                    .with_arg(Field::new(1, "msg", BaseType::String)),
            )
            .with_function(
                Function::new("add", BaseType::I32)
                    .with_arg(Field::new(1, "a", BaseType::I32))
                    .with_arg(Field::new(2, "b", BaseType::I32)),
            )
            .with_function(Function::new("move", Type::Struct(Arc::new(StructDef::new("Point")))));
        let out = emitter_output(|e, w| e.service_prototypes(w, &service));

        assert!(out.contains("THRIFT_C_API_DLLEXPORT void init_service_ns_svc();\n"));
        assert!(out.contains("THRIFT_C_API_DLLEXPORT void close_service_ns_svc();\n"));
        assert!(out.contains("THRIFT_C_API_DLLEXPORT char* ns_svc_echo(char* msg);\n"));
        let head = "THRIFT_C_API_DLLEXPORT int32_t ns_svc_add(";
        assert!(out.contains(&format!(
            "{head}int32_t a,\n{}int32_t b);\n",
            " ".repeat(head.len())
        )));
        assert!(out.contains("THRIFT_C_API_DLLEXPORT ns_Point* ns_svc_move();\n"));
    }

    #[test]
    fn test_guard_and_end() {
        let out = emitter_output(|e, w| {
            e.begin(w, "demo");
            e.end(w, "demo");
        });
        assert!(out.contains("#ifndef _NS__DEMO_H\n#define _NS__DEMO_H\n"));
        assert!(out.contains("#ifdef __cplusplus\nextern \"C\" {\n#endif\n"));
        assert!(out.ends_with("#ifdef __cplusplus\n}\n#endif\n\n#endif // _NS__DEMO_H\n"));
    }

    #[test]
    fn test_guard_splits_camel_case_namespace() {
        let options = GeneratorOptions::default();
        let camel = TypeMapper::new("MyNs.core");
        assert_eq!(
            HeaderEmitter::new(&camel, &options).guard_name("shapes"),
            "_MY_NS_CORE__SHAPES_H"
        );

        let bare = TypeMapper::new("");
        assert_eq!(HeaderEmitter::new(&bare, &options).guard_name("shapes"), "_SHAPES_H");
    }
}
