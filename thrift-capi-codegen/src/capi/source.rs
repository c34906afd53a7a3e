//! C++ bridge source emission.
//!
//! The source implements every exported function declared by the header:
//! free functions releasing owned buffers, the per-service handler registry
//! with its init/close entry points, and the marshaling bodies calling into
//! the user-supplied `<Service>Handler` classes.

use super::{NativeMarshaler, c_return_type, c_signature};
use crate::error::CodegenError;
use crate::mapper::TypeMapper;
use crate::naming::camel_case_to_underscores;
use crate::output::AUTOGEN_BANNER;
use crate::writer::CodeWriter;
use thrift_capi_schema::{BaseType, Function, Service, StructDef, Type};

/// Emits the C++ source implementing the header.
pub struct SourceEmitter<'a> {
    mapper: &'a TypeMapper,
}

impl<'a> SourceEmitter<'a> {
    /// Creates a source emitter.
    #[must_use]
    pub fn new(mapper: &'a TypeMapper) -> Self {
        Self { mapper }
    }

    /// Writes the banner and includes.
    pub fn begin<'s>(
        &self,
        w: &mut CodeWriter,
        header_file: &str,
        services: impl IntoIterator<Item = &'s Service>,
    ) {
        w.push(AUTOGEN_BANNER);
        w.line("#include <assert.h>");
        w.line("#include <stdlib.h>");
        w.line("#include <string.h>");
        w.newline();
        w.line(&format!("#include \"{header_file}\""));
        w.newline();

        let mut services = services.into_iter().peekable();
        if services.peek().is_some() {
            w.line("// C++ services");
            for service in services {
                w.line(&format!("#include \"{}Handler.h\"", service.name));
            }
            w.newline();
        }
    }

    /// Writes the shared string free function.
    pub fn string_free(&self, w: &mut CodeWriter) {
        w.line(&format!(
            "void {}(char* value)",
            self.mapper.string_free_function()
        ));
        w.open_scope();
        w.line("free(value);");
        w.close_scope().newline();
        w.newline();
    }

    /// Writes the free function of one struct.
    ///
    /// Every string reachable through nested struct members is released in
    /// field order before the struct block itself.
    pub fn struct_free(&self, w: &mut CodeWriter, def: &StructDef) {
        let c_name = self.mapper.c_name(&def.name);
        w.line(&format!(
            "void {}({c_name}* value)",
            self.mapper.struct_free_function(&def.name)
        ));
        w.open_scope();
        w.line("if (!value)");
        w.open_scope();
        w.line("return;");
        w.close_scope().newline();
        w.newline();

        let mut strings = Vec::new();
        owned_strings(def, "value->", &mut strings);
        for path in &strings {
            w.line(&format!(
                "{}({path});",
                self.mapper.string_free_function()
            ));
        }
        if !strings.is_empty() {
            w.newline();
        }
        w.line("free(value);");
        w.close_scope().newline();
        w.newline();
    }

    /// Writes the handler registry, init/close entry points and every
    /// function body of a service.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` when a function argument or
    /// return value is a container.
    pub fn service(&self, w: &mut CodeWriter, service: &Service) -> Result<(), CodegenError> {
        let registry = registry_instance(&service.name);
        self.registry(w, service, &registry);

        w.line(&format!("void {}()", self.mapper.init_function(&service.name)));
        w.open_scope();
        w.line(&format!("{registry}.init();"));
        w.close_scope().newline();
        w.newline();

        w.line(&format!("void {}()", self.mapper.close_function(&service.name)));
        w.open_scope();
        w.line(&format!("{registry}.close();"));
        w.close_scope().newline();
        w.newline();

        for function in &service.functions {
            self.function(w, service, function, &registry)?;
        }
        Ok(())
    }

    fn registry(&self, w: &mut CodeWriter, service: &Service, instance: &str) {
        let class = format!("{}Registry", service.name);
        let handler = self.mapper.handler_class(&service.name);
        let init = self.mapper.init_function(&service.name);

        w.line(&format!("// {} handler registry", service.name));
        w.line("namespace");
        w.open_scope();
        w.line(&format!("class {class}"));
        w.open_scope();
        w.indent_down();
        w.line("public:");
        w.indent_up();

        w.line("void init()");
        w.open_scope();
        w.line("if (!handler_)");
        w.open_scope();
        w.line(&format!("handler_ = new {handler}();"));
        w.close_scope().newline();
        w.close_scope().newline();
        w.newline();

        w.line("void close()");
        w.open_scope();
        w.line("delete handler_;");
        w.line("handler_ = NULL;");
        w.close_scope().newline();
        w.newline();

        w.line(&format!("{handler}* handler() const"));
        w.open_scope();
        w.line(&format!(
            "assert(handler_ && \"{init}() has not been called.\");"
        ));
        w.line("return handler_;");
        w.close_scope().newline();
        w.newline();

        w.indent_down();
        w.line("private:");
        w.indent_up();
        w.line(&format!("{handler}* handler_ = NULL;"));
        w.close_scope().push(";\n");
        w.newline();
        w.line(&format!("{class} {instance};"));
        w.close_scope().newline();
        w.newline();
    }

    fn function(
        &self,
        w: &mut CodeWriter,
        service: &Service,
        function: &Function,
        registry: &str,
    ) -> Result<(), CodegenError> {
        let context = format!("{}.{}", service.name, function.name);
        let marshaler = NativeMarshaler::new(self.mapper, &context);
        let handler = self.mapper.handler_class(&service.name);
        let ret = &function.return_type;

        tracing::debug!(function = %context, "emitting native bridge");

        let (head, params) = c_signature(self.mapper, &service.name, function);
        w.aligned_list(&head, &params, ")");
        w.open_scope();
        w.line(&format!("{handler}* _handler = {registry}.handler();"));
        w.newline();

        let mut call_args = Vec::new();
        let returns_out_param = returns_by_out_param(ret);
        if returns_out_param {
            call_args.push("_cpp_result".to_string());
        }
        for arg in function.sorted_args() {
            let cpp_name = format!("cpp_{}", arg.name);
            w.line(&format!("{} {cpp_name};", self.mapper.cpp_type(&arg.ty)));
            marshaler.c_to_cpp(w, &arg.ty, &arg.name, &cpp_name)?;
            w.newline();
            call_args.push(cpp_name);
        }

        let call = format!("_handler->{}(", function.name);
        match ret.underlying() {
            Type::Base(BaseType::Void) => {
                w.aligned_list(&call, &call_args, ");");
            }
            Type::Base(BaseType::String) | Type::Struct(_) => {
                w.line(&format!("{} _cpp_result;", self.mapper.cpp_type(ret)));
                w.aligned_list(&call, &call_args, ");");
                w.newline();
                self.result_to_c(w, &marshaler, ret)?;
                w.line("return _result;");
            }
            Type::Base(_) => {
                let c_type = self.mapper.c_type(ret);
                w.aligned_list(&format!("{c_type} _result = ({c_type}){call}"), &call_args, ");");
                w.newline();
                w.line("return _result;");
            }
            Type::Enum(_) => {
                w.aligned_list(
                    &format!("{} _cpp_result = {call}", self.mapper.cpp_type(ret)),
                    &call_args,
                    ");",
                );
                w.newline();
                w.line(&format!("{} _result;", self.mapper.c_type(ret)));
                marshaler.cpp_to_c(w, ret, "_cpp_result", "_result")?;
                w.line("return _result;");
            }
            _ => {
                tracing::error!(function = %context, ty = %ret, "container return is not bridged");
                return Err(CodegenError::unsupported(ret.name(), context));
            }
        }

        w.close_scope().newline();
        w.newline();
        Ok(())
    }

    /// Converts `_cpp_result` into a caller-owned `_result`.
    fn result_to_c(
        &self,
        w: &mut CodeWriter,
        marshaler: &NativeMarshaler<'_>,
        ret: &Type,
    ) -> Result<(), CodegenError> {
        if ret.is_struct() {
            let c_type = self.mapper.c_type(ret);
            w.line(&format!("{c_type} _c_result;"));
            marshaler.cpp_to_c(w, ret, "_cpp_result", "_c_result")?;
            w.newline();
            w.line(&format!(
                "{} _result = ({}*)malloc(sizeof({c_type}));",
                c_return_type(self.mapper, ret),
                c_type
            ));
            w.line("*_result = _c_result;");
        } else {
            w.line(&format!("{} _result;", self.mapper.c_type(ret)));
            marshaler.cpp_to_c(w, ret, "_cpp_result", "_result")?;
        }
        w.newline();
        Ok(())
    }
}

/// Strings and structs are returned through the handler's first argument.
fn returns_by_out_param(ty: &Type) -> bool {
    ty.is_string() || ty.is_struct()
}

fn registry_instance(service: &str) -> String {
    format!("g_{}_registry", camel_case_to_underscores(service))
}

/// Collects the access path of every string member reachable from `def`.
fn owned_strings(def: &StructDef, path: &str, out: &mut Vec<String>) {
    for field in def.sorted_members() {
        match field.ty.underlying() {
            Type::Base(BaseType::String) => out.push(format!("{path}{}", field.name)),
            Type::Struct(inner) => owned_strings(inner, &format!("{path}{}.", field.name), out),
            _ => {}
        }
    }
}
