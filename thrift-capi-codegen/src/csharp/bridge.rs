//! C# bridge emission: sequential-layout mirrors of the C declarations and
//! one `DirectClient` per service calling the exported functions through
//! P/Invoke.

use super::ManagedMarshaler;
use crate::config::GeneratorOptions;
use crate::error::CodegenError;
use crate::mapper::{InteropPosition, TypeMapper};
use crate::output::AUTOGEN_BANNER;
use crate::writer::CodeWriter;
use thrift_capi_schema::{BaseType, EnumDef, Function, Service, StructDef, Type};

/// Emits the managed interop source.
pub struct BridgeEmitter<'a> {
    mapper: &'a TypeMapper,
    options: &'a GeneratorOptions,
    wrote_service: bool,
}

impl<'a> BridgeEmitter<'a> {
    /// Creates a bridge emitter.
    #[must_use]
    pub fn new(mapper: &'a TypeMapper, options: &'a GeneratorOptions) -> Self {
        Self {
            mapper,
            options,
            wrote_service: false,
        }
    }

    /// Writes the banner and usings, and opens the managed namespace when
    /// one is declared.
    pub fn begin(&self, w: &mut CodeWriter, namespace: &str) {
        w.push(AUTOGEN_BANNER);
        w.line("using System;");
        w.line("using System.Collections.Generic;");
        w.line("using System.Runtime.InteropServices;");
        w.newline();
        if !namespace.is_empty() {
            w.line(&format!("namespace {namespace}"));
            w.open_scope();
        }
    }

    /// Closes the managed namespace.
    pub fn end(&self, w: &mut CodeWriter, namespace: &str) {
        if !namespace.is_empty() {
            w.close_scope().newline();
        }
    }

    /// Writes the mirror of a C enum.
    pub fn enum_mirror(&self, w: &mut CodeWriter, def: &EnumDef) {
        w.line(&format!("internal enum {}", self.mapper.c_name(&def.name)));
        w.open_scope();
        for value in &def.values {
            w.line(&format!(
                "{} = {},",
                self.mapper.c_enum_value(def, &value.name),
                value.value
            ));
        }
        w.close_scope().newline();
        w.newline();
    }

    /// Writes the sequential-layout mirror of a C struct.
    ///
    /// Container members have no C representation; they degrade to the
    /// placeholder scalar so that the layout still matches the header.
    pub fn struct_mirror(&self, w: &mut CodeWriter, def: &StructDef) {
        w.line("[StructLayout(LayoutKind.Sequential)]");
        w.line(&format!("internal struct {}", self.mapper.c_name(&def.name)));
        w.open_scope();
        for field in def.sorted_members() {
            if field.ty.is_container() {
                tracing::warn!(
                    record = %def.name,
                    field = %field.name,
                    ty = %field.ty,
                    "container field mirrored as placeholder"
                );
            }
            w.line(&format!(
                "public {} {};",
                self.mapper.cs_interop_type(&field.ty, InteropPosition::Field),
                self.options.reserved_words.escape(&field.name)
            ));
        }
        w.close_scope().newline();
        w.newline();
    }

    /// Writes `namespace <Service> { public class DirectClient { ... } }`.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` when a function argument or
    /// return value is a container.
    pub fn service<'s>(
        &mut self,
        w: &mut CodeWriter,
        service: &Service,
        structs: impl IntoIterator<Item = &'s StructDef>,
    ) -> Result<(), CodegenError> {
        let dll = self.options.dll_for(&service.name);
        let init = self.mapper.init_function(&service.name);
        let close = self.mapper.close_function(&service.name);

        if self.wrote_service {
            w.newline();
        }
        self.wrote_service = true;
        w.line(&format!("namespace {}", service.name));
        w.open_scope();
        if let Some(doc) = service.doc.as_deref().filter(|_| self.options.docs) {
            self.summary(w, doc);
        }
        w.line("public class DirectClient");
        w.open_scope();

        self.import(w, &dll, &format!("void {init}("), &[]);
        self.import(w, &dll, &format!("void {close}("), &[]);
        self.import(
            w,
            &dll,
            &format!("void {}(", self.mapper.string_free_function()),
            &["IntPtr value".to_string()],
        );
        for def in structs {
            self.import(
                w,
                &dll,
                &format!("void {}(", self.mapper.struct_free_function(&def.name)),
                &["IntPtr value".to_string()],
            );
        }
        for function in &service.functions {
            let params: Vec<String> = function
                .sorted_args()
                .into_iter()
                .map(|arg| {
                    format!(
                        "{} {}",
                        self.mapper
                            .cs_interop_type(&arg.ty, InteropPosition::Parameter),
                        self.options.reserved_words.escape(&arg.name)
                    )
                })
                .collect();
            let head = format!(
                "{} {}(",
                self.mapper
                    .cs_interop_type(&function.return_type, InteropPosition::Return),
                self.mapper.function_name(&service.name, &function.name)
            );
            self.import(w, &dll, &head, &params);
        }

        w.line("public DirectClient()");
        w.open_scope();
        w.line(&format!("{init}();"));
        w.close_scope().newline();
        w.newline();

        w.line("~DirectClient()");
        w.open_scope();
        w.line(&format!("{close}();"));
        w.close_scope().newline();

        for function in &service.functions {
            w.newline();
            self.wrapper(w, service, function)?;
        }

        w.close_scope().newline();
        w.close_scope().newline();
        Ok(())
    }

    fn import(&self, w: &mut CodeWriter, dll: &str, head: &str, params: &[String]) {
        w.line(&format!(
            "[DllImport(\"{dll}\", CallingConvention = CallingConvention.Cdecl)]"
        ));
        w.aligned_list(&format!("private static extern {head}"), params, ");");
        w.newline();
    }

    fn summary(&self, w: &mut CodeWriter, doc: &str) {
        w.line("/// <summary>");
        for text in doc.trim().lines() {
            let text = text.trim_end();
            if text.is_empty() {
                w.line("///");
            } else {
                w.line(&format!("/// {text}"));
            }
        }
        w.line("/// </summary>");
    }

    fn wrapper(
        &self,
        w: &mut CodeWriter,
        service: &Service,
        function: &Function,
    ) -> Result<(), CodegenError> {
        let context = format!("{}.{}", service.name, function.name);
        let reserved = &self.options.reserved_words;
        let marshaler = ManagedMarshaler::new(self.mapper, reserved, &context);
        let ret = &function.return_type;
        let exported = self.mapper.function_name(&service.name, &function.name);

        tracing::debug!(function = %context, "emitting managed wrapper");

        if let Some(doc) = function.doc.as_deref().filter(|_| self.options.docs) {
            self.summary(w, doc);
        }
        let params: Vec<String> = function
            .sorted_args()
            .into_iter()
            .map(|arg| format!("{} {}", self.mapper.cs_type(&arg.ty), reserved.escape(&arg.name)))
            .collect();
        w.aligned_list(
            &format!(
                "public {} {}(",
                self.mapper.cs_type(ret),
                reserved.escape(&function.name)
            ),
            &params,
            ")",
        );
        w.open_scope();

        let mut call_args = Vec::new();
        for arg in function.sorted_args() {
            let c_name = format!("c_{}", arg.name);
            let c_type = self.mapper.cs_interop_type(&arg.ty, InteropPosition::Field);
            match arg.ty.underlying() {
                Type::Struct(_) => w.line(&format!("{c_type} {c_name} = new {c_type}();")),
                Type::Enum(_) => w.line(&format!("{c_type} {c_name} = default({c_type});")),
                _ => w.line(&format!("{c_type} {c_name};")),
            };
            marshaler.cs_to_c(w, &arg.ty, &reserved.escape(&arg.name), &c_name)?;
            w.newline();
            call_args.push(c_name);
        }

        let call = format!("{exported}(");
        match ret.underlying() {
            Type::Base(BaseType::Void) => {
                w.aligned_list(&call, &call_args, ");");
            }
            Type::Base(BaseType::String) => {
                w.aligned_list(&format!("IntPtr _c_result = {call}"), &call_args, ");");
                w.line("string _result = Marshal.PtrToStringAnsi(_c_result);");
                w.line(&format!(
                    "{}(_c_result);",
                    self.mapper.string_free_function()
                ));
                w.line("return _result;");
            }
            Type::Base(_) => {
                w.aligned_list(&format!("return {call}"), &call_args, ");");
            }
            Type::Enum(_) => {
                let c_type = self.mapper.cs_interop_type(ret, InteropPosition::Return);
                let cs_type = self.mapper.cs_type(ret);
                w.aligned_list(&format!("{c_type} _c_result = {call}"), &call_args, ");");
                w.line(&format!("{cs_type} _result = default({cs_type});"));
                marshaler.c_to_cs(w, ret, "_c_result", "_result")?;
                w.line("return _result;");
            }
            Type::Struct(def) => {
                let mirror = self.mapper.c_name(&def.name);
                let cs_type = self.mapper.cs_type(ret);
                w.aligned_list(&format!("IntPtr _c_result = {call}"), &call_args, ");");
                w.line(&format!(
                    "{mirror} _c_value = ({mirror})Marshal.PtrToStructure(_c_result, typeof({mirror}));"
                ));
                w.line(&format!("{cs_type} _result = new {cs_type}();"));
                marshaler.c_to_cs(w, ret, "_c_value", "_result")?;
                w.line(&format!(
                    "{}(_c_result);",
                    self.mapper.struct_free_function(&def.name)
                ));
                w.line("return _result;");
            }
            _ => {
                tracing::error!(function = %context, ty = %ret, "container return is not bridged");
                return Err(CodegenError::unsupported(ret.name(), context));
            }
        }

        w.close_scope().newline();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use thrift_capi_schema::Field;

    fn point() -> Arc<StructDef> {
        Arc::new(
            StructDef::new("Point")
                .with_field(Field::new(2, "y", BaseType::I32))
                .with_field(Field::new(1, "x", BaseType::I32))
                .with_field(Field::new(3, "name", BaseType::String)),
        )
    }

    fn emit_service(service: &Service, options: &GeneratorOptions) -> String {
        let mapper = TypeMapper::new("ns");
        let point = point();
        let mut w = CodeWriter::new();
        let mut emitter = BridgeEmitter::new(&mapper, options);
        emitter
            .service(&mut w, service, [point.as_ref()])
            .expect("service");
        w.into_string()
    }

    #[test]
    fn test_struct_mirror_layout() {
        let mapper = TypeMapper::new("ns");
        let options = GeneratorOptions::default();
        let mut w = CodeWriter::new();
        BridgeEmitter::new(&mapper, &options).struct_mirror(&mut w, &point());

        assert_eq!(
            w.as_str(),
            "[StructLayout(LayoutKind.Sequential)]\ninternal struct ns_Point\n{\n\
             \tpublic int x;\n\tpublic int y;\n\tpublic string name;\n}\n\n"
        );
    }

    #[test]
    fn test_enum_mirror() {
        let mapper = TypeMapper::new("ns");
        let options = GeneratorOptions::default();
        let def = EnumDef::new("Color").with_value("RED", 4).with_value("BLUE", 8);
        let mut w = CodeWriter::new();
        BridgeEmitter::new(&mapper, &options).enum_mirror(&mut w, &def);

        assert_eq!(
            w.as_str(),
            "internal enum ns_Color\n{\n\tColor_RED = 4,\n\tColor_BLUE = 8,\n}\n\n"
        );
    }

    #[test]
    fn test_direct_client_lifecycle_and_imports() {
        let service = Service::new("Svc").with_function(
            Function::new("Echo", BaseType::String)
                .with_arg(Field::new(1, "msg", BaseType::String)),
        );
        let out = emit_service(&service, &GeneratorOptions::default());

        assert!(out.starts_with("namespace Svc\n{\n\tpublic class DirectClient\n"));
        assert!(out.contains(
            "\t\t[DllImport(\"Svc.dll\", CallingConvention = CallingConvention.Cdecl)]\n\
             \t\tprivate static extern void init_service_ns_svc();\n"
        ));
        assert!(out.contains("private static extern void ns_string_free_memory(IntPtr value);\n"));
        assert!(out.contains("private static extern void ns_Point_free_memory(IntPtr value);\n"));
        assert!(out.contains(
            "private static extern IntPtr ns_svc_echo([MarshalAs(UnmanagedType.LPStr)] string msg);\n"
        ));
        assert!(out.contains("\t\tpublic DirectClient()\n\t\t{\n\t\t\tinit_service_ns_svc();\n"));
        assert!(out.contains("\t\t~DirectClient()\n\t\t{\n\t\t\tclose_service_ns_svc();\n"));
    }

    #[test]
    fn test_string_wrapper_frees_native_buffer() {
        let service = Service::new("Svc").with_function(
            Function::new("Echo", BaseType::String)
                .with_arg(Field::new(1, "msg", BaseType::String)),
        );
        let out = emit_service(&service, &GeneratorOptions::default());

        assert!(out.contains("public string Echo(string msg)\n"));
        assert!(out.contains("\t\t\tstring c_msg;\n\t\t\tc_msg = msg;\n"));
        assert!(out.contains("\t\t\tIntPtr _c_result = ns_svc_echo(c_msg);\n"));
        let copy = out
            .find("string _result = Marshal.PtrToStringAnsi(_c_result);")
            .expect("copy");
        let free = out.find("ns_string_free_memory(_c_result);").expect("free");
        assert!(copy < free);
    }

    #[test]
    fn test_struct_wrapper_copies_then_frees() {
        let service = Service::new("Svc").with_function(Function::new("origin", Type::Struct(point())));
        let out = emit_service(&service, &GeneratorOptions::default());

        assert!(out.contains("private static extern IntPtr ns_svc_origin();\n"));
        assert!(out.contains(
            "ns_Point _c_value = (ns_Point)Marshal.PtrToStructure(_c_result, typeof(ns_Point));"
        ));
        assert!(out.contains("Point _result = new Point();"));
        let copy = out.find("_result.Name = _c_value.name;").expect("copy");
        let free = out.find("ns_Point_free_memory(_c_result);").expect("free");
        assert!(copy < free);
    }

    #[test]
    fn test_argument_names_do_not_shadow_wrapper_locals() {
        let service = Service::new("Svc").with_function(
            Function::new("get", BaseType::String)
                .with_arg(Field::new(1, "result", BaseType::String))
                .with_arg(Field::new(2, "value", BaseType::String)),
        );
        let out = emit_service(&service, &GeneratorOptions::default());

        assert!(out.contains("\t\t\tstring c_result;\n\t\t\tc_result = result;\n"));
        assert!(out.contains("\t\t\tstring c_value;\n\t\t\tc_value = value;\n"));
        assert!(out.contains("IntPtr _c_result = ns_svc_get(c_result,\n"));
        assert!(out.contains("string _result = Marshal.PtrToStringAnsi(_c_result);"));
        assert!(!out.contains("string result ="));
    }

    #[test]
    fn test_reserved_names_and_dll_override() {
        let service = Service::new("Svc").with_function(
            Function::new("event", BaseType::Void)
                .with_arg(Field::new(1, "object", BaseType::I64)),
        );
        let options = GeneratorOptions::default().with_dll_name("native.dll");
        let out = emit_service(&service, &options);

        assert!(out.contains("public void @event(long @object)\n"));
        assert!(out.contains("private static extern void ns_svc_event(long @object);\n"));
        assert!(out.contains("c_object = @object;"));
        assert!(out.contains("[DllImport(\"native.dll\""));
        assert!(!out.contains("Svc.dll"));
    }
}
