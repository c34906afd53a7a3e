//! Statement emission converting values between the C-linkage and C++
//! representations.

use crate::error::CodegenError;
use crate::mapper::TypeMapper;
use crate::naming::dots_to_underscores;
use crate::writer::CodeWriter;
use thrift_capi_schema::{BaseType, EnumDef, Type};

/// Emits conversion statements for one exported function.
pub struct NativeMarshaler<'a> {
    mapper: &'a TypeMapper,
    context: &'a str,
}

impl<'a> NativeMarshaler<'a> {
    /// Creates a marshaler; `context` names the function in error reports.
    #[must_use]
    pub fn new(mapper: &'a TypeMapper, context: &'a str) -> Self {
        Self { mapper, context }
    }

    /// Converts the C value `c_name` into the declared C++ variable
    /// `cpp_name`.
    ///
    /// Struct members are staged in `cpp_<path>_<field>` locals and stored
    /// through the generated `__set_<field>` setters.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` for containers.
    pub fn c_to_cpp(
        &self,
        w: &mut CodeWriter,
        ty: &Type,
        c_name: &str,
        cpp_name: &str,
    ) -> Result<(), CodegenError> {
        match ty.underlying() {
            Type::Base(BaseType::String) => {
                w.line(&format!("{cpp_name} = std::string({c_name});"));
            }
            Type::Base(_) => {
                w.line(&format!(
                    "{cpp_name} = ({}){c_name};",
                    self.mapper.cpp_type(ty)
                ));
            }
            Type::Enum(def) => {
                self.enum_switch(w, def, c_name, cpp_name, EnumDirection::ToCpp);
            }
            Type::Struct(def) => {
                let local_prefix = format!("cpp_{}", dots_to_underscores(c_name));
                for field in def.sorted_members() {
                    let local = format!("{local_prefix}_{}", field.name);
                    w.line(&format!("{} {local};", self.mapper.cpp_type(&field.ty)));
                    self.c_to_cpp(w, &field.ty, &format!("{c_name}.{}", field.name), &local)?;
                    w.line(&format!("{cpp_name}.__set_{}({local});", field.name));
                }
            }
            _ => return Err(self.unsupported(ty)),
        }
        Ok(())
    }

    /// Converts the C++ value `cpp_name` into the declared C variable
    /// `c_name`.
    ///
    /// Strings are copied into a `malloc`-ed, null-terminated buffer owned
    /// by the caller.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` for containers.
    pub fn cpp_to_c(
        &self,
        w: &mut CodeWriter,
        ty: &Type,
        cpp_name: &str,
        c_name: &str,
    ) -> Result<(), CodegenError> {
        match ty.underlying() {
            Type::Base(BaseType::String) => {
                w.line(&format!(
                    "{c_name} = (char*)malloc({cpp_name}.size() + 1);"
                ));
                w.line(&format!(
                    "memcpy({c_name}, {cpp_name}.c_str(), {cpp_name}.size());"
                ));
                w.line(&format!("{c_name}[{cpp_name}.size()] = '\\0';"));
            }
            Type::Base(_) => {
                w.line(&format!(
                    "{c_name} = ({}){cpp_name};",
                    self.mapper.c_type(ty)
                ));
            }
            Type::Enum(def) => {
                self.enum_switch(w, def, cpp_name, c_name, EnumDirection::ToC);
            }
            Type::Struct(def) => {
                for field in def.sorted_members() {
                    self.cpp_to_c(
                        w,
                        &field.ty,
                        &format!("{cpp_name}.{}", field.name),
                        &format!("{c_name}.{}", field.name),
                    )?;
                }
            }
            _ => return Err(self.unsupported(ty)),
        }
        Ok(())
    }

    fn enum_switch(
        &self,
        w: &mut CodeWriter,
        def: &EnumDef,
        from: &str,
        to: &str,
        direction: EnumDirection,
    ) {
        w.line(&format!("switch ({from})"));
        w.open_scope();
        for value in &def.values {
            let c_value = self.mapper.c_enum_value(def, &value.name);
            let cpp_value = self.mapper.cpp_enum_value(def, &value.name);
            let (label, target) = match direction {
                EnumDirection::ToCpp => (c_value, cpp_value),
                EnumDirection::ToC => (cpp_value, c_value),
            };
            w.line(&format!("case {label}:"));
            w.indent_up();
            w.line(&format!("{to} = {target};"));
            w.line("break;");
            w.indent_down();
        }
        w.close_scope().newline();
    }

    fn unsupported(&self, ty: &Type) -> CodegenError {
        tracing::error!(
            ty = %ty,
            context = self.context,
            "container types cannot cross the C boundary"
        );
        CodegenError::unsupported(ty.name(), self.context)
    }
}

#[derive(Debug, Clone, Copy)]
enum EnumDirection {
    ToCpp,
    ToC,
}
