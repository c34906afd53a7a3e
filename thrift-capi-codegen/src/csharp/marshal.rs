//! Statement emission converting values between the public C# types and
//! the C-linkage mirrors.

use crate::error::CodegenError;
use crate::mapper::TypeMapper;
use crate::naming::{ReservedWords, capitalize_first};
use crate::writer::CodeWriter;
use thrift_capi_schema::{EnumDef, Type};

/// Emits managed conversion statements for one wrapper method.
pub struct ManagedMarshaler<'a> {
    mapper: &'a TypeMapper,
    reserved: &'a ReservedWords,
    context: &'a str,
}

impl<'a> ManagedMarshaler<'a> {
    /// Creates a marshaler; `context` names the function in error reports.
    #[must_use]
    pub fn new(mapper: &'a TypeMapper, reserved: &'a ReservedWords, context: &'a str) -> Self {
        Self {
            mapper,
            reserved,
            context,
        }
    }

    /// Converts the public value `cs_name` into the mirror variable `c_name`.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` for containers.
    pub fn cs_to_c(
        &self,
        w: &mut CodeWriter,
        ty: &Type,
        cs_name: &str,
        c_name: &str,
    ) -> Result<(), CodegenError> {
        match ty.underlying() {
            Type::Base(_) => {
                w.line(&format!("{c_name} = {cs_name};"));
            }
            Type::Enum(def) => {
                w.line(&format!("switch ({cs_name})"));
                w.open_scope();
                for value in &def.values {
                    self.case(
                        w,
                        &self.mapper.cs_enum_value(def, &value.name),
                        c_name,
                        &self.mapper.cs_mirror_enum_value(def, &value.name),
                    );
                }
                w.close_scope().newline();
            }
            Type::Struct(def) => {
                for field in def.sorted_members() {
                    self.cs_to_c(
                        w,
                        &field.ty,
                        &format!("{cs_name}.{}", capitalize_first(&field.name)),
                        &format!("{c_name}.{}", self.reserved.escape(&field.name)),
                    )?;
                }
            }
            _ => return Err(self.unsupported(ty)),
        }
        Ok(())
    }

    /// Converts the mirror value `c_name` into the public variable
    /// `cs_name`, which must already hold a constructed object for structs.
    ///
    /// # Errors
    /// Returns `CodegenError::Unsupported` for containers.
    pub fn c_to_cs(
        &self,
        w: &mut CodeWriter,
        ty: &Type,
        c_name: &str,
        cs_name: &str,
    ) -> Result<(), CodegenError> {
        match ty.underlying() {
            Type::Base(_) => {
                w.line(&format!("{cs_name} = {c_name};"));
            }
            Type::Enum(def) => self.enum_to_cs(w, def, c_name, cs_name),
            Type::Struct(def) => {
                for field in def.sorted_members() {
                    let cs_field = format!("{cs_name}.{}", capitalize_first(&field.name));
                    if field.ty.is_struct() {
                        w.line(&format!(
                            "{cs_field} = new {}();",
                            self.mapper.cs_type(&field.ty)
                        ));
                    }
                    self.c_to_cs(
                        w,
                        &field.ty,
                        &format!("{c_name}.{}", self.reserved.escape(&field.name)),
                        &cs_field,
                    )?;
                }
            }
            _ => return Err(self.unsupported(ty)),
        }
        Ok(())
    }

    fn enum_to_cs(&self, w: &mut CodeWriter, def: &EnumDef, c_name: &str, cs_name: &str) {
        w.line(&format!("switch ({c_name})"));
        w.open_scope();
        for value in &def.values {
            self.case(
                w,
                &self.mapper.cs_mirror_enum_value(def, &value.name),
                cs_name,
                &self.mapper.cs_enum_value(def, &value.name),
            );
        }
        w.close_scope().newline();
    }

    fn case(&self, w: &mut CodeWriter, label: &str, target: &str, value: &str) {
        w.line(&format!("case {label}:"));
        w.indent_up();
        w.line(&format!("{target} = {value};"));
        w.line("break;");
        w.indent_down();
    }

    fn unsupported(&self, ty: &Type) -> CodegenError {
        tracing::error!(
            ty = %ty,
            context = self.context,
            "container types cannot be marshaled to the managed bridge"
        );
        CodegenError::unsupported(ty.name(), self.context)
    }
}
