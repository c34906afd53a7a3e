//! Type-name mapping for the three generated surfaces.
//!
//! Typedefs are looked through, so an alias maps exactly like the type it
//! names regardless of alias depth.

use crate::naming::{camel_case_to_underscores, dots_to_scope, dots_to_underscores};
use thrift_capi_schema::{BaseType, EnumDef, Type};

/// Placeholder spelling for containers on the C-linkage surface.
///
/// Containers are not bridged across the C boundary.
pub const CONTAINER_PLACEHOLDER: &str = "int";

/// Maps schema types and declaration names to surface spellings.
#[derive(Debug, Clone)]
pub struct TypeMapper {
    /// C-linkage prefix, e.g. `tutorial_shared`.
    prefix: String,
    /// Exported-function prefix, e.g. `tutorial_shared_`.
    function_prefix: String,
    /// C++ namespace, e.g. `tutorial::shared`.
    cpp_namespace: String,
}

impl TypeMapper {
    /// Creates a mapper for a dotted native namespace.
    #[must_use]
    pub fn new(native_namespace: &str) -> Self {
        let prefix = dots_to_underscores(native_namespace);
        let function_prefix = if prefix.is_empty() {
            String::new()
        } else {
            format!("{}_", camel_case_to_underscores(&prefix))
        };
        Self {
            prefix,
            function_prefix,
            cpp_namespace: dots_to_scope(native_namespace),
        }
    }

    /// C-linkage prefix (namespace with dots replaced by underscores).
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Prefix of every exported service function.
    #[must_use]
    pub fn function_prefix(&self) -> &str {
        &self.function_prefix
    }

    /// C++ namespace using `::` separators.
    #[must_use]
    pub fn cpp_namespace(&self) -> &str {
        &self.cpp_namespace
    }

    /// `<ns>_<name>`, or `name` when there is no namespace.
    #[must_use]
    pub fn c_name(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}_{}", self.prefix, name)
        }
    }

    /// `<ns::>name`.
    #[must_use]
    pub fn cpp_name(&self, name: &str) -> String {
        if self.cpp_namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}::{}", self.cpp_namespace, name)
        }
    }

    /// C-linkage spelling of a type.
    #[must_use]
    pub fn c_type(&self, ty: &Type) -> String {
        match ty {
            Type::Base(base) => c_base_type(*base).to_string(),
            Type::Enum(def) => self.c_name(&def.name),
            Type::Struct(def) => self.c_name(&def.name),
            Type::List(_) | Type::Set(_) | Type::Map(_, _) => CONTAINER_PLACEHOLDER.to_string(),
            Type::StructRef(name) => self.c_name(name),
            Type::Typedef(def) => self.c_type(&def.ty),
        }
    }

    /// C++ (native-object) spelling of a type.
    #[must_use]
    pub fn cpp_type(&self, ty: &Type) -> String {
        match ty {
            Type::Base(base) => cpp_base_type(*base).to_string(),
            Type::Enum(def) => format!("{}::type", self.cpp_name(&def.name)),
            Type::Struct(def) => self.cpp_name(&def.name),
            Type::List(elem) => format!("std::vector<{}>", self.cpp_type(elem)),
            Type::Set(elem) => format!("std::set<{}>", self.cpp_type(elem)),
            Type::Map(key, value) => format!(
                "std::map<{}, {}>",
                self.cpp_type(key),
                self.cpp_type(value)
            ),
            Type::StructRef(name) => self.cpp_name(name),
            Type::Typedef(def) => self.cpp_type(&def.ty),
        }
    }

    /// Public C# spelling of a type, as used by the wrapper API.
    #[must_use]
    pub fn cs_type(&self, ty: &Type) -> String {
        match ty {
            Type::Base(base) => cs_base_type(*base).to_string(),
            Type::Enum(def) => def.name.clone(),
            Type::Struct(def) => def.name.clone(),
            Type::List(elem) => format!("List<{}>", self.cs_type(elem)),
            Type::Set(elem) => format!("HashSet<{}>", self.cs_type(elem)),
            Type::Map(key, value) => {
                format!("Dictionary<{}, {}>", self.cs_type(key), self.cs_type(value))
            }
            Type::StructRef(name) => name.clone(),
            Type::Typedef(def) => self.cs_type(&def.ty),
        }
    }

    /// C# spelling of the C-linkage type, used by mirrors and `extern`
    /// declarations.
    ///
    /// Strings passed as parameters carry an ANSI marshaling attribute;
    /// strings and structs returned from native code are raw pointers.
    #[must_use]
    pub fn cs_interop_type(&self, ty: &Type, position: InteropPosition) -> String {
        match ty {
            Type::Base(BaseType::String) => match position {
                InteropPosition::Parameter => {
                    "[MarshalAs(UnmanagedType.LPStr)] string".to_string()
                }
                InteropPosition::Return => "IntPtr".to_string(),
                InteropPosition::Field => "string".to_string(),
            },
            Type::Base(base) => cs_base_type(*base).to_string(),
            Type::Enum(def) => self.c_name(&def.name),
            Type::Struct(def) => match position {
                InteropPosition::Return => "IntPtr".to_string(),
                _ => self.c_name(&def.name),
            },
            Type::List(_) | Type::Set(_) | Type::Map(_, _) => CONTAINER_PLACEHOLDER.to_string(),
            Type::StructRef(name) => self.c_name(name),
            Type::Typedef(def) => self.cs_interop_type(&def.ty, position),
        }
    }

    /// C enum constant: `Enum_Value`.
    #[must_use]
    pub fn c_enum_value(&self, def: &EnumDef, value: &str) -> String {
        format!("{}_{}", def.name, value)
    }

    /// C++ enum constant: `ns::Enum::Value`.
    #[must_use]
    pub fn cpp_enum_value(&self, def: &EnumDef, value: &str) -> String {
        format!("{}::{}", self.cpp_name(&def.name), value)
    }

    /// C# mirror enum constant: `ns_Enum.Enum_Value`.
    #[must_use]
    pub fn cs_mirror_enum_value(&self, def: &EnumDef, value: &str) -> String {
        format!("{}.{}", self.c_name(&def.name), self.c_enum_value(def, value))
    }

    /// Public C# enum constant: `Enum.Value`.
    #[must_use]
    pub fn cs_enum_value(&self, def: &EnumDef, value: &str) -> String {
        format!("{}.{}", def.name, value)
    }

    /// `<ns_lc><service_lc>`, shared by every exported symbol of a service.
    #[must_use]
    pub fn service_symbol(&self, service: &str) -> String {
        format!(
            "{}{}",
            self.function_prefix,
            camel_case_to_underscores(service)
        )
    }

    /// Exported C name of a service function.
    #[must_use]
    pub fn function_name(&self, service: &str, function: &str) -> String {
        format!(
            "{}_{}",
            self.service_symbol(service),
            camel_case_to_underscores(function)
        )
    }

    /// `init_service_<ns_lc><service_lc>`.
    #[must_use]
    pub fn init_function(&self, service: &str) -> String {
        format!("init_service_{}", self.service_symbol(service))
    }

    /// `close_service_<ns_lc><service_lc>`.
    #[must_use]
    pub fn close_function(&self, service: &str) -> String {
        format!("close_service_{}", self.service_symbol(service))
    }

    /// Shared free function for string buffers.
    #[must_use]
    pub fn string_free_function(&self) -> String {
        self.c_name("string_free_memory")
    }

    /// Free function of one struct.
    #[must_use]
    pub fn struct_free_function(&self, name: &str) -> String {
        format!("{}_free_memory", self.c_name(name))
    }

    /// Qualified C++ handler class of a service.
    #[must_use]
    pub fn handler_class(&self, service: &str) -> String {
        self.cpp_name(&format!("{service}Handler"))
    }
}

/// Where a C# interop type appears.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteropPosition {
    /// Argument of an `extern` declaration.
    Parameter,
    /// Return of an `extern` declaration.
    Return,
    /// Field of a sequential-layout mirror struct.
    Field,
}

fn c_base_type(base: BaseType) -> &'static str {
    match base {
        BaseType::Void => "void",
        BaseType::Bool => "int",
        BaseType::I8 => "int8_t",
        BaseType::I16 => "int16_t",
        BaseType::I32 => "int32_t",
        BaseType::I64 => "int64_t",
        BaseType::Double => "double",
        BaseType::String => "char*",
    }
}

fn cpp_base_type(base: BaseType) -> &'static str {
    match base {
        BaseType::Void => "void",
        BaseType::Bool => "bool",
        BaseType::I8 => "int8_t",
        BaseType::I16 => "int16_t",
        BaseType::I32 => "int32_t",
        BaseType::I64 => "int64_t",
        BaseType::Double => "double",
        BaseType::String => "std::string",
    }
}

fn cs_base_type(base: BaseType) -> &'static str {
    match base {
        BaseType::Void => "void",
        BaseType::Bool => "bool",
        BaseType::I8 => "sbyte",
        BaseType::I16 => "short",
        BaseType::I32 => "int",
        BaseType::I64 => "long",
        BaseType::Double => "double",
        BaseType::String => "string",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use thrift_capi_schema::{StructDef, TypedefDef};

    fn alias(name: &str, ty: Type) -> Type {
        Type::Typedef(Arc::new(TypedefDef::new(name, ty)))
    }

    #[test]
    fn test_prefixes() {
        let mapper = TypeMapper::new("tutorial.Shared");
        assert_eq!(mapper.prefix(), "tutorial_Shared");
        assert_eq!(mapper.function_prefix(), "tutorial__shared_");
        assert_eq!(mapper.cpp_namespace(), "tutorial::Shared");

        let flat = TypeMapper::new("ns");
        assert_eq!(flat.function_name("Svc", "Echo"), "ns_svc_echo");
        assert_eq!(flat.init_function("Svc"), "init_service_ns_svc");
        assert_eq!(flat.close_function("MyService"), "close_service_ns_my_service");
        assert_eq!(flat.string_free_function(), "ns_string_free_memory");
        assert_eq!(flat.struct_free_function("Point"), "ns_Point_free_memory");
        assert_eq!(flat.handler_class("Svc"), "ns::SvcHandler");
    }

    #[test]
    fn test_empty_namespace() {
        let mapper = TypeMapper::new("");
        assert_eq!(mapper.c_name("Point"), "Point");
        assert_eq!(mapper.cpp_name("Point"), "Point");
        assert_eq!(mapper.function_name("Svc", "ping"), "svc_ping");
        assert_eq!(mapper.string_free_function(), "string_free_memory");
    }

    #[test]
    fn test_base_types() {
        let mapper = TypeMapper::new("ns");
        let string = Type::Base(BaseType::String);
        assert_eq!(mapper.c_type(&string), "char*");
        assert_eq!(mapper.cpp_type(&string), "std::string");
        assert_eq!(mapper.cs_type(&string), "string");
        assert_eq!(mapper.c_type(&Type::Base(BaseType::Bool)), "int");
        assert_eq!(mapper.cpp_type(&Type::Base(BaseType::Bool)), "bool");
        assert_eq!(mapper.c_type(&Type::Base(BaseType::I64)), "int64_t");
        assert_eq!(mapper.cs_type(&Type::Base(BaseType::I8)), "sbyte");
    }

    #[test]
    fn test_typedef_depth_is_transparent() {
        let mapper = TypeMapper::new("ns");
        for base in [
            BaseType::Bool,
            BaseType::I8,
            BaseType::I16,
            BaseType::I32,
            BaseType::I64,
            BaseType::Double,
            BaseType::String,
        ] {
            let ty = Type::Base(base);
            let once = alias("A", ty.clone());
            let twice = alias("B", once.clone());
            for candidate in [&once, &twice] {
                assert_eq!(mapper.c_type(candidate), mapper.c_type(&ty));
                assert_eq!(mapper.cpp_type(candidate), mapper.cpp_type(&ty));
                assert_eq!(mapper.cs_type(candidate), mapper.cs_type(&ty));
                assert_eq!(
                    mapper.cs_interop_type(candidate, InteropPosition::Parameter),
                    mapper.cs_interop_type(&ty, InteropPosition::Parameter)
                );
            }
        }
    }

    #[test]
    fn test_named_types() {
        let mapper = TypeMapper::new("ns");
        let color = Arc::new(EnumDef::new("Color").with_value("RED", 1));
        let point = Type::Struct(Arc::new(StructDef::new("Point")));

        assert_eq!(mapper.c_type(&Type::Enum(Arc::clone(&color))), "ns_Color");
        assert_eq!(mapper.cpp_type(&Type::Enum(Arc::clone(&color))), "ns::Color::type");
        assert_eq!(mapper.cs_type(&Type::Enum(Arc::clone(&color))), "Color");
        assert_eq!(mapper.c_type(&point), "ns_Point");
        assert_eq!(mapper.cpp_type(&point), "ns::Point");
        assert_eq!(mapper.cs_interop_type(&point, InteropPosition::Return), "IntPtr");
        assert_eq!(mapper.cs_interop_type(&point, InteropPosition::Parameter), "ns_Point");

        assert_eq!(mapper.c_enum_value(&color, "RED"), "Color_RED");
        assert_eq!(mapper.cpp_enum_value(&color, "RED"), "ns::Color::RED");
        assert_eq!(mapper.cs_enum_value(&color, "RED"), "Color.RED");
        assert_eq!(mapper.cs_mirror_enum_value(&color, "RED"), "ns_Color.Color_RED");
    }

    #[test]
    fn test_containers() {
        let mapper = TypeMapper::new("ns");
        let list = Type::List(Box::new(Type::Base(BaseType::String)));
        let map = Type::Map(
            Box::new(Type::Base(BaseType::String)),
            Box::new(Type::Base(BaseType::I32)),
        );

        assert_eq!(mapper.c_type(&list), CONTAINER_PLACEHOLDER);
        assert_eq!(mapper.cpp_type(&list), "std::vector<std::string>");
        assert_eq!(mapper.cs_type(&list), "List<string>");
        assert_eq!(mapper.cpp_type(&map), "std::map<std::string, int32_t>");
        assert_eq!(mapper.cs_type(&map), "Dictionary<string, int>");

        let children = Type::List(Box::new(Type::StructRef("Node".to_string())));
        assert_eq!(mapper.c_type(&children), CONTAINER_PLACEHOLDER);
        assert_eq!(mapper.cpp_type(&children), "std::vector<ns::Node>");
        assert_eq!(mapper.cs_type(&children), "List<Node>");
    }
}
