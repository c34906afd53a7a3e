//! Raw schema-document declarations.
//!
//! These mirror the elements of the XML schema document one to one. Type
//! references are still names here; [`crate::resolve`] turns a [`Document`]
//! into a [`crate::Program`].

use crate::types::{BaseType, ConstValue, EnumDef, Requiredness, StructKind};

/// Unresolved type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// Built-in type.
    Base(BaseType),
    /// Reference to a typedef, enum, or struct by name.
    Named {
        /// Owning program, when qualified.
        module: Option<String>,
        /// Declaration name.
        name: String,
    },
    /// `list<T>`.
    List(Box<TypeRef>),
    /// `set<T>`.
    Set(Box<TypeRef>),
    /// `map<K, V>`.
    Map(Box<TypeRef>, Box<TypeRef>),
}

impl TypeRef {
    /// Shorthand for a named reference without module.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            module: None,
            name: name.into(),
        }
    }
}

/// Raw schema document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Program name.
    pub name: String,
    /// `(language, namespace)` pairs in document order.
    pub namespaces: Vec<(String, String)>,
    /// Typedefs.
    pub typedefs: Vec<RawTypedef>,
    /// Enums (they hold no type references).
    pub enums: Vec<EnumDef>,
    /// Constants.
    pub consts: Vec<RawConst>,
    /// Structs, unions, and exceptions.
    pub structs: Vec<RawStruct>,
    /// Services.
    pub services: Vec<RawService>,
}

/// Raw typedef.
#[derive(Debug, Clone)]
pub struct RawTypedef {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    pub ty: TypeRef,
    /// Documentation.
    pub doc: Option<String>,
}

/// Raw constant.
#[derive(Debug, Clone)]
pub struct RawConst {
    /// Constant name.
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    /// Value.
    pub value: ConstValue,
    /// Documentation.
    pub doc: Option<String>,
}

/// Raw field.
#[derive(Debug, Clone)]
pub struct RawField {
    /// Field id.
    pub id: i32,
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: TypeRef,
    /// Requiredness.
    pub requiredness: Requiredness,
    /// Default value.
    pub default: Option<ConstValue>,
    /// Documentation.
    pub doc: Option<String>,
}

/// Raw struct.
#[derive(Debug, Clone)]
pub struct RawStruct {
    /// Struct name.
    pub name: String,
    /// Declaration kind.
    pub kind: StructKind,
    /// Fields in declaration order.
    pub fields: Vec<RawField>,
    /// Documentation.
    pub doc: Option<String>,
}

/// Raw service.
#[derive(Debug, Clone)]
pub struct RawService {
    /// Service name.
    pub name: String,
    /// Extended service.
    pub extends: Option<String>,
    /// Functions.
    pub functions: Vec<RawFunction>,
    /// Documentation.
    pub doc: Option<String>,
}

/// Raw function.
#[derive(Debug, Clone)]
pub struct RawFunction {
    /// Function name.
    pub name: String,
    /// Return type.
    pub returns: TypeRef,
    /// Arguments.
    pub args: Vec<RawField>,
    /// Declared `oneway`.
    pub oneway: bool,
    /// Documentation.
    pub doc: Option<String>,
}
