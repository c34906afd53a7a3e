//! Schema type definitions.
//!
//! This module contains the resolved, immutable representation of Thrift
//! declarations: base types, typedefs, enums, constants, and structs. Named
//! declarations are shared through `Arc`, so every use site of a struct or
//! enum points at the same node.

use std::fmt;
use std::sync::Arc;

/// Thrift base types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    /// No value (function return only).
    Void,
    /// Boolean.
    Bool,
    /// Signed 8-bit integer.
    I8,
    /// Signed 16-bit integer.
    I16,
    /// Signed 32-bit integer.
    I32,
    /// Signed 64-bit integer.
    I64,
    /// 64-bit floating point.
    Double,
    /// Character string (binary is read as string).
    String,
}

impl BaseType {
    /// Returns the Thrift IDL spelling of the type.
    #[must_use]
    pub const fn thrift_name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// Parses a base type from its Thrift name.
    #[must_use]
    pub fn from_thrift_name(name: &str) -> Option<Self> {
        match name {
            "void" => Some(Self::Void),
            "bool" => Some(Self::Bool),
            "byte" | "i8" => Some(Self::I8),
            "i16" => Some(Self::I16),
            "i32" => Some(Self::I32),
            "i64" => Some(Self::I64),
            "double" => Some(Self::Double),
            "string" | "binary" => Some(Self::String),
            _ => None,
        }
    }
}

/// A schema type.
#[derive(Debug, Clone)]
pub enum Type {
    /// Built-in scalar or string.
    Base(BaseType),
    /// Named alias of another type.
    Typedef(Arc<TypedefDef>),
    /// Enumeration.
    Enum(Arc<EnumDef>),
    /// Struct, union, or exception.
    Struct(Arc<StructDef>),
    /// `list<T>`.
    List(Box<Type>),
    /// `set<T>`.
    Set(Box<Type>),
    /// `map<K, V>`.
    Map(Box<Type>, Box<Type>),
    /// Struct named from a container inside its own definition.
    ///
    /// Only appears as a container element, key, or value. The struct is
    /// still being resolved at that point, so it is held by name.
    StructRef(String),
}

impl Type {
    /// Shorthand for `Type::Base(BaseType::Void)`.
    #[must_use]
    pub const fn void() -> Self {
        Self::Base(BaseType::Void)
    }

    /// Unwraps typedefs until a non-alias type is reached.
    #[must_use]
    pub fn underlying(&self) -> &Type {
        let mut ty = self;
        while let Self::Typedef(def) = ty {
            ty = &def.ty;
        }
        ty
    }

    /// Returns the base type, looking through typedefs.
    #[must_use]
    pub fn base(&self) -> Option<BaseType> {
        match self.underlying() {
            Self::Base(base) => Some(*base),
            _ => None,
        }
    }

    /// Returns true if this is a base type (after typedef resolution).
    #[must_use]
    pub fn is_base_type(&self) -> bool {
        self.base().is_some()
    }

    /// Returns true if this is `string` (after typedef resolution).
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.base() == Some(BaseType::String)
    }

    /// Returns true if this is `void` (after typedef resolution).
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.base() == Some(BaseType::Void)
    }

    /// Returns true if this type itself is a typedef.
    #[must_use]
    pub const fn is_typedef(&self) -> bool {
        matches!(self, Self::Typedef(_))
    }

    /// Returns true if this is an enum (after typedef resolution).
    #[must_use]
    pub fn is_enum(&self) -> bool {
        matches!(self.underlying(), Self::Enum(_))
    }

    /// Returns true if this is a struct (after typedef resolution).
    #[must_use]
    pub fn is_struct(&self) -> bool {
        matches!(self.underlying(), Self::Struct(_))
    }

    /// Returns true if this is a list, set, or map (after typedef resolution).
    #[must_use]
    pub fn is_container(&self) -> bool {
        matches!(
            self.underlying(),
            Self::List(_) | Self::Set(_) | Self::Map(_, _)
        )
    }

    /// Returns the enum definition, looking through typedefs.
    #[must_use]
    pub fn as_enum(&self) -> Option<&Arc<EnumDef>> {
        match self.underlying() {
            Self::Enum(def) => Some(def),
            _ => None,
        }
    }

    /// Returns the struct definition, looking through typedefs.
    #[must_use]
    pub fn as_struct(&self) -> Option<&Arc<StructDef>> {
        match self.underlying() {
            Self::Struct(def) => Some(def),
            _ => None,
        }
    }

    /// Returns the declared name of the type.
    ///
    /// Typedefs answer with their own alias name, not the aliased type's.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Base(base) => base.thrift_name().to_string(),
            Self::Typedef(def) => def.name.clone(),
            Self::Enum(def) => def.name.clone(),
            Self::Struct(def) => def.name.clone(),
            Self::List(elem) => format!("list<{}>", elem.name()),
            Self::Set(elem) => format!("set<{}>", elem.name()),
            Self::Map(key, value) => format!("map<{}, {}>", key.name(), value.name()),
            Self::StructRef(name) => name.clone(),
        }
    }
}

impl From<BaseType> for Type {
    fn from(base: BaseType) -> Self {
        Self::Base(base)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Typedef declaration.
#[derive(Debug, Clone)]
pub struct TypedefDef {
    /// Alias name.
    pub name: String,
    /// Aliased type.
    pub ty: Type,
    /// Documentation.
    pub doc: Option<String>,
}

impl TypedefDef {
    /// Creates a new typedef.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            doc: None,
        }
    }
}

/// Enum declaration.
#[derive(Debug, Clone)]
pub struct EnumDef {
    /// Enum name.
    pub name: String,
    /// Values in declaration order.
    pub values: Vec<EnumValue>,
    /// Documentation.
    pub doc: Option<String>,
}

impl EnumDef {
    /// Creates a new empty enum.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            doc: None,
        }
    }

    /// Adds a value to the enum.
    pub fn add_value(&mut self, value: EnumValue) {
        self.values.push(value);
    }

    /// Builder-style variant of [`EnumDef::add_value`].
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: i32) -> Self {
        self.add_value(EnumValue::new(name, value));
        self
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn get_value(&self, name: &str) -> Option<&EnumValue> {
        self.values.iter().find(|v| v.name == name)
    }
}

/// Enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    /// Value name.
    pub name: String,
    /// Declared integer value.
    pub value: i32,
    /// Documentation.
    pub doc: Option<String>,
}

impl EnumValue {
    /// Creates a new enum value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
            doc: None,
        }
    }
}

/// Constant declaration.
#[derive(Debug, Clone)]
pub struct ConstDef {
    /// Constant name.
    pub name: String,
    /// Declared type.
    pub ty: Type,
    /// Value.
    pub value: ConstValue,
    /// Documentation.
    pub doc: Option<String>,
}

impl ConstDef {
    /// Creates a new constant.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: Type, value: ConstValue) -> Self {
        Self {
            name: name.into(),
            ty,
            value,
            doc: None,
        }
    }
}

/// Constant value literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Integer literal.
    Integer(i64),
    /// Floating point literal.
    Double(f64),
    /// String literal.
    String(String),
    /// Reference to another constant or enum value.
    Identifier(String),
    /// List or set literal.
    List(Vec<ConstValue>),
    /// Map literal.
    Map(Vec<(ConstValue, ConstValue)>),
}

impl fmt::Display for ConstValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Double(v) => write!(f, "{v:?}"),
            Self::String(v) => write!(f, "\"{v}\""),
            Self::Identifier(v) => f.write_str(v),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Kind of struct-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StructKind {
    /// Plain struct.
    #[default]
    Struct,
    /// Union.
    Union,
    /// Exception.
    Exception,
}

/// Struct declaration.
#[derive(Debug, Clone)]
pub struct StructDef {
    /// Struct name.
    pub name: String,
    /// Fields in declaration order.
    pub fields: Vec<Field>,
    /// Declaration kind.
    pub kind: StructKind,
    /// Documentation.
    pub doc: Option<String>,
}

impl StructDef {
    /// Creates a new empty struct.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            kind: StructKind::Struct,
            doc: None,
        }
    }

    /// Adds a field.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Builder-style variant of [`StructDef::add_field`].
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// Returns the fields ordered by field id.
    ///
    /// The sort is stable: fields sharing an id keep declaration order.
    #[must_use]
    pub fn sorted_members(&self) -> Vec<&Field> {
        sort_fields(&self.fields)
    }

    /// Returns true if this struct was declared as an exception.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.kind == StructKind::Exception
    }
}

/// Field requiredness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Requiredness {
    /// No qualifier.
    #[default]
    Default,
    /// `required`.
    Required,
    /// `optional`.
    Optional,
}

impl Requiredness {
    /// Parses requiredness from its schema-document spelling.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "default" | "opt-in-req-out" => Some(Self::Default),
            "required" => Some(Self::Required),
            "optional" => Some(Self::Optional),
            _ => None,
        }
    }
}

/// Struct member or function argument.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field id.
    pub id: i32,
    /// Field name.
    pub name: String,
    /// Field type.
    pub ty: Type,
    /// Requiredness qualifier.
    pub requiredness: Requiredness,
    /// Default value.
    pub default: Option<ConstValue>,
    /// Documentation.
    pub doc: Option<String>,
}

impl Field {
    /// Creates a new field.
    #[must_use]
    pub fn new(id: i32, name: impl Into<String>, ty: impl Into<Type>) -> Self {
        Self {
            id,
            name: name.into(),
            ty: ty.into(),
            requiredness: Requiredness::Default,
            default: None,
            doc: None,
        }
    }

    /// Sets the documentation string.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }
}

/// Orders fields by id, keeping declaration order among equal ids.
pub(crate) fn sort_fields(fields: &[Field]) -> Vec<&Field> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|f| f.id);
    sorted
}
