//! Service definitions.
//!
//! This module contains the data structures representing Thrift services and
//! their functions.

use crate::types::{Field, Type, sort_fields};

/// Service definition.
#[derive(Debug, Clone)]
pub struct Service {
    /// Service name.
    pub name: String,
    /// Name of the extended service, if any.
    pub extends: Option<String>,
    /// Functions in declaration order.
    pub functions: Vec<Function>,
    /// Documentation.
    pub doc: Option<String>,
}

impl Service {
    /// Creates a new service with no functions.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extends: None,
            functions: Vec::new(),
            doc: None,
        }
    }

    /// Adds a function to the service.
    pub fn add_function(&mut self, function: Function) {
        self.functions.push(function);
    }

    /// Builder-style variant of [`Service::add_function`].
    #[must_use]
    pub fn with_function(mut self, function: Function) -> Self {
        self.add_function(function);
        self
    }

    /// Looks up a function by name.
    #[must_use]
    pub fn get_function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }
}

/// Service function.
#[derive(Debug, Clone)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Return type (`void` when nothing is returned).
    pub return_type: Type,
    /// Arguments in declaration order.
    pub args: Vec<Field>,
    /// Declared `oneway`.
    pub oneway: bool,
    /// Documentation.
    pub doc: Option<String>,
}

impl Function {
    /// Creates a new function without arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: impl Into<Type>) -> Self {
        Self {
            name: name.into(),
            return_type: return_type.into(),
            args: Vec::new(),
            oneway: false,
            doc: None,
        }
    }

    /// Adds an argument.
    #[must_use]
    pub fn with_arg(mut self, arg: Field) -> Self {
        self.args.push(arg);
        self
    }

    /// Sets the documentation string.
    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Returns the arguments ordered by field id.
    #[must_use]
    pub fn sorted_args(&self) -> Vec<&Field> {
        sort_fields(&self.args)
    }

    /// Returns true if the function returns nothing.
    #[must_use]
    pub fn returns_void(&self) -> bool {
        self.return_type.is_void()
    }
}
