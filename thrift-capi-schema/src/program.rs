//! Program (document root) definition.

use crate::services::Service;
use crate::types::{ConstDef, EnumDef, StructDef, TypedefDef};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A fully resolved Thrift program.
///
/// All sequences keep program (declaration) order, which is the order the
/// generator visits them in.
#[derive(Debug, Clone)]
pub struct Program {
    /// Program name (the IDL file stem).
    pub name: String,
    /// Namespace per target language.
    pub namespaces: BTreeMap<String, String>,
    /// Typedefs.
    pub typedefs: Vec<Arc<TypedefDef>>,
    /// Enums.
    pub enums: Vec<Arc<EnumDef>>,
    /// Constants.
    pub consts: Vec<Arc<ConstDef>>,
    /// Structs, unions, and exceptions.
    pub structs: Vec<Arc<StructDef>>,
    /// Services.
    pub services: Vec<Arc<Service>>,
}

impl Program {
    /// Creates a new empty program.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespaces: BTreeMap::new(),
            typedefs: Vec::new(),
            enums: Vec::new(),
            consts: Vec::new(),
            structs: Vec::new(),
            services: Vec::new(),
        }
    }

    /// Sets the namespace for a language.
    pub fn set_namespace(&mut self, lang: impl Into<String>, namespace: impl Into<String>) {
        self.namespaces.insert(lang.into(), namespace.into());
    }

    /// Returns the namespace for a language, or an empty string.
    #[must_use]
    pub fn namespace(&self, lang: &str) -> &str {
        self.namespaces.get(lang).map_or("", String::as_str)
    }

    /// Adds a typedef and returns the shared handle.
    pub fn add_typedef(&mut self, def: TypedefDef) -> Arc<TypedefDef> {
        let def = Arc::new(def);
        self.typedefs.push(Arc::clone(&def));
        def
    }

    /// Adds an enum and returns the shared handle.
    pub fn add_enum(&mut self, def: EnumDef) -> Arc<EnumDef> {
        let def = Arc::new(def);
        self.enums.push(Arc::clone(&def));
        def
    }

    /// Adds a constant and returns the shared handle.
    pub fn add_const(&mut self, def: ConstDef) -> Arc<ConstDef> {
        let def = Arc::new(def);
        self.consts.push(Arc::clone(&def));
        def
    }

    /// Adds a struct and returns the shared handle.
    pub fn add_struct(&mut self, def: StructDef) -> Arc<StructDef> {
        let def = Arc::new(def);
        self.structs.push(Arc::clone(&def));
        def
    }

    /// Adds a service and returns the shared handle.
    pub fn add_service(&mut self, service: Service) -> Arc<Service> {
        let service = Arc::new(service);
        self.services.push(Arc::clone(&service));
        service
    }

    /// Looks up a struct by name.
    #[must_use]
    pub fn get_struct(&self, name: &str) -> Option<&Arc<StructDef>> {
        self.structs.iter().find(|s| s.name == name)
    }

    /// Looks up an enum by name.
    #[must_use]
    pub fn get_enum(&self, name: &str) -> Option<&Arc<EnumDef>> {
        self.enums.iter().find(|e| e.name == name)
    }
}
