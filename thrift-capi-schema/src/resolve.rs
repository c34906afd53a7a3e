//! Reference resolution.
//!
//! Turns a raw [`Document`] into a [`Program`] whose type references are
//! shared `Arc` nodes. Resolution is memoised per declaration and keeps
//! program order for every declaration list. A struct reached through one of
//! its own containers is kept by name as [`Type::StructRef`]; by-value cycles
//! are rejected.

use crate::document::{Document, RawField, RawStruct, RawTypedef, TypeRef};
use crate::error::SchemaError;
use crate::program::Program;
use crate::services::{Function, Service};
use crate::types::{ConstDef, EnumDef, Field, StructDef, Type, TypedefDef};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves all type references of a raw document.
///
/// # Errors
/// Returns `SchemaError::TypeNotFound` for dangling references and
/// `SchemaError::CircularReference` for typedefs or structs that contain
/// themselves by value.
pub fn resolve_document(doc: &Document) -> Result<Program, SchemaError> {
    let mut resolver = Resolver::new(doc);
    let mut program = Program::new(doc.name.clone());

    for (lang, namespace) in &doc.namespaces {
        program.set_namespace(lang.clone(), namespace.clone());
    }

    for raw in &doc.typedefs {
        let def = resolver.typedef(&raw.name)?;
        program.typedefs.push(def);
    }

    for def in &doc.enums {
        if let Some(def) = resolver.enums.get(def.name.as_str()) {
            program.enums.push(Arc::clone(def));
        }
    }

    for raw in &doc.consts {
        let ty = resolver.resolve(&raw.ty, &raw.name)?;
        let mut def = ConstDef::new(raw.name.clone(), ty, raw.value.clone());
        def.doc = raw.doc.clone();
        program.consts.push(Arc::new(def));
    }

    for raw in &doc.structs {
        let def = resolver.structure(&raw.name)?;
        program.structs.push(def);
    }

    for raw in &doc.services {
        let mut service = Service::new(raw.name.clone());
        service.extends = raw.extends.clone();
        service.doc = raw.doc.clone();

        for raw_fn in &raw.functions {
            let context = format!("{}.{}", raw.name, raw_fn.name);
            let mut function = Function::new(
                raw_fn.name.clone(),
                resolver.resolve(&raw_fn.returns, &context)?,
            );
            function.oneway = raw_fn.oneway;
            function.doc = raw_fn.doc.clone();
            function.args = resolver.fields(&raw_fn.args, &context)?;
            service.add_function(function);
        }

        program.services.push(Arc::new(service));
    }

    tracing::debug!(
        program = %program.name,
        structs = program.structs.len(),
        services = program.services.len(),
        "resolved schema document"
    );

    Ok(program)
}

/// Memoising resolver over one document.
struct Resolver<'a> {
    raw_typedefs: HashMap<&'a str, &'a RawTypedef>,
    raw_structs: HashMap<&'a str, &'a RawStruct>,
    enums: HashMap<&'a str, Arc<EnumDef>>,
    typedefs: HashMap<&'a str, Arc<TypedefDef>>,
    structs: HashMap<&'a str, Arc<StructDef>>,
    /// Declarations being resolved, with the container depth at entry.
    in_progress: Vec<(String, usize)>,
    container_depth: usize,
    /// Typedefs whose target is being substituted in place.
    inlining: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(doc: &'a Document) -> Self {
        Self {
            raw_typedefs: doc.typedefs.iter().map(|t| (t.name.as_str(), t)).collect(),
            raw_structs: doc.structs.iter().map(|s| (s.name.as_str(), s)).collect(),
            enums: doc
                .enums
                .iter()
                .map(|e| (e.name.as_str(), Arc::new(e.clone())))
                .collect(),
            typedefs: HashMap::new(),
            structs: HashMap::new(),
            in_progress: Vec::new(),
            container_depth: 0,
            inlining: Vec::new(),
        }
    }

    fn resolve(&mut self, ty: &TypeRef, context: &str) -> Result<Type, SchemaError> {
        match ty {
            TypeRef::Base(base) => Ok(Type::Base(*base)),
            TypeRef::List(elem) => Ok(Type::List(self.element(elem, context)?)),
            TypeRef::Set(elem) => Ok(Type::Set(self.element(elem, context)?)),
            TypeRef::Map(key, value) => Ok(Type::Map(
                self.element(key, context)?,
                self.element(value, context)?,
            )),
            TypeRef::Named { module, name } => {
                if let Some(def) = self.enums.get(name.as_str()) {
                    return Ok(Type::Enum(Arc::clone(def)));
                }
                if self.raw_typedefs.contains_key(name.as_str()) {
                    if self.encloses_container(name) {
                        return self.inline_typedef(name, context);
                    }
                    return self.typedef(name).map(Type::Typedef);
                }
                if self.raw_structs.contains_key(name.as_str()) {
                    if self.encloses_container(name) {
                        return Ok(Type::StructRef(name.clone()));
                    }
                    return self.structure(name).map(Type::Struct);
                }
                let name = match module {
                    Some(module) => format!("{module}.{name}"),
                    None => name.clone(),
                };
                Err(SchemaError::TypeNotFound {
                    name,
                    context: context.to_string(),
                })
            }
        }
    }

    /// Resolves a container element, key, or value type.
    fn element(&mut self, ty: &TypeRef, context: &str) -> Result<Box<Type>, SchemaError> {
        self.container_depth += 1;
        let resolved = self.resolve(ty, context);
        self.container_depth -= 1;
        resolved.map(Box::new)
    }

    /// True when `name` is being resolved and a container lies between its
    /// definition and the current reference.
    fn encloses_container(&self, name: &str) -> bool {
        self.in_progress
            .iter()
            .any(|(n, depth)| n == name && self.container_depth > *depth)
    }

    /// Resolves a typedef reached through a container inside its own target
    /// to the aliased type.
    fn inline_typedef(&mut self, name: &str, context: &str) -> Result<Type, SchemaError> {
        if self.inlining.iter().any(|n| n == name) {
            return Err(self.cycle(name));
        }
        let raw = *self
            .raw_typedefs
            .get(name)
            .ok_or_else(|| SchemaError::TypeNotFound {
                name: name.to_string(),
                context: context.to_string(),
            })?;

        self.inlining.push(name.to_string());
        let ty = self.resolve(&raw.ty, context);
        self.inlining.pop();
        ty
    }

    fn typedef(&mut self, name: &str) -> Result<Arc<TypedefDef>, SchemaError> {
        if let Some(def) = self.typedefs.get(name) {
            return Ok(Arc::clone(def));
        }
        let raw = *self
            .raw_typedefs
            .get(name)
            .ok_or_else(|| SchemaError::TypeNotFound {
                name: name.to_string(),
                context: name.to_string(),
            })?;

        self.enter(name)?;
        let ty = self.resolve(&raw.ty, name)?;
        self.in_progress.pop();

        let mut def = TypedefDef::new(raw.name.clone(), ty);
        def.doc = raw.doc.clone();
        let def = Arc::new(def);
        self.typedefs.insert(raw.name.as_str(), Arc::clone(&def));
        Ok(def)
    }

    fn structure(&mut self, name: &str) -> Result<Arc<StructDef>, SchemaError> {
        if let Some(def) = self.structs.get(name) {
            return Ok(Arc::clone(def));
        }
        let raw = *self
            .raw_structs
            .get(name)
            .ok_or_else(|| SchemaError::TypeNotFound {
                name: name.to_string(),
                context: name.to_string(),
            })?;

        self.enter(name)?;
        let fields = self.fields(&raw.fields, name)?;
        self.in_progress.pop();

        let mut def = StructDef::new(raw.name.clone());
        def.kind = raw.kind;
        def.doc = raw.doc.clone();
        def.fields = fields;
        let def = Arc::new(def);
        self.structs.insert(raw.name.as_str(), Arc::clone(&def));
        Ok(def)
    }

    fn fields(&mut self, raw: &[RawField], context: &str) -> Result<Vec<Field>, SchemaError> {
        raw.iter()
            .map(|f| {
                let mut field = Field::new(f.id, f.name.clone(), self.resolve(&f.ty, context)?);
                field.requiredness = f.requiredness;
                field.default = f.default.clone();
                field.doc = f.doc.clone();
                Ok(field)
            })
            .collect()
    }

    /// Marks a declaration as being resolved, failing on re-entry.
    fn enter(&mut self, name: &str) -> Result<(), SchemaError> {
        if self.in_progress.iter().any(|(n, _)| n == name) {
            return Err(self.cycle(name));
        }
        self.in_progress
            .push((name.to_string(), self.container_depth));
        Ok(())
    }

    fn cycle(&self, name: &str) -> SchemaError {
        let mut path: Vec<&str> = self.in_progress.iter().map(|(n, _)| n.as_str()).collect();
        path.push(name);
        SchemaError::CircularReference {
            path: path.join(" -> "),
        }
    }
}
