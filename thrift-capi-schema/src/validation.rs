//! Program validation utilities.
//!
//! The generator trusts its input. These checks cover the uniqueness
//! properties the emitted code depends on (switch labels, struct members,
//! exported symbol names) and are run before generation.

use crate::error::SchemaError;
use crate::program::Program;
use crate::types::{EnumDef, Field};
use std::collections::HashSet;

/// Validates a resolved program.
///
/// # Arguments
/// * `program` - The program to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first issue found.
///
/// # Errors
/// Returns `SchemaError::Validation` if validation fails.
pub fn validate_program(program: &Program) -> Result<(), SchemaError> {
    for enum_def in &program.enums {
        validate_enum(enum_def)?;
    }
    for struct_def in &program.structs {
        validate_fields(&struct_def.name, &struct_def.fields)?;
    }
    for service in &program.services {
        let mut seen = HashSet::new();
        for function in &service.functions {
            if !seen.insert(function.name.as_str()) {
                return Err(SchemaError::validation(format!(
                    "Duplicate function '{}' in service '{}'",
                    function.name, service.name
                )));
            }
            validate_fields(
                &format!("{}.{}", service.name, function.name),
                &function.args,
            )?;
        }
    }
    Ok(())
}

/// Validates an enum definition.
fn validate_enum(enum_def: &EnumDef) -> Result<(), SchemaError> {
    let mut seen_names = HashSet::new();
    let mut seen_values = HashSet::new();

    for value in &enum_def.values {
        if !seen_names.insert(&value.name) {
            return Err(SchemaError::validation(format!(
                "Duplicate enum value name '{}' in enum '{}'",
                value.name, enum_def.name
            )));
        }

        // Marshaling switches use one case label per value.
        if !seen_values.insert(value.value) {
            return Err(SchemaError::validation(format!(
                "Duplicate enum value {} in enum '{}'",
                value.value, enum_def.name
            )));
        }
    }

    Ok(())
}

/// Validates field ids and names of a struct or argument list.
fn validate_fields(owner: &str, fields: &[Field]) -> Result<(), SchemaError> {
    let mut seen_ids = HashSet::new();
    let mut seen_names = HashSet::new();

    for field in fields {
        if !seen_ids.insert(field.id) {
            return Err(SchemaError::validation(format!(
                "Duplicate field id {} in '{}'",
                field.id, owner
            )));
        }
        if !seen_names.insert(field.name.as_str()) {
            return Err(SchemaError::validation(format!(
                "Duplicate field name '{}' in '{}'",
                field.name, owner
            )));
        }
    }

    Ok(())
}
