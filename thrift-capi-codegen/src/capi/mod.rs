//! C-linkage header and C++ bridge source emission.

pub mod header;
pub mod marshal;
pub mod source;

pub use header::HeaderEmitter;
pub use marshal::NativeMarshaler;
pub use source::SourceEmitter;

use crate::mapper::TypeMapper;
use thrift_capi_schema::{Function, Type};

/// Export macro prefixed to every exported prototype.
pub const EXPORT_MACRO: &str = "THRIFT_C_API_DLLEXPORT";

/// C return spelling; structs are returned by pointer.
pub(crate) fn c_return_type(mapper: &TypeMapper, ty: &Type) -> String {
    if ty.is_struct() {
        format!("{}*", mapper.c_type(ty))
    } else {
        mapper.c_type(ty)
    }
}

/// `<ret> <name>(` and the parameter list of an exported function.
pub(crate) fn c_signature(
    mapper: &TypeMapper,
    service: &str,
    function: &Function,
) -> (String, Vec<String>) {
    let head = format!(
        "{} {}(",
        c_return_type(mapper, &function.return_type),
        mapper.function_name(service, &function.name)
    );
    let params = function
        .sorted_args()
        .into_iter()
        .map(|arg| format!("{} {}", mapper.c_type(&arg.ty), arg.name))
        .collect();
    (head, params)
}
