//! Managed (C#) interop wrapper emission.

pub mod bridge;
pub mod marshal;

pub use bridge::BridgeEmitter;
pub use marshal::ManagedMarshaler;
