//! Declarative scalar extraction for variable-criteria incentives.
//!
//! A criteria record names a function selector or event topic and a field
//! index; the engine decodes the matching call input or receipt log with a
//! caller-supplied [`SignatureRegistry`] and returns the field as an
//! unsigned integer.

pub mod decode;
pub mod engine;
pub mod evidence;
pub mod registry;
pub mod types;

pub use engine::get_incentive_scalar;
pub use evidence::{CallTransaction, Evidence, LogEntry, TransactionReceipt};
pub use registry::{KnownSignatures, SignatureDefinition, SignatureRegistry};
pub use types::*;
