pub mod memory;
pub mod types;

pub use memory::InMemoryLedger;
pub use types::*;
