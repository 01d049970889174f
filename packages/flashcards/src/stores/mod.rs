//! Card store implementations.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;
