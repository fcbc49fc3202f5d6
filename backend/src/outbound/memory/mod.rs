//! In-process store used when no database URL is configured.
//!
//! [`InMemoryStore`] implements every repository port behind one mutex, so a
//! toggle is as atomic here as the Diesel transaction is in PostgreSQL. Data
//! lives only as long as the process.

mod store;

pub use store::InMemoryStore;
