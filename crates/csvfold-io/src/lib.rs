//! I/O collaborators for csvfold.
//!
//! The merge engine never touches files directly. Everything it needs from
//! the outside world goes through two traits:
//!
//! - [`RecordParser`] -- turns a delimited-text source into a [`Dataset`](csvfold_types::Dataset)
//! - [`Storage`] -- existence checks, byte reads, and byte writes
//!
//! # Backends
//!
//! - [`CsvFileParser`] / [`FsStorage`] -- local filesystem via `tokio::fs`
//! - [`InMemoryStorage`] -- `HashMap`-based backend implementing both traits,
//!   for tests and embedding
//!
//! Text encodings of the persisted document live in [`encoding`].

pub mod encoding;
pub mod error;
pub mod fs;
pub mod memory;
pub mod parser;
pub mod traits;

pub use error::{StorageError, StorageResult};
pub use fs::FsStorage;
pub use memory::InMemoryStorage;
pub use parser::{parse_delimited, CsvFileParser};
pub use traits::{RecordParser, Storage};
