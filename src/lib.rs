//! # VStore - An In-Memory Text Vector Store
//!
//! VStore keeps short texts together with fixed-dimension embeddings and
//! answers nearest-neighbor and top-k queries over them by linear scan.
//! Texts are embedded by a caller-supplied function; its output is truncated
//! or zero-padded to the store's dimension on every insert and update.
//!
//! Three metrics rank stored vectors against a query: cosine similarity
//! (higher is better), Euclidean and Manhattan distance (lower is better).
//!
//! ## Example
//!
//! ```
//! use vstore::{Metric, VectorStore};
//!
//! let mut store = VectorStore::with_embedding(3, |text: &str| match text {
//!     "cat" => vec![1.0, 0.0, 0.0],
//!     "car" => vec![0.0, 1.0, 0.0],
//!     _ => vec![1.0, 1.0, 0.0],
//! }).unwrap();
//!
//! store.add_text("cat");
//! store.add_text("car");
//! store.add_text("catcar");
//!
//! // Search by metric name
//! let best = store.find_nearest(&[1.0, 0.0, 0.0], "cosine").unwrap();
//! assert_eq!(best, Some(0));
//!
//! // Or with the typed metric
//! let top = store.top_k(&[1.0, 0.0, 0.0], 2, Metric::Cosine).unwrap();
//! assert_eq!(top, vec![0, 2]);
//! ```

pub mod vector;
mod config;
mod error;
mod metric;
mod record;
mod store;

pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use metric::Metric;
pub use record::VectorRecord;
pub use store::{EmbedFn, VectorStore};
