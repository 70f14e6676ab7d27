//! Storage layer for AQI data.
//!
//! Three independent concerns live here:
//!
//! - [`backend`]: byte stores keyed by string (`get`/`set`/`remove`), with an
//!   in-memory implementation for tests and a SQLite one via `rusqlite` for
//!   CLI runs that should survive restarts.
//! - [`cache`]: a time-boxed cache over a byte store, split into versioned
//!   namespaces. Every storage failure is absorbed and reads as a miss.
//! - [`artifacts`] and [`precomputed`]: the on-disk precomputed files
//!   (`daily-<year>/<id>.json`, `map-<year>.json`) and the lookup that lets a
//!   fetch short-circuit to them for known years.
//!
//! # Usage
//!
//! ```rust
//! use aqi_store::backend::MemoryStore;
//! use aqi_store::cache::{Namespace, TimedCache};
//! use std::sync::Arc;
//!
//! let cache = TimedCache::new(Arc::new(MemoryStore::default()));
//! cache.write(Namespace::DAILY, Some("bang-rak-2024"), &vec![1, 2, 3]);
//! let hit: Option<Vec<i32>> = cache.read(Namespace::DAILY, Some("bang-rak-2024"));
//! assert_eq!(hit, Some(vec![1, 2, 3]));
//! ```

pub mod artifacts;
pub mod backend;
pub mod cache;
pub mod error;
pub mod precomputed;
mod schema;
