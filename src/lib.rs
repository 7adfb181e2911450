//! # Elastic Hash
//!
//! A Rust implementation of a fixed-capacity hash table using elastic hashing.
//!
//! `ElasticHashMap` splits its capacity into a sequence of levels of geometrically
//! shrinking size. Each level admits a number of quadratic probes derived from its current
//! load and a configured slack fraction `delta`, so the expected probe cost stays nearly
//! constant as the table fills. A `delta` fraction of the slots is never filled.
//!
//! The table is allocated once at construction. It never resizes and entries are never
//! removed. Running out of room is reported through [`InsertError`].
//!
//! ## Basic Usage
//!
//! ```rust
//! use elastic_hash::ElasticHashMap;
//!
//! // 10 slots, 10% kept free
//! let mut map = ElasticHashMap::new(10, 0.1)?;
//!
//! // Insert values
//! map.insert("apple".to_string(), 1)?;
//! map.insert("banana".to_string(), 2)?;
//!
//! // Retrieve values
//! assert_eq!(map.get("apple"), Some(&1));
//! assert_eq!(map.get_or_default("cherry"), (0, false));
//!
//! // Update values
//! assert_eq!(map.insert("apple".to_string(), 10)?, Some(1));
//! assert_eq!(map.get("apple"), Some(&10));
//! # Ok::<(), elastic_hash::Error>(())
//! ```
//!
//! ## Running Out Of Space
//!
//! ```rust
//! use elastic_hash::{ElasticConfig, ElasticHashMap, InsertError};
//!
//! let mut map = ElasticHashMap::with_config(ElasticConfig::new(2, 0.5))?;
//! assert_eq!(map.max_len(), 1);
//! assert_eq!(map.insert(1_u32, "one"), Ok(None));
//! assert_eq!(map.insert(2_u32, "two"), Err(InsertError::OutOfSpace));
//! # Ok::<(), elastic_hash::ConfigError>(())
//! ```

/// Construction parameters
mod config;
/// Module implementing the multi-level elastic hash table
mod elastic_hashmap;
/// Error types
mod error;
/// Key hashing trait and built-in key types
mod key;
/// Level partitioning and slot storage
mod layout;
/// Probe sequence and probe limits
mod probe;
/// Utility functions and traits for the hash map
mod utils;

pub use config::ElasticConfig;
pub use elastic_hashmap::{DefaultHashBuilder, ElasticHashMap, Iter};
pub use error::{ConfigError, Error, InsertError};
pub use key::ElasticKey;
pub use utils::{HashMapExtensions, try_from_iter};
