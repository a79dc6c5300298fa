#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod cache;
mod entry;
mod loader;
mod registry;

pub use cache::{IntoIter, Iter, ResourceCache, DEFAULT_CAPACITY};
pub use entry::PeekMut;
pub use loader::{Loader, LoadingCache};
pub use registry::CacheRegistry;

#[cfg(not(feature = "ahash"))]
type RandomState = std::hash::RandomState;
#[cfg(feature = "ahash")]
type RandomState = ahash::RandomState;
