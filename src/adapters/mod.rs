// Adapters layer: concrete implementations of the domain ports.

#[cfg(feature = "browser")]
pub mod browser;
pub mod snapshot;
pub mod storage;
