//! Process-wide bookkeeping for contexts that share a GL object namespace.
//!
//! This is the single piece of global state in the crate: a counter of live
//! shared contexts plus an "initialized" flag, both atomics. The process
//! starts at zero; the namespace is torn down implicitly when the last
//! shared context releases.

mod shared;

pub use shared::{global_registry, RegistryToken, SharedContextRegistry, SubsystemEvent};
