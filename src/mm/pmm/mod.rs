//! # PMM - Physical Memory Manager
//!
//! Alocador de frames físicos com uma lista livre por CPU (`Kmem`).

pub mod frame;
pub mod freelist;
pub mod kmem;
pub mod poison;
pub mod stats;

#[cfg(test)]
mod tests;

pub use frame::PhysFrame;
pub use kmem::Kmem;
pub use poison::PoisonFlags;
pub use stats::{KmemStats, KmemStatsSnapshot};
