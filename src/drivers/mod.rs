//! # Kernel Driver Layer
//!
//! Apenas a camada de dispositivos de bloco sobre a qual o buffer cache
//! faz I/O.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              fs::bio (Bcache)               │
//! └─────────────────────────────────────────────┘
//!                      ↓  DeviceId
//! ┌─────────────────────────────────────────────┐
//! │       drivers::block (DeviceTable)          │
//! │  - BlockDevice trait                        │
//! │  - RamDisk (disco em memória)               │
//! └─────────────────────────────────────────────┘
//! ```

pub mod block;
