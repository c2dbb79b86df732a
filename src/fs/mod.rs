//! Camada de blocos do sistema de arquivos.
//!
//! Submódulos:
//! - `bio`: Buffer cache de blocos de disco (`Bcache`).
//! - `config`: Tamanho de bloco e dimensões do cache.

pub mod bio;
pub mod config;

pub use bio::{Bcache, Buf, BufId, PinnedBuf};
pub use config::{BcacheConfig, BSIZE};
