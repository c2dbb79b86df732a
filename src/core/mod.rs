//! Core Module
//!
//! Serviços centrais independentes de arquitetura usados pelo cache de
//! blocos e pelo alocador de páginas: logging e o contador de ticks.

#[macro_use]
pub mod logging;
pub mod time;
