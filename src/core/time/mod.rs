//! Tempo
//!
//! Só o contador global de ticks (jiffies). O cache de blocos usa os ticks
//! como carimbo de LRU; não há timers aqui.

pub mod jiffies;

pub use jiffies::{get_jiffies, inc_jiffies};
