//! # Configuração do Buffer Cache
//!
//! Constantes de tamanho do cache de blocos e a configuração em tempo de
//! execução derivada delas.

/// Tamanho de um bloco de disco (bytes)
pub const BSIZE: usize = 1024;

/// Máximo de blocos que uma operação de FS escreve
pub const MAXOPBLOCKS: usize = 10;

/// Número de buffers no cache
pub const NBUF: usize = MAXOPBLOCKS * 3;

/// Número de buckets da tabela hash (primo, diferente de NBUF)
pub const NBUCKET: usize = 13;

/// Configuração em tempo de execução do `Bcache`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BcacheConfig {
    /// Número de slots (fixo durante toda a vida do cache)
    pub nbuf: usize,
    /// Número de buckets da tabela hash
    pub nbucket: usize,
}

impl BcacheConfig {
    pub const fn new(nbuf: usize, nbucket: usize) -> Self {
        Self { nbuf, nbucket }
    }

    /// Ambos os tamanhos precisam ser não nulos.
    pub const fn is_valid(&self) -> bool {
        self.nbuf > 0 && self.nbucket > 0
    }
}

impl Default for BcacheConfig {
    fn default() -> Self {
        Self::new(NBUF, NBUCKET)
    }
}
