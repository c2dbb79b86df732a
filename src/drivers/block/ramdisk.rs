//! # RamDisk
//!
//! Disco em memória. Usado como dispositivo de boot (initrd) e nos testes
//! do buffer cache, onde os contadores de leitura/escrita provam quantas
//! vezes o cache realmente foi ao disco.

use alloc::vec;
use alloc::vec::Vec;
use core::sync::atomic::{AtomicU64, Ordering};

use spin::Mutex;

use super::traits::{BlockDevice, BlockError};

/// Disco em memória com blocos de tamanho fixo.
pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    block_size: usize,
    total_blocks: u64,
    read_only: bool,
    reads: AtomicU64,
    writes: AtomicU64,
}

impl RamDisk {
    /// Cria um disco zerado.
    pub fn new(block_size: usize, total_blocks: u64) -> Self {
        Self {
            data: Mutex::new(vec![0u8; block_size * total_blocks as usize]),
            block_size,
            total_blocks,
            read_only: false,
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Cria um disco a partir de uma imagem (tamanho arredondado para cima).
    pub fn from_image(block_size: usize, image: &[u8]) -> Self {
        let total_blocks = image.len().div_ceil(block_size) as u64;
        let disk = Self::new(block_size, total_blocks);
        disk.data.lock()[..image.len()].copy_from_slice(image);
        disk
    }

    /// Marca o disco como somente leitura.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Quantas leituras de bloco foram servidas
    pub fn reads(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Quantas escritas de bloco foram aceitas
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    fn range(&self, lba: u64, len: usize) -> Result<core::ops::Range<usize>, BlockError> {
        if lba >= self.total_blocks {
            return Err(BlockError::InvalidBlock);
        }
        if len != self.block_size {
            return Err(BlockError::InvalidBuffer);
        }
        let start = lba as usize * self.block_size;
        Ok(start..start + self.block_size)
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, lba: u64, buf: &mut [u8]) -> Result<(), BlockError> {
        let range = self.range(lba, buf.len())?;
        buf.copy_from_slice(&self.data.lock()[range]);
        self.reads.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn write_block(&self, lba: u64, buf: &[u8]) -> Result<(), BlockError> {
        if self.read_only {
            return Err(BlockError::ReadOnly);
        }
        let range = self.range(lba, buf.len())?;
        self.data.lock()[range].copy_from_slice(buf);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn total_blocks(&self) -> u64 {
        self.total_blocks
    }

    fn is_read_only(&self) -> bool {
        self.read_only
    }
}
