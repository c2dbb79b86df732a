//! Buckets da tabela hash do cache.
//!
//! Cada bucket guarda os metadados (chave, refcnt, carimbo LRU) dos slots
//! que hoje pertencem a ele. O conteúdo dos blocos fica nos slots, fora do
//! lock do bucket.

use alloc::vec::Vec;

use crate::drivers::block::DeviceId;

use super::buf::BufId;

/// Identidade de um bloco: (dispositivo, número do bloco)
pub(super) type BlockKey = (DeviceId, u32);

/// Metadados de um slot. Só mudam com o lock do bucket dono.
#[derive(Debug, Clone)]
pub(super) struct BufMeta {
    pub id: BufId,
    /// `None` até o primeiro uso
    pub key: Option<BlockKey>,
    pub refcnt: u32,
    /// Ticks de quando `refcnt` chegou a zero
    pub stamp: u64,
}

/// Candidato a vítima copiado de um bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Candidate {
    pub bucket: usize,
    pub id: BufId,
    pub stamp: u64,
}

pub(super) struct Bucket {
    pub entries: Vec<BufMeta>,
}

impl Bucket {
    /// Bucket vazio com espaço para todos os slots: mover um slot entre
    /// buckets nunca aloca com lock retido.
    pub fn with_capacity(nbuf: usize) -> Self {
        Self {
            entries: Vec::with_capacity(nbuf),
        }
    }

    pub fn find_mut(&mut self, key: BlockKey) -> Option<&mut BufMeta> {
        self.entries.iter_mut().find(|m| m.key == Some(key))
    }

    pub fn contains(&self, key: BlockKey) -> bool {
        self.entries.iter().any(|m| m.key == Some(key))
    }

    pub fn position(&self, id: BufId) -> Option<usize> {
        self.entries.iter().position(|m| m.id == id)
    }

    pub fn entry_mut(&mut self, id: BufId) -> Option<&mut BufMeta> {
        self.entries.iter_mut().find(|m| m.id == id)
    }

    /// Slot ocioso mais antigo deste bucket. Empate fica com o primeiro.
    pub fn lru_candidate(&self, bucket: usize) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        for meta in self.entries.iter().filter(|m| m.refcnt == 0) {
            if best.map_or(true, |b| meta.stamp < b.stamp) {
                best = Some(Candidate {
                    bucket,
                    id: meta.id,
                    stamp: meta.stamp,
                });
            }
        }
        best
    }
}

/// Bucket de uma chave: `(dev + blockno) % nbucket`
#[inline]
pub(super) fn bucket_of(key: BlockKey, nbucket: usize) -> usize {
    ((key.0.as_u32() as u64 + key.1 as u64) % nbucket as u64) as usize
}
