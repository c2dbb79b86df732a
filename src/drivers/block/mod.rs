//! # Dispositivos de Bloco
//!
//! Tabela de dispositivos consultada pelo buffer cache e o driver de disco
//! em memória.
//!
//! | Driver      | Status      | Descrição                    |
//! |-------------|-------------|------------------------------|
//! | Ramdisk     | Funcional   | Disco em memória             |

pub mod ramdisk;
pub mod traits;

pub use ramdisk::RamDisk;
pub use traits::{BlockDevice, BlockError};

use alloc::sync::Arc;
use alloc::vec::Vec;
use spin::RwLock;

use crate::fs::config::BSIZE;

/// Identificador de dispositivo (índice na `DeviceTable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub u32);

impl DeviceId {
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Registro de dispositivos de bloco
///
/// Só aceita dispositivos cujo bloco tem exatamente `BSIZE` bytes: o cache
/// transfere sempre um bloco inteiro por buffer.
pub struct DeviceTable {
    devices: RwLock<Vec<Arc<dyn BlockDevice>>>,
}

impl DeviceTable {
    pub const fn new() -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
        }
    }

    /// Registra um novo dispositivo de bloco
    pub fn register(&self, device: Arc<dyn BlockDevice>) -> Result<DeviceId, BlockError> {
        if device.block_size() != BSIZE {
            crate::kwarn!("(Block) Tamanho de bloco rejeitado:", device.block_size());
            return Err(BlockError::InvalidBuffer);
        }
        let mut devices = self.devices.write();
        let id = DeviceId(devices.len() as u32);
        devices.push(device);
        crate::kinfo!("(Block) Dispositivo registrado id=", id.0);
        Ok(id)
    }

    /// Obtém um dispositivo de bloco pelo id
    pub fn get(&self, id: DeviceId) -> Option<Arc<dyn BlockDevice>> {
        self.devices.read().get(id.0 as usize).cloned()
    }

    /// Retorna o número total de dispositivos registrados
    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}
