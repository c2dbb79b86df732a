//! Tipos de Erro do Subsistema de Memória
//!
//! Só `OutOfMemory` chega ao chamador de `alloc`; os demais viram o
//! diagnóstico do pânico de `kfree` ou rejeitam uma configuração inválida.

/// Erros do subsistema de memória
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmError {
    /// Sem memória física disponível (OOM)
    OutOfMemory,
    /// Endereço fora da faixa gerenciada
    InvalidAddress,
    /// Endereço não alinhado a página
    NotAligned,
    /// Parâmetro inválido
    InvalidParameter,
}

impl MmError {
    /// Retorna descrição legível do erro
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfMemory => "OOM: sem frames físicos disponíveis",
            Self::InvalidAddress => "Endereço fora da faixa gerenciada",
            Self::NotAligned => "Endereço não alinhado a página",
            Self::InvalidParameter => "Parâmetro inválido",
        }
    }
}

impl core::fmt::Display for MmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tipo Result específico para operações de memória
pub type MmResult<T> = Result<T, MmError>;
