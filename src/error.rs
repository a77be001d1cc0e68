//! Tipos de erro do crate.
//!
//! A construção de grafos nunca falha: registros ruins apenas degradam.
//! Os erros aqui cobrem as bordas da API: configuração inválida e
//! decodificação de payloads JSON.

use thiserror::Error;

/// Result com o [`GraphError`] do crate.
pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Falha ao decodificar JSON: {0}")]
    Decode(#[from] serde_json::Error),
}
