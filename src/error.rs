//! Erros do motor de conversa.
//!
//! Só falhas de carregamento ([`EngineError::ModelLoad`], ou
//! [`EngineError::Join`] quando o loader entra em pânico) chegam ao cliente
//! como HTTP 500; erros e pânicos da geração viram texto de resposta no
//! próprio motor.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to load the dialogue model: {0:#}")]
    ModelLoad(anyhow::Error),

    #[error("{0:#}")]
    Generation(anyhow::Error),

    #[error("model loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
