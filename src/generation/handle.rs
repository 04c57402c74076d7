//! # ModelHandle — Carregamento Preguiçoso e Acesso Serializado
//!
//! ```text
//! 1ª requisição generativa ──► get() ──► spawn_blocking(loader) ──► OnceCell
//! requisições seguintes    ──► get() ──► Arc já publicado
//! ```
//!
//! O `OnceCell` garante que o loader rode uma única vez mesmo com chamadas
//! concorrentes; quem chega durante o carregamento espera o mesmo resultado.
//! Se o carregamento falhar, a célula continua vazia e a próxima requisição
//! tenta de novo.
//!
//! O modelo fica atrás de um `parking_lot::Mutex`: inferência é CPU-bound
//! e roda em `spawn_blocking`, uma geração por vez.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;

use super::DialogueModel;
use crate::error::EngineError;

pub type SharedModel = Arc<Mutex<Box<dyn DialogueModel>>>;

/// Função (bloqueante) que constrói o modelo.
pub type ModelLoader = Arc<dyn Fn() -> anyhow::Result<Box<dyn DialogueModel>> + Send + Sync>;

#[derive(Clone)]
pub struct ModelHandle {
    cell: Arc<OnceCell<SharedModel>>,
    loader: ModelLoader,
}

impl ModelHandle {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            loader,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    /// Modelo pronto, carregando-o na primeira chamada.
    pub async fn get(&self) -> Result<SharedModel, EngineError> {
        self.cell
            .get_or_try_init(|| async {
                tracing::info!("Carregando modelo de diálogo (primeiro uso)...");
                let loader = Arc::clone(&self.loader);
                let model = tokio::task::spawn_blocking(move || loader())
                    .await?
                    .map_err(EngineError::ModelLoad)?;
                tracing::info!("Modelo de diálogo pronto");
                Ok::<_, EngineError>(Arc::new(Mutex::new(model)))
            })
            .await
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::SamplingParams;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NullModel;

    impl DialogueModel for NullModel {
        fn encode_turn(&self, _text: &str) -> anyhow::Result<Vec<u32>> {
            Ok(vec![0])
        }
        fn generate(&mut self, prompt: &[u32], _p: &SamplingParams) -> anyhow::Result<Vec<u32>> {
            Ok(prompt.to_vec())
        }
        fn decode(&self, _ids: &[u32]) -> anyhow::Result<String> {
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn loader_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = ModelHandle::new(Arc::new(move || -> anyhow::Result<Box<dyn DialogueModel>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(NullModel))
        }));

        assert!(!handle.is_loaded());
        let (a, b) = tokio::join!(handle.get(), handle.get());
        assert!(a.is_ok() && b.is_ok());
        handle.get().await.unwrap();

        assert!(handle.is_loaded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_load_is_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = ModelHandle::new(Arc::new(move || -> anyhow::Result<Box<dyn DialogueModel>> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                anyhow::bail!("hub unreachable");
            }
            Ok(Box::new(NullModel))
        }));

        let err = handle.get().await.err().unwrap();
        assert!(matches!(err, EngineError::ModelLoad(_)));
        assert!(err.to_string().contains("hub unreachable"));
        assert!(!handle.is_loaded());

        assert!(handle.get().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
