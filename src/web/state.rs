//! # Estado da Aplicação Web
//!
//! ```text
//! AppState (Clone, barato)
//!  ├── engine: Arc<ChatEngine>   → cascata + sessões + handle do modelo
//!  └── chat_log: ChatLog         → canal para a task de escrita do log
//! ```
//!
//! O modelo não aparece aqui: o [`ChatEngine`] o carrega sob demanda
//! (ou em background, com `CHAT_PRELOAD_MODEL`), então o servidor fica
//! disponível imediatamente.

use std::sync::Arc;

use crate::orchestrator::ChatEngine;
use crate::persistence::ChatLog;

/// Estado compartilhado da aplicação Axum.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ChatEngine>,
    pub chat_log: ChatLog,
}
