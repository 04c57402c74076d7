//! # Orquestrador — A Cascata de Respostas
//!
//! O [`ChatEngine`] é o **coração do sistema**: recebe uma mensagem e a
//! passa pelos três níveis da cascata, parando no primeiro que responder.
//!
//! ```text
//! Mensagem do Usuário
//!   │
//!   ├── 1. RuleMatcher   → resposta fixa        (sessão resetada)
//!   │
//!   ├── 2. FaqMatcher    → resposta curada      (sessão resetada)
//!   │
//!   └── 3. Generativo    → DialoGPT + sanitizer (histórico atualizado)
//!          ├── modelo carregado no primeiro uso
//!          ├── erro de geração   → "Sorry, I encountered an error: …"
//!          └── tempo esgotado    → fallback do sanitizer, estado intacto
//! ```
//!
//! ## Concorrência
//!
//! O motor é `Send + Sync` e compartilhado via `Arc` entre os handlers.
//! Regras e FAQ são puras; o estado mutável fica no [`SessionStore`]
//! (um lock curto por operação) e no modelo (um lock por geração, dentro
//! de `spawn_blocking`).

use std::time::Duration;

use crate::core::MatchResult;
use crate::error::EngineError;
use crate::generation::sanitizer::{self, SHORT_REPLY_FALLBACK};
use crate::generation::{GenerativeResponder, ModelHandle, SessionStore};
use crate::nlu::{FaqMatcher, RuleMatcher};

/// Tempo máximo padrão de uma geração.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(30);

pub struct ChatEngine {
    rules: RuleMatcher,
    faq: FaqMatcher,
    responder: GenerativeResponder,
    model: ModelHandle,
    sessions: SessionStore,
    generation_timeout: Duration,
}

impl ChatEngine {
    pub fn new(
        faq: FaqMatcher,
        responder: GenerativeResponder,
        model: ModelHandle,
        sessions: SessionStore,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            rules: RuleMatcher::new(),
            faq,
            responder,
            model,
            sessions,
            generation_timeout,
        }
    }

    pub fn faq(&self) -> &FaqMatcher {
        &self.faq
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Esquece o histórico generativo da sessão.
    pub fn reset_session(&self, session_id: &str) {
        if self.sessions.reset(session_id) {
            tracing::debug!(session = %session_id, "Histórico da sessão limpo");
        }
    }

    /// Responde uma mensagem do usuário.
    ///
    /// # Erros
    ///
    /// Só retorna `Err` quando o modelo precisa ser carregado e falha
    /// ([`EngineError::ModelLoad`]). Erros da geração, inclusive pânico
    /// dentro do modelo, viram texto de resposta.
    pub async fn respond(&self, session_id: &str, text: &str) -> Result<MatchResult, EngineError> {
        if let Some(hit) = self.rules.match_rule(text) {
            tracing::info!(session = %session_id, category = ?hit.category, "Resposta por regra");
            self.reset_session(session_id);
            return Ok(MatchResult::rule(hit.reply));
        }

        if let Some(hit) = self.faq.match_faq(text) {
            self.reset_session(session_id);
            return Ok(MatchResult::faq(hit.answer));
        }

        let reply = match self.generate(session_id, text).await {
            Ok(Some(raw)) => sanitizer::sanitize(&raw),
            Ok(None) => SHORT_REPLY_FALLBACK.to_string(),
            Err(EngineError::Generation(e)) => {
                tracing::error!(session = %session_id, error = %format!("{e:#}"), "Falha na geração");
                format!("Sorry, I encountered an error: {e:#}")
            }
            Err(e) => return Err(e),
        };

        Ok(MatchResult::generative(reply))
    }

    /// Roda uma geração para a sessão. `Ok(None)` quando o tempo esgota.
    async fn generate(&self, session_id: &str, text: &str) -> Result<Option<String>, EngineError> {
        let model = self.model.get().await?;
        let (mut state, ticket) = self.sessions.checkout(session_id);
        let responder = self.responder.clone();
        let text = text.to_owned();

        let task = tokio::task::spawn_blocking(move || {
            let mut guard = model.lock();
            let reply = responder.generate(&mut **guard, &text, &mut state)?;
            Ok::<_, anyhow::Error>((reply, state))
        });

        match tokio::time::timeout(self.generation_timeout, task).await {
            Err(_) => {
                // a task continua até o fim, mas o resultado é descartado
                tracing::warn!(
                    session = %session_id,
                    timeout_secs = self.generation_timeout.as_secs_f32(),
                    "Geração excedeu o tempo limite"
                );
                Ok(None)
            }
            Ok(joined) => {
                let (reply, state) = joined
                    .map_err(|e| EngineError::Generation(anyhow::Error::new(e).context("generation task failed")))?
                    .map_err(EngineError::Generation)?;
                tracing::debug!(session = %session_id, history = state.len(), "Turno generativo");
                self.sessions.commit(session_id, ticket, state);
                Ok(Some(reply))
            }
        }
    }
}
