//! # Handlers HTTP — Os Endpoints da Aplicação
//!
//! | Handler | Método | Retorno | Uso |
//! |---------|--------|---------|-----|
//! | `index` | GET `/` | HTML completo | Página de chat (Maud) |
//! | `ask` | POST `/ask` | JSON | Uma mensagem → uma resposta |
//! | `reset` | POST `/reset` | JSON | Esquece o histórico da sessão |
//! | `status` | GET `/status` | JSON | Modelo carregado? quantas sessões? |
//!
//! ## Erros em `/ask`
//!
//! | Situação | Status | Corpo |
//! |----------|--------|-------|
//! | `message` vazio ou ausente | 200 | `{"reply": "Please type something!"}` |
//! | Falha ao carregar o modelo | 500 | `{"reply": "Error: ..."}` |
//! | Falha durante a geração | 200 | resposta `"Sorry, I encountered an error: ..."` |

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::state::AppState;
use super::templates;
use crate::core::ReplySource;

pub const EMPTY_MESSAGE_REPLY: &str = "Please type something!";

/// Corpo de `POST /ask`. Campos ausentes são tolerados.
#[derive(Debug, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ReplySource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AskResponse {
    fn bare(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            source: None,
            session_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResetRequest {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub session_id: String,
    pub reset: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub model_loaded: bool,
    pub faq_entries: usize,
    pub sessions: usize,
}

/// GET `/` — Página de chat.
pub async fn index() -> Html<String> {
    Html(templates::chat_page().into_string())
}

/// POST `/ask` — Processa uma mensagem.
///
/// ```text
/// 1. message vazio → "Please type something!" (motor não é chamado)
/// 2. session_id ausente → novo UUID v4, devolvido na resposta
/// 3. ChatEngine::respond()
/// 4. Turno enviado ao log de conversas (fire and forget)
/// ```
pub async fn ask(State(state): State<AppState>, Json(req): Json<AskRequest>) -> Response {
    let message = req.message.unwrap_or_default();
    if message.trim().is_empty() {
        return Json(AskResponse::bare(EMPTY_MESSAGE_REPLY)).into_response();
    }

    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(session = %session_id, chars = message.chars().count(), "Mensagem recebida");

    match state.engine.respond(&session_id, &message).await {
        Ok(reply) => {
            state.chat_log.record(&session_id, &message, &reply);
            Json(AskResponse {
                reply: reply.text,
                source: Some(reply.source),
                session_id: Some(session_id),
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(session = %session_id, error = %e, "Falha ao responder");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(AskResponse::bare(format!("Error: {e}"))),
            )
                .into_response()
        }
    }
}

/// POST `/reset` — Limpa o histórico generativo de uma sessão.
pub async fn reset(State(state): State<AppState>, Json(req): Json<ResetRequest>) -> Json<ResetResponse> {
    let reset = state.engine.sessions().reset(&req.session_id);
    tracing::info!(session = %req.session_id, reset, "Reset de conversa");
    Json(ResetResponse {
        session_id: req.session_id,
        reset,
    })
}

/// GET `/status` — Estado do servidor.
pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        model_loaded: state.engine.model().is_loaded(),
        faq_entries: state.engine.faq().knowledge_base().len(),
        sessions: state.engine.sessions().len(),
    })
}
