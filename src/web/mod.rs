//! # Módulo Web — API JSON e Página de Chat
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │ Browser (página Maud + fetch)                    │
//! ├──────────────────────────────────────────────────┤
//! │ Axum Router (este módulo)                        │
//! │  ├── GET  /        → página de chat              │
//! │  ├── POST /ask     → {reply, source, session_id} │
//! │  ├── POST /reset   → limpa histórico da sessão   │
//! │  └── GET  /status  → {model_loaded, ...}         │
//! ├──────────────────────────────────────────────────┤
//! │ TraceLayer (tracing por requisição) + CORS       │
//! └──────────────────────────────────────────────────┘
//! ```
//!
//! ## Submódulos
//!
//! | Módulo | Responsabilidade |
//! |--------|------------------|
//! | [`state`] | Estado compartilhado (`AppState`) |
//! | [`handlers`] | Handlers Axum para cada rota |
//! | [`templates`] | Template Maud da página |

pub mod handlers;
pub mod state;
pub mod templates;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use state::AppState;

/// Cria o router Axum com todas as rotas da aplicação.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/ask", post(handlers::ask))
        .route("/reset", post(handlers::reset))
        .route("/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
