#![allow(dead_code)]
#![allow(rustdoc::broken_intra_doc_links)]
//! # Cascade Chat — Assistente de Suporte em Cascata
//!
//! **Ponto de entrada principal** do assistente.
//!
//! Cada mensagem passa por três níveis, parando no primeiro que responder:
//! regras fixas, FAQs curadas (similaridade de Jaccard) e, por último, um
//! modelo de diálogo (DialoGPT) cuja saída é sanitizada.
//!
//! ## Fluxo de Inicialização
//!
//! ```text
//! main()
//!   ├── Configura tracing/logging
//!   ├── Lê Settings (.env + ambiente)
//!   ├── Carrega FAQs (data/faq.json ou tabela embutida)
//!   ├── Monta ChatEngine (modelo ainda NÃO carregado)
//!   ├── Inicia task do log de conversas
//!   ├── Inicia servidor TCP (127.0.0.1:5000)
//!   └── CHAT_PRELOAD_MODEL=true → aquece o modelo em background
//! ```
//!
//! Sem pré-carga, o modelo (~350 MB) é baixado e carregado na primeira
//! mensagem que chegar ao nível generativo; regras e FAQs respondem desde o
//! primeiro segundo.
//!
//! ## Exemplo de Uso
//!
//! ```bash
//! # Executar com logs padrão (info)
//! cargo run
//!
//! # Logs detalhados + modelo aquecido no start
//! RUST_LOG=debug CHAT_PRELOAD_MODEL=true cargo run
//!
//! curl -s localhost:5000/ask -H 'content-type: application/json' \
//!      -d '{"message": "What services does your company provide?"}'
//! ```

/// Módulo `config` — configuração via variáveis de ambiente.
mod config;

/// Módulo `core` — FAQs, base de conhecimento e o tipo de resposta.
mod core;

/// Módulo `error` — erros na fronteira do motor.
mod error;

/// Módulo `generation` — modelo de diálogo, estado por sessão e sanitizer.
mod generation;

/// Módulo `nlu` — normalização, regras e casamento de FAQs.
mod nlu;

/// Módulo `orchestrator` — a cascata regras → FAQ → generativo.
mod orchestrator;

/// Módulo `persistence` — FAQs em disco e log de conversas.
mod persistence;

/// Módulo `web` — servidor axum, handlers HTTP e template.
mod web;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::core::faq_data::builtin_document;
use crate::core::KnowledgeBase;
use crate::generation::dialogpt::DialoGpt;
use crate::generation::handle::ModelLoader;
use crate::generation::{DialogueModel, GenerativeResponder, ModelHandle, SamplingParams, SessionStore};
use crate::nlu::{FaqMatcher, Normalizer};
use crate::orchestrator::ChatEngine;
use crate::persistence::ChatLog;
use crate::web::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controla o nível; padrão "info".
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("💬 Cascade Chat — Starting...");

    let settings = Settings::from_env().context("Configuração inválida")?;

    // FAQs: arquivo corrompido não derruba o servidor, cai para a tabela embutida.
    let faq_doc = match persistence::load_faq(&settings.faq_path) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "Falha ao carregar FAQs do disco, usando as embutidas");
            builtin_document()
        }
    };
    let normalizer = Arc::new(Normalizer::new());
    let kb = Arc::new(KnowledgeBase::from_document(faq_doc, &normalizer));
    tracing::info!(entries = kb.len(), version = kb.version(), "Base de FAQs pronta");

    let repo = settings.model_repo.clone();
    let token = settings.hf_token.clone();
    let loader: ModelLoader = Arc::new(move || -> Result<Box<dyn DialogueModel>> {
        Ok(Box::new(DialoGpt::load(&repo, token.clone())?))
    });
    let model = ModelHandle::new(loader);

    let engine = Arc::new(ChatEngine::new(
        FaqMatcher::new(kb, normalizer),
        GenerativeResponder::new(SamplingParams::default()),
        model.clone(),
        SessionStore::new(settings.max_sessions, settings.history_cap),
        settings.generation_timeout,
    ));

    let (chat_log, _log_writer) = ChatLog::spawn(settings.chat_log_path.clone());

    let app = web::create_router(AppState { engine, chat_log });

    let listener = tokio::net::TcpListener::bind(settings.bind_addr)
        .await
        .with_context(|| format!("Falha ao fazer bind em {}", settings.bind_addr))?;
    tracing::info!("🚀 Server running at http://{}", settings.bind_addr);

    if settings.preload_model {
        // Aquece o modelo sem segurar o servidor; falha aqui só é logada,
        // a próxima requisição generativa tenta de novo.
        tokio::spawn(async move {
            tracing::info!("Pré-carregando modelo de diálogo (primeira execução baixa ~350MB)...");
            match model.get().await {
                Ok(_) => tracing::info!("✅ Modelo pronto!"),
                Err(e) => tracing::error!(error = %e, "Falha na pré-carga do modelo"),
            }
        });
    } else {
        tracing::info!("Modelo será carregado na primeira pergunta que chegar ao nível generativo");
    }

    axum::serve(listener, app).await?;

    Ok(())
}
