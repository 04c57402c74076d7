//! # Módulo Core — Tipos Fundamentais do Domínio
//!
//! Agrupa os tipos que o pipeline de resposta compartilha entre camadas:
//!
//! - [`FaqEntry`] — par pergunta/resposta curado, com tokens pré-computados
//! - [`KnowledgeBase`] — tabela imutável de FAQs carregada uma vez no start
//! - [`FaqDocument`] — formato versionado da tabela (embutida ou em disco)
//! - [`MatchResult`] / [`ReplySource`] — a resposta final e o nível que a produziu
//!
//! ## Ciclo de Vida
//!
//! ```text
//! start ─► FaqDocument (embutido ou data/faq.json)
//!            └─► KnowledgeBase::from_document(doc, &Normalizer)
//!                  └─► Vec<FaqEntry> (tokens calculados UMA vez)
//! ```
//!
//! Depois de construída, a KB nunca é mutada — é compartilhada via `Arc`
//! sem lock entre todas as requisições.

/// Tabela de FAQs embutida no binário.
pub mod faq_data;

/// Sub-módulo com [`KnowledgeBase`], [`FaqEntry`] e o formato em disco.
pub mod knowledge_base;

/// Sub-módulo com o resultado do pipeline ([`MatchResult`]).
pub mod reply;

pub use knowledge_base::{FaqDocument, FaqEntry, FaqRecord, KnowledgeBase};
pub use reply::{MatchResult, ReplySource};
