//! # Módulo NLU — Os Dois Níveis Determinísticos da Cascata
//!
//! Tudo aqui é puro e sem estado: pode ser chamado por quantas requisições
//! concorrentes forem necessárias, sem lock.
//!
//! ```text
//! Mensagem do usuário
//!   ├── 1. RuleMatcher  → resposta fixa? (saudação, despedida, "quem é você")
//!   └── 2. FaqMatcher   → FAQ com score ≥ 0.35? (Jaccard + bônus de keyword)
//!          └── usa Normalizer (tokens → stop-words → forma base)
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`normalizer`] | Texto → conjunto de tokens comparáveis |
//! | [`rules`] | Tabela ordenada de respostas fixas |
//! | [`faq`] | Similaridade contra a base de FAQs |

pub mod faq;
pub mod normalizer;
pub mod rules;

pub use faq::{FaqHit, FaqMatcher};
pub use normalizer::Normalizer;
pub use rules::{RuleCategory, RuleHit, RuleMatcher};
