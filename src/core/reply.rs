//! Resultado do pipeline de seleção de resposta.

use serde::Serialize;

/// Nível da cascata que produziu a resposta.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    /// Resposta fixa da tabela de regras.
    Rule,
    /// Resposta curada da base de FAQs.
    Faq,
    /// Texto amostrado do modelo generativo (ou um fallback do sanitizer).
    Generative,
}

impl ReplySource {
    pub fn label(&self) -> &'static str {
        match self {
            ReplySource::Rule => "rule",
            ReplySource::Faq => "faq",
            ReplySource::Generative => "generative",
        }
    }
}

/// Resposta final — transitória, nunca persistida como tal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MatchResult {
    pub text: String,
    pub source: ReplySource,
}

impl MatchResult {
    pub fn rule(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Rule,
        }
    }

    pub fn faq(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Faq,
        }
    }

    pub fn generative(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: ReplySource::Generative,
        }
    }
}
