//! # KnowledgeBase — Tabela de FAQs Curada
//!
//! A [`KnowledgeBase`] guarda as entradas de FAQ que o
//! [`FaqMatcher`](crate::nlu::faq::FaqMatcher) pontua contra a mensagem do
//! usuário. Cada [`FaqEntry`] carrega, além da pergunta e da resposta, o
//! conjunto de tokens normalizados da pergunta — calculado **uma única vez**
//! na carga, nunca por requisição.
//!
//! ## Formato em Disco
//!
//! ```json
//! {
//!   "version": 3,
//!   "entries": [
//!     { "question": "...", "answer": "...", "keywords": ["refund", "money back"] }
//!   ]
//! }
//! ```
//!
//! O índice de tokens não é serializado (`FaqRecord` não o possui); é
//! reconstruído em [`KnowledgeBase::from_document()`].

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::nlu::normalizer::Normalizer;

/// Registro serializável de uma FAQ — exatamente o que vem do disco.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqRecord {
    /// Pergunta canônica usada para a similaridade.
    pub question: String,
    /// Resposta oficial devolvida ao usuário.
    pub answer: String,
    /// Pistas lexicais extras (substrings) que dão bônus de score.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Documento versionado de FAQs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FaqDocument {
    /// Versão do conteúdo, registrada no log de start.
    #[serde(default)]
    pub version: u32,
    /// Entradas na ordem de avaliação (empates favorecem a primeira).
    pub entries: Vec<FaqRecord>,
}

/// Entrada imutável da KB, pronta para pontuação.
#[derive(Clone, Debug)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
    /// Palavras-chave já em lowercase.
    pub keywords: Vec<String>,
    /// Tokens normalizados da pergunta (derivados na carga).
    pub tokens: HashSet<String>,
}

/// Base de conhecimento somente-leitura.
#[derive(Clone, Debug)]
pub struct KnowledgeBase {
    version: u32,
    entries: Vec<FaqEntry>,
}

impl KnowledgeBase {
    /// Constrói a KB a partir de um documento, pré-computando os tokens.
    ///
    /// Entradas cuja pergunta normaliza para um conjunto vazio são mantidas
    /// (o matcher simplesmente as ignora) e geram um aviso no log.
    pub fn from_document(doc: FaqDocument, normalizer: &Normalizer) -> Self {
        let entries = doc
            .entries
            .into_iter()
            .map(|record| {
                let tokens = normalizer.normalize(&record.question);
                if tokens.is_empty() {
                    tracing::warn!(question = %record.question, "FAQ sem tokens após normalização");
                }
                FaqEntry {
                    keywords: record.keywords.iter().map(|k| k.to_lowercase()).collect(),
                    question: record.question,
                    answer: record.answer,
                    tokens,
                }
            })
            .collect();

        Self {
            version: doc.version,
            entries,
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
