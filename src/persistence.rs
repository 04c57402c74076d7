//! # Persistência — FAQs em Disco e Log de Conversas
//!
//! Duas responsabilidades independentes:
//!
//! | Item | Arquivo padrão | Direção |
//! |------|----------------|---------|
//! | Tabela de FAQs | `data/faq.json` | leitura, uma vez no start |
//! | Log de conversas | `data/chats.jsonl` | escrita, uma linha por turno |
//!
//! ## Formato da Tabela de FAQs
//!
//! ```text
//! { "version": 1,
//!   "entries": [ { "question": "...", "answer": "...", "keywords": ["..."] } ] }
//! ```
//!
//! Arquivo ausente → tabela embutida. Arquivo corrompido → erro (quem chama
//! decide cair para a embutida).
//!
//! ## Log de Conversas
//!
//! As escritas vão por um canal para uma task dedicada, então o handler
//! nunca espera disco. Falhas de escrita são logadas e ignoradas.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::faq_data::builtin_document;
use crate::core::{FaqDocument, MatchResult, ReplySource};

/// Carrega a tabela de FAQs, ou a embutida se o arquivo não existir.
///
/// # Erros
///
/// Retorna erro se o arquivo existir mas não puder ser lido ou não for um
/// documento válido.
pub fn load_faq(path: &Path) -> Result<FaqDocument> {
    if !path.exists() {
        tracing::info!("Nenhum {} encontrado, usando FAQs embutidas", path.display());
        return Ok(builtin_document());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Falha ao ler {}", path.display()))?;
    let doc: FaqDocument = serde_json::from_str(&json)
        .with_context(|| format!("Falha ao desserializar {}", path.display()))?;
    tracing::info!(entries = doc.entries.len(), version = doc.version, "FAQs carregadas de {}", path.display());
    Ok(doc)
}

/// Uma linha do log de conversas.
#[derive(Clone, Debug, Serialize)]
pub struct ChatRecord {
    pub ts: DateTime<Utc>,
    pub session_id: String,
    pub user_msg: String,
    pub bot_msg: String,
    pub source: ReplySource,
}

/// Ponta de envio do log de conversas. Clonável; barato.
#[derive(Clone)]
pub struct ChatLog {
    tx: mpsc::UnboundedSender<ChatRecord>,
}

impl ChatLog {
    /// Inicia a task de escrita em `path`.
    ///
    /// A task termina quando todas as cópias de `ChatLog` forem descartadas.
    pub fn spawn(path: PathBuf) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_writer(path, rx));
        (Self { tx }, handle)
    }

    /// Registra um turno. Nunca bloqueia nem falha.
    pub fn record(&self, session_id: &str, user_msg: &str, reply: &MatchResult) {
        let record = ChatRecord {
            ts: Utc::now(),
            session_id: session_id.to_string(),
            user_msg: user_msg.to_string(),
            bot_msg: reply.text.clone(),
            source: reply.source,
        };
        if self.tx.send(record).is_err() {
            tracing::warn!("Log de conversas encerrado, turno descartado");
        }
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<ChatRecord>) {
    while let Some(record) = rx.recv().await {
        if let Err(e) = append_record(&path, &record).await {
            tracing::error!(error = %format!("{e:#}"), "Falha ao gravar log de conversas");
        }
    }
}

async fn append_record(path: &Path, record: &ChatRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Falha ao criar {}", parent.display()))?;
    }
    let mut line = serde_json::to_string(record).context("Falha ao serializar turno")?;
    line.push('\n');

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Falha ao abrir {}", path.display()))?;
    file.write_all(line.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let doc = load_faq(&dir.path().join("nope.json")).unwrap();
        assert_eq!(doc.entries.len(), builtin_document().entries.len());
    }

    #[test]
    fn reads_versioned_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(
            &path,
            r#"{"version": 3, "entries": [{"question": "Do you ship abroad?", "answer": "Yes."}]}"#,
        )
        .unwrap();

        let doc = load_faq(&path).unwrap();
        assert_eq!(doc.version, 3);
        assert_eq!(doc.entries[0].answer, "Yes.");
        assert!(doc.entries[0].keywords.is_empty());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("faq.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_faq(&path).is_err());
    }

    #[tokio::test]
    async fn chat_log_appends_one_json_line_per_turn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("chats.jsonl");

        let (log, writer) = ChatLog::spawn(path.clone());
        log.record("s1", "hello", &MatchResult::rule("Hello! How can I help you today?"));
        log.record("s1", "what's new", &MatchResult::generative("Not much."));
        drop(log);
        writer.await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["session_id"], "s1");
        assert_eq!(lines[0]["source"], "rule");
        assert_eq!(lines[1]["bot_msg"], "Not much.");
        assert_eq!(lines[1]["source"], "generative");
        assert!(lines[1]["ts"].is_string());
    }
}
