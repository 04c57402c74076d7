//! # Configuração — Variáveis de Ambiente
//!
//! Lida uma vez no start. Um `.env` na raiz é carregado antes (via
//! `dotenvy`), sem sobrescrever o que já está no ambiente.
//!
//! | Variável | Padrão |
//! |----------|--------|
//! | `CHAT_BIND_ADDR` | `127.0.0.1:5000` |
//! | `CHAT_MODEL_REPO` | `microsoft/DialoGPT-small` |
//! | `HUGGINGFACE_API_KEY` | — (opcional) |
//! | `CHAT_FAQ_PATH` | `data/faq.json` |
//! | `CHAT_LOG_PATH` | `data/chats.jsonl` |
//! | `CHAT_GENERATION_TIMEOUT_SECS` | `30` |
//! | `CHAT_MAX_SESSIONS` | `1024` |
//! | `CHAT_HISTORY_CAP` | `256` |
//! | `CHAT_PRELOAD_MODEL` | `false` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::generation::dialogpt::DEFAULT_REPO;
use crate::generation::state::{MAX_HISTORY_TOKENS, MAX_SESSIONS};
use crate::orchestrator::DEFAULT_GENERATION_TIMEOUT;

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub model_repo: String,
    pub hf_token: Option<String>,
    pub faq_path: PathBuf,
    pub chat_log_path: PathBuf,
    pub generation_timeout: Duration,
    pub max_sessions: usize,
    pub history_cap: usize,
    pub preload_model: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            model_repo: DEFAULT_REPO.to_string(),
            hf_token: None,
            faq_path: PathBuf::from("data/faq.json"),
            chat_log_path: PathBuf::from("data/chats.jsonl"),
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
            max_sessions: MAX_SESSIONS,
            history_cap: MAX_HISTORY_TOKENS,
            preload_model: false,
        }
    }
}

impl Settings {
    /// Lê `.env` (se houver) e o ambiente do processo.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta a configuração a partir de uma função de consulta.
    ///
    /// Valores vazios contam como ausentes.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let hf_token = get("HUGGINGFACE_API_KEY");
        if hf_token.is_none() {
            tracing::warn!("HUGGINGFACE_API_KEY não definido; downloads do Hub serão anônimos");
        }

        Ok(Self {
            bind_addr: parse_or(get("CHAT_BIND_ADDR"), "CHAT_BIND_ADDR", defaults.bind_addr)?,
            model_repo: get("CHAT_MODEL_REPO").unwrap_or(defaults.model_repo),
            hf_token,
            faq_path: get("CHAT_FAQ_PATH").map(PathBuf::from).unwrap_or(defaults.faq_path),
            chat_log_path: get("CHAT_LOG_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.chat_log_path),
            generation_timeout: parse_or(
                get("CHAT_GENERATION_TIMEOUT_SECS"),
                "CHAT_GENERATION_TIMEOUT_SECS",
                defaults.generation_timeout.as_secs(),
            )
            .map(Duration::from_secs)?,
            max_sessions: parse_or(get("CHAT_MAX_SESSIONS"), "CHAT_MAX_SESSIONS", defaults.max_sessions)?,
            history_cap: parse_or(get("CHAT_HISTORY_CAP"), "CHAT_HISTORY_CAP", defaults.history_cap)?,
            preload_model: parse_or(get("CHAT_PRELOAD_MODEL"), "CHAT_PRELOAD_MODEL", defaults.preload_model)?,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Valor inválido para {key}: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.bind_addr.to_string(), "127.0.0.1:5000");
        assert_eq!(s.model_repo, "microsoft/DialoGPT-small");
        assert!(s.hf_token.is_none());
        assert_eq!(s.generation_timeout, Duration::from_secs(30));
        assert_eq!(s.history_cap, 256);
        assert!(!s.preload_model);
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("CHAT_BIND_ADDR", "0.0.0.0:8080"),
            ("HUGGINGFACE_API_KEY", "hf_abc"),
            ("CHAT_GENERATION_TIMEOUT_SECS", "5"),
            ("CHAT_MAX_SESSIONS", "10"),
            ("CHAT_PRELOAD_MODEL", "true"),
            ("CHAT_FAQ_PATH", "/etc/faq.json"),
        ])
        .unwrap();
        assert_eq!(s.bind_addr.port(), 8080);
        assert_eq!(s.hf_token.as_deref(), Some("hf_abc"));
        assert_eq!(s.generation_timeout, Duration::from_secs(5));
        assert_eq!(s.max_sessions, 10);
        assert!(s.preload_model);
        assert_eq!(s.faq_path, PathBuf::from("/etc/faq.json"));
    }

    #[test]
    fn blank_values_count_as_unset() {
        let s = settings(&[("HUGGINGFACE_API_KEY", "  "), ("CHAT_MODEL_REPO", "")]).unwrap();
        assert!(s.hf_token.is_none());
        assert_eq!(s.model_repo, DEFAULT_REPO);
    }

    #[test]
    fn invalid_number_is_reported_with_key() {
        let err = settings(&[("CHAT_MAX_SESSIONS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("CHAT_MAX_SESSIONS"));
    }
}
