//! # Módulo Generation — Terceiro Nível da Cascata
//!
//! Quando nem as regras nem as FAQs respondem, a mensagem vai para um
//! modelo de diálogo pré-treinado (DialoGPT). Este módulo isola tudo o que
//! envolve o modelo atrás do trait [`DialogueModel`], de modo que o
//! pipeline nunca dependa de candle/tokenizers diretamente — e os testes
//! possam trocar o modelo por um roteiro.
//!
//! ## Fluxo de Uma Geração
//!
//! ```text
//! texto ─► encode_turn (texto + <|endoftext|>)
//!            │
//!            ▼
//!   ConversationState::append_turn   (histórico > 256 tokens → descartado)
//!            │  prompt = histórico + turno
//!            ▼
//!   DialogueModel::generate          (top-k 30, top-p 0.85, T=0.7,
//!            │                        no-repeat 3-gram, penalty 1.3, ≤ 40 tokens)
//!            ▼
//!   estado ← sequência completa; decode só do sufixo novo
//!            │
//!            ▼
//!   sanitizer::sanitize              (lixo → fallback, 1ª sentença, tamanho mínimo)
//! ```
//!
//! ## Sub-módulos
//!
//! | Módulo | Responsabilidade |
//! |--------|-----------------|
//! | [`state`] | Histórico por sessão com teto e despejo LRU |
//! | [`responder`] | Um turno generativo sobre um `DialogueModel` |
//! | [`handle`] | Inicialização preguiçosa e acesso serializado ao modelo |
//! | [`dialogpt`] | Implementação real: HF Hub + tokenizer + GPT-2 |
//! | [`gpt2`] | Rede GPT-2 em candle, com KV cache |
//! | [`sampling`] | Penalidades de repetição + amostragem top-k/top-p |
//! | [`sanitizer`] | Limpeza do texto gerado |

pub mod dialogpt;
pub mod gpt2;
pub mod handle;
pub mod responder;
pub mod sampling;
pub mod sanitizer;
pub mod state;

use anyhow::Result;

pub use handle::ModelHandle;
pub use responder::GenerativeResponder;
pub use state::{ConversationState, SessionStore};

/// Parâmetros de amostragem de uma geração.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplingParams {
    pub max_new_tokens: usize,
    pub top_k: usize,
    pub top_p: f64,
    pub temperature: f64,
    /// Tamanho do n-grama que não pode se repetir (0 desliga).
    pub no_repeat_ngram_size: usize,
    /// Penalidade estilo CTRL aplicada a todo token já visto (1.0 desliga).
    pub repetition_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 40,
            top_k: 30,
            top_p: 0.85,
            temperature: 0.7,
            no_repeat_ngram_size: 3,
            repetition_penalty: 1.3,
        }
    }
}

/// Modelo de diálogo visto como caixa-preta sequência → sequência.
///
/// Implementações não precisam ser reentrantes: o [`ModelHandle`] garante
/// uma única geração em andamento por vez.
pub trait DialogueModel: Send {
    /// Codifica um turno do usuário, já com o marcador de fim de turno.
    fn encode_turn(&self, text: &str) -> Result<Vec<u32>>;

    /// Amostra uma continuação; retorna `prompt + continuação`.
    fn generate(&mut self, prompt: &[u32], params: &SamplingParams) -> Result<Vec<u32>>;

    /// Decodifica tokens em texto, omitindo tokens especiais.
    fn decode(&self, ids: &[u32]) -> Result<String>;
}
