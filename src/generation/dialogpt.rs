//! # DialoGPT — Modelo de Diálogo Real
//!
//! Baixa (ou reaproveita do cache local) o checkpoint do HuggingFace Hub e
//! expõe o conjunto tokenizer + [`Gpt2`] como um [`DialogueModel`].
//!
//! ## Estratégia de Fallback
//!
//! | Componente | Preferido | Fallback |
//! |-----------|-----------|----------|
//! | Tokenizer | `tokenizer.json` | `vocab.json` + `merges.txt` (BPE byte-level) |
//! | Pesos | `model.safetensors` | `pytorch_model.bin` |
//! | Device | CPU | — |
//!
//! O token do Hub (`HUGGINGFACE_API_KEY`) é opcional: repositórios públicos
//! baixam sem ele.

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::api::sync::ApiBuilder;
use tokenizers::Tokenizer;

use super::gpt2::{self, Gpt2};
use super::sampling::TokenSampler;
use super::{DialogueModel, SamplingParams};

/// Checkpoint padrão.
pub const DEFAULT_REPO: &str = "microsoft/DialoGPT-small";

/// `<|endoftext|>` no vocabulário do GPT-2; também separa turnos no DialoGPT.
pub const EOS_TOKEN: &str = "<|endoftext|>";
const GPT2_EOS_ID: u32 = 50256;

pub struct DialoGpt {
    model: Gpt2,
    tokenizer: Tokenizer,
    eos_token_id: u32,
    seed: u64,
}

impl DialoGpt {
    /// Carrega o checkpoint `repo_id` do HuggingFace Hub.
    ///
    /// Faz I/O bloqueante (download de ~350 MB na primeira vez, leitura dos
    /// pesos) e por isso deve rodar em `spawn_blocking`.
    pub fn load(repo_id: &str, hf_token: Option<String>) -> Result<Self> {
        let device = Device::Cpu;

        tracing::info!("Loading {} from HuggingFace Hub...", repo_id);
        let mut builder = ApiBuilder::new().with_progress(false);
        if hf_token.is_some() {
            builder = builder.with_token(hf_token);
        }
        let api = builder.build().context("Failed to create HF Hub API")?;
        let repo = api.model(repo_id.to_string());

        // ─── Tokenizer ────────────────────────────────────────────
        let tokenizer = match repo.get("tokenizer.json") {
            Ok(tokenizer_path) => {
                tracing::info!("Loading tokenizer from tokenizer.json...");
                Tokenizer::from_file(&tokenizer_path).map_err(|e| anyhow::anyhow!("{}", e))?
            }
            Err(_) => {
                tracing::info!("tokenizer.json not available, building BPE from vocab.json + merges.txt...");
                let vocab_path = repo.get("vocab.json").context("Failed to download vocab.json")?;
                let merges_path = repo.get("merges.txt").context("Failed to download merges.txt")?;
                Self::build_bpe_tokenizer(
                    vocab_path.to_str().context("Invalid vocab.json path encoding")?,
                    merges_path.to_str().context("Invalid merges.txt path encoding")?,
                )?
            }
        };
        let eos_token_id = tokenizer.token_to_id(EOS_TOKEN).unwrap_or(GPT2_EOS_ID);

        // ─── Config ───────────────────────────────────────────────
        let config_path = repo.get("config.json").context("Failed to download config.json")?;
        let config_str = std::fs::read_to_string(&config_path)?;
        let config: gpt2::Config =
            serde_json::from_str(&config_str).context("Failed to parse model config")?;

        // ─── Pesos ────────────────────────────────────────────────
        let vb = match repo.get("model.safetensors") {
            Ok(safetensors_path) => {
                tracing::info!("Loading from model.safetensors...");
                unsafe {
                    VarBuilder::from_mmaped_safetensors(&[safetensors_path], DType::F32, &device)
                        .context("Failed to load safetensors weights")?
                }
            }
            Err(_) => {
                tracing::info!("Falling back to pytorch_model.bin...");
                let weights_path = repo
                    .get("pytorch_model.bin")
                    .context("Failed to download pytorch_model.bin")?;
                VarBuilder::from_pth(&weights_path, DType::F32, &device)
                    .context("Failed to load pytorch weights")?
            }
        };
        // Checkpoints de GPT2LMHeadModel prefixam tudo com "transformer."
        let vb = if vb.contains_tensor("transformer.wte.weight") {
            vb.pp("transformer")
        } else {
            vb
        };

        let model = Gpt2::load(vb, &config).context("Failed to load GPT-2 weights")?;

        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(299_792_458);

        tracing::info!(
            layers = config.n_layer,
            vocab = config.vocab_size,
            eos = eos_token_id,
            "Modelo de diálogo carregado em {:?}",
            device
        );
        Ok(Self {
            model,
            tokenizer,
            eos_token_id,
            seed,
        })
    }

    /// Tokenizer BPE byte-level do GPT-2 a partir de `vocab.json` + `merges.txt`.
    fn build_bpe_tokenizer(vocab_path: &str, merges_path: &str) -> Result<Tokenizer> {
        use tokenizers::models::bpe::BPE;
        use tokenizers::pre_tokenizers::byte_level::ByteLevel;
        use tokenizers::AddedToken;

        let bpe = BPE::from_file(vocab_path, merges_path)
            .build()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let mut tokenizer = Tokenizer::new(bpe);
        tokenizer.with_pre_tokenizer(Some(ByteLevel::default().add_prefix_space(false)));
        tokenizer.with_decoder(Some(ByteLevel::default()));
        tokenizer.add_special_tokens(&[AddedToken::from(EOS_TOKEN, true)]);

        Ok(tokenizer)
    }
}

impl DialogueModel for DialoGpt {
    fn encode_turn(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenizer error: {}", e))?;
        let mut ids = encoding.get_ids().to_vec();
        ids.push(self.eos_token_id);
        Ok(ids)
    }

    fn generate(&mut self, prompt: &[u32], params: &SamplingParams) -> Result<Vec<u32>> {
        self.seed = self.seed.wrapping_add(1);
        let mut sampler = TokenSampler::new(self.seed, params);
        let started = std::time::Instant::now();

        let ids = self
            .model
            .generate(prompt, params.max_new_tokens, &mut sampler, self.eos_token_id)?;

        tracing::debug!(
            prompt = prompt.len(),
            new_tokens = ids.len() - prompt.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Geração concluída"
        );
        Ok(ids)
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| anyhow::anyhow!("Tokenizer error: {}", e))
    }
}
