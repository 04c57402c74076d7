//! # GPT-2 — A Rede por Trás do DialoGPT
//!
//! DialoGPT é um GPT-2 treinado em diálogos: mesma arquitetura, mesmos nomes
//! de tensores. Esta é a rede em candle, com KV cache para que cada passo
//! de geração processe só o token novo.
//!
//! ```text
//! ids ─► wte + wpe ─► [Block × n_layer] ─► ln_f ─► (· wteᵀ) ─► logits
//!
//! Block:  x + Attn(LN₁(x))  →  x + MLP(LN₂(x))
//! ```
//!
//! ## Convenções do checkpoint
//!
//! | Detalhe | Tratamento |
//! |---------|-----------|
//! | Camadas `Conv1D` (peso `[in, out]`) | `x · W + b`, sem transpor |
//! | `lm_head` | amarrado a `wte` (pesos compartilhados) |
//! | Prefixo `transformer.` | detectado no loader |
//! | Ativação | GELU aproximada por tanh (`gelu_new`) |

use candle_core::{Device, IndexOp, Module, Result, Tensor, D};
use candle_nn::{Embedding, LayerNorm, VarBuilder};
use serde::Deserialize;

use super::sampling::TokenSampler;

fn default_layer_norm_epsilon() -> f64 {
    1e-5
}

/// Hiperparâmetros lidos do `config.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub vocab_size: usize,
    pub n_positions: usize,
    pub n_embd: usize,
    pub n_layer: usize,
    pub n_head: usize,
    #[serde(default)]
    pub n_inner: Option<usize>,
    #[serde(default = "default_layer_norm_epsilon")]
    pub layer_norm_epsilon: f64,
}

/// "Conv1D" do GPT-2: uma projeção linear com peso armazenado como `[in, out]`.
struct Conv1D {
    weight: Tensor,
    bias: Tensor,
}

impl Conv1D {
    fn load(n_in: usize, n_out: usize, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            weight: vb.get((n_in, n_out), "weight")?,
            bias: vb.get(n_out, "bias")?,
        })
    }
}

impl Module for Conv1D {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        xs.broadcast_matmul(&self.weight)?.broadcast_add(&self.bias)
    }
}

struct Attention {
    c_attn: Conv1D,
    c_proj: Conv1D,
    n_head: usize,
    head_dim: usize,
    kv_cache: Option<(Tensor, Tensor)>,
}

impl Attention {
    fn load(cfg: &Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            c_attn: Conv1D::load(cfg.n_embd, 3 * cfg.n_embd, vb.pp("c_attn"))?,
            c_proj: Conv1D::load(cfg.n_embd, cfg.n_embd, vb.pp("c_proj"))?,
            n_head: cfg.n_head,
            head_dim: cfg.n_embd / cfg.n_head,
            kv_cache: None,
        })
    }

    fn forward(&mut self, xs: &Tensor, mask: Option<&Tensor>) -> Result<Tensor> {
        let (b, t, c) = xs.dims3()?;
        let qkv = self.c_attn.forward(xs)?;

        let split_heads = |x: Tensor| -> Result<Tensor> {
            x.contiguous()?
                .reshape((b, t, self.n_head, self.head_dim))?
                .transpose(1, 2)?
                .contiguous()
        };
        let q = split_heads(qkv.narrow(D::Minus1, 0, c)?)?;
        let k = split_heads(qkv.narrow(D::Minus1, c, c)?)?;
        let v = split_heads(qkv.narrow(D::Minus1, 2 * c, c)?)?;

        let (k, v) = match &self.kv_cache {
            Some((past_k, past_v)) => (
                Tensor::cat(&[past_k, &k], 2)?,
                Tensor::cat(&[past_v, &v], 2)?,
            ),
            None => (k, v),
        };
        self.kv_cache = Some((k.clone(), v.clone()));

        let scale = (self.head_dim as f64).sqrt();
        let att = (q.matmul(&k.t()?.contiguous()?)? / scale)?;
        let att = match mask {
            Some(mask) => att.broadcast_add(mask)?,
            None => att,
        };
        let att = candle_nn::ops::softmax_last_dim(&att)?;

        let ys = att.matmul(&v)?.transpose(1, 2)?.reshape((b, t, c))?;
        self.c_proj.forward(&ys)
    }
}

struct Mlp {
    c_fc: Conv1D,
    c_proj: Conv1D,
}

impl Mlp {
    fn load(cfg: &Config, vb: VarBuilder) -> Result<Self> {
        let inner = cfg.n_inner.unwrap_or(4 * cfg.n_embd);
        Ok(Self {
            c_fc: Conv1D::load(cfg.n_embd, inner, vb.pp("c_fc"))?,
            c_proj: Conv1D::load(inner, cfg.n_embd, vb.pp("c_proj"))?,
        })
    }
}

impl Module for Mlp {
    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        self.c_proj.forward(&self.c_fc.forward(xs)?.gelu()?)
    }
}

struct Block {
    ln_1: LayerNorm,
    attn: Attention,
    ln_2: LayerNorm,
    mlp: Mlp,
}

impl Block {
    fn load(cfg: &Config, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            ln_1: candle_nn::layer_norm(cfg.n_embd, cfg.layer_norm_epsilon, vb.pp("ln_1"))?,
            attn: Attention::load(cfg, vb.pp("attn"))?,
            ln_2: candle_nn::layer_norm(cfg.n_embd, cfg.layer_norm_epsilon, vb.pp("ln_2"))?,
            mlp: Mlp::load(cfg, vb.pp("mlp"))?,
        })
    }

    fn forward(&mut self, xs: &Tensor, mask: Option<&Tensor>) -> Result<Tensor> {
        let xs = (xs + self.attn.forward(&self.ln_1.forward(xs)?, mask)?)?;
        &xs + self.mlp.forward(&self.ln_2.forward(&xs)?)?
    }
}

/// Máscara causal `[t, past + t]`: posição `i` enxerga até `past + i`.
fn causal_mask(t: usize, past: usize, device: &Device) -> Result<Tensor> {
    let total = past + t;
    let mask: Vec<f32> = (0..t)
        .flat_map(|i| {
            (0..total).map(move |j| if j > past + i { f32::NEG_INFINITY } else { 0.0 })
        })
        .collect();
    Tensor::from_slice(&mask, (t, total), device)
}

/// GPT-2 com cabeça de linguagem amarrada aos embeddings.
pub struct Gpt2 {
    wte: Embedding,
    wpe: Embedding,
    blocks: Vec<Block>,
    ln_f: LayerNorm,
    config: Config,
    device: Device,
}

impl Gpt2 {
    pub fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let blocks = (0..config.n_layer)
            .map(|i| Block::load(config, vb.pp(format!("h.{i}"))))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            wte: candle_nn::embedding(config.vocab_size, config.n_embd, vb.pp("wte"))?,
            wpe: candle_nn::embedding(config.n_positions, config.n_embd, vb.pp("wpe"))?,
            blocks,
            ln_f: candle_nn::layer_norm(config.n_embd, config.layer_norm_epsilon, vb.pp("ln_f"))?,
            config: config.clone(),
            device: vb.device().clone(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn clear_cache(&mut self) {
        for block in &mut self.blocks {
            block.attn.kv_cache = None;
        }
    }

    /// Forward de `input_ids` (`[1, t]`) a partir da posição `past`.
    ///
    /// Retorna apenas os logits da última posição (`[vocab]`), que é tudo o
    /// que a geração autoregressiva consome.
    pub fn forward(&mut self, input_ids: &Tensor, past: usize) -> Result<Tensor> {
        let (_b, t) = input_ids.dims2()?;
        let positions = Tensor::arange(past as u32, (past + t) as u32, &self.device)?.unsqueeze(0)?;

        let mut hidden = self
            .wte
            .forward(input_ids)?
            .broadcast_add(&self.wpe.forward(&positions)?)?;

        let mask = if t > 1 {
            Some(causal_mask(t, past, &self.device)?)
        } else {
            None
        };
        for block in &mut self.blocks {
            hidden = block.forward(&hidden, mask.as_ref())?;
        }

        let last = self.ln_f.forward(&hidden)?.i((.., t - 1, ..))?;
        last.matmul(&self.wte.embeddings().t()?)?.squeeze(0)
    }

    /// Geração autoregressiva: retorna `prompt + continuação`.
    ///
    /// Para no token `eos` (incluído na saída, como o DialoGPT espera no
    /// histórico) ou após `max_new_tokens`.
    pub fn generate(
        &mut self,
        prompt: &[u32],
        max_new_tokens: usize,
        sampler: &mut TokenSampler,
        eos_token_id: u32,
    ) -> Result<Vec<u32>> {
        if prompt.is_empty() {
            candle_core::bail!("empty prompt");
        }
        if prompt.len() + max_new_tokens > self.config.n_positions {
            candle_core::bail!(
                "prompt of {} tokens exceeds the context window of {}",
                prompt.len(),
                self.config.n_positions
            );
        }

        self.clear_cache();
        let mut tokens = prompt.to_vec();
        let mut input = prompt.to_vec();
        let mut past = 0;

        for _ in 0..max_new_tokens {
            let ids = Tensor::new(input.as_slice(), &self.device)?.unsqueeze(0)?;
            let logits = self.forward(&ids, past)?;
            past += input.len();

            let next = sampler.sample(&logits, &tokens)?;
            tokens.push(next);
            if next == eos_token_id {
                break;
            }
            input = vec![next];
        }

        Ok(tokens)
    }
}
