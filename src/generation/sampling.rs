//! # Sampling — Do Vetor de Logits ao Próximo Token
//!
//! Cada passo da geração recebe os logits da última posição e escolhe um
//! token. Antes da amostragem, duas restrições anti-repetição:
//!
//! ```text
//! logits ─► repetition penalty (1.3, sobre todo token já visto)
//!        ─► no-repeat n-gram   (3-gramas já vistos → −∞)
//!        ─► temperatura 0.7 → top-k 30 → top-p 0.85 → amostra
//! ```
//!
//! A amostragem em si é do `candle_transformers::generation::LogitsProcessor`;
//! aqui fica só a parte que ele não cobre (n-gramas banidos).

use candle_core::{Result, Tensor};
use candle_transformers::generation::{LogitsProcessor, Sampling};
use candle_transformers::utils::apply_repeat_penalty;

use super::SamplingParams;

/// Tokens que completariam um n-grama já presente em `tokens`.
///
/// O prefixo é o último `n - 1` tokens da sequência; todo n-grama anterior
/// com esse mesmo prefixo proíbe seu último token.
pub fn banned_ngram_tokens(tokens: &[u32], n: usize) -> Vec<u32> {
    if n == 0 || tokens.len() < n {
        return Vec::new();
    }

    let prefix = &tokens[tokens.len() - (n - 1)..];
    let mut banned: Vec<u32> = tokens
        .windows(n)
        .filter(|w| &w[..n - 1] == prefix)
        .map(|w| w[n - 1])
        .collect();
    banned.sort_unstable();
    banned.dedup();
    banned
}

/// Amostrador com estado (RNG) de uma geração.
pub struct TokenSampler {
    processor: LogitsProcessor,
    repetition_penalty: f32,
    no_repeat_ngram_size: usize,
}

impl TokenSampler {
    pub fn new(seed: u64, params: &SamplingParams) -> Self {
        let sampling = Sampling::TopKThenTopP {
            k: params.top_k,
            p: params.top_p,
            temperature: params.temperature,
        };
        Self {
            processor: LogitsProcessor::from_sampling(seed, sampling),
            repetition_penalty: params.repetition_penalty,
            no_repeat_ngram_size: params.no_repeat_ngram_size,
        }
    }

    /// Escolhe o próximo token dados os logits `[vocab]` e a sequência até aqui.
    pub fn sample(&mut self, logits: &Tensor, context: &[u32]) -> Result<u32> {
        let logits = if (self.repetition_penalty - 1.0).abs() > f32::EPSILON {
            apply_repeat_penalty(logits, self.repetition_penalty, context)?
        } else {
            logits.clone()
        };

        let banned = banned_ngram_tokens(context, self.no_repeat_ngram_size);
        let logits = if banned.is_empty() {
            logits
        } else {
            let mut values = logits.to_vec1::<f32>()?;
            for id in banned {
                if let Some(v) = values.get_mut(id as usize) {
                    *v = f32::NEG_INFINITY;
                }
            }
            let len = values.len();
            Tensor::from_vec(values, len, logits.device())?
        };

        self.processor.sample(&logits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    #[test]
    fn no_bans_for_short_sequences() {
        assert!(banned_ngram_tokens(&[1, 2], 3).is_empty());
        assert!(banned_ngram_tokens(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn bans_token_completing_seen_trigram() {
        // "1 2 3 ... 1 2" → 3 completaria "1 2 3" de novo
        assert_eq!(banned_ngram_tokens(&[1, 2, 3, 9, 1, 2], 3), vec![3]);
    }

    #[test]
    fn collects_every_continuation_of_the_prefix() {
        assert_eq!(banned_ngram_tokens(&[5, 1, 5, 2, 5, 1, 5], 2), vec![1, 2]);
    }

    #[test]
    fn unseen_prefix_bans_nothing() {
        assert!(banned_ngram_tokens(&[1, 2, 3, 4, 5], 3).is_empty());
    }

    #[test]
    fn banned_token_is_never_sampled() {
        let params = SamplingParams {
            top_k: 1,
            repetition_penalty: 1.0,
            no_repeat_ngram_size: 2,
            ..SamplingParams::default()
        };
        // token 0 domina, mas "7 0" já apareceu e o contexto termina em 7
        let logits = Tensor::new(&[10.0f32, 1.0, -5.0, -5.0], &Device::Cpu).unwrap();
        let context = [7, 0, 7];
        for seed in 0..20 {
            let mut sampler = TokenSampler::new(seed, &params);
            assert_eq!(sampler.sample(&logits, &context).unwrap(), 1);
        }
    }

    #[test]
    fn dominant_token_wins_with_top_k_one() {
        let params = SamplingParams {
            top_k: 1,
            ..SamplingParams::default()
        };
        let logits = Tensor::new(&[0.0f32, 0.5, 9.0, 0.1], &Device::Cpu).unwrap();
        let mut sampler = TokenSampler::new(42, &params);
        assert_eq!(sampler.sample(&logits, &[]).unwrap(), 2);
    }
}
