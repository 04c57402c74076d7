//! Um turno generativo: codifica, junta ao histórico, gera e decodifica o
//! sufixo novo. A sanitização fica a cargo de quem chama.

use anyhow::{ensure, Result};

use super::state::ConversationState;
use super::{DialogueModel, SamplingParams};

#[derive(Clone, Debug, Default)]
pub struct GenerativeResponder {
    params: SamplingParams,
}

impl GenerativeResponder {
    pub fn new(params: SamplingParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SamplingParams {
        &self.params
    }

    /// Gera a resposta crua para `raw` e atualiza `state`.
    ///
    /// Em caso de erro o histórico não é gravado: o estado só muda por conta
    /// do descarte de histórico acima do teto, que acontece antes da geração.
    pub fn generate(
        &self,
        model: &mut dyn DialogueModel,
        raw: &str,
        state: &mut ConversationState,
    ) -> Result<String> {
        let new_turn = model.encode_turn(raw)?;
        let prompt = state.append_turn(&new_turn);
        let prompt_len = prompt.len();

        let full = model.generate(&prompt, &self.params)?;
        ensure!(
            full.len() >= prompt_len && full[..prompt_len] == prompt[..],
            "model output does not extend the prompt"
        );

        let reply = model.decode(&full[prompt_len..])?;
        state.replace(full);
        Ok(reply)
    }
}
