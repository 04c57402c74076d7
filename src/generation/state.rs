//! # Estado Conversacional — Histórico Limitado por Sessão
//!
//! O modelo generativo só mantém contexto se receber os turnos anteriores.
//! [`ConversationState`] guarda esse histórico (IDs de tokens opacos) e
//! [`SessionStore`] mantém um estado por sessão, com despejo LRU.
//!
//! ## Teto do Histórico
//!
//! ```text
//! append_turn(novo):
//!   se len(histórico) > cap (256) → histórico descartado (reset completo)
//!   prompt = histórico + novo
//! ```
//!
//! Não há janela deslizante: passar do teto zera tudo. Como o histórico
//! passa a ser `prompt + continuação` depois de cada geração, ele cresce
//! monotonicamente até o reset.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Teto padrão de tokens de histórico.
pub const MAX_HISTORY_TOKENS: usize = 256;

/// Máximo padrão de sessões simultâneas em memória.
pub const MAX_SESSIONS: usize = 1024;

/// Histórico codificado de uma conversa.
#[derive(Clone, Debug)]
pub struct ConversationState {
    history: Option<Vec<u32>>,
    cap: usize,
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new(MAX_HISTORY_TOKENS)
    }
}

impl ConversationState {
    pub fn new(cap: usize) -> Self {
        Self { history: None, cap }
    }

    pub fn current(&self) -> Option<&[u32]> {
        self.history.as_deref()
    }

    pub fn len(&self) -> usize {
        self.history.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prompt para o próximo turno: histórico (se dentro do teto) + turno novo.
    ///
    /// O histórico acima do teto é descartado aqui mesmo; o estado só volta a
    /// ter histórico via [`replace()`](Self::replace) após a geração.
    pub fn append_turn(&mut self, new_turn: &[u32]) -> Vec<u32> {
        if self.len() > self.cap {
            tracing::debug!(len = self.len(), cap = self.cap, "Histórico acima do teto, resetando");
            self.history = None;
        }

        let mut combined = self.history.clone().unwrap_or_default();
        combined.extend_from_slice(new_turn);
        combined
    }

    /// Substitui o histórico pela sequência completa da última geração.
    pub fn replace(&mut self, ids: Vec<u32>) {
        self.history = Some(ids);
    }

    pub fn reset(&mut self) {
        self.history = None;
    }
}

struct SessionSlot {
    state: ConversationState,
    last_used: u64,
    /// Tick da última gravação; muda a cada `commit`.
    epoch: u64,
}

/// Versão do slot vista em [`SessionStore::checkout`].
///
/// `None` quando a sessão ainda não tinha histórico.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTicket(Option<u64>);

struct Sessions {
    slots: HashMap<String, SessionSlot>,
    tick: u64,
}

/// Estados conversacionais indexados por ID de sessão, com despejo LRU.
///
/// O lock cobre apenas operações de mapa — nunca é mantido durante uma
/// geração. Por isso a gravação é condicional: [`commit`](Self::commit)
/// descarta o estado se o slot visto no `checkout` foi resetado ou
/// regravado enquanto o modelo gerava.
pub struct SessionStore {
    inner: Mutex<Sessions>,
    max_sessions: usize,
    history_cap: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize, history_cap: usize) -> Self {
        Self {
            inner: Mutex::new(Sessions {
                slots: HashMap::new(),
                tick: 0,
            }),
            max_sessions: max_sessions.max(1),
            history_cap,
        }
    }

    /// Cópia do estado da sessão (vazio se a sessão não existe) e o ticket
    /// que autoriza gravá-lo de volta.
    pub fn checkout(&self, session_id: &str) -> (ConversationState, SessionTicket) {
        let mut inner = self.inner.lock();
        inner.tick += 1;
        let tick = inner.tick;
        match inner.slots.get_mut(session_id) {
            Some(slot) => {
                slot.last_used = tick;
                (slot.state.clone(), SessionTicket(Some(slot.epoch)))
            }
            None => (ConversationState::new(self.history_cap), SessionTicket(None)),
        }
    }

    /// Grava o estado da sessão se o slot ainda é o mesmo do `checkout`,
    /// despejando a menos usada se passar do máximo.
    ///
    /// Retorna `false` (e não grava) quando o histórico lido no checkout foi
    /// resetado ou substituído nesse meio tempo.
    pub fn commit(&self, session_id: &str, ticket: SessionTicket, state: ConversationState) -> bool {
        let mut inner = self.inner.lock();
        if let SessionTicket(Some(seen)) = ticket {
            let current = inner.slots.get(session_id).map(|slot| slot.epoch);
            if current != Some(seen) {
                tracing::debug!(session = %session_id, "Sessão mudou durante a geração, estado descartado");
                return false;
            }
        }

        inner.tick += 1;
        let tick = inner.tick;
        inner.slots.insert(
            session_id.to_string(),
            SessionSlot {
                state,
                last_used: tick,
                epoch: tick,
            },
        );

        while inner.slots.len() > self.max_sessions {
            let oldest = inner
                .slots
                .iter()
                .min_by_key(|(_, slot)| slot.last_used)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(id) => {
                    tracing::debug!(session = %id, "Sessão despejada (LRU)");
                    inner.slots.remove(&id);
                }
                None => break,
            }
        }
        true
    }

    /// Limpa o histórico da sessão. Retorna `true` se havia algo a limpar.
    pub fn reset(&self, session_id: &str) -> bool {
        self.inner.lock().slots.remove(session_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_turn_has_no_history() {
        let mut state = ConversationState::default();
        assert!(state.current().is_none());
        assert_eq!(state.append_turn(&[1, 2, 3]), vec![1, 2, 3]);
        // append_turn não grava nada sozinho
        assert!(state.is_empty());
    }

    #[test]
    fn history_is_prepended_within_cap() {
        let mut state = ConversationState::new(8);
        state.replace(vec![7, 7, 7]);
        assert_eq!(state.append_turn(&[1]), vec![7, 7, 7, 1]);
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn history_at_cap_is_kept() {
        let mut state = ConversationState::new(4);
        state.replace(vec![9; 4]);
        assert_eq!(state.append_turn(&[1]).len(), 5);
    }

    #[test]
    fn history_over_cap_is_discarded_before_append() {
        let mut state = ConversationState::default();
        state.replace(vec![5; MAX_HISTORY_TOKENS + 1]);
        assert_eq!(state.append_turn(&[1, 2]), vec![1, 2]);
        assert!(state.current().is_none());
    }

    #[test]
    fn reset_clears_history() {
        let mut state = ConversationState::default();
        state.replace(vec![1, 2]);
        state.reset();
        assert!(state.current().is_none());
    }

    #[test]
    fn sessions_are_isolated() {
        let store = SessionStore::new(10, 16);
        let (mut a, ticket) = store.checkout("a");
        a.replace(vec![1, 2, 3]);
        assert!(store.commit("a", ticket, a));

        assert_eq!(store.checkout("a").0.len(), 3);
        assert!(store.checkout("b").0.is_empty());
    }

    fn put(store: &SessionStore, id: &str, ids: Vec<u32>) {
        let (mut state, ticket) = store.checkout(id);
        state.replace(ids);
        assert!(store.commit(id, ticket, state));
    }

    #[test]
    fn least_recently_used_session_is_evicted() {
        let store = SessionStore::new(2, 16);
        put(&store, "a", vec![]);
        put(&store, "b", vec![]);
        // "a" passa a ser a mais recente
        put(&store, "a", vec![1]);
        put(&store, "c", vec![]);

        assert_eq!(store.len(), 2);
        assert_eq!(store.checkout("a").0.len(), 1);
        assert!(!store.reset("b"));
        assert!(store.reset("c"));
    }

    #[test]
    fn reset_removes_session_state() {
        let store = SessionStore::new(4, 16);
        put(&store, "s", vec![4, 4]);
        assert!(store.reset("s"));
        assert!(store.checkout("s").0.is_empty());
        assert!(!store.reset("s"));
    }

    #[test]
    fn reset_during_generation_discards_stale_history() {
        let store = SessionStore::new(4, 16);
        put(&store, "s", vec![4, 4]);

        let (mut state, ticket) = store.checkout("s");
        // regra/FAQ responde enquanto o modelo ainda gera
        assert!(store.reset("s"));
        state.replace(vec![4, 4, 1, 2]);

        assert!(!store.commit("s", ticket, state));
        assert!(store.checkout("s").0.is_empty());
    }

    #[test]
    fn concurrent_commit_keeps_the_first_writer() {
        let store = SessionStore::new(4, 16);
        put(&store, "s", vec![1]);

        let (mut first, t1) = store.checkout("s");
        let (mut second, t2) = store.checkout("s");
        first.replace(vec![1, 2]);
        second.replace(vec![1, 3]);

        assert!(store.commit("s", t1, first));
        assert!(!store.commit("s", t2, second));
        assert_eq!(store.checkout("s").0.current(), Some(&[1, 2][..]));
    }
}
