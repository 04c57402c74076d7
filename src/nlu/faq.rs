//! # FAQ Matcher — Segundo Nível da Cascata
//!
//! Pontua a mensagem contra cada entrada da [`KnowledgeBase`] e devolve a
//! resposta curada da melhor entrada, se ela passar do limiar.
//!
//! ## Score
//!
//! ```text
//! score = |U ∩ E| / |U ∪ E|            (Jaccard dos tokens normalizados)
//!       + 0.15 se alguma keyword da entrada é substring da mensagem (lowercase)
//! score = min(score, 1.0)
//! ```
//!
//! O teto em 1.0 mantém o score no intervalo `[0, 1]`; duas entradas que
//! saturam empatam, e o empate favorece a primeira (comparação estrita `>`).
//!
//! | Situação | Resultado |
//! |----------|-----------|
//! | Mensagem sem tokens ("123", "the of a") | `None` imediato |
//! | Melhor score < 0.35 | `None` (segue para o modelo generativo) |
//! | Melhor score ≥ 0.35 | [`FaqHit`] com a resposta |

use std::collections::HashSet;
use std::sync::Arc;

use super::normalizer::Normalizer;
use crate::core::KnowledgeBase;

/// Score mínimo para aceitar uma FAQ.
pub const FAQ_THRESHOLD: f64 = 0.35;

/// Bônus quando uma keyword aparece literalmente na mensagem.
pub const KEYWORD_BONUS: f64 = 0.15;

/// Melhor entrada encontrada acima do limiar.
#[derive(Clone, Debug, PartialEq)]
pub struct FaqHit {
    /// Índice da entrada na KB.
    pub index: usize,
    pub score: f64,
    pub answer: String,
}

/// Similaridade de Jaccard entre dois conjuntos. Dois conjuntos vazios → 0.0.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Casador de FAQs sobre uma KB imutável.
pub struct FaqMatcher {
    kb: Arc<KnowledgeBase>,
    normalizer: Arc<Normalizer>,
    threshold: f64,
}

impl FaqMatcher {
    pub fn new(kb: Arc<KnowledgeBase>, normalizer: Arc<Normalizer>) -> Self {
        Self {
            kb,
            normalizer,
            threshold: FAQ_THRESHOLD,
        }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Melhor FAQ para a mensagem, se `score ≥ 0.35`.
    pub fn match_faq(&self, raw: &str) -> Option<FaqHit> {
        let user_tokens = self.normalizer.normalize(raw);
        if user_tokens.is_empty() {
            return None;
        }

        let user_lower = raw.to_lowercase();
        let mut best: Option<(usize, f64)> = None;

        for (index, entry) in self.kb.entries().iter().enumerate() {
            if entry.tokens.is_empty() {
                continue;
            }

            let mut score = jaccard(&user_tokens, &entry.tokens);
            if entry.keywords.iter().any(|k| user_lower.contains(k.as_str())) {
                score += KEYWORD_BONUS;
            }
            let score = score.min(1.0);

            // `>` estrito: em empate fica a primeira entrada vista
            if best.map_or(score > 0.0, |(_, s)| score > s) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        if score < self.threshold {
            tracing::debug!(score = %format!("{:.2}", score), "FAQ abaixo do limiar");
            return None;
        }

        tracing::info!(index, score = %format!("{:.2}", score), "FAQ selecionada");
        Some(FaqHit {
            index,
            score,
            answer: self.kb.entries()[index].answer.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::faq_data::builtin_document;
    use crate::core::{FaqDocument, FaqRecord};

    fn matcher() -> FaqMatcher {
        let normalizer = Arc::new(Normalizer::new());
        let kb = Arc::new(KnowledgeBase::from_document(builtin_document(), &normalizer));
        FaqMatcher::new(kb, normalizer)
    }

    fn tokens(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn services_question_selects_services_entry() {
        let m = matcher();
        let hit = m.match_faq("What services does your company provide?").unwrap();
        assert_eq!(hit.index, 0);
        assert!(hit.score >= FAQ_THRESHOLD);
        assert!(hit.answer.starts_with("We deliver 24x7"));
    }

    #[test]
    fn empty_token_set_never_matches() {
        let m = matcher();
        assert!(m.match_faq("123").is_none());
        assert!(m.match_faq("the of a").is_none());
        assert!(m.match_faq("").is_none());
    }

    #[test]
    fn keyword_bonus_lifts_partial_overlap() {
        let m = matcher();
        // Jaccard {refund, pleas} × {refund, polici} = 1/3 < 0.35; "refund" dá o bônus
        let hit = m.match_faq("refund please").unwrap();
        assert!(hit.answer.contains("refund"));
        assert!((hit.score - (1.0 / 3.0 + KEYWORD_BONUS)).abs() < 1e-9);
    }

    #[test]
    fn unrelated_text_stays_below_threshold() {
        let m = matcher();
        assert!(m.match_faq("purple elephants dance quietly").is_none());
    }

    #[test]
    fn jaccard_is_symmetric_and_bounded() {
        let pairs = [
            (tokens(&["a", "b", "c"]), tokens(&["b", "c", "d"])),
            (tokens(&["x"]), tokens(&["x"])),
            (tokens(&["x"]), tokens(&["y"])),
            (tokens(&[]), tokens(&["y"])),
        ];
        for (a, b) in &pairs {
            let ab = jaccard(a, b);
            assert_eq!(ab, jaccard(b, a));
            assert!((0.0..=1.0).contains(&ab));
        }
        assert_eq!(jaccard(&pairs[0].0, &pairs[0].1), 0.5);
        assert_eq!(jaccard(&tokens(&[]), &tokens(&[])), 0.0);
    }

    #[test]
    fn score_is_capped_and_first_entry_wins_ties() {
        let normalizer = Arc::new(Normalizer::new());
        let doc = FaqDocument {
            version: 1,
            entries: vec![
                FaqRecord {
                    question: "billing invoices".into(),
                    answer: "first".into(),
                    keywords: vec!["billing".into()],
                },
                FaqRecord {
                    question: "billing invoices".into(),
                    answer: "second".into(),
                    keywords: vec!["invoices".into()],
                },
            ],
        };
        let kb = Arc::new(KnowledgeBase::from_document(doc, &normalizer));
        let hit = FaqMatcher::new(kb, normalizer).match_faq("billing invoices").unwrap();
        assert_eq!(hit.answer, "first");
        assert_eq!(hit.score, 1.0);
    }

    #[test]
    fn entries_without_tokens_are_skipped() {
        let normalizer = Arc::new(Normalizer::new());
        let doc = FaqDocument {
            version: 1,
            entries: vec![FaqRecord {
                question: "what is it?".into(),
                answer: "nothing".into(),
                keywords: vec!["thing".into()],
            }],
        };
        let kb = Arc::new(KnowledgeBase::from_document(doc, &normalizer));
        assert!(FaqMatcher::new(kb, normalizer).match_faq("a thing").is_none());
    }
}
