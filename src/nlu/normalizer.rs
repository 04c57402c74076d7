//! # Normalizador de Texto — Tokens para Similaridade
//!
//! O [`Normalizer`] transforma texto livre em um **conjunto** de tokens
//! comparáveis, usado pelo [`FaqMatcher`](super::faq::FaqMatcher) para o
//! cálculo de Jaccard.
//!
//! ## Pipeline
//!
//! ```text
//! "What services does your company provide?"
//!   ├── 1. NFC + lowercase        → "what services does your company provide?"
//!   ├── 2. Tokeniza (alfanumérico) → [what, services, does, your, company, provide]
//!   ├── 3. Só alfabéticos         → (descarta "123", "v2")
//!   ├── 4. Remove stop-words      → [services, company, provide]
//!   └── 5. Forma base (Snowball)  → {servic, compani, provid}
//! ```
//!
//! ## Forma Base
//!
//! A redução usa o stemmer Snowball para inglês (`rust-stemmers`), uma
//! aproximação do lema de dicionário: flexões regulares colapsam igual
//! ("services"/"service" → "servic"), irregulares não ("went" ≠ "go"). O
//! resultado nem sempre é uma palavra ("compani"), mas é aplicado de forma
//! idêntica à mensagem e às perguntas da KB, que é o que a similaridade exige.
//!
//! A função é pura: sem I/O, sem estado escondido. Por isso os tokens das
//! FAQs podem ser calculados uma única vez na carga.

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

/// Stop-words em inglês (lista fechada do NLTK, sem as formas com apóstrofo —
/// o tokenizador já quebra "don't" em "don" + "t").
const STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Normalizador determinístico de texto em inglês.
pub struct Normalizer {
    stemmer: Stemmer,
    stopwords: HashSet<&'static str>,
}

impl Normalizer {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            stopwords: STOPWORDS.iter().copied().collect(),
        }
    }

    /// Texto → conjunto de tokens normalizados. Entrada vazia → conjunto vazio.
    pub fn normalize(&self, text: &str) -> HashSet<String> {
        let text: String = text.nfc().collect::<String>().to_lowercase();

        text.split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .filter(|token| token.chars().all(char::is_alphabetic))
            .filter(|token| !self.stopwords.contains(token))
            .map(|token| self.stemmer.stem(token).into_owned())
            .collect()
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reduces_question_to_content_stems() {
        let n = Normalizer::new();
        assert_eq!(
            n.normalize("What services does your company provide?"),
            set(&["servic", "compani", "provid"])
        );
    }

    #[test]
    fn empty_and_stopword_only_inputs() {
        let n = Normalizer::new();
        assert!(n.normalize("").is_empty());
        assert!(n.normalize("the of a").is_empty());
        assert!(n.normalize("   ?! ...").is_empty());
    }

    #[test]
    fn drops_non_alphabetic_tokens() {
        let n = Normalizer::new();
        assert!(n.normalize("123").is_empty());
        assert_eq!(n.normalize("order 42 v2 refund"), set(&["order", "refund"]));
    }

    #[test]
    fn duplicates_and_inflections_collapse() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("Refunds, refund, REFUND"), set(&["refund"]));
    }

    #[test]
    fn stems_approximate_lemmas() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("services"), n.normalize("service"));
        assert_eq!(n.normalize("services"), set(&["servic"]));
        // flexão irregular não vira o lema
        assert_ne!(n.normalize("went"), n.normalize("go"));
    }

    #[test]
    fn contractions_split_into_stopwords() {
        let n = Normalizer::new();
        assert_eq!(n.normalize("don't won't"), HashSet::new());
        assert!(n.is_stopword("don"));
    }

    #[test]
    fn is_deterministic() {
        let n = Normalizer::new();
        let text = "How can I reset my password?";
        assert_eq!(n.normalize(text), n.normalize(text));
    }
}
