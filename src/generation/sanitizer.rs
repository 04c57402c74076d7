//! # Sanitizer — Limpeza da Saída Generativa
//!
//! Modelos de diálogo treinados em conversas da internet produzem muito
//! ruído ("lol", "add me", respostas de duas letras). O sanitizer aplica,
//! em ordem:
//!
//! | Passo | Regra | Resultado |
//! |-------|-------|-----------|
//! | 1 | Contém marcador de baixa qualidade (substring, lowercase) | fallback de esclarecimento |
//! | 2 | Quebra em `[.!?]+` e mantém só o primeiro pedaço não-vazio (sem a pontuação) | — |
//! | 3 | Nenhuma sentença sobrou | fallback "interesting question" |
//! | 4 | Sentença com mais de 5 chars | acrescenta `.` |
//! | 5 | Resultado com menos de 3 chars | fallback longo |
//!
//! A pontuação original da sentença é descartada: "What? I don't know"
//! vira "What", "Really?! Yes." vira "Really.". Os fallbacks são sentenças
//! únicas terminadas em `.`, então sobrevivem intactos a uma segunda passada
//! e `sanitize(sanitize(x)) == sanitize(x)`.

use std::sync::OnceLock;

use regex::Regex;

/// Substrings que marcam saída inútil do modelo.
pub const LOW_QUALITY_MARKERS: &[&str] = &[
    "add me", "plz", "pls", "homie", "gotchu", "lol", "xd", "edit", "stats",
];

pub const CLARIFY_FALLBACK: &str =
    "I'm not sure how to respond to that, please try rephrasing your question.";

pub const NO_SENTENCE_FALLBACK: &str = "That's an interesting question, please tell me more.";

/// Também usado quando a geração estoura o tempo limite.
pub const SHORT_REPLY_FALLBACK: &str =
    "That's an interesting question, please tell me more about what you're looking for.";

fn terminator_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("terminator regex is valid"))
}

/// Primeira sentença com corpo não-vazio, aparada e sem a pontuação final.
fn first_sentence(text: &str) -> Option<&str> {
    terminator_regex()
        .split(text)
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Limpa uma resposta gerada.
pub fn sanitize(text: &str) -> String {
    let text = text.trim();
    let lower = text.to_lowercase();

    if LOW_QUALITY_MARKERS.iter().any(|m| lower.contains(m)) {
        tracing::debug!(reply = %text, "Resposta com marcador de baixa qualidade");
        return CLARIFY_FALLBACK.to_string();
    }

    if text.is_empty() {
        return SHORT_REPLY_FALLBACK.to_string();
    }

    let mut reply = match first_sentence(text) {
        Some(sentence) => sentence.to_string(),
        None => return NO_SENTENCE_FALLBACK.to_string(),
    };

    if reply.chars().count() > 5 {
        reply.push('.');
    }

    if reply.chars().count() < 3 {
        return SHORT_REPLY_FALLBACK.to_string();
    }

    reply
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_quality_markers_trigger_clarification() {
        assert_eq!(sanitize("lol ok"), CLARIFY_FALLBACK);
        assert_eq!(sanitize("ADD ME on steam"), CLARIFY_FALLBACK);
        // substring, não palavra
        assert_eq!(sanitize("I like editing videos."), CLARIFY_FALLBACK);
    }

    #[test]
    fn keeps_first_sentence_only() {
        assert_eq!(
            sanitize("I love Rust. It is fast. Really!"),
            "I love Rust."
        );
        assert_eq!(sanitize("Really?! Yes."), "Really.");
    }

    #[test]
    fn sentence_punctuation_is_dropped() {
        assert_eq!(sanitize("What? I don't know"), "What");
        assert_eq!(sanitize("Great!!! See you"), "Great");
        // "Hi" sozinho fica curto demais
        assert_eq!(sanitize("Hi! How are you"), SHORT_REPLY_FALLBACK);
    }

    #[test]
    fn appends_period_to_long_unterminated_sentence() {
        assert_eq!(sanitize("I think so"), "I think so.");
        assert_eq!(sanitize("  sure thing  "), "sure thing.");
    }

    #[test]
    fn short_reply_gets_no_period() {
        assert_eq!(sanitize("Yes"), "Yes");
        assert_eq!(sanitize("Okay!"), "Okay");
    }

    #[test]
    fn too_short_reply_uses_long_fallback() {
        assert_eq!(sanitize("k"), SHORT_REPLY_FALLBACK);
        assert_eq!(sanitize("ok"), SHORT_REPLY_FALLBACK);
        assert_eq!(sanitize(""), SHORT_REPLY_FALLBACK);
        assert_eq!(sanitize("   "), SHORT_REPLY_FALLBACK);
    }

    #[test]
    fn punctuation_only_uses_sentence_fallback() {
        assert_eq!(sanitize("..."), NO_SENTENCE_FALLBACK);
        assert_eq!(sanitize("?! . !"), NO_SENTENCE_FALLBACK);
    }

    #[test]
    fn leading_punctuation_is_skipped() {
        assert_eq!(sanitize("... well I guess"), "well I guess.");
    }

    #[test]
    fn fallbacks_are_stable() {
        for fallback in [CLARIFY_FALLBACK, NO_SENTENCE_FALLBACK, SHORT_REPLY_FALLBACK] {
            assert_eq!(sanitize(fallback), fallback);
        }
    }

    #[test]
    fn sanitize_is_idempotent() {
        let samples = [
            "I love Rust. It is fast.",
            "lol",
            "",
            "k",
            "...",
            "Really?! Yes.",
            "What? I don't know",
            "Hi! How are you",
            "hello there friend",
            "Yes",
            "  spaced    out   words  ",
            "It costs 3.50 dollars",
            "Why? Because.",
            "ça va très bien",
            "\n\nnew lines\nhere",
        ];
        for s in samples {
            let once = sanitize(s);
            assert_eq!(sanitize(&once), once, "not idempotent for {s:?}");
        }
    }
}
