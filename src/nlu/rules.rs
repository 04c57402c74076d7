//! # Regras de Resposta Fixa — Primeiro Nível da Cascata
//!
//! O [`RuleMatcher`] reconhece intenções conversacionais triviais (saudação,
//! despedida, "quem é você?") e devolve uma resposta pronta, sem tocar no
//! modelo generativo nem na KB.
//!
//! ## Tabela Ordenada
//!
//! As regras são **dados**: uma lista de `(categoria, padrão, resposta)`
//! avaliada em ordem. A primeira que casa vence — não há pontuação.
//!
//! | # | Categoria | Padrão (resumo) |
//! |---|-----------|-----------------|
//! | 1 | [`Name`](RuleCategory::Name) | "name" + {what, your, who, tell, say} |
//! | 2 | [`Identity`](RuleCategory::Identity) | who+you, ou what+you+are |
//! | 3 | [`Greeting`](RuleCategory::Greeting) | hello, hi, hey, greetings… |
//! | 4 | [`TimeGreeting`](RuleCategory::TimeGreeting) | morning / afternoon / evening / night |
//! | 5 | [`HowAreYou`](RuleCategory::HowAreYou) | how + you + {are, doing, feeling} |
//! | 6 | [`Capability`](RuleCategory::Capability) | what + you + {can, do, capable, help} |
//! | 7 | [`Help`](RuleCategory::Help) | help, assist, support |
//! | 8 | [`Farewell`](RuleCategory::Farewell) | bye, goodbye, "see you", later… |
//! | 9 | [`Thanks`](RuleCategory::Thanks) | thank, thanks, thx, appreciate |
//! | 10 | [`Age`](RuleCategory::Age) | age, old+you |
//! | 11 | [`Location`](RuleCategory::Location) | where + you |
//! | 12 | [`Origin`](RuleCategory::Origin) | {created, made, built…} + you |
//!
//! ## Casamento de Termos
//!
//! Termos são procurados como **substring** do texto em lowercase: "hellooo"
//! casa "hello", "goodmorning" casa "morning", "your" casa "you".
//!
//! Exceção: os termos curtos de [`WHOLE_WORD_TERMS`] só casam como palavra
//! inteira, senão "hi" dispararia em "this", "age" em "message" e "do" em
//! "does".

/// Categoria da regra que disparou.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleCategory {
    Name,
    Identity,
    Greeting,
    TimeGreeting,
    HowAreYou,
    Capability,
    Help,
    Farewell,
    Thanks,
    Age,
    Location,
    Origin,
}

/// Resultado de uma regra que casou.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleHit {
    pub category: RuleCategory,
    pub reply: &'static str,
}

/// Predicado declarativo sobre as palavras da mensagem.
enum Pattern {
    /// Pelo menos um dos termos aparece.
    AnyOf(&'static [&'static str]),
    /// Todos os sub-padrões casam (co-ocorrência).
    AllOf(&'static [Pattern]),
    /// Pelo menos um dos sub-padrões casa.
    EitherOf(&'static [Pattern]),
}

impl Pattern {
    fn matches(&self, utterance: &Utterance) -> bool {
        match self {
            Pattern::AnyOf(terms) => terms.iter().any(|t| utterance.has(t)),
            Pattern::AllOf(parts) => parts.iter().all(|p| p.matches(utterance)),
            Pattern::EitherOf(parts) => parts.iter().any(|p| p.matches(utterance)),
        }
    }
}

struct Rule {
    category: RuleCategory,
    pattern: Pattern,
    reply: &'static str,
}

const IDENTITY_REPLY: &str =
    "I'm an AI chatbot created to help answer questions and have conversations. You can call me ChatBot!";

/// Ordem = precedência.
const RULES: &[Rule] = &[
    Rule {
        category: RuleCategory::Name,
        pattern: Pattern::AllOf(&[
            Pattern::AnyOf(&["name"]),
            Pattern::AnyOf(&["what", "your", "who", "tell", "say"]),
        ]),
        reply: IDENTITY_REPLY,
    },
    Rule {
        category: RuleCategory::Identity,
        pattern: Pattern::EitherOf(&[
            Pattern::AllOf(&[Pattern::AnyOf(&["who"]), Pattern::AnyOf(&["you"])]),
            Pattern::AllOf(&[
                Pattern::AnyOf(&["what"]),
                Pattern::AnyOf(&["you"]),
                Pattern::AnyOf(&["are"]),
            ]),
        ]),
        reply: IDENTITY_REPLY,
    },
    Rule {
        category: RuleCategory::Greeting,
        pattern: Pattern::AnyOf(&["hello", "hi", "hey", "greetings", "greeting", "hii", "hiii"]),
        reply: "Hello! How can I help you today?",
    },
    Rule {
        category: RuleCategory::TimeGreeting,
        pattern: Pattern::AnyOf(&["good morning", "morning"]),
        reply: "Good morning! How can I help you today?",
    },
    Rule {
        category: RuleCategory::TimeGreeting,
        pattern: Pattern::AnyOf(&["good afternoon", "afternoon"]),
        reply: "Good afternoon! How can I help you today?",
    },
    Rule {
        category: RuleCategory::TimeGreeting,
        pattern: Pattern::AnyOf(&["good evening", "evening"]),
        reply: "Good evening! How can I help you today?",
    },
    Rule {
        category: RuleCategory::TimeGreeting,
        pattern: Pattern::AnyOf(&["good night", "night"]),
        reply: "Good night! Sleep well!",
    },
    Rule {
        category: RuleCategory::HowAreYou,
        pattern: Pattern::AllOf(&[
            Pattern::AnyOf(&["how"]),
            Pattern::AnyOf(&["you"]),
            Pattern::AnyOf(&["are", "doing", "feeling"]),
        ]),
        reply: "I'm doing great, thank you for asking! How are you doing today?",
    },
    Rule {
        category: RuleCategory::Capability,
        pattern: Pattern::AllOf(&[
            Pattern::AnyOf(&["what"]),
            Pattern::AnyOf(&["you"]),
            Pattern::AnyOf(&["can", "do", "capable", "help"]),
        ]),
        reply: "I can have conversations, answer questions, and help with various topics. Feel free to ask me anything!",
    },
    Rule {
        category: RuleCategory::Help,
        pattern: Pattern::AnyOf(&["help", "assist", "support"]),
        reply: "I'm here to help! You can ask me questions, have a conversation, or just chat. What would you like to know?",
    },
    Rule {
        category: RuleCategory::Farewell,
        pattern: Pattern::AnyOf(&["bye", "goodbye", "see you", "farewell", "later", "cya"]),
        reply: "Goodbye! It was nice chatting with you. Have a great day!",
    },
    Rule {
        category: RuleCategory::Thanks,
        pattern: Pattern::AnyOf(&["thank", "thanks", "appreciate", "thx"]),
        reply: "You're welcome! I'm glad I could help. Is there anything else you'd like to know?",
    },
    Rule {
        category: RuleCategory::Age,
        pattern: Pattern::EitherOf(&[
            Pattern::AnyOf(&["age"]),
            Pattern::AllOf(&[Pattern::AnyOf(&["old"]), Pattern::AnyOf(&["you"])]),
        ]),
        reply: "I'm an AI, so I don't have an age in the traditional sense. I exist in the digital world!",
    },
    Rule {
        category: RuleCategory::Location,
        pattern: Pattern::AllOf(&[Pattern::AnyOf(&["where"]), Pattern::AnyOf(&["you"])]),
        reply: "I exist in the cloud and can be accessed from anywhere! I don't have a physical location.",
    },
    Rule {
        category: RuleCategory::Origin,
        pattern: Pattern::AllOf(&[
            Pattern::AnyOf(&["created", "made", "built", "developed", "designed"]),
            Pattern::AnyOf(&["you"]),
        ]),
        reply: "I was created using advanced AI technology, specifically the DialoGPT model, to help with conversations and questions.",
    },
];

/// Termos curtos demais para casar como substring.
pub const WHOLE_WORD_TERMS: &[&str] = &["hi", "hii", "hiii", "hey", "age", "old", "do", "can", "are"];

/// Mensagem em lowercase, mais a versão reduzida a palavras (com espaços
/// nas bordas) para os termos de palavra inteira.
struct Utterance {
    lower: String,
    padded_words: String,
}

impl Utterance {
    fn new(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let padded_words = format!(" {} ", words.join(" "));
        Self { lower, padded_words }
    }

    fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    fn has(&self, term: &str) -> bool {
        if WHOLE_WORD_TERMS.contains(&term) {
            self.padded_words.contains(&format!(" {term} "))
        } else {
            self.lower.contains(term)
        }
    }
}

/// Casador de regras — sem estado, seguro para uso concorrente ilimitado.
#[derive(Clone, Copy, Debug, Default)]
pub struct RuleMatcher;

impl RuleMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Primeira regra cujo padrão casa com a mensagem, ou `None`.
    pub fn match_rule(&self, raw: &str) -> Option<RuleHit> {
        let utterance = Utterance::new(raw);
        if utterance.is_empty() {
            return None;
        }

        RULES
            .iter()
            .find(|rule| rule.pattern.matches(&utterance))
            .map(|rule| RuleHit {
                category: rule.category,
                reply: rule.reply,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(text: &str) -> Option<RuleCategory> {
        RuleMatcher::new().match_rule(text).map(|hit| hit.category)
    }

    #[test]
    fn greeting_returns_exact_reply() {
        let hit = RuleMatcher::new().match_rule("hello").unwrap();
        assert_eq!(hit.category, RuleCategory::Greeting);
        assert_eq!(hit.reply, "Hello! How can I help you today?");
    }

    #[test]
    fn every_category_is_reachable() {
        let cases = [
            ("What's your name?", RuleCategory::Name),
            ("who are you", RuleCategory::Identity),
            ("Hey there", RuleCategory::Greeting),
            ("good afternoon", RuleCategory::TimeGreeting),
            ("How are you doing today", RuleCategory::HowAreYou),
            ("what can you do", RuleCategory::Capability),
            ("I need some help", RuleCategory::Help),
            ("ok bye", RuleCategory::Farewell),
            ("thank you so much", RuleCategory::Thanks),
            ("what is your age", RuleCategory::Age),
            ("where do you live", RuleCategory::Location),
            ("how were you built", RuleCategory::Origin),
        ];
        for (text, expected) in cases {
            assert_eq!(category(text), Some(expected), "input: {text}");
        }
    }

    #[test]
    fn time_of_day_replies() {
        let m = RuleMatcher::new();
        assert_eq!(
            m.match_rule("Good morning").unwrap().reply,
            "Good morning! How can I help you today?"
        );
        assert_eq!(m.match_rule("good night!").unwrap().reply, "Good night! Sleep well!");
        assert_eq!(
            m.match_rule("evening all").unwrap().reply,
            "Good evening! How can I help you today?"
        );
    }

    #[test]
    fn earlier_rule_wins_on_overlap() {
        // time-of-day (4) antes de "how are you" (5)
        assert_eq!(category("good morning, how are you"), Some(RuleCategory::TimeGreeting));
        // identity (2) antes de origin (12)
        assert_eq!(category("who made you"), Some(RuleCategory::Identity));
        // name (1) antes de greeting (3)
        assert_eq!(category("hi, tell me your name"), Some(RuleCategory::Name));
        // capability (6) antes de help (7)
        assert_eq!(category("what can you help with"), Some(RuleCategory::Capability));
    }

    #[test]
    fn terms_match_inside_longer_words() {
        let cases = [
            ("goodmorning", RuleCategory::TimeGreeting),
            ("thankyou", RuleCategory::Thanks),
            ("hellooo", RuleCategory::Greeting),
            ("byee", RuleCategory::Farewell),
            ("I appreciated that", RuleCategory::Thanks),
            ("how you feeling", RuleCategory::HowAreYou),
            ("How do I contact support?", RuleCategory::Help),
        ];
        for (text, expected) in cases {
            assert_eq!(category(text), Some(expected), "input: {text}");
        }
    }

    #[test]
    fn short_terms_need_whole_words() {
        assert_eq!(category("this is something"), None);
        assert_eq!(category("I got your message"), None);
        // "does" não conta como "do"
        assert_eq!(category("what services does your company provide"), None);
    }

    #[test]
    fn how_are_you_outranks_age() {
        assert_eq!(category("How old are you?"), Some(RuleCategory::HowAreYou));
        assert_eq!(category("are you old"), Some(RuleCategory::Age));
    }

    #[test]
    fn name_requires_co_occurring_marker() {
        assert_eq!(category("name"), None);
        assert_eq!(category("say my name"), Some(RuleCategory::Name));
    }

    #[test]
    fn no_match_falls_through() {
        assert!(RuleMatcher::new().match_rule("").is_none());
        assert!(RuleMatcher::new().match_rule("   ").is_none());
        assert!(RuleMatcher::new().match_rule("reset my password").is_none());
    }
}
