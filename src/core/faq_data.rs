//! Tabela de FAQs curada que acompanha o binário.
//!
//! Usada quando não existe `data/faq.json` (ou quando o arquivo está
//! corrompido). Incrementar [`BUILTIN_VERSION`] sempre que o conteúdo mudar.

use super::knowledge_base::{FaqDocument, FaqRecord};

/// Versão da tabela embutida.
pub const BUILTIN_VERSION: u32 = 1;

/// `(pergunta canônica, resposta, palavras-chave)`.
const FAQ_TABLE: &[(&str, &str, &[&str])] = &[
    (
        "What services does your company provide?",
        "We deliver 24x7 AI-powered customer assistance, onboarding guidance, and self-help resources tailored to your account.",
        &["services", "provide", "offer", "capabilities"],
    ),
    (
        "Who are you and what is this chatbot?",
        "I'm an AI assistant written in Rust, pairing a curated FAQ with the DialoGPT conversational model to answer your questions.",
        &["who", "yourself", "introduce", "about you", "who are you"],
    ),
    (
        "What can you do?",
        "I can chat with you, answer the curated FAQs, and keep a log of every conversation so the team can review it later.",
        &["what can you do", "capabilities", "features", "help me with"],
    ),
    (
        "Tell me more about the company.",
        "We build conversational tooling for support teams. This assistant shows how rule matching, FAQ retrieval and a generative model fit together in one service.",
        &["company", "about the company", "who built", "team"],
    ),
    (
        "How can I reset my password?",
        "You can reset your password from the login screen by selecting \u{201c}Forgot password,\u{201d} entering your registered email, and following the verification link we send.",
        &["password", "reset", "forgot", "recover"],
    ),
    (
        "What is your refund policy?",
        "We offer a no-questions-asked refund within the first 30 days. Reach out to support with your order ID so we can process it immediately.",
        &["refund", "return", "money back"],
    ),
    (
        "How do I contact support?",
        "You can chat with us here or email support@yourcompany.com anytime. For urgent issues, call +1-800-000-0000 and we will escalate it instantly.",
        &["contact", "support", "helpdesk", "email", "phone"],
    ),
    (
        "What are your support hours?",
        "Our virtual agents are online around the clock, and human specialists are available Monday through Friday, 9 AM to 9 PM local time.",
        &["hours", "availability", "open", "time"],
    ),
    (
        "Where can I track my order?",
        "Open your dashboard, go to Orders, and click \u{201c}Track shipment.\u{201d} The status updates in real time using the carrier scan data.",
        &["track", "order", "shipping", "status"],
    ),
    (
        "Do you offer custom plans or pricing?",
        "Yes, we design custom plans for teams of every size. Share your goals and usage estimates, and we\u{2019}ll send a tailored quote within one business day.",
        &["pricing", "cost", "custom", "plan", "quote"],
    ),
    (
        "How do I get started or create an account?",
        "Sign up with your work email, verify the confirmation link, and the onboarding checklist will walk you through the initial setup in less than five minutes.",
        &["start", "signup", "account", "create"],
    ),
    (
        "Can the platform integrate with other tools?",
        "Absolutely. We support native integrations with Slack, Teams, Salesforce, and Zapier, plus webhooks for anything else.",
        &["integration", "tools", "connect", "api"],
    ),
    (
        "How do I report a technical issue?",
        "Send us the error details plus the steps to reproduce it, and our reliability team will take over right away.",
        &["issue", "bug", "error", "problem"],
    ),
];

/// Documento de FAQ embutido, no mesmo formato aceito em disco.
pub fn builtin_document() -> FaqDocument {
    FaqDocument {
        version: BUILTIN_VERSION,
        entries: FAQ_TABLE
            .iter()
            .map(|(question, answer, keywords)| FaqRecord {
                question: question.to_string(),
                answer: answer.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
    }
}
