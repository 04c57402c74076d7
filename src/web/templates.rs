//! # Templates Maud — Página de Chat
//!
//! Uma única página, sem assets externos: HTML + CSS + um script inline
//! que faz `fetch("/ask")` e guarda o `session_id` devolvido pelo servidor.
//!
//! ```text
//! ┌──────────── header ─────────────┐
//! │ Support Assistant       [Reset] │
//! ├─────────────────────────────────┤
//! │  bot: Hello! ...                │
//! │                  user: hi       │
//! ├─────────────────────────────────┤
//! │ [______________________] [Send] │
//! └─────────────────────────────────┘
//! ```

use maud::{html, Markup, PreEscaped, DOCTYPE};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; background: #f3f4f6; margin: 0; }
.chat { max-width: 640px; margin: 2rem auto; background: #fff; border-radius: 12px;
        box-shadow: 0 2px 12px rgba(0,0,0,.08); display: flex; flex-direction: column; height: 80vh; }
.chat header { display: flex; justify-content: space-between; align-items: center;
               padding: .75rem 1rem; border-bottom: 1px solid #e5e7eb; }
.messages { flex: 1; overflow-y: auto; padding: 1rem; display: flex; flex-direction: column; gap: .5rem; }
.msg { padding: .5rem .75rem; border-radius: 10px; max-width: 80%; white-space: pre-wrap; }
.msg.user { align-self: flex-end; background: #2563eb; color: #fff; }
.msg.bot { align-self: flex-start; background: #e5e7eb; }
.msg .source { display: block; font-size: .7rem; opacity: .6; margin-top: .25rem; }
form { display: flex; gap: .5rem; padding: .75rem; border-top: 1px solid #e5e7eb; }
form input { flex: 1; padding: .5rem; border: 1px solid #d1d5db; border-radius: 8px; }
button { padding: .5rem 1rem; border: 0; border-radius: 8px; background: #2563eb; color: #fff; cursor: pointer; }
button.secondary { background: #9ca3af; }
"#;

const SCRIPT: &str = r#"
const messages = document.getElementById('messages');
const form = document.getElementById('chat-form');
const input = document.getElementById('message');
let sessionId = sessionStorage.getItem('session_id');

function append(role, text, source) {
  const div = document.createElement('div');
  div.className = 'msg ' + role;
  div.textContent = text;
  if (source) {
    const tag = document.createElement('span');
    tag.className = 'source';
    tag.textContent = source;
    div.appendChild(tag);
  }
  messages.appendChild(div);
  messages.scrollTop = messages.scrollHeight;
}

form.addEventListener('submit', async (ev) => {
  ev.preventDefault();
  const text = input.value;
  input.value = '';
  if (text.trim()) append('user', text);
  try {
    const res = await fetch('/ask', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ message: text, session_id: sessionId }),
    });
    const data = await res.json();
    if (data.session_id) {
      sessionId = data.session_id;
      sessionStorage.setItem('session_id', sessionId);
    }
    append('bot', data.reply, data.source);
  } catch (err) {
    append('bot', 'Error: ' + err);
  }
});

document.getElementById('reset').addEventListener('click', async () => {
  if (sessionId) {
    await fetch('/reset', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify({ session_id: sessionId }),
    });
  }
  messages.innerHTML = '';
  append('bot', 'Conversation reset. How can I help?');
});
"#;

/// Página completa do chat.
pub fn chat_page() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Support Assistant" }
                style { (PreEscaped(STYLE)) }
            }
            body {
                div class="chat" {
                    header {
                        strong { "Support Assistant" }
                        button id="reset" class="secondary" type="button" { "Reset" }
                    }
                    div id="messages" class="messages" {
                        div class="msg bot" { "Hello! How can I help you today?" }
                    }
                    form id="chat-form" autocomplete="off" {
                        input id="message" name="message" type="text" placeholder="Type your message...";
                        button type="submit" { "Send" }
                    }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}
