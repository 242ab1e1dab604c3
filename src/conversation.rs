//! Multi-turn conversational agent.
//!
//! Each session keeps its own history. A turn either greets, answers from
//! documentation (RAG) or continues the conversation, depending on a routing
//! decision the language model makes over the recent transcript.

use crate::agent::{AgentError, CompletionAgent};
use crate::pipeline::assistant_prompt;
use crate::retrieval::{self, Retriever};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Messages included in the routing and fallback prompts.
pub const HISTORY_WINDOW: usize = 6;

/// Messages kept per session; older ones are dropped.
pub const MAX_HISTORY: usize = HISTORY_WINDOW * 4;

/// Sessions kept before the least recently used one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Sessions untouched for this long are evicted.
pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);

const GREETINGS: [&str; 5] = ["hi", "hello", "hey", "good morning", "good evening"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    fn speaker(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// History of one conversation, capped at [`MAX_HISTORY`] messages.
#[derive(Debug, Default)]
pub struct ConversationSession {
    history: Vec<Message>,
    turns: usize,
}

impl ConversationSession {
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.history.push(Message {
            role,
            content: content.into(),
        });
        self.turns += 1;
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
    }

    /// Messages pushed over the session's lifetime, including dropped ones.
    pub fn turns(&self) -> usize {
        self.turns
    }

    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// The last `window` messages, one `Speaker: content` line each.
    pub fn transcript(&self, window: usize) -> String {
        let start = self.history.len().saturating_sub(window);
        self.history[start..]
            .iter()
            .map(|m| format!("{}: {}\n", m.role.speaker(), m.content))
            .collect()
    }
}

#[derive(Debug)]
struct StoredSession {
    session: Arc<Mutex<ConversationSession>>,
    last_used: Instant,
}

impl StoredSession {
    fn new() -> Self {
        Self {
            session: Arc::default(),
            last_used: Instant::now(),
        }
    }
}

/// Sessions keyed by id. A session is locked for the duration of a turn, so
/// concurrent turns on the same session are serialized.
///
/// The store is bounded: idle sessions expire, and once `max_sessions` is
/// reached the least recently used session is evicted to make room.
#[derive(Debug)]
pub struct ConversationStore {
    sessions: DashMap<String, StoredSession>,
    max_sessions: usize,
    idle_ttl: Duration,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::with_limits(DEFAULT_MAX_SESSIONS, DEFAULT_IDLE_TTL)
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_sessions: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            max_sessions: max_sessions.max(1),
            idle_ttl,
        }
    }

    /// Get or create a session, marking it as used.
    pub fn session(&self, session_id: &str) -> Arc<Mutex<ConversationSession>> {
        if let Some(mut stored) = self.sessions.get_mut(session_id) {
            stored.last_used = Instant::now();
            return stored.session.clone();
        }

        self.evict();
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(StoredSession::new)
            .session
            .clone()
    }

    /// Drop expired sessions, then the least recently used ones until there
    /// is room for one more.
    fn evict(&self) {
        let ttl = self.idle_ttl;
        self.sessions.retain(|_, stored| stored.last_used.elapsed() < ttl);

        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|entry| entry.last_used)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(id) => {
                    self.sessions.remove(&id);
                    tracing::debug!(session_id = %id, "evicted conversation session");
                }
                None => break,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// How a turn is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Rag,
    NoRag,
}

impl Route {
    /// Read the model's routing verdict. `NO_RAG` contains `RAG`, so it is
    /// checked first; anything unrecognized continues the conversation.
    pub fn parse(verdict: &str) -> Self {
        let verdict = verdict.trim().to_uppercase();
        if verdict.contains("NO_RAG") {
            Route::NoRag
        } else if verdict.contains("RAG") {
            Route::Rag
        } else {
            Route::NoRag
        }
    }
}

pub fn routing_prompt(transcript: &str) -> String {
    format!(
        "You are a Customer Support Copilot. Given the following conversation, decide whether \
         the user query requires knowledge from documentation or developer resources.\n\
         Respond with either \"RAG\" or \"NO_RAG\".\n\n\
         Conversation:\n{transcript}\n\
         Decision:"
    )
}

pub fn fallback_prompt(transcript: &str) -> String {
    format!(
        "You are a helpful AI assistant. Continue the conversation with the user based on the \
         following context:\n{transcript}\
         Respond conversationally and politely."
    )
}

/// Canned reply to an opening greeting, `None` for anything else.
fn greeting_reply(input: &str) -> Option<String> {
    let normalized = input.trim().to_lowercase();
    if !GREETINGS.contains(&normalized.as_str()) {
        return None;
    }

    let mut chars = normalized.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    Some(format!("{capitalized}! How can I help you today?"))
}

/// Reply to one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationReply {
    pub session_id: String,
    pub response: String,
}

pub struct ConversationAgent {
    agent: Arc<dyn CompletionAgent>,
    retriever: Option<Arc<dyn Retriever>>,
    store: ConversationStore,
    documents: usize,
}

impl ConversationAgent {
    pub fn new(agent: Arc<dyn CompletionAgent>) -> Self {
        Self {
            agent,
            retriever: None,
            store: ConversationStore::new(),
            documents: 3,
        }
    }

    pub fn with_store(mut self, store: ConversationStore) -> Self {
        self.store = store;
        self
    }

    pub fn with_retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Documents retrieved for a RAG turn.
    pub fn with_documents(mut self, documents: usize) -> Self {
        self.documents = documents;
        self
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Answer one user turn, creating a session when `session_id` is absent.
    pub async fn respond(
        &self,
        session_id: Option<&str>,
        input: &str,
    ) -> Result<ConversationReply, AgentError> {
        let session_id = session_id
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let session = self.store.session(&session_id);
        let mut session = session.lock().await;
        session.push(Role::User, input);

        let response = match greeting_reply(input).filter(|_| session.turns() == 1) {
            Some(reply) => reply,
            None => self.answer(&session, input).await?,
        };

        session.push(Role::Assistant, response.clone());
        Ok(ConversationReply {
            session_id,
            response,
        })
    }

    async fn answer(&self, session: &ConversationSession, input: &str) -> Result<String, AgentError> {
        let transcript = session.transcript(HISTORY_WINDOW);
        let verdict = self.agent.complete(&routing_prompt(&transcript)).await?;
        let route = Route::parse(&verdict);
        tracing::debug!(?route, turns = session.history().len(), "conversation routed");

        let answer = match route {
            Route::Rag => {
                let docs = retrieval::search_or_empty(
                    self.retriever.as_deref(),
                    input,
                    0.0,
                    self.documents,
                )
                .await;
                let context = retrieval::format_context(&docs);
                self.agent.complete(&assistant_prompt(&context, input)).await?
            }
            Route::NoRag => self.agent.complete(&fallback_prompt(&transcript)).await?,
        };

        Ok(answer.trim().to_string())
    }
}
