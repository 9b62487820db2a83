//! Shared fixtures: test messages, in-memory database, mock bot, fake LLM and fake git.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use omni_bot::llm::{ChatMessage, LlmClient};
use omni_bot::plugins::{PluginManager, PluginRegistry, PluginServices};
use omni_bot::updates::{RemoteHead, UpdateError, VersionControl};
use omni_bot::{Bot, Chat, Message, MessageDirection, User};
use storage::Database;
use tokio::sync::Notify;

pub fn create_test_message(user_id: i64, content: &str) -> Message {
    Message {
        id: "1".to_string(),
        content: content.to_string(),
        user: User {
            id: user_id,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat {
            id: 456,
            chat_type: "private".to_string(),
        },
        message_type: "text".to_string(),
        direction: MessageDirection::Incoming,
        created_at: Utc::now(),
        reply_to_message_id: None,
    }
}

pub async fn memory_db() -> Database {
    Database::new("sqlite::memory:")
        .await
        .expect("in-memory database")
}

/// Plugin manager over the built-in plugins, with every built-in discovered and loaded.
pub async fn loaded_plugins(db: &Database) -> Arc<PluginManager> {
    let services = PluginServices {
        db: db.clone(),
        content: Arc::new(omni_bot::content::ContentEngine::with_seed(7)),
        http: reqwest::Client::new(),
    };
    let plugins = Arc::new(PluginManager::new(
        db.clone(),
        PluginRegistry::with_builtins(),
        services,
        None,
    ));
    plugins.load_all_plugins().await.expect("load plugins");
    plugins
}

/// Records every outgoing message as `(chat_id, text)`.
#[derive(Default)]
pub struct MockBot {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl MockBot {
    pub fn texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat: &Chat, text: &str) -> omni_bot::Result<()> {
        self.sent.lock().unwrap().push((chat.id, text.to_string()));
        Ok(())
    }

    async fn reply_to(&self, message: &Message, text: &str) -> omni_bot::Result<()> {
        self.send_message(&message.chat, text).await
    }

    async fn get_me(&self) -> omni_bot::Result<String> {
        Ok("mockbot".to_string())
    }
}

/// Answers with a fixed text and remembers how many turns it was given.
pub struct FakeLlm {
    pub answer: String,
    pub last_len: AtomicUsize,
}

impl FakeLlm {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            last_len: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl LlmClient for FakeLlm {
    async fn complete(&self, messages: Vec<ChatMessage>) -> anyhow::Result<String> {
        self.last_len.store(messages.len(), Ordering::SeqCst);
        Ok(self.answer.clone())
    }
}

/// Version control over a plain directory: `pull` writes `app.txt` with the remote version.
pub struct FakeVcs {
    pub dir: PathBuf,
    pub current: Mutex<String>,
    pub remote: String,
    pub fail_pull: AtomicBool,
    /// Signalled when `pull` starts.
    pub pull_started: Notify,
    /// When set, `pull` waits for this before touching the tree.
    pub pull_gate: Mutex<Option<Arc<Notify>>>,
    /// When set, `pull` closes this database's pool so later history writes fail.
    pub close_db_on_pull: Mutex<Option<Database>>,
}

impl FakeVcs {
    pub fn new(dir: PathBuf, current: &str, remote: &str) -> Self {
        Self {
            dir,
            current: Mutex::new(current.to_string()),
            remote: remote.to_string(),
            fail_pull: AtomicBool::new(false),
            pull_started: Notify::new(),
            pull_gate: Mutex::new(None),
            close_db_on_pull: Mutex::new(None),
        }
    }
}

#[async_trait]
impl VersionControl for FakeVcs {
    async fn current_version(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    async fn fetch_remote(&self) -> Result<RemoteHead, UpdateError> {
        Ok(RemoteHead {
            version: self.remote.clone(),
            message: "Remote change".to_string(),
        })
    }

    async fn pull(&self) -> Result<(), UpdateError> {
        self.pull_started.notify_one();
        let gate = self.pull_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let db = self.close_db_on_pull.lock().unwrap().take();
        if let Some(db) = db {
            db.pool_manager().pool().close().await;
        }
        // Half-applied pull: the tree changes before the failure surfaces.
        std::fs::write(self.dir.join("app.txt"), &self.remote)?;
        if self.fail_pull.load(Ordering::SeqCst) {
            return Err(UpdateError::Git("merge conflict".to_string()));
        }
        *self.current.lock().unwrap() = self.remote.clone();
        Ok(())
    }
}
