//! In-memory fakes for the repository and generation ports.
//!
//! Compiled for this crate's tests and, behind the `testing` feature, for
//! downstream crates that want to drive procedures without a database or
//! network access.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use pocketchat_types::error::{GenerationError, RepositoryError};
use pocketchat_types::message::{Message, NewMessage};

use crate::generation::{GeneratedImage, GenerationProvider};
use crate::repository::MessageRepository;

/// Row store backed by a `Vec`.
///
/// Every insert gets a fresh v7 id and a timestamp one second after the
/// previous row, so ordering by `created_at` is deterministic.
pub struct MemoryRepository {
    rows: Mutex<Vec<Message>>,
    epoch: DateTime<Utc>,
    fail: AtomicBool,
    inserts: AtomicUsize,
    lists: AtomicUsize,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            epoch: Utc
                .with_ymd_and_hms(2025, 1, 1, 9, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            fail: AtomicBool::new(false),
            inserts: AtomicUsize::new(0),
            lists: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent call fail with a query error (or stop failing).
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of successful inserts.
    pub fn insert_count(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    /// Number of `list_recent` calls, failed ones included.
    pub fn list_count(&self) -> usize {
        self.lists.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored row in insertion order.
    pub fn rows(&self) -> Vec<Message> {
        self.rows.lock().map(|rows| rows.clone()).unwrap_or_default()
    }

    fn check(&self) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            Err(RepositoryError::Query("simulated store outage".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRepository for MemoryRepository {
    async fn insert(&self, message: &NewMessage) -> Result<Message, RepositoryError> {
        self.check()?;
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        let stored = Message {
            id: Uuid::now_v7().to_string(),
            user_id: message.user_id.clone(),
            content: message.content.clone(),
            image_url: message.image_url.clone(),
            is_user_message: message.is_user_message,
            created_at: self.epoch + Duration::seconds(rows.len() as i64),
        };
        rows.push(stored.clone());
        self.inserts.fetch_add(1, Ordering::SeqCst);
        Ok(stored)
    }

    async fn list_recent(&self, user_id: &str, limit: u32) -> Result<Vec<Message>, RepositoryError> {
        self.lists.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let rows = self
            .rows
            .lock()
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;
        Ok(rows
            .iter()
            .rev()
            .filter(|m| m.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Generation provider with canned responses.
pub struct ScriptedProvider {
    text: Result<String, String>,
    image: Result<GeneratedImage, String>,
    text_calls: AtomicUsize,
    image_calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    /// Replies with `text` to every text prompt and with a tiny JPEG payload
    /// to every image prompt.
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            text: Ok(text.into()),
            image: Ok(GeneratedImage::new("/9j/4AAQSkZJRg==", None)),
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Replace the image result.
    pub fn with_image(mut self, image: GeneratedImage) -> Self {
        self.image = Ok(image);
        self
    }

    /// Fails every call with a provider error carrying `detail`.
    pub fn failing(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        Self {
            text: Err(detail.clone()),
            image: Err(detail),
            text_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn text_calls(&self) -> usize {
        self.text_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn record(&self, prompt: &str) {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
    }
}

impl GenerationProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.text_calls.fetch_add(1, Ordering::SeqCst);
        self.record(prompt);
        self.text.clone().map_err(|message| GenerationError::Provider {
            status: 500,
            message,
        })
    }

    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GenerationError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.record(prompt);
        self.image.clone().map_err(|message| GenerationError::Provider {
            status: 500,
            message,
        })
    }
}
