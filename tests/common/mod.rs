//! Fakes for the model clients and notifier, shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::Mutex;

use medai::config::Config;
use medai::index::VectorIndex;
use medai::llm::{Embedder, Generator};
use medai::notify::Notifier;
use medai::state::AppState;

pub const PASSAGES: &[(&str, [f32; 2])] = &[
    ("Anemia is a shortage of red blood cells.", [1.0, 0.0]),
    ("Iron deficiency is the most common cause of anemia.", [0.95, 0.05]),
    ("Fatigue and pale skin are typical symptoms.", [0.9, 0.1]),
    ("Treatment depends on the underlying cause.", [0.8, 0.2]),
    ("Fractures need immobilisation.", [0.0, 1.0]),
];

/// Embeds every text to the same vector and counts calls.
#[derive(Default)]
pub struct FixedEmbedder {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    fn model(&self) -> &str {
        "fixed"
    }

    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

/// What the fake generator does with a prompt.
pub enum Reply {
    Echo,
    Fixed(&'static str),
    Fail(&'static str),
}

pub struct FakeGenerator {
    reply: Reply,
    pub calls: AtomicUsize,
}

impl FakeGenerator {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Generator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Echo => Ok(prompt.to_string()),
            Reply::Fixed(answer) => Ok(answer.to_string()),
            Reply::Fail(message) => anyhow::bail!("{message}"),
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<String>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, _service: &str, message: &str) -> Result<()> {
        self.sent.lock().push(message.to_string());
        Ok(())
    }
}

pub struct Harness {
    pub state: AppState,
    pub embedder: Arc<FixedEmbedder>,
    pub generator: Arc<FakeGenerator>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn sample_index() -> VectorIndex {
    let mut index = VectorIndex::new("fixed", 2);
    for (content, embedding) in PASSAGES {
        index.push(*content, embedding.to_vec()).unwrap();
    }
    index
}

pub fn harness(reply: Reply) -> Harness {
    let embedder = Arc::new(FixedEmbedder::default());
    let generator = Arc::new(FakeGenerator::new(reply));
    let notifier = Arc::new(RecordingNotifier::default());

    let state = AppState::from_parts(
        Config::default(),
        sample_index(),
        embedder.clone(),
        generator.clone(),
        notifier.clone(),
    );

    Harness {
        state,
        embedder,
        generator,
        notifier,
    }
}
