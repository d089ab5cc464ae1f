//! # medai
//!
//! Retrieval-augmented question answering over a medical reference book.
//!
//! ## Architecture
//!
//! ```text
//!   offline (medai-index)                 online (medai)
//!
//!   ┌──────────────┐              ┌───────────────────────┐
//!   │  PDF / text  │              │  POST /ask {question} │
//!   └──────┬───────┘              └───────────┬───────────┘
//!          ▼                                  ▼
//!   ┌──────────────┐              ┌───────────────────────┐
//!   │ Split 1000 / │              │   Embed question      │
//!   │ overlap 20   │              └───────────┬───────────┘
//!   └──────┬───────┘                          ▼
//!          ▼                      ┌───────────────────────┐
//!   ┌──────────────┐   index.json │  Cosine top-k (k=4)   │
//!   │ Embed chunks ├─────────────►│  over loaded index    │
//!   └──────────────┘              └───────────┬───────────┘
//!                                             ▼
//!                                 ┌───────────────────────┐
//!                                 │ Context + question →  │
//!                                 │ prompt → LLM → answer │
//!                                 └───────────────────────┘
//! ```
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for server, models and notifications
//! - [`models`] - Shared data types: `Passage`, request/response bodies, chat turns
//! - [`chunking`] - Document loading (PDF, text) and the recursive character splitter
//! - [`index`] - Persisted vector index with cosine similarity search
//! - [`ingest`] - Offline pipeline: load → split → embed → save
//! - [`llm`] - Embedding and generation clients for Ollama, OpenAI-compatible APIs and Gemini
//! - [`rag`] - Context assembly, prompt template and the answering chain
//! - [`logsink`] - In-memory log tail with error notification
//! - [`notify`] - Telegram notifier
//! - [`api`] - Axum HTTP handlers for `/`, `/ask` and `/logs`
//! - [`state`] - Shared application state built once at startup
//! - [`client`] - Chat client used by the terminal UI

pub mod api;
pub mod chunking;
pub mod client;
pub mod config;
pub mod index;
pub mod ingest;
pub mod llm;
pub mod logsink;
pub mod models;
pub mod notify;
pub mod rag;
pub mod state;
