//! Namesmith Infrastructure Layer
//!
//! Concrete adapters behind the application ports: the Redis work queue and
//! its in-memory twin, the Groq completion client, the DNS+WHOIS prober,
//! and the SQLite repositories.
pub mod checker;
pub mod database;
pub mod llm;
pub mod queue;
pub mod repositories;

pub use checker::DnsWhoisProber;
pub use llm::GroqSuggestor;
pub use queue::{InMemoryWorkQueue, RedisWorkQueue};
