mod groq;

pub use groq::GroqSuggestor;
