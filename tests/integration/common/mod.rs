#![allow(dead_code)]

use async_trait::async_trait;
use namesmith_application::ports::{
    DomainProber, GeneratedBatch, GenerationRequest, SuggestionGenerator, TokenUsage,
};
use namesmith_domain::{CheckStatus, DomainError};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Generator returning pre-scripted batches in order.
pub struct ScriptedGenerator {
    batches: Mutex<VecDeque<Vec<String>>>,
}

impl ScriptedGenerator {
    pub fn new(batches: &[&[&str]]) -> Self {
        Self {
            batches: Mutex::new(
                batches
                    .iter()
                    .map(|batch| batch.iter().map(|d| d.to_string()).collect())
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl SuggestionGenerator for ScriptedGenerator {
    async fn generate(&self, _request: &GenerationRequest) -> Result<GeneratedBatch, DomainError> {
        let domains = self
            .batches
            .lock()
            .unwrap()
            .pop_front()
            .expect("generator script exhausted");
        Ok(GeneratedBatch {
            domains,
            usage: TokenUsage {
                total: 42,
                prompt: 30,
                completion: 12,
            },
        })
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

/// Prober with a scripted answer table. Each probe of a name consumes the
/// next scripted status; the last one repeats. Unscripted names are
/// non-conclusive.
pub struct TableProber {
    statuses: Mutex<HashMap<String, VecDeque<CheckStatus>>>,
}

impl TableProber {
    pub fn new(entries: &[(&str, CheckStatus)]) -> Self {
        let mut statuses: HashMap<String, VecDeque<CheckStatus>> = HashMap::new();
        for (fqdn, status) in entries {
            statuses.entry(fqdn.to_string()).or_default().push_back(*status);
        }
        Self {
            statuses: Mutex::new(statuses),
        }
    }
}

#[async_trait]
impl DomainProber for TableProber {
    async fn check(&self, fqdn: &str) -> CheckStatus {
        let mut statuses = self.statuses.lock().unwrap();
        match statuses.get_mut(fqdn) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().copied().unwrap_or(CheckStatus::NonConclusive),
            None => CheckStatus::NonConclusive,
        }
    }
}
