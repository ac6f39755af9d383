use crate::ports::{
    DomainRepository, EventSink, GenerationRequest, SuggestionEntry, SuggestionGenerator,
    SuggestionRepository, WorkQueue,
};
use crate::services::MetricsTracker;
use crate::use_cases::DispatchChecksUseCase;
use chrono::Utc;
use namesmith_domain::{
    CandidateDomain, DomainError, DomainStatus, PromptType, SimilarContext, Suggestion,
    UserPreferences,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// One user-facing suggestion request.
#[derive(Debug, Clone)]
pub struct SuggestRequest {
    pub description: String,
    pub target_count: u32,
    pub prompt_type: PromptType,
    pub user_id: Option<String>,
    pub preferences: Option<UserPreferences>,
    pub similar_to: Option<SimilarContext>,
}

/// Drives the generate-and-check retry loop until the caller's target count
/// of available domains is met or the retry budget is spent.
///
/// Batch and streaming share this loop; they differ only in the sink
/// handed in. Partial results are success: the accumulator is always
/// returned, and callers compare `available` entries against the target.
pub struct SuggestDomainsUseCase {
    generator: Arc<dyn SuggestionGenerator>,
    dispatcher: Arc<DispatchChecksUseCase>,
    queue: Arc<dyn WorkQueue>,
    domains: Arc<dyn DomainRepository>,
    suggestions: Arc<dyn SuggestionRepository>,
    max_retries: u32,
}

/// Why the loop stopped emitting.
enum LoopExit {
    Finished,
    ClientGone,
}

impl SuggestDomainsUseCase {
    pub fn new(
        generator: Arc<dyn SuggestionGenerator>,
        dispatcher: Arc<DispatchChecksUseCase>,
        queue: Arc<dyn WorkQueue>,
        domains: Arc<dyn DomainRepository>,
        suggestions: Arc<dyn SuggestionRepository>,
        max_retries: u32,
    ) -> Self {
        Self {
            generator,
            dispatcher,
            queue,
            domains,
            suggestions,
            max_retries,
        }
    }

    /// Buffered mode: run the loop silently and return the accumulator.
    /// The suggestion row is created at the terminal flush.
    pub async fn execute(
        &self,
        request: &SuggestRequest,
    ) -> Result<Vec<SuggestionEntry>, DomainError> {
        let mut sink = crate::ports::BufferingSink;
        self.run(request, &mut sink, false).await
    }

    /// Streaming mode: emit incremental events into `sink`. The suggestion
    /// row is created up front so events can be attributed to it.
    pub async fn execute_streaming(
        &self,
        request: &SuggestRequest,
        sink: &mut dyn EventSink,
    ) -> Result<Vec<SuggestionEntry>, DomainError> {
        self.run(request, sink, true).await
    }

    #[instrument(skip(self, request, sink), fields(target = request.target_count, prompt = request.prompt_type.id()))]
    async fn run(
        &self,
        request: &SuggestRequest,
        sink: &mut dyn EventSink,
        streaming: bool,
    ) -> Result<Vec<SuggestionEntry>, DomainError> {
        let tracker = Arc::new(MetricsTracker::new());
        if let Ok(depth) = self.queue.queue_depth().await {
            tracker.set_queue_depth(depth);
        }

        let mut suggestion_id = if streaming {
            self.create_suggestion_row(request).await
        } else {
            None
        };

        let client_connected = sink.started().await.is_ok();

        let mut accumulated: Vec<SuggestionEntry> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut available_count: u32 = 0;

        let outcome = if !client_connected {
            Ok(LoopExit::ClientGone)
        } else if request.target_count == 0 {
            Ok(LoopExit::Finished)
        } else {
            self.run_loop(
                request,
                sink,
                &tracker,
                &mut accumulated,
                &mut index,
                &mut available_count,
            )
            .await
        };

        match outcome {
            Ok(exit) => {
                if matches!(exit, LoopExit::Finished) {
                    if sink.completed(&accumulated).await.is_err() {
                        debug!("Client disconnected before completion event");
                    }
                }
                info!(
                    total = accumulated.len(),
                    available = available_count,
                    target = request.target_count,
                    "Suggestion request finished"
                );
                if suggestion_id.is_none() {
                    suggestion_id = self.create_suggestion_row(request).await;
                }
                self.flush_background(request, suggestion_id, &accumulated, tracker);
                Ok(accumulated)
            }
            Err(error) => {
                tracker.add_error(error.to_string());
                if sink.failed(&error).await.is_err() {
                    debug!("Client disconnected before error event");
                }
                if suggestion_id.is_none() {
                    suggestion_id = self.create_suggestion_row(request).await;
                }
                self.flush_background(request, suggestion_id, &accumulated, tracker);
                Err(error)
            }
        }
    }

    async fn run_loop(
        &self,
        request: &SuggestRequest,
        sink: &mut dyn EventSink,
        tracker: &MetricsTracker,
        accumulated: &mut Vec<SuggestionEntry>,
        index: &mut HashMap<String, usize>,
        available_count: &mut u32,
    ) -> Result<LoopExit, DomainError> {
        let target = request.target_count;
        let mut retries = 0;

        while retries < self.max_retries && *available_count < target {
            tracker.start_timer("llm");
            let generated = self
                .generator
                .generate(&GenerationRequest {
                    description: request.description.clone(),
                    target_count: target,
                    prompt_type: request.prompt_type,
                    preferences: request.preferences.clone(),
                    similar_to: request.similar_to.clone(),
                })
                .await;
            tracker.stop_timer("llm");
            tracker.increment_llm_call();

            let batch = generated?;
            tracker.add_llm_tokens(batch.usage);
            tracker.add_domains_generated(&batch.domains);

            // Entries already accumulated as available are settled; they are
            // never re-checked and never replaced.
            let to_check: Vec<String> = batch
                .domains
                .iter()
                .filter(|fqdn| match index.get(fqdn.as_str()) {
                    Some(&i) => accumulated[i].status != DomainStatus::Available,
                    None => true,
                })
                .cloned()
                .collect();

            if to_check.is_empty() {
                retries += 1;
                tracker.increment_retry();
                continue;
            }

            tracker.start_timer("worker");
            let dispatch = self.dispatcher.execute(&to_check).await;
            tracker.stop_timer("worker");
            tracker.add_worker_jobs(dispatch.jobs_dispatched);

            for fqdn in &batch.domains {
                let checked = dispatch.statuses.contains_key(fqdn);
                if !checked && !index.contains_key(fqdn) {
                    continue;
                }
                let status = dispatch
                    .statuses
                    .get(fqdn)
                    .map(|s| s.into_domain_status())
                    .unwrap_or(DomainStatus::Unknown);

                if let Some(&i) = index.get(fqdn) {
                    let previous = accumulated[i].status;
                    if previous != DomainStatus::Available && status == DomainStatus::Available {
                        accumulated[i].status = DomainStatus::Available;
                        accumulated[i].updated_at = Utc::now();
                        *available_count += 1;
                        tracker.replace_domain_status(previous, DomainStatus::Available);
                        tracker.mark_first_suggestion();

                        let update = accumulated[i].clone();
                        let total = accumulated.len() as u32;
                        if sink
                            .suggestions(&[], &[update], *available_count, total)
                            .await
                            .is_err()
                        {
                            return Ok(LoopExit::ClientGone);
                        }
                    }
                    continue;
                }

                // Target reached: extra availables are dropped, but the slot
                // math above still lets upgrades overflow the target.
                if status == DomainStatus::Available && *available_count >= target {
                    continue;
                }

                let entry = new_entry(fqdn, status);
                index.insert(fqdn.clone(), accumulated.len());
                accumulated.push(entry.clone());
                tracker.add_domain_status(status);
                if status == DomainStatus::Available {
                    *available_count += 1;
                    tracker.mark_first_suggestion();
                }

                let total = accumulated.len() as u32;
                if sink
                    .suggestions(&[entry], &[], *available_count, total)
                    .await
                    .is_err()
                {
                    return Ok(LoopExit::ClientGone);
                }
            }

            retries += 1;
            tracker.increment_retry();
        }

        Ok(LoopExit::Finished)
    }

    /// Insert the suggestion row. Persistence trouble is logged and the
    /// request carries on without an id.
    async fn create_suggestion_row(&self, request: &SuggestRequest) -> Option<i64> {
        let row = Suggestion {
            id: None,
            description: request.description.clone(),
            target_count: request.target_count,
            model: self.generator.model().to_string(),
            prompt_id: request.prompt_type.id().to_string(),
            user_id: request.user_id.clone(),
            created_at: None,
        };
        match self.suggestions.create(&row).await {
            Ok(id) => Some(id),
            Err(e) => {
                warn!(error = %e, "Failed to create suggestion row");
                None
            }
        }
    }

    /// Persist domains and metrics on a detached task so the response does
    /// not wait on the database and the writes survive the handler.
    fn flush_background(
        &self,
        request: &SuggestRequest,
        suggestion_id: Option<i64>,
        accumulated: &[SuggestionEntry],
        tracker: Arc<MetricsTracker>,
    ) {
        let domains = self.domains.clone();
        let suggestions = self.suggestions.clone();
        let entries = accumulated.to_vec();
        let target_count = request.target_count;

        tokio::spawn(async move {
            for entry in &entries {
                let candidate = match CandidateDomain::parse(&entry.domain) {
                    Ok(candidate) => candidate,
                    Err(e) => {
                        debug!(domain = %entry.domain, error = %e, "Skipping unparseable entry");
                        continue;
                    }
                };
                if let Err(e) = domains
                    .upsert_status(&candidate, entry.status, suggestion_id)
                    .await
                {
                    warn!(domain = %entry.domain, error = %e, "Failed to store domain");
                }
            }

            if let Some(id) = suggestion_id {
                tracker.save(&*suggestions, id, target_count).await;
            }
        });
    }
}

fn new_entry(fqdn: &str, status: DomainStatus) -> SuggestionEntry {
    let now = Utc::now();
    let tld = CandidateDomain::parse(fqdn)
        .map(|c| c.public_suffix)
        .unwrap_or_else(|_| fqdn.rsplit('.').next().unwrap_or("").to_string());
    SuggestionEntry {
        domain: fqdn.to_string(),
        tld,
        status,
        created_at: now,
        updated_at: now,
    }
}
