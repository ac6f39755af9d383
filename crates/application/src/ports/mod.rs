mod domain_repository;
mod event_sink;
mod prober;
mod suggestion_generator;
mod suggestion_repository;
mod telemetry_repository;
mod work_queue;

pub use domain_repository::DomainRepository;
pub use event_sink::{BufferingSink, EventSink, SuggestionEntry};
pub use prober::DomainProber;
pub use suggestion_generator::{GeneratedBatch, GenerationRequest, SuggestionGenerator, TokenUsage};
pub use suggestion_repository::SuggestionRepository;
pub use telemetry_repository::{WorkerTelemetryRepository, WorkerUpdate};
pub use work_queue::{ClaimedJob, JobConsumer, JobFunc, JobHandle, JobSpec, JobStatus, WorkQueue};
