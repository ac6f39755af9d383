use async_trait::async_trait;
use namesmith_application::ports::{
    ClaimedJob, JobConsumer, JobFunc, JobHandle, JobSpec, JobStatus, WorkQueue,
};
use namesmith_domain::DomainError;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;
use uuid::Uuid;

/// How long finished job results stay readable before expiring.
const RESULT_TTL_SECS: u64 = 600;

#[derive(Debug, Serialize, Deserialize)]
struct JobEnvelope {
    id: String,
    func: JobFunc,
    args: Value,
    timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ResultEnvelope {
    ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Redis-backed work queue: a list per queue for jobs, one key per job for
/// its result, and `SET NX EX` for the recheck lock primitive.
pub struct RedisWorkQueue {
    conn: ConnectionManager,
    queue_key: String,
    result_prefix: String,
}

impl RedisWorkQueue {
    pub async fn connect(redis_url: &str, queue_name: &str) -> Result<Self, DomainError> {
        let client = ::redis::Client::open(redis_url)
            .map_err(|e| DomainError::QueueProtocol(format!("invalid redis url: {e}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(map_redis_err)?;
        Ok(Self {
            conn,
            queue_key: format!("namesmith:queue:{queue_name}"),
            result_prefix: "namesmith:result:".to_string(),
        })
    }

    fn result_key(&self, id: &str) -> String {
        format!("{}{}", self.result_prefix, id)
    }
}

fn map_redis_err(e: ::redis::RedisError) -> DomainError {
    if e.is_io_error() || e.is_connection_refusal() || e.is_timeout() || e.is_connection_dropped() {
        DomainError::QueueUnavailable(e.to_string())
    } else {
        DomainError::QueueProtocol(e.to_string())
    }
}

#[async_trait]
impl WorkQueue for RedisWorkQueue {
    #[instrument(skip(self, spec), fields(func = spec.func.as_str()))]
    async fn enqueue(&self, spec: JobSpec) -> Result<JobHandle, DomainError> {
        let envelope = JobEnvelope {
            id: Uuid::new_v4().to_string(),
            func: spec.func,
            args: spec.args,
            timeout_secs: spec.timeout.as_secs(),
        };
        let payload = serde_json::to_string(&envelope)
            .map_err(|e| DomainError::QueueProtocol(e.to_string()))?;

        let mut conn = self.conn.clone();
        let _: () = conn
            .lpush(&self.queue_key, payload)
            .await
            .map_err(map_redis_err)?;
        Ok(JobHandle(envelope.id))
    }

    async fn job_status(&self, handle: &JobHandle) -> Result<JobStatus, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.result_key(&handle.0))
            .await
            .map_err(map_redis_err)?;

        let Some(raw) = raw else {
            return Ok(JobStatus::Pending);
        };
        let envelope: ResultEnvelope = serde_json::from_str(&raw)
            .map_err(|e| DomainError::QueueProtocol(format!("bad result payload: {e}")))?;

        if envelope.ok {
            Ok(JobStatus::Finished(envelope.result.unwrap_or(Value::Null)))
        } else {
            Ok(JobStatus::Failed(
                envelope.error.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }

    async fn queue_depth(&self) -> Result<u64, DomainError> {
        let mut conn = self.conn.clone();
        let depth: u64 = conn.llen(&self.queue_key).await.map_err(map_redis_err)?;
        Ok(depth)
    }

    async fn set_if_absent(&self, key: &str, ttl: Duration) -> Result<bool, DomainError> {
        let mut conn = self.conn.clone();
        let acquired: Option<String> = ::redis::cmd("SET")
            .arg(key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(map_redis_err)?;
        Ok(acquired.is_some())
    }

    async fn delete(&self, key: &str) -> Result<(), DomainError> {
        let mut conn = self.conn.clone();
        let _: () = conn.del(key).await.map_err(map_redis_err)?;
        Ok(())
    }
}

#[async_trait]
impl JobConsumer for RedisWorkQueue {
    async fn claim(&self, poll_timeout: Duration) -> Result<Option<ClaimedJob>, DomainError> {
        let mut conn = self.conn.clone();
        let popped: Option<(String, String)> = conn
            .brpop(&self.queue_key, poll_timeout.as_secs_f64())
            .await
            .map_err(map_redis_err)?;

        let Some((_, payload)) = popped else {
            return Ok(None);
        };
        let envelope: JobEnvelope = serde_json::from_str(&payload)
            .map_err(|e| DomainError::QueueProtocol(format!("bad job payload: {e}")))?;

        Ok(Some(ClaimedJob {
            handle: JobHandle(envelope.id),
            func: envelope.func,
            args: envelope.args,
            timeout: Duration::from_secs(envelope.timeout_secs),
        }))
    }

    async fn complete(&self, job: &ClaimedJob, result: Value) -> Result<(), DomainError> {
        let envelope = ResultEnvelope {
            ok: true,
            result: Some(result),
            error: None,
        };
        self.write_result(&job.handle, &envelope).await
    }

    async fn fail(&self, job: &ClaimedJob, error: &str) -> Result<(), DomainError> {
        let envelope = ResultEnvelope {
            ok: false,
            result: None,
            error: Some(error.to_string()),
        };
        self.write_result(&job.handle, &envelope).await
    }
}

impl RedisWorkQueue {
    async fn write_result(
        &self,
        handle: &JobHandle,
        envelope: &ResultEnvelope,
    ) -> Result<(), DomainError> {
        let payload = serde_json::to_string(envelope)
            .map_err(|e| DomainError::QueueProtocol(e.to_string()))?;
        let mut conn = self.conn.clone();
        let _: () = conn
            .set_ex(self.result_key(&handle.0), payload, RESULT_TTL_SECS)
            .await
            .map_err(map_redis_err)?;
        Ok(())
    }
}
