use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    response::Json,
    routing::{get, post},
    Router,
};
use futures::Stream;
use std::convert::Infallible;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    dto::{DomainSuggestionResponse, SuggestDomainsRequest, SuggestResponse, SuggestStreamQuery},
    errors::ApiError,
    state::AppState,
    streaming::ChannelEventSink,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/domains/suggest", post(suggest_domains))
        .route("/domains/suggest/stream", get(suggest_domains_stream))
}

async fn suggest_domains(
    State(state): State<AppState>,
    Json(request): Json<SuggestDomainsRequest>,
) -> Result<Json<SuggestResponse>, ApiError> {
    let request = request.into_request()?;
    info!(
        target = request.target_count,
        prompt = request.prompt_type.id(),
        "Buffered suggestion request"
    );

    let entries = state.suggest.execute(&request).await?;
    Ok(Json(SuggestResponse {
        total: entries.len(),
        suggestions: entries
            .iter()
            .map(DomainSuggestionResponse::from_entry)
            .collect(),
    }))
}

async fn suggest_domains_stream(
    State(state): State<AppState>,
    Query(query): Query<SuggestStreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let request = query.into_request()?;
    info!(
        target = request.target_count,
        prompt = request.prompt_type.id(),
        "Streaming suggestion request"
    );

    let (tx, rx) = mpsc::channel::<Event>(32);
    let suggest = state.suggest.clone();
    tokio::spawn(async move {
        let mut sink = ChannelEventSink::new(tx);
        if let Err(e) = suggest.execute_streaming(&request, &mut sink).await {
            debug!(error = %e, "Streaming request ended with error");
        }
    });

    let stream = futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|event| (Ok(event), rx))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
