//! POST /api/chat/:id/stream - the chat reply as server-sent events.
//!
//! Events, in order: `{"pending":true}` before an escalation, the reply as
//! `{"content":..}` chunks, `{"document":..}` after an update, then a final
//! `[DONE]`. A failure emits `{"error":"Streaming failed"}` before `[DONE]`.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use tokio::sync::mpsc;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    AnswerQueryCommand, AnswerQueryError, AnswerQueryHandler, AnswerQueryResult,
};

use super::dto::{ChatRequest, StreamPayload};
use super::handlers::to_command;

/// Terminal SSE data marker.
pub const DONE_MARKER: &str = "[DONE]";

pub async fn stream_chat(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ChatRequest>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let cmd = to_command(&id, req)?;
    let (tx, rx) = mpsc::channel::<Event>(16);
    tokio::spawn(produce(Arc::clone(&state.answers), cmd, tx));

    let events = stream::unfold(rx, |mut rx| async move {
        rx.recv()
            .await
            .map(|event| (Ok::<Event, Infallible>(event), rx))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

async fn produce(answers: Arc<AnswerQueryHandler>, cmd: AnswerQueryCommand, tx: mpsc::Sender<Event>) {
    let report_id = cmd.report_id.clone();
    let result = answer_with_pending(&answers, cmd, &tx).await;

    let mut payloads = Vec::new();
    match result {
        Ok(Some(result)) => {
            payloads.extend(reply_chunks(&result.reply).map(|chunk| StreamPayload::Content {
                content: chunk.to_string(),
            }));
            if let Some(document) = result.document {
                payloads.push(StreamPayload::Document { document });
            }
        }
        Ok(None) => return,
        Err(err) => {
            tracing::warn!(report_id = %report_id, error = %err, kind = err.kind(), "Streaming chat failed");
            payloads.push(StreamPayload::failed());
        }
    }

    for payload in &payloads {
        if tx.send(event(payload)).await.is_err() {
            return;
        }
    }
    let _ = tx.send(Event::default().data(DONE_MARKER)).await;
}

/// Routes and answers, announcing escalations before the retrieval call.
/// `Ok(None)` means the client disconnected.
async fn answer_with_pending(
    answers: &AnswerQueryHandler,
    cmd: AnswerQueryCommand,
    tx: &mpsc::Sender<Event>,
) -> Result<Option<AnswerQueryResult>, AnswerQueryError> {
    let routed = answers.route(cmd).await?;
    if routed.needs_escalation() && tx.send(event(&StreamPayload::pending())).await.is_err() {
        return Ok(None);
    }
    answers.answer(routed).await.map(Some)
}

fn event(payload: &StreamPayload) -> Event {
    Event::default().json_data(payload).unwrap_or_else(|err| {
        tracing::error!(error = %err, "Failed to encode SSE payload");
        Event::default().data(r#"{"error":"Streaming failed"}"#)
    })
}

/// Word-sized pieces that concatenate back to the reply.
fn reply_chunks(reply: &str) -> impl Iterator<Item = &str> {
    reply.split_inclusive(' ')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_concatenate_to_reply() {
        let reply = "The property has 25 units.";
        let chunks: Vec<&str> = reply_chunks(reply).collect();
        assert_eq!(chunks, vec!["The ", "property ", "has ", "25 ", "units."]);
        assert_eq!(chunks.concat(), reply);
    }

    #[test]
    fn empty_reply_has_no_chunks() {
        assert_eq!(reply_chunks("").count(), 0);
    }
}
