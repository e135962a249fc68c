//! In-memory mock of the Bot API's `getUpdates` endpoint.
//!
//! Serves `GET /bot<token>/getUpdates` with the real API's offset
//! semantics: an `offset` parameter confirms (drops) every update below it
//! before the pending ones are returned. A `POST /updates` hook lets tests
//! and manual runs enqueue updates, standing in for real users messaging
//! the bot. Update ids are assigned monotonically starting at 1.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Update {
    pub update_id: u64,
    pub message: Message,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub message_id: u64,
    pub text: String,
}

/// The envelope the real API wraps every `getUpdates` response in.
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatesResponse {
    pub ok: bool,
    pub result: Vec<Update>,
}

#[derive(Deserialize)]
pub struct PushMessage {
    pub text: String,
}

#[derive(Deserialize)]
pub struct GetUpdatesParams {
    pub offset: Option<u64>,
}

/// Pending updates plus the id counter.
#[derive(Debug, Default)]
pub struct Inbox {
    next_update_id: u64,
    updates: Vec<Update>,
}

impl Inbox {
    fn push(&mut self, text: String) -> Update {
        self.next_update_id += 1;
        let update = Update {
            update_id: self.next_update_id,
            message: Message {
                message_id: self.next_update_id,
                text,
            },
        };
        self.updates.push(update.clone());
        update
    }

    /// Drop every update the client has confirmed by polling past it.
    fn confirm(&mut self, offset: u64) {
        self.updates.retain(|u| u.update_id >= offset);
    }

    fn pending(&self) -> Vec<Update> {
        self.updates.clone()
    }
}

pub type Db = Arc<RwLock<Inbox>>;

pub fn app() -> Router {
    let db = Db::default();
    Router::new()
        .route("/updates", post(push_update))
        .route("/{bot_path}/getUpdates", get(get_updates))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_updates(
    State(db): State<Db>,
    Path(bot_path): Path<String>,
    Query(params): Query<GetUpdatesParams>,
) -> Result<Json<UpdatesResponse>, StatusCode> {
    // The real path shape is `bot<token>`; anything else is not a bot route.
    if !bot_path.starts_with("bot") || bot_path.len() == 3 {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut inbox = db.write().await;
    if let Some(offset) = params.offset {
        inbox.confirm(offset);
    }
    Ok(Json(UpdatesResponse {
        ok: true,
        result: inbox.pending(),
    }))
}

async fn push_update(
    State(db): State<Db>,
    Json(input): Json<PushMessage>,
) -> (StatusCode, Json<Update>) {
    let mut inbox = db.write().await;
    let update = inbox.push(input.text);
    (StatusCode::CREATED, Json(update))
}
