//! Route handlers. Each handler evaluates the access policy against the
//! freshly loaded configuration, calls the matching usecase, and shapes the
//! result into the wire contract external consumers already depend on.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{conversation::Conversation, message::Message};
use crate::http::error::ApiError;
use crate::infra::config::{BridgeConfig, ConfigStore};
use crate::usecases::access::{self, AccessReason, AccessRequest, AccessState};
use crate::usecases::directory::{self, DirectoryError, SearchHit};
use crate::usecases::fetch_messages::{self, FetchMessagesError};
use crate::usecases::send_message::{self, SendCommand, SendError};
use crate::usecases::transport::BackendTransport;
use crate::usecases::whitelist;

#[derive(Clone)]
pub struct AppState {
    pub transport: Arc<dyn BackendTransport>,
    pub store: Arc<dyn ConfigStore>,
}

#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    token: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SendBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ToggleWhitelistBody {
    use_whitelist: bool,
}

#[derive(Debug, Deserialize)]
pub struct WhitelistEntryBody {
    chat_id: ChatIdParam,
}

/// Whitelist mutation bodies historically carried the id either as a JSON
/// number or as a string scraped from markup; both are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChatIdParam {
    Number(i64),
    Text(String),
}

impl ChatIdParam {
    fn resolve(&self) -> Option<i64> {
        match self {
            Self::Number(id) => Some(*id),
            Self::Text(raw) => raw.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    first_name: String,
    last_name: String,
    id: i64,
    isactivate: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatEntry {
    id: i64,
    title: String,
    username: String,
    #[serde(rename = "type")]
    kind: &'static str,
    is_self: bool,
    pinned: bool,
}

impl ChatEntry {
    fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id,
            title: conversation.title.clone(),
            username: conversation.username.clone(),
            kind: conversation.kind.label(),
            is_self: conversation.is_self,
            pinned: conversation.pinned,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse {
    page: usize,
    total_pages: usize,
    chats: Vec<ChatEntry>,
}

#[derive(Debug, Serialize)]
pub struct SearchEntry {
    id: Option<i64>,
    title: String,
    username: String,
    #[serde(rename = "type")]
    kind: &'static str,
}

impl SearchEntry {
    fn from_hit(hit: &SearchHit) -> Self {
        Self {
            id: hit.id,
            title: hit.title.clone(),
            username: hit.username.clone(),
            kind: hit.kind.map(|kind| kind.label()).unwrap_or("none"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageEntry {
    id: i32,
    date: i64,
    sender: String,
    text: String,
    reactions: String,
    you: bool,
}

impl MessageEntry {
    fn from_message(message: &Message) -> Self {
        Self {
            id: message.id,
            date: message.timestamp,
            sender: message.sender_label.clone(),
            text: message.body.clone(),
            reactions: message.reactions_summary.clone(),
            you: message.is_own,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SendResponse {
    success: bool,
    message_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u8>,
}

pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<MeResponse>, ApiError> {
    gate(&state, &headers, query.token.as_deref(), None).await?;

    let account = state.transport.current_account().await.map_err(|err| {
        ApiError::backend_unavailable("Failed to fetch user data", err.to_string())
    })?;

    Ok(Json(MeResponse {
        first_name: account.first_name,
        last_name: account.last_name,
        id: account.id,
        isactivate: true,
    }))
}

pub async fn list_chats(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Vec<ChatEntry>>, ApiError> {
    let config = gate(&state, &headers, query.token.as_deref(), None).await?;

    let conversations = directory::list(state.transport.as_ref(), &config.access.whitelist_config())
        .await
        .map_err(|err| directory_error("Failed to fetch chat data", err))?;

    Ok(Json(conversations.iter().map(ChatEntry::from_conversation).collect()))
}

/// Pages are 1-based; a path segment that is not a number falls back to the
/// first page rather than failing the request.
pub async fn chats_page(
    State(state): State<AppState>,
    Path(page): Path<String>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let config = gate(&state, &headers, query.token.as_deref(), None).await?;
    let requested = page.parse().unwrap_or(1);

    let page = directory::page(
        state.transport.as_ref(),
        &config.access.whitelist_config(),
        requested,
    )
    .await
    .map_err(|err| directory_error("Failed to fetch paginated chat data", err))?;

    Ok(Json(PageResponse {
        page: page.page,
        total_pages: page.total_pages,
        chats: page.items.iter().map(ChatEntry::from_conversation).collect(),
    }))
}

pub async fn search_chats(
    State(state): State<AppState>,
    Path(query_text): Path<String>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<Vec<SearchEntry>>, ApiError> {
    let config = gate(&state, &headers, query.token.as_deref(), None).await?;

    let hits = directory::search(
        state.transport.as_ref(),
        &config.access.whitelist_config(),
        &query_text,
    )
    .await
    .map_err(|err| directory_error("Failed to search chats", err))?;

    Ok(Json(hits.iter().map(SearchEntry::from_hit).collect()))
}

pub async fn chat_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    headers: HeaderMap,
    Query(query): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageEntry>>, ApiError> {
    gate(&state, &headers, query.token.as_deref(), Some(chat_id)).await?;

    let account = state.transport.current_account().await.map_err(|err| {
        ApiError::backend_unavailable("Failed to fetch chat messages", err.to_string())
    })?;

    let messages = fetch_messages::fetch_recent(
        state.transport.as_ref(),
        chat_id,
        query.limit.unwrap_or(0),
        account.id,
    )
    .await
    .map_err(|err| match err {
        FetchMessagesError::ConversationNotFound => {
            ApiError::backend_unavailable("Failed to fetch chat messages", "chat not found".to_owned())
        }
        FetchMessagesError::Unavailable(details) => {
            ApiError::backend_unavailable("Failed to fetch chat messages", details)
        }
    })?;

    Ok(Json(messages.iter().map(MessageEntry::from_message).collect()))
}

pub async fn send_to_chat(
    State(state): State<AppState>,
    Path(chat_id): Path<i64>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    Json(body): Json<SendBody>,
) -> Result<Json<SendResponse>, ApiError> {
    gate(&state, &headers, query.token.as_deref(), Some(chat_id)).await?;

    let sent = dispatch_send(&state, chat_id, body.message.unwrap_or_default()).await?;

    Ok(Json(SendResponse {
        success: true,
        message_id: sent.message_id,
        status: None,
    }))
}

/// Legacy GET send route; kept for consumers that cannot issue a POST.
/// Its responses carry a numeric `status` flag on top of the regular shape.
pub async fn send_to_chat_inline(
    State(state): State<AppState>,
    Path((chat_id, text)): Path<(i64, String)>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
) -> Result<Json<SendResponse>, ApiError> {
    gate(&state, &headers, query.token.as_deref(), Some(chat_id))
        .await
        .map_err(ApiError::with_status_flag)?;

    let sent = dispatch_send(&state, chat_id, text)
        .await
        .map_err(ApiError::with_status_flag)?;

    Ok(Json(SendResponse {
        success: true,
        message_id: sent.message_id,
        status: Some(1),
    }))
}

pub async fn toggle_whitelist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    Json(body): Json<ToggleWhitelistBody>,
) -> Result<StatusCode, ApiError> {
    gate(&state, &headers, query.token.as_deref(), None).await?;

    mutate_whitelist(&state, |wl| whitelist::set_enforcement(wl, body.use_whitelist))?;

    Ok(StatusCode::OK)
}

pub async fn add_to_whitelist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    Json(body): Json<WhitelistEntryBody>,
) -> Result<StatusCode, ApiError> {
    gate(&state, &headers, query.token.as_deref(), None).await?;
    let chat_id = resolve_chat_id(&body.chat_id)?;

    mutate_whitelist(&state, |wl| whitelist::add(wl, chat_id))?;

    Ok(StatusCode::OK)
}

pub async fn remove_from_whitelist(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenQuery>,
    Json(body): Json<WhitelistEntryBody>,
) -> Result<StatusCode, ApiError> {
    gate(&state, &headers, query.token.as_deref(), None).await?;
    let chat_id = resolve_chat_id(&body.chat_id)?;

    mutate_whitelist(&state, |wl| whitelist::remove(wl, chat_id))?;

    Ok(StatusCode::OK)
}

/// Evaluates both access gates against the freshly loaded configuration,
/// persisting a bootstrapped token before any response leaves the handler.
/// Returns the loaded configuration so handlers reuse the same snapshot.
async fn gate(
    state: &AppState,
    headers: &HeaderMap,
    query_token: Option<&str>,
    target: Option<i64>,
) -> Result<BridgeConfig, ApiError> {
    let config = state.store.load().map_err(|err| {
        ApiError::backend_unavailable("Failed to load configuration", err.to_string())
    })?;

    let presented = presented_token(headers, query_token);
    let whitelist = config.access.whitelist_config();
    let auth = access::authorize(
        AccessRequest {
            bearer_token: presented,
            target_conversation_id: target,
        },
        AccessState {
            require_token: config.access.require_token,
            configured_token: config.access.token.as_deref(),
            whitelist: &whitelist,
        },
    );

    if let Some(token) = auth.bootstrap_token {
        state
            .store
            .update(&mut |config| {
                // First write wins if another request bootstrapped concurrently.
                if config.access.token.is_none() {
                    config.access.token = Some(token.clone());
                }
            })
            .map_err(|err| {
                ApiError::backend_unavailable("Failed to persist access token", err.to_string())
            })?;
        tracing::info!("access token bootstrapped from first authorized request");
    }

    match auth.decision.reason {
        AccessReason::Ok => Ok(config),
        AccessReason::Unauthorized => Err(ApiError::unauthorized()),
        AccessReason::Forbidden => Err(ApiError::forbidden()),
    }
}

/// `Authorization: Bearer <token>` wins over the `?token=` query parameter.
fn presented_token<'a>(headers: &'a HeaderMap, query_token: Option<&'a str>) -> Option<&'a str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .or(query_token)
}

async fn dispatch_send(
    state: &AppState,
    chat_id: i64,
    body: String,
) -> Result<send_message::SentMessage, ApiError> {
    send_message::send(
        state.transport.as_ref(),
        SendCommand {
            conversation_id: chat_id,
            body,
        },
    )
    .await
    .map_err(|err| match err {
        SendError::EmptyBody => {
            ApiError::validation("Message text is required and must be a string.")
        }
        SendError::Rejected => ApiError::send_failed("Failed to send message."),
        SendError::ConversationNotFound => {
            ApiError::send_failed("An unexpected error occurred while sending the message.")
                .with_details("chat not found".to_owned())
        }
        SendError::Unavailable(details) => {
            ApiError::send_failed("An unexpected error occurred while sending the message.")
                .with_details(details)
        }
    })
}

fn resolve_chat_id(param: &ChatIdParam) -> Result<i64, ApiError> {
    param
        .resolve()
        .ok_or_else(|| ApiError::validation("chat_id must be a number"))
}

fn mutate_whitelist(
    state: &AppState,
    mut apply: impl FnMut(&mut access::WhitelistConfig) -> bool,
) -> Result<(), ApiError> {
    state
        .store
        .update(&mut |config| {
            let mut wl = config.access.whitelist_config();
            apply(&mut wl);
            config.access.apply_whitelist(&wl);
        })
        .map_err(|err| {
            ApiError::backend_unavailable("Failed to update whitelist", err.to_string())
        })?;

    Ok(())
}

fn directory_error(message: &str, error: DirectoryError) -> ApiError {
    match error {
        DirectoryError::Unavailable(details) => ApiError::directory_unavailable(message, details),
    }
}
