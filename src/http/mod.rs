//! HTTP facade: the axum router and the JSON wire contract.

mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/getme", get(handlers::get_me))
        .route("/api/chats", get(handlers::list_chats))
        .route("/api/chats/page/{page}", get(handlers::chats_page))
        .route("/api/chats/search/{query}", get(handlers::search_chats))
        .route("/api/chat/{chat_id}", get(handlers::chat_messages))
        .route("/api/chat/{chat_id}/send", post(handlers::send_to_chat))
        .route(
            "/api/chatformsg/{chat_id}/{text}",
            get(handlers::send_to_chat_inline),
        )
        .route("/toggle-whitelist", post(handlers::toggle_whitelist))
        .route("/add-to-whitelist", post(handlers::add_to_whitelist))
        .route("/remove-from-whitelist", post(handlers::remove_from_whitelist))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
