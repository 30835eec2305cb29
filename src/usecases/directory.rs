//! Directory service: listing, pagination, and search over the normalized,
//! whitelist-filtered conversation snapshot.
//!
//! Every call fetches a fresh snapshot through the transport; the bridge
//! promises no cross-request consistency, the backend is the source of truth.

use crate::domain::conversation::{Conversation, ConversationKind};
use crate::usecases::access::{conversation_visible, WhitelistConfig};
use crate::usecases::normalize;
use crate::usecases::transport::{BackendError, BackendTransport};

/// Fixed page size of the paged listing.
pub const PAGE_SIZE: usize = 15;

/// Title of the search sentinel returned when nothing matches.
pub const NOT_FOUND_TITLE: &str = "Not found";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    /// The snapshot could not be fetched; no partial results are synthesized.
    Unavailable(String),
}

/// One fixed-size page of the filtered directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryPage {
    pub page: usize,
    pub total_pages: usize,
    pub items: Vec<Conversation>,
}

/// One search result. Search never returns an empty list: a miss yields a
/// single sentinel entry with no id and the literal `"Not found"` title,
/// which external consumers rely on receiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: Option<i64>,
    pub title: String,
    pub username: String,
    pub kind: Option<ConversationKind>,
}

impl SearchHit {
    fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            id: Some(conversation.id),
            title: conversation.title.clone(),
            username: conversation.username.clone(),
            kind: Some(conversation.kind),
        }
    }

    fn not_found() -> Self {
        Self {
            id: None,
            title: NOT_FOUND_TITLE.to_owned(),
            username: String::new(),
            kind: None,
        }
    }
}

/// Full filtered snapshot in backend order.
pub async fn list(
    transport: &dyn BackendTransport,
    whitelist: &WhitelistConfig,
) -> Result<Vec<Conversation>, DirectoryError> {
    snapshot(transport, whitelist).await
}

/// One page of the filtered snapshot. Pages are 1-based; anything below 1 is
/// coerced to the first page, anything past the end yields empty items with
/// the correctly computed page count.
pub async fn page(
    transport: &dyn BackendTransport,
    whitelist: &WhitelistConfig,
    page: usize,
) -> Result<DirectoryPage, DirectoryError> {
    let conversations = snapshot(transport, whitelist).await?;
    Ok(paginate(conversations, page))
}

/// Case-insensitive substring search over titles and usernames.
pub async fn search(
    transport: &dyn BackendTransport,
    whitelist: &WhitelistConfig,
    query: &str,
) -> Result<Vec<SearchHit>, DirectoryError> {
    let conversations = snapshot(transport, whitelist).await?;
    let query_lower = query.to_lowercase();

    let hits: Vec<SearchHit> = conversations
        .iter()
        .filter(|conversation| conversation.matches_query(&query_lower))
        .map(SearchHit::from_conversation)
        .collect();

    if hits.is_empty() {
        return Ok(vec![SearchHit::not_found()]);
    }

    Ok(hits)
}

async fn snapshot(
    transport: &dyn BackendTransport,
    whitelist: &WhitelistConfig,
) -> Result<Vec<Conversation>, DirectoryError> {
    let account = transport.current_account().await.map_err(map_backend_error)?;
    let entities = transport.list_dialogs().await.map_err(map_backend_error)?;

    let conversations = normalize::normalize(&entities, account.id)
        .into_iter()
        .filter(|conversation| conversation_visible(whitelist, conversation.id))
        .collect();

    Ok(conversations)
}

fn paginate(conversations: Vec<Conversation>, requested_page: usize) -> DirectoryPage {
    let page = requested_page.max(1);
    let total_pages = conversations.len().div_ceil(PAGE_SIZE);

    let items = conversations
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();

    DirectoryPage {
        page,
        total_pages,
        items,
    }
}

fn map_backend_error(error: BackendError) -> DirectoryError {
    DirectoryError::Unavailable(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::transport::{AccountInfo, RawEntity, RawMessage};
    use async_trait::async_trait;

    struct StubTransport {
        dialogs: Result<Vec<RawEntity>, BackendError>,
    }

    impl StubTransport {
        fn with_dialogs(dialogs: Vec<RawEntity>) -> Self {
            Self { dialogs: Ok(dialogs) }
        }

        fn unavailable() -> Self {
            Self {
                dialogs: Err(BackendError::Unavailable("timeout".to_owned())),
            }
        }
    }

    #[async_trait]
    impl BackendTransport for StubTransport {
        async fn current_account(&self) -> Result<AccountInfo, BackendError> {
            Ok(AccountInfo {
                id: 111,
                first_name: "Me".to_owned(),
                last_name: String::new(),
            })
        }

        async fn list_dialogs(&self) -> Result<Vec<RawEntity>, BackendError> {
            self.dialogs.clone()
        }

        async fn recent_messages(
            &self,
            _conversation_id: i64,
            _limit: usize,
        ) -> Result<Vec<RawMessage>, BackendError> {
            unreachable!("directory never fetches messages")
        }

        async fn send_message(
            &self,
            _conversation_id: i64,
            _body: &str,
        ) -> Result<Option<i32>, BackendError> {
            unreachable!("directory never sends messages")
        }
    }

    fn user_entity(id: i64, name: &str) -> RawEntity {
        RawEntity::user(id, name)
    }

    fn many_users(count: usize) -> Vec<RawEntity> {
        (0..count)
            .map(|n| user_entity(1000 + n as i64, &format!("User{n}")))
            .collect()
    }

    fn open_whitelist() -> WhitelistConfig {
        WhitelistConfig::default()
    }

    #[tokio::test]
    async fn list_returns_normalized_snapshot_in_source_order() {
        let transport = StubTransport::with_dialogs(vec![
            RawEntity::channel(222, "News", false),
            user_entity(111, "Me"),
        ]);

        let conversations = list(&transport, &open_whitelist()).await.expect("list");

        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].id, -100222);
        assert_eq!(conversations[1].title, "Saved Messages");
    }

    #[tokio::test]
    async fn list_applies_whitelist_on_directory_ids() {
        let transport = StubTransport::with_dialogs(vec![
            RawEntity::channel(222, "News", false),
            user_entity(5, "Jane"),
        ]);
        let whitelist = WhitelistConfig {
            enabled: true,
            allowed_ids: [-100222].into_iter().collect(),
        };

        let conversations = list(&transport, &whitelist).await.expect("list");

        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].id, -100222);
    }

    #[tokio::test]
    async fn snapshot_failure_surfaces_as_unavailable() {
        let transport = StubTransport::unavailable();

        let err = list(&transport, &open_whitelist()).await.expect_err("must fail");

        assert!(matches!(err, DirectoryError::Unavailable(_)));
    }

    #[tokio::test]
    async fn page_splits_into_fixed_size_pages() {
        let transport = StubTransport::with_dialogs(many_users(20));

        let first = page(&transport, &open_whitelist(), 1).await.expect("page");

        assert_eq!(first.page, 1);
        assert_eq!(first.total_pages, 2);
        assert_eq!(first.items.len(), PAGE_SIZE);
        assert_eq!(first.items[0].id, 1000);
    }

    #[tokio::test]
    async fn last_page_holds_the_remainder() {
        let transport = StubTransport::with_dialogs(many_users(20));

        let last = page(&transport, &open_whitelist(), 2).await.expect("page");

        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].id, 1015);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_with_correct_total() {
        let transport = StubTransport::with_dialogs(many_users(20));

        let beyond = page(&transport, &open_whitelist(), 9).await.expect("page");

        assert_eq!(beyond.total_pages, 2);
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn page_zero_is_coerced_to_the_first_page() {
        let transport = StubTransport::with_dialogs(many_users(3));

        let coerced = page(&transport, &open_whitelist(), 0).await.expect("page");

        assert_eq!(coerced.page, 1);
        assert_eq!(coerced.items.len(), 3);
    }

    #[tokio::test]
    async fn empty_directory_has_zero_pages() {
        let transport = StubTransport::with_dialogs(vec![]);

        let empty = page(&transport, &open_whitelist(), 1).await.expect("page");

        assert_eq!(empty.total_pages, 0);
        assert!(empty.items.is_empty());
    }

    #[tokio::test]
    async fn search_matches_title_case_insensitively() {
        let transport = StubTransport::with_dialogs(vec![
            RawEntity::channel(222, "Rust News", false),
            user_entity(5, "Jane"),
        ]);

        let hits = search(&transport, &open_whitelist(), "RUST").await.expect("search");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, Some(-100222));
    }

    #[tokio::test]
    async fn search_matches_username() {
        let mut entity = user_entity(5, "Jane");
        entity.username = Some("janedoe".to_owned());
        let transport = StubTransport::with_dialogs(vec![entity]);

        let hits = search(&transport, &open_whitelist(), "doe").await.expect("search");

        assert_eq!(hits[0].id, Some(5));
    }

    #[tokio::test]
    async fn search_miss_returns_the_sentinel_not_an_empty_list() {
        let transport = StubTransport::with_dialogs(vec![user_entity(5, "Jane")]);

        let hits = search(&transport, &open_whitelist(), "nothing").await.expect("search");

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, None);
        assert_eq!(hits[0].title, NOT_FOUND_TITLE);
        assert_eq!(hits[0].kind, None);
    }

    #[tokio::test]
    async fn search_only_sees_whitelisted_conversations() {
        let transport = StubTransport::with_dialogs(vec![user_entity(5, "Jane")]);
        let whitelist = WhitelistConfig {
            enabled: true,
            allowed_ids: [999].into_iter().collect(),
        };

        let hits = search(&transport, &whitelist, "jane").await.expect("search");

        assert_eq!(hits[0].title, NOT_FOUND_TITLE);
    }
}
