//! Telegram transport backed by grammers. Translates between the backend's
//! view of dialogs and messages and the transport contract the usecases
//! consume. The bridge holds no state of its own; every call goes to the
//! backend.

use std::path::Path;

use async_trait::async_trait;
use grammers_client::types::{Chat, Dialog, Message};
use grammers_client::{Client, Config, InitParams};
use grammers_session::{PackedType, Session};

use crate::infra::config::TelegramConfig;
use crate::usecases::normalize;
use crate::usecases::transport::{
    AccountInfo, BackendError, BackendTransport, RawEntity, RawKind, RawMessage,
};

pub struct TelegramBridge {
    client: Client,
}

impl TelegramBridge {
    /// Connects to Telegram using the stored session. Does not verify that
    /// the session is authorized; callers check before serving traffic.
    pub async fn connect(config: &TelegramConfig, session_path: &Path) -> anyhow::Result<Self> {
        let session = Session::load_file_or_create(session_path)?;

        let client = Client::connect(Config {
            session,
            api_id: config.api_id,
            api_hash: config.api_hash.clone(),
            params: InitParams::default(),
        })
        .await?;

        Ok(Self { client })
    }

    pub async fn is_authorized(&self) -> anyhow::Result<bool> {
        Ok(self.client.is_authorized().await?)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Resolves a conversation by its directory id: walks the dialog list
    /// and compares each dialog under the same id scheme the directory uses.
    async fn find_chat(&self, conversation_id: i64) -> Result<Chat, BackendError> {
        let mut dialogs = self.client.iter_dialogs();

        while let Some(dialog) = dialogs.next().await.map_err(map_invocation_error)? {
            let chat = dialog.chat();
            let id = normalize::directory_id(chat_kind(chat), chat.id());
            if id == conversation_id {
                return Ok(chat.clone());
            }
        }

        Err(BackendError::ConversationNotFound)
    }
}

#[async_trait]
impl BackendTransport for TelegramBridge {
    async fn current_account(&self) -> Result<AccountInfo, BackendError> {
        let me = self.client.get_me().await.map_err(map_invocation_error)?;

        Ok(AccountInfo {
            id: me.id(),
            first_name: me.first_name().to_owned(),
            last_name: me.last_name().unwrap_or_default().to_owned(),
        })
    }

    async fn list_dialogs(&self) -> Result<Vec<RawEntity>, BackendError> {
        let mut dialogs = self.client.iter_dialogs();
        let mut entities = Vec::new();

        while let Some(dialog) = dialogs.next().await.map_err(map_invocation_error)? {
            entities.push(raw_entity(&dialog));
        }

        Ok(entities)
    }

    async fn recent_messages(
        &self,
        conversation_id: i64,
        limit: usize,
    ) -> Result<Vec<RawMessage>, BackendError> {
        let chat = self.find_chat(conversation_id).await?;

        let mut iter = self.client.iter_messages(&chat).limit(limit);
        let mut messages = Vec::new();

        while let Some(message) = iter.next().await.map_err(map_invocation_error)? {
            messages.push(raw_message(&message));
        }

        Ok(messages)
    }

    async fn send_message(
        &self,
        conversation_id: i64,
        body: &str,
    ) -> Result<Option<i32>, BackendError> {
        let chat = self.find_chat(conversation_id).await?;

        let sent = self
            .client
            .send_message(&chat, body)
            .await
            .map_err(map_invocation_error)?;

        Ok(Some(sent.id()))
    }
}

fn chat_kind(chat: &Chat) -> RawKind {
    match chat.pack().ty {
        PackedType::User | PackedType::Bot => RawKind::User,
        PackedType::Chat => RawKind::Chat,
        PackedType::Megagroup | PackedType::Broadcast | PackedType::Gigagroup => RawKind::Channel,
    }
}

fn raw_entity(dialog: &Dialog) -> RawEntity {
    let chat = dialog.chat();
    let kind = chat_kind(chat);
    let megagroup = matches!(chat.pack().ty, PackedType::Megagroup | PackedType::Gigagroup);
    let name = chat.name().to_owned();

    let (title, first_name) = match kind {
        RawKind::User => (None, Some(name)),
        RawKind::Chat | RawKind::Channel => (Some(name), None),
    };

    RawEntity {
        kind,
        id: chat.id(),
        title,
        first_name,
        last_name: None,
        username: chat.username().map(str::to_owned),
        megagroup,
        // Not surfaced by the dialog list here; absent means kept.
        migrated_to: None,
        pinned: false,
    }
}

fn raw_message(message: &Message) -> RawMessage {
    let sender = message.sender();

    RawMessage {
        id: message.id(),
        timestamp: message.date().timestamp(),
        sender_id: sender.as_ref().map(Chat::id),
        sender_label: sender.as_ref().map(|chat| chat.name().to_owned()),
        text: message.text().to_owned(),
        has_media: message.media().is_some(),
        reactions: Vec::new(),
    }
}

fn map_invocation_error(error: impl std::fmt::Display) -> BackendError {
    BackendError::Unavailable(error.to_string())
}
