//! Message gateway, write side: sending one message to one conversation.
//!
//! Validation runs strictly before any backend call; a request rejected
//! here never reaches the transport.

use crate::usecases::transport::{BackendError, BackendTransport};

/// Command to send a message to a specific conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCommand {
    pub conversation_id: i64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendError {
    /// Body empty after trimming whitespace; caught before the backend call.
    EmptyBody,
    ConversationNotFound,
    /// Backend accepted the call but produced no message, or rejected it.
    Rejected,
    Unavailable(String),
}

/// Result of a successful send: the id the backend assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: i32,
}

pub async fn send(
    transport: &dyn BackendTransport,
    command: SendCommand,
) -> Result<SentMessage, SendError> {
    let body = command.body.trim();
    if body.is_empty() {
        return Err(SendError::EmptyBody);
    }

    let message_id = transport
        .send_message(command.conversation_id, body)
        .await
        .map_err(map_backend_error)?
        .ok_or(SendError::Rejected)?;

    Ok(SentMessage { message_id })
}

fn map_backend_error(error: BackendError) -> SendError {
    match error {
        BackendError::ConversationNotFound => SendError::ConversationNotFound,
        BackendError::Unavailable(message) => SendError::Unavailable(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::transport::{AccountInfo, RawEntity, RawMessage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StubTransport {
        result: Result<Option<i32>, BackendError>,
        captured: Mutex<Option<(i64, String)>>,
    }

    impl StubTransport {
        fn with_result(result: Result<Option<i32>, BackendError>) -> Self {
            Self {
                result,
                captured: Mutex::new(None),
            }
        }

        fn was_invoked(&self) -> bool {
            self.captured.lock().expect("capture lock").is_some()
        }
    }

    #[async_trait]
    impl BackendTransport for StubTransport {
        async fn current_account(&self) -> Result<AccountInfo, BackendError> {
            unreachable!("send never asks for the account")
        }

        async fn list_dialogs(&self) -> Result<Vec<RawEntity>, BackendError> {
            unreachable!("send never lists dialogs")
        }

        async fn recent_messages(
            &self,
            _conversation_id: i64,
            _limit: usize,
        ) -> Result<Vec<RawMessage>, BackendError> {
            unreachable!("send never fetches")
        }

        async fn send_message(
            &self,
            conversation_id: i64,
            body: &str,
        ) -> Result<Option<i32>, BackendError> {
            *self.captured.lock().expect("capture lock") =
                Some((conversation_id, body.to_owned()));
            self.result.clone()
        }
    }

    fn command(body: &str) -> SendCommand {
        SendCommand {
            conversation_id: -100222,
            body: body.to_owned(),
        }
    }

    #[tokio::test]
    async fn empty_body_fails_before_any_backend_call() {
        let transport = StubTransport::with_result(Ok(Some(1)));

        let err = send(&transport, command("")).await.expect_err("must fail");

        assert_eq!(err, SendError::EmptyBody);
        assert!(!transport.was_invoked());
    }

    #[tokio::test]
    async fn whitespace_only_body_fails_validation() {
        let transport = StubTransport::with_result(Ok(Some(1)));

        let err = send(&transport, command("  \n\t ")).await.expect_err("must fail");

        assert_eq!(err, SendError::EmptyBody);
        assert!(!transport.was_invoked());
    }

    #[tokio::test]
    async fn trims_body_before_sending() {
        let transport = StubTransport::with_result(Ok(Some(1)));

        let _ = send(&transport, command("  hello  ")).await.expect("send");

        let captured = transport.captured.lock().expect("capture lock");
        assert_eq!(captured.as_ref().unwrap().1, "hello");
    }

    #[tokio::test]
    async fn returns_the_assigned_message_id() {
        let transport = StubTransport::with_result(Ok(Some(987)));

        let sent = send(&transport, command("hello")).await.expect("send");

        assert_eq!(sent.message_id, 987);
        let captured = transport.captured.lock().expect("capture lock");
        assert_eq!(captured.as_ref().unwrap().0, -100222);
    }

    #[tokio::test]
    async fn backend_null_result_is_a_rejection() {
        let transport = StubTransport::with_result(Ok(None));

        let err = send(&transport, command("hello")).await.expect_err("must fail");

        assert_eq!(err, SendError::Rejected);
    }

    #[tokio::test]
    async fn maps_conversation_not_found() {
        let transport = StubTransport::with_result(Err(BackendError::ConversationNotFound));

        let err = send(&transport, command("hello")).await.expect_err("must fail");

        assert_eq!(err, SendError::ConversationNotFound);
    }

    #[tokio::test]
    async fn maps_backend_unavailability() {
        let transport =
            StubTransport::with_result(Err(BackendError::Unavailable("flood wait".to_owned())));

        let err = send(&transport, command("hello")).await.expect_err("must fail");

        assert_eq!(err, SendError::Unavailable("flood wait".to_owned()));
    }
}
