//! Auth, upload and error-envelope handling against the mock backend.

mod common;

use std::sync::atomic::Ordering;

use assert_matches::assert_matches;
use eduhub_client::{ApiError, FilePart, TokenStore};
use eduhub_core::approval::ResolveCommand;
use eduhub_core::requests::{ApproveRequest, LoginRequest, RejectRequest};
use eduhub_core::status::{EntityKind, RequestKind};

use common::{harness, VALID_ACCESS, VALID_REFRESH};

#[tokio::test]
async fn login_stores_tokens() {
    let h = harness(None).await;

    let tokens = h
        .client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "secret".into(),
        })
        .await
        .unwrap();

    assert_eq!(tokens.access_token, VALID_ACCESS);
    assert_eq!(h.tokens.refresh_token().await.unwrap().as_deref(), Some(VALID_REFRESH));
}

/// Bad credentials surface the server message and never start a refresh.
#[tokio::test]
async fn failed_login_is_an_api_error() {
    let h = harness(None).await;

    let err = h
        .client
        .login(&LoginRequest {
            username: "admin".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();

    assert_matches!(
        err,
        ApiError::Api { status: 401, ref code, .. } if code.as_deref() == Some("BAD_CREDENTIALS")
    );
    assert_eq!(h.state.refresh_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_login_is_refused_locally() {
    let h = harness(None).await;
    let err = h
        .client
        .login(&LoginRequest {
            username: String::new(),
            password: "x".into(),
        })
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Validation(_));
}

/// Logout clears local tokens even if the server call fails.
#[tokio::test]
async fn logout_clears_tokens_even_on_failure() {
    let h = harness(Some((VALID_ACCESS, VALID_REFRESH))).await;
    h.state.logout_fails.store(true, Ordering::SeqCst);

    assert!(h.client.logout().await.is_err());
    assert_eq!(h.state.logout_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.tokens.access_token().await.unwrap(), None);
}

/// The structured error envelope is preserved for translation.
#[tokio::test]
async fn error_envelope_keeps_code_and_message() {
    let h = harness(Some((VALID_ACCESS, VALID_REFRESH))).await;

    let err = h
        .client
        .resolve(
            EntityKind::Partner,
            RequestKind::Create,
            &ResolveCommand::Approve(ApproveRequest { id: 3 }),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code(), Some("DUPLICATE_REGISTRATION_NUMBER"));
    assert_matches!(
        err,
        ApiError::Api { status: 409, ref message, .. } if message.contains("registration")
    );
}

/// A blank reject note is refused before any request is made.
#[tokio::test]
async fn blank_reject_note_is_not_sent() {
    let h = harness(Some((VALID_ACCESS, VALID_REFRESH))).await;

    let err = h
        .client
        .resolve(
            EntityKind::Partner,
            RequestKind::Create,
            &ResolveCommand::Reject(RejectRequest {
                id: 3,
                admin_note: "  ".into(),
            }),
        )
        .await
        .unwrap_err();

    assert_matches!(err, ApiError::Validation(_));
}

#[tokio::test]
async fn upload_sends_multipart_file_field() {
    let h = harness(Some((VALID_ACCESS, VALID_REFRESH))).await;

    let url = h
        .client
        .upload(FilePart {
            file_name: "bang-thac-si.pdf".into(),
            mime: Some("application/pdf".into()),
            bytes: vec![0u8; 16],
        })
        .await
        .unwrap();

    assert_eq!(url, "https://files.eduhub.vn/bang-thac-si.pdf?size=16");
}
