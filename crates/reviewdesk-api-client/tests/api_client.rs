use mockito::Matcher;
use reviewdesk_api_client::{ApiClient, Auth, FormSession, SubmitState};
use reviewdesk_core::models::{FieldValue, FileUpload};
use reviewdesk_core::AppError;
use serde_json::json;

const FORM: &str = r#"{
    "_id": "form-1",
    "name": "Lobby",
    "type": "Review",
    "isActive": true,
    "reviewLink": "https://reviews.example.com/lobby",
    "fields": [
        {"name": "name", "type": "text", "position": 1},
        {"name": "stars", "type": "rating", "isRequired": true, "position": 2},
        {"name": "comment", "type": "textarea", "position": 3},
        {"name": "photo", "type": "image", "position": 4}
    ]
}"#;

const CREATED: &str = r#"{
    "_id": "sub-9",
    "formId": "form-1",
    "createdAt": "2025-03-01T09:30:00Z",
    "submissions": {"stars": "5"}
}"#;

fn client(server: &mockito::Server) -> ApiClient {
    ApiClient::new(server.url(), Auth::Bearer("secret".to_string())).unwrap()
}

async fn open_session(server: &mut mockito::Server) -> FormSession {
    let mock = server
        .mock("GET", "/api/forms/form-1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"form": {}}}"#, FORM))
        .create_async()
        .await;

    let public = client(server).with_auth(Auth::Anonymous);
    let session = FormSession::open(&public, "form-1").await.unwrap();
    mock.assert_async().await;
    session
}

#[tokio::test]
async fn test_list_forms_accepts_envelope() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/forms")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(format!(r#"{{"forms": [{}]}}"#, FORM))
        .create_async()
        .await;

    let forms = client(&server).list_forms().await.unwrap();
    mock.assert_async().await;

    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0].id, "form-1");
    assert_eq!(forms[0].rendered_fields().len(), 4);
}

#[tokio::test]
async fn test_get_form_not_found() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/forms/missing")
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Form not found"}"#)
        .create_async()
        .await;

    let err = client(&server).get_form("missing").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Form not found"));
}

#[tokio::test]
async fn test_mark_read_sends_patch() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("PATCH", "/api/submissions/sub-1/read")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"ok": true}"#)
        .create_async()
        .await;

    client(&server).mark_submission_read("sub-1").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_json() {
    let mut server = mockito::Server::new_async().await;
    let mut session = open_session(&mut server).await;

    let mock = server
        .mock("POST", "/api/submission")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "formId": "form-1",
            "captchaToken": "tok",
            "submissions": {"stars": "5", "comment": "Friendly and quick"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(CREATED)
        .create_async()
        .await;

    session.set_value("stars", FieldValue::Rating(5)).unwrap();
    session
        .set_value("comment", FieldValue::LongText("Friendly and quick".to_string()))
        .unwrap();
    session.set_verification_token("tok");

    let public = client(&server).with_auth(Auth::Anonymous);
    let created = session.submit(&public).await.unwrap();
    mock.assert_async().await;

    assert_eq!(created.id, "sub-9");
    assert!(matches!(session.state(), SubmitState::Submitted(_)));

    let prompt = session.review_prompt().unwrap();
    assert_eq!(prompt.link, "https://reviews.example.com/lobby");
    assert_eq!(prompt.copy_text.as_deref(), Some("Friendly and quick"));
}

#[tokio::test]
async fn test_submit_with_image_uses_multipart() {
    let mut server = mockito::Server::new_async().await;
    let mut session = open_session(&mut server).await;

    let mock = server
        .mock("POST", "/api/submission")
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data".to_string()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="captchaToken""#.to_string()),
            Matcher::Regex(r#"name="photo"; filename="receipt.png""#.to_string()),
        ]))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(CREATED)
        .create_async()
        .await;

    session.set_value("stars", FieldValue::Rating(4)).unwrap();
    session
        .set_value(
            "photo",
            FieldValue::File(Some(FileUpload {
                file_name: "receipt.png".to_string(),
                content_type: Some("image/png".to_string()),
                bytes: b"png-bytes".to_vec(),
            })),
        )
        .unwrap();
    session.set_verification_token("tok");

    let public = client(&server).with_auth(Auth::Anonymous);
    session.submit(&public).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_submit_limit_reached() {
    let mut server = mockito::Server::new_async().await;
    let mut session = open_session(&mut server).await;

    let _mock = server
        .mock("POST", "/api/submission")
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": "Monthly submission limit reached for this plan"}"#)
        .create_async()
        .await;

    session.set_value("stars", FieldValue::Rating(5)).unwrap();
    session.set_verification_token("tok");

    let public = client(&server).with_auth(Auth::Anonymous);
    let err = session.submit(&public).await.unwrap_err();

    assert!(err.is_limit_reached());
    assert_eq!(
        session.state(),
        &SubmitState::LimitReached("Monthly submission limit reached for this plan".to_string())
    );
    assert!(session.review_prompt().is_none());
}

#[tokio::test]
async fn test_submit_server_error_is_failed() {
    let mut server = mockito::Server::new_async().await;
    let mut session = open_session(&mut server).await;

    let _mock = server
        .mock("POST", "/api/submission")
        .with_status(500)
        .with_body("upstream exploded")
        .create_async()
        .await;

    session.set_value("stars", FieldValue::Rating(2)).unwrap();
    session.set_verification_token("tok");

    let public = client(&server).with_auth(Auth::Anonymous);
    let err = session.submit(&public).await.unwrap_err();

    assert!(matches!(err, AppError::Upstream { status: Some(500), .. }));
    assert!(matches!(session.state(), SubmitState::Failed(_)));
}

#[tokio::test]
async fn test_submit_without_token_makes_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mut session = open_session(&mut server).await;

    let mock = server
        .mock("POST", "/api/submission")
        .expect(0)
        .create_async()
        .await;

    session.set_value("stars", FieldValue::Rating(5)).unwrap();

    let public = client(&server).with_auth(Auth::Anonymous);
    let err = session.submit(&public).await.unwrap_err();
    mock.assert_async().await;

    assert!(matches!(err, AppError::VerificationRequired));
    assert_eq!(session.state(), &SubmitState::Idle);
}
