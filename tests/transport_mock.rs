//! Transport tests against a mockito HTTP server.

use heygen_lib_rust::operation::{ApiVersion, HostPrefix, HttpMethod};
use heygen_lib_rust::request::{BinaryAttachment, FormPart};
use heygen_lib_rust::telemetry::{InMemoryObserver, REDACTED};
use heygen_lib_rust::transport::execute_request;
use heygen_lib_rust::{
    build_request, BinaryData, Credentials, Error, HeyGenClient, HttpTransport, Item,
    OperationKey, ParameterBag, RequestBody, RequestSender, RequestSpec, TransportConfig,
};
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use std::sync::Arc;

const KEY: &str = "sk-test-key";

fn item(value: Value) -> Item {
    Item::new(ParameterBag::from_value(value).unwrap())
}

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(
        Credentials::new(KEY).unwrap(),
        &TransportConfig::default().with_base_url_override(base_url),
    )
    .unwrap()
}

#[tokio::test]
async fn json_request_carries_key_and_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v2/photo_avatar/train")
        .match_header("x-api-key", KEY)
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({ "group_id": "g-1" })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":null,"data":{"flow_id":"f-1"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let params = item(json!({ "groupId": "g-1" }));
    let spec = build_request(OperationKey::TrainAvatarGroup, &params).unwrap();
    let body = execute_request(&t, spec).await.unwrap();

    assert_eq!(body, json!({ "error": null, "data": { "flow_id": "f-1" } }));
    mock.assert_async().await;
}

#[tokio::test]
async fn get_with_query_parameter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/video_status.get")
        .match_query(Matcher::UrlEncoded("video_id".into(), "vid-1".into()))
        .match_header("x-api-key", KEY)
        .with_status(200)
        .with_body(r#"{"data":{"status":"completed"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let params = item(json!({ "videoId": "vid-1" }));
    let spec = build_request(OperationKey::GetVideoStatus, &params).unwrap();
    let body = execute_request(&t, spec).await.unwrap();

    assert_eq!(body["data"]["status"], json!("completed"));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_json_text_is_returned_as_string() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/voices")
        .with_status(200)
        .with_header("content-type", "text/plain")
        .with_body("OK")
        .create_async()
        .await;

    let t = transport(&server.url());
    let spec = build_request(OperationKey::ListAllVoices, &item(json!({}))).unwrap();
    assert_eq!(execute_request(&t, spec).await.unwrap(), json!("OK"));
}

#[tokio::test]
async fn binary_upload_sends_raw_bytes() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/asset")
        .match_header("x-api-key", KEY)
        .match_header("content-type", "image/png")
        .match_body("PNGDATA")
        .with_status(200)
        .with_body(r#"{"data":{"id":"asset-1"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let upload = item(json!({ "binaryData": true }))
        .with_binary("data", BinaryData::new(b"PNGDATA", "image/png"));
    let spec = build_request(OperationKey::DocumentUpload, &upload).unwrap();
    let body = execute_request(&t, spec).await.unwrap();

    assert_eq!(body["data"]["id"], json!("asset-1"));
    mock.assert_async().await;
}

#[tokio::test]
async fn form_data_sends_text_and_file_parts() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/asset")
        .match_header("x-api-key", KEY)
        .match_header(
            "content-type",
            Matcher::Regex("^multipart/form-data; boundary=".into()),
        )
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="title"\r\n\r\nhello\r\n"#.into()),
            Matcher::Regex(r#"name="file"; filename="clip.bin""#.into()),
            Matcher::Regex("(?i)content-type: application/octet-stream".into()),
            Matcher::Regex("FILEBYTES".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"ok":true}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let spec = RequestSpec {
        operation: OperationKey::DocumentUpload,
        method: HttpMethod::Post,
        host: HostPrefix::Upload,
        version: ApiVersion::V1,
        path: "/asset".to_string(),
        body: RequestBody::FormData(vec![
            FormPart::Text {
                name: "title".to_string(),
                value: "hello".to_string(),
            },
            FormPart::File {
                name: "file".to_string(),
                attachment: BinaryAttachment::new(&b"FILEBYTES"[..], "application/octet-stream")
                    .with_file_name("clip.bin"),
            },
        ]),
        query: Vec::new(),
    };
    let body = t.send(&spec).await.unwrap();

    assert_eq!(body, json!({ "ok": true }));
    mock.assert_async().await;
}

#[tokio::test]
async fn url_upload_downloads_then_uploads() {
    let mut server = Server::new_async().await;
    let download = server
        .mock("GET", "/files/clip.mp4")
        .match_header("x-api-key", Matcher::Missing)
        .with_status(200)
        .with_body("MP4BYTES")
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/v1/asset")
        .match_header("x-api-key", KEY)
        .match_header("content-type", "video/mp4")
        .match_body("MP4BYTES")
        .with_status(200)
        .with_body(r#"{"data":{"id":"asset-2"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let file_url = format!("{}/files/clip.mp4", server.url());
    let params = item(json!({ "fileUrl": file_url }));
    let spec = build_request(OperationKey::DocumentUpload, &params).unwrap();
    let body = execute_request(&t, spec).await.unwrap();

    assert_eq!(body["data"]["id"], json!("asset-2"));
    download.assert_async().await;
    upload.assert_async().await;
}

#[tokio::test]
async fn failed_download_is_an_api_error_and_nothing_is_uploaded() {
    let mut server = Server::new_async().await;
    let _download = server
        .mock("GET", "/files/missing.png")
        .with_status(404)
        .create_async()
        .await;
    let upload = server
        .mock("POST", "/v1/asset")
        .expect(0)
        .create_async()
        .await;

    let t = transport(&server.url());
    let file_url = format!("{}/files/missing.png", server.url());
    let params = item(json!({ "fileUrl": file_url }));
    let spec = build_request(OperationKey::DocumentUpload, &params).unwrap();
    let err = execute_request(&t, spec).await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(
        err.context().and_then(|c| c.operation.as_deref()),
        Some("document.upload")
    );
    upload.assert_async().await;
}

#[tokio::test]
async fn non_success_status_keeps_status_and_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/photo_avatar/a-404")
        .with_status(404)
        .with_body(r#"{"error":{"code":"not_found","message":"avatar not found"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let params = item(json!({ "avatarId": "a-404" }));
    let spec = build_request(OperationKey::GetAvatarDetails, &params).unwrap();
    let err = execute_request(&t, spec).await.unwrap_err();

    match &err {
        Error::Api { status, body, .. } => {
            assert_eq!(*status, Some(404));
            assert!(body.as_deref().unwrap_or_default().contains("avatar not found"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
    assert!(err.record_message().contains("avatar not found"));
}

#[tokio::test]
async fn verify_credentials_hits_user_info() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/v1/user_info")
        .match_header("x-api-key", KEY)
        .with_status(200)
        .with_body(r#"{"data":{"username":"ada"}}"#)
        .create_async()
        .await;

    let t = transport(&server.url());
    let body = t.verify_credentials().await.unwrap();
    assert_eq!(body["data"]["username"], json!("ada"));
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_key_fails_credential_test() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/user_info")
        .with_status(401)
        .with_body(r#"{"error":"Unauthorized"}"#)
        .create_async()
        .await;

    let client = HeyGenClient::builder()
        .api_key(KEY)
        .transport_config(TransportConfig::default())
        .base_url_override(server.url())
        .build()
        .unwrap();
    let err = client.test_credentials().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[tokio::test]
async fn observer_never_sees_the_key() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v2/photo_avatar/upscale")
        .with_status(200)
        .with_body(r#"{"data":{}}"#)
        .create_async()
        .await;

    let observer = Arc::new(InMemoryObserver::new());
    let client = HeyGenClient::builder()
        .api_key(KEY)
        .transport_config(TransportConfig::default())
        .base_url_override(server.url())
        .observer(observer.clone())
        .build()
        .unwrap();

    client
        .execute(OperationKey::UpscaleAvatar, &[item(json!({ "avatarId": "a-1" }))])
        .await
        .unwrap();

    let requests = observer.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].operation, Some(OperationKey::UpscaleAvatar));
    assert_eq!(requests[0].header("x-api-key"), Some(REDACTED));
    assert!(!format!("{:?}", requests).contains(KEY));

    let responses = observer.responses();
    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].status, Some(200));
    assert_eq!(responses[0].request_id, requests[0].request_id);
}

#[tokio::test]
async fn client_batch_records_upstream_failures() {
    let mut server = Server::new_async().await;
    let _ok = server
        .mock("GET", "/v2/photo_avatar/train/status/g-ok")
        .with_status(200)
        .with_body(r#"{"data":{"status":"ready"}}"#)
        .create_async()
        .await;
    let _bad = server
        .mock("GET", "/v2/photo_avatar/train/status/g-bad")
        .with_status(400)
        .with_body(r#"{"error":"bad group"}"#)
        .create_async()
        .await;

    let client = HeyGenClient::builder()
        .api_key(KEY)
        .transport_config(TransportConfig::default())
        .base_url_override(server.url())
        .continue_on_fail(true)
        .build()
        .unwrap();

    let items = vec![
        item(json!({ "groupId": "g-ok" })),
        item(json!({ "groupId": "g-bad" })),
        item(json!({})),
    ];
    let result = client
        .execute(OperationKey::GetTrainingStatus, &items)
        .await
        .unwrap();

    let records = result.to_json();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["data"]["status"], json!("ready"));
    assert!(records[1]["error"].as_str().unwrap().contains("bad group"));
    assert!(records[2]["error"].as_str().unwrap().contains("groupId"));
}
