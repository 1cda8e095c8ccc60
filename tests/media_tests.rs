
use actix_web::{
    http::{header, StatusCode},
    test, App,
};
use associates_backend::{
    entities::media::{DestroyOutcome, MediaFile, UploadedMedia},
    errors::MediaError,
    routes::configure_routes,
    use_cases::media::{resolve_mime, to_data_uri},
};
use mockall::predicate::eq;
use serde_json::{json, Value};
use test_utils::*;

const BOUNDARY: &str = "----associates-test-boundary";

macro_rules! init_app {
    ($media:expr) => {
        test::init_service(
            App::new()
                .app_data(build_state(&test_config(), MockCredentialRepo::new(), MockDocumentRepo::new(), $media))
                .configure(configure_routes),
        )
        .await
    };
}

fn multipart_body(field: &str, file_name: &str, content_type: &str, data: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\
         \r\n\
         {data}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload_request(body: String) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/upload")
        .insert_header((header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(body)
}

fn uploaded(public_id: &str) -> UploadedMedia {
    UploadedMedia {
        public_id: public_id.to_string(),
        secure_url: format!("https://res.cloudinary.com/demo/image/upload/{public_id}.png"),
        url: None,
        resource_type: Some("image".into()),
        format: Some("png".into()),
        bytes: Some(5),
        width: None,
        height: None,
        extra: object(json!({ "version": 1312461204, "etag": "d1ac0ee70a9a" })),
    }
}

#[actix_rt::test]
async fn upload_forwards_file_as_data_uri() {
    let mut media = MockMedia::new();
    media
        .expect_upload()
        .with(eq("data:text/plain;base64,aGVsbG8=".to_string()))
        .times(1)
        .returning(|_| Ok(uploaded("abc123")));
    let app = init_app!(media);

    let req = upload_request(multipart_body("my_file", "hello.txt", "text/plain", "hello"))
        .cookie(session_cookie(ADMIN_IDENTIFIER))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["public_id"], "abc123");
    assert_eq!(body["version"], 1312461204);
    assert!(body["secure_url"].as_str().unwrap().starts_with("https://"));
}

#[actix_rt::test]
async fn upload_requires_session() {
    let mut media = MockMedia::new();
    media.expect_upload().times(0);
    let app = init_app!(media);

    let req = upload_request(multipart_body("my_file", "hello.txt", "text/plain", "hello")).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn upload_without_file_field_is_bad_request() {
    let mut media = MockMedia::new();
    media.expect_upload().times(0);
    let app = init_app!(media);

    let req = upload_request(multipart_body("other", "hello.txt", "text/plain", "hello"))
        .cookie(session_cookie(ADMIN_IDENTIFIER))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn upstream_failures_map_to_gateway_and_unavailable() {
    for (error, expected) in [
        (MediaError::Upstream("connect timeout".into()), StatusCode::BAD_GATEWAY),
        (MediaError::Rejected("Invalid Signature".into()), StatusCode::BAD_GATEWAY),
        (MediaError::NotConfigured, StatusCode::SERVICE_UNAVAILABLE),
    ] {
        let mut media = MockMedia::new();
        let mut error = Some(error);
        media
            .expect_upload()
            .times(1)
            .returning(move |_| Err(error.take().unwrap_or(MediaError::NotConfigured)));
        let app = init_app!(media);

        let req = upload_request(multipart_body("my_file", "a.png", "image/png", "png"))
            .cookie(session_cookie(ADMIN_IDENTIFIER))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), expected);
        let body: Value = test::read_body_json(resp).await;
        assert!(!body.to_string().contains("Invalid Signature"));
        assert!(!body.to_string().contains("connect timeout"));
    }
}

#[actix_rt::test]
async fn delete_outcomes() {
    let cases = [
        ("gone", Ok(DestroyOutcome::Deleted), StatusCode::OK, json!({ "success": true })),
        (
            "missing",
            Ok(DestroyOutcome::NotDeleted("not found".into())),
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "message": "Image deletion failed" }),
        ),
        (
            "broken",
            Err(MediaError::Upstream("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "success": false, "message": "Something went wrong" }),
        ),
    ];

    for (public_id, outcome, status, expected) in cases {
        let mut media = MockMedia::new();
        let mut outcome = Some(outcome);
        media
            .expect_destroy()
            .with(eq(public_id))
            .times(1)
            .returning(move |_| outcome.take().unwrap_or(Ok(DestroyOutcome::Deleted)));
        let app = init_app!(media);

        let req = test::TestRequest::post()
            .uri("/api/delete")
            .cookie(session_cookie(ADMIN_IDENTIFIER))
            .set_json(json!({ "publicId": public_id }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), status, "publicId {public_id}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, expected);
    }
}

#[actix_rt::test]
async fn delete_with_blank_public_id_is_rejected() {
    let mut media = MockMedia::new();
    media.expect_destroy().times(0);
    let app = init_app!(media);

    let req = test::TestRequest::post()
        .uri("/api/delete")
        .cookie(session_cookie(ADMIN_IDENTIFIER))
        .set_json(json!({ "publicId": "  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
}

#[::core::prelude::v1::test]
fn mime_prefers_declared_type_then_sniffs() {
    let png_magic = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    let declared = MediaFile {
        data: b"hello".to_vec(),
        content_type: Some("text/plain".into()),
        file_name: None,
    };
    assert_eq!(resolve_mime(&declared), "text/plain");

    let sniffed = MediaFile {
        data: png_magic,
        content_type: Some("application/octet-stream".into()),
        file_name: Some("upload.bin".into()),
    };
    assert_eq!(resolve_mime(&sniffed), "image/png");

    let unknown = MediaFile {
        data: vec![1, 2, 3],
        content_type: None,
        file_name: None,
    };
    assert_eq!(resolve_mime(&unknown), "application/octet-stream");

    assert_eq!(to_data_uri("text/plain", b"hello"), "data:text/plain;base64,aGVsbG8=");
}
