//! Admin panel flows: sign-in gate, batch upload, deletion modes.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};

use tandaro_integration_tests::TestContext;

const ADMIN_PHONE: &str = "0541234567";

fn file(name: &str, mime: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(name.to_string())
        .mime_str(mime)
        .unwrap()
}

async fn signed_in_admin(ctx: &TestContext) -> Client {
    ctx.register("Samir", ADMIN_PHONE, true).await;
    let client = ctx.admin_browser(ADMIN_PHONE).await;
    client
        .post(format!("{}/language", ctx.admin_url))
        .form(&[("lang", "en"), ("return_to", "/gallery")])
        .send()
        .await
        .unwrap();
    client
}

async fn upload(ctx: &TestContext, client: &Client, form: Form) -> String {
    let resp = client
        .post(format!("{}/gallery/upload", ctx.admin_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.text().await.unwrap()
}

#[tokio::test]
async fn test_gallery_requires_sign_in() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let resp = client
        .get(format!("{}/gallery", ctx.admin_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().path(), "/auth/login");
}

#[tokio::test]
async fn test_customer_cannot_sign_in() {
    let ctx = TestContext::start().await;
    ctx.register("Rana", "0501234567", false).await;
    let client = TestContext::browser();

    let resp = client
        .post(format!("{}/auth/login", ctx.admin_url))
        .form(&[("phone", "0501234567")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .get(format!("{}/gallery", ctx.admin_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().path(), "/auth/login");
}

#[tokio::test]
async fn test_batch_with_invalid_file_keeps_valid_ones() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let form = Form::new()
        .part("files", file("van.jpg", "image/jpeg", b"jpeg-bytes"))
        .part("files", file("notes.txt", "text/plain", b"not an image"))
        .part("files", file("truck.png", "image/png", b"png-bytes"));
    let body = upload(&ctx, &client, form).await;

    assert!(body.contains(r#"data-uploaded="2" data-failed="1""#));
    assert!(body.contains("<bdi>notes.txt</bdi>: File is not an image"));

    let images = ctx.backends.gallery.list().await.unwrap();
    assert_eq!(images.len(), 2);
    let mut names: Vec<&str> = images.iter().map(|i| i.file_name.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, ["truck.png", "van.jpg"]);
    assert!(images.iter().all(|i| i.title == "New photo"));
    assert!(images.iter().all(|i| i.uploaded_by.starts_with("admin:")));
    assert_eq!(ctx.stored_files("gallery").len(), 2);
}

#[tokio::test]
async fn test_oversized_file_is_reported() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let big = vec![0_u8; 5 * 1024 * 1024 + 1];
    let form = Form::new().part("files", file("huge.jpg", "image/jpeg", &big));
    let body = upload(&ctx, &client, form).await;

    assert!(body.contains(r#"data-uploaded="0" data-failed="1""#));
    assert!(body.contains("File is larger than 5 MB"));
    assert!(ctx.stored_files("gallery").is_empty());
}

#[tokio::test]
async fn test_uploaded_image_reaches_storefront_slideshow() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let form = Form::new().part("files", file("van.jpg", "image/jpeg", b"jpeg-bytes"));
    upload(&ctx, &client, form).await;

    let image = ctx.backends.gallery.list().await.unwrap().remove(0);
    assert!(image.url.starts_with(&format!("{}/media/gallery/", ctx.storefront_url)));

    let visitor = TestContext::browser();
    let resp = visitor.get(&image.url).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.bytes().await.unwrap().as_ref(), b"jpeg-bytes");

    let body = visitor
        .get(format!("{}/gallery", ctx.storefront_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("data-slideshow"));
    assert!(body.contains(&image.url));
}

#[tokio::test]
async fn test_delete_record_only_leaves_orphan() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let form = Form::new().part("files", file("van.jpg", "image/jpeg", b"jpeg-bytes"));
    upload(&ctx, &client, form).await;
    let image = ctx.backends.gallery.list().await.unwrap().remove(0);

    let resp = client
        .post(format!("{}/gallery/{}/delete", ctx.admin_url, image.id))
        .form(&[("delete_object", "")])
        .send()
        .await
        .unwrap();
    assert!(resp.text().await.unwrap().contains("Photo deleted"));

    assert!(ctx.backends.gallery.list().await.unwrap().is_empty());
    assert_eq!(ctx.stored_files("gallery").len(), 1);
}

#[tokio::test]
async fn test_delete_with_object_removes_file() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let form = Form::new().part("files", file("van.jpg", "image/jpeg", b"jpeg-bytes"));
    upload(&ctx, &client, form).await;
    let image = ctx.backends.gallery.list().await.unwrap().remove(0);

    client
        .post(format!("{}/gallery/{}/delete", ctx.admin_url, image.id))
        .form(&[("delete_object", "on")])
        .send()
        .await
        .unwrap();

    assert!(ctx.backends.gallery.list().await.unwrap().is_empty());
    assert!(ctx.stored_files("gallery").is_empty());
}

#[tokio::test]
async fn test_delete_unknown_image() {
    let ctx = TestContext::start().await;
    let client = signed_in_admin(&ctx).await;

    let resp = client
        .post(format!("{}/gallery/999/delete", ctx.admin_url))
        .form(&[("delete_object", "on")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().query(), Some("missing=1"));
    assert!(resp.text().await.unwrap().contains("Photo not found"));
}
