//! Storefront flows: phone identity, layout preferences, bookings.

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};

use tandaro_integration_tests::{TestContext, WHATSAPP_NUMBER};

async fn page(client: &Client, url: String) -> (StatusCode, String) {
    let resp = client.get(url).send().await.unwrap();
    let status = resp.status();
    (status, resp.text().await.unwrap())
}

async fn use_english(ctx: &TestContext, client: &Client) {
    let resp = client
        .post(format!("{}/language", ctx.storefront_url))
        .form(&[("lang", "en"), ("return_to", "/")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let (status, body) = page(&client, format!("{}/health", ctx.storefront_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _) = page(&client, format!("{}/health/ready", ctx.storefront_url)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_defaults_to_arabic_with_whatsapp_button() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let (status, body) = page(&client, format!("{}/", ctx.storefront_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"lang="ar" dir="rtl""#));
    assert!(body.contains(&format!("https://wa.me/{WHATSAPP_NUMBER}?text=")));
}

#[tokio::test]
async fn test_signup_then_account_logout_and_login() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    let resp = client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Rana"), ("phone", "050-123-4567")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains("My account (Rana)"));

    let (status, body) = page(&client, format!("{}/account", ctx.storefront_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<h1>Rana</h1>"));
    assert!(body.contains("No bookings yet"));

    let resp = client
        .post(format!("{}/auth/logout", ctx.storefront_url))
        .send()
        .await
        .unwrap();
    assert!(!resp.text().await.unwrap().contains("My account"));

    // Account page now asks for identification.
    let (_, body) = page(&client, format!("{}/account", ctx.storefront_url)).await;
    assert!(body.contains(r#"action="/auth""#));

    let resp = client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "login"), ("phone", "+972501234567")])
        .send()
        .await
        .unwrap();
    assert!(resp.text().await.unwrap().contains("My account (Rana)"));

    // Language survives signing in and out.
    let (_, body) = page(&client, format!("{}/", ctx.storefront_url)).await;
    assert!(body.contains(r#"lang="en" dir="ltr""#));
}

#[tokio::test]
async fn test_signup_with_registered_phone_offers_login() {
    let ctx = TestContext::start().await;
    ctx.register("Rana", "0501234567", false).await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    let resp = client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Someone"), ("phone", "0501234567")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.unwrap();
    assert!(body.contains("This number is already registered"));
    assert!(body.contains(r#"value="login""#));

    assert_eq!(ctx.backends.users.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_login_with_unknown_phone_offers_signup() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    let resp = client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "login"), ("phone", "0529999999")])
        .send()
        .await
        .unwrap();
    let body = resp.text().await.unwrap();
    assert!(body.contains("No account with this number"));
    assert!(body.contains(r#"value="signup""#));
}

#[tokio::test]
async fn test_invalid_phone_is_rejected_without_account() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    let resp = client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Rana"), ("phone", "12345")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Invalid phone number"));
    assert!(ctx.backends.users.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unsupported_language_is_bad_request() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let resp = client
        .post(format!("{}/language", ctx.storefront_url))
        .form(&[("lang", "fr")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_hebrew_switch_and_return_path() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let resp = client
        .post(format!("{}/language", ctx.storefront_url))
        .form(&[("lang", "he"), ("return_to", "/gallery")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().path(), "/gallery");
    let body = resp.text().await.unwrap();
    assert!(body.contains(r#"lang="he" dir="rtl""#));
    assert!(body.contains("גלריית תמונות"));
}

#[tokio::test]
async fn test_language_switch_with_newline_in_return_path_goes_home() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let resp = client
        .post(format!("{}/language", ctx.storefront_url))
        .form(&[("lang", "en"), ("return_to", "/x\ny")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.url().path(), "/");
    assert!(resp.text().await.unwrap().contains(r#"lang="en""#));
}

#[tokio::test]
async fn test_notification_sound_toggles() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();

    let (_, body) = page(&client, format!("{}/", ctx.storefront_url)).await;
    assert!(body.contains(r#"data-notification-sound="true""#));

    let resp = client
        .post(format!("{}/preferences/notification-sound", ctx.storefront_url))
        .form(&[("return_to", "/")])
        .send()
        .await
        .unwrap();
    assert!(resp.text().await.unwrap().contains(r#"data-notification-sound="false""#));

    let resp = client
        .post(format!("{}/preferences/notification-sound", ctx.storefront_url))
        .form(&[("return_to", "/")])
        .send()
        .await
        .unwrap();
    assert!(resp.text().await.unwrap().contains(r#"data-notification-sound="true""#));
}

#[tokio::test]
async fn test_booking_appears_on_account() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Rana"), ("phone", "0501234567")])
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{}/book", ctx.storefront_url))
        .form(&[
            ("pickup_address", "Haifa port"),
            ("dropoff_address", "Nazareth"),
            ("scheduled_for", "2030-05-01T10:00"),
            ("notes", "Two boxes"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.url().path(), "/account");
    let body = resp.text().await.unwrap();
    assert!(body.contains("Your booking was received"));
    assert!(body.contains("Haifa port"));
    assert!(body.contains(r#"data-status="pending">Pending</td>"#));

    let bookings = ctx.backends.bookings.list().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].customer_name, "Rana");
}

#[tokio::test]
async fn test_booking_without_address_is_rejected() {
    let ctx = TestContext::start().await;
    let client = TestContext::browser();
    use_english(&ctx, &client).await;

    client
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Rana"), ("phone", "0501234567")])
        .send()
        .await
        .unwrap();

    let resp = client
        .post(format!("{}/book", ctx.storefront_url))
        .form(&[
            ("pickup_address", ""),
            ("dropoff_address", "Nazareth"),
            ("scheduled_for", "2030-05-01T10:00"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(resp.text().await.unwrap().contains("Please enter both pickup and drop-off addresses"));
    assert!(ctx.backends.bookings.list().await.unwrap().is_empty());
}
