//! Admin booking management seen from both sides.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use reqwest::StatusCode;

use tandaro_core::BookingStatus;
use tandaro_integration_tests::TestContext;

#[tokio::test]
async fn test_status_change_is_visible_to_customer() {
    let ctx = TestContext::start().await;
    ctx.register("Samir", "0541234567", true).await;

    let customer = TestContext::browser();
    customer
        .post(format!("{}/auth", ctx.storefront_url))
        .form(&[("mode", "signup"), ("name", "Rana"), ("phone", "0501234567")])
        .send()
        .await
        .unwrap();
    customer
        .post(format!("{}/book", ctx.storefront_url))
        .form(&[
            ("pickup_address", "Haifa port"),
            ("dropoff_address", "Nazareth"),
            ("scheduled_for", "2030-05-01T10:00"),
        ])
        .send()
        .await
        .unwrap();
    let booking = ctx.backends.bookings.list().await.unwrap().remove(0);

    let admin = ctx.admin_browser("0541234567").await;
    let body = admin
        .get(format!("{}/bookings", ctx.admin_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains(&format!(r#"data-booking="{}""#, booking.id)));
    assert!(body.contains("Haifa port"));

    let resp = admin
        .post(format!("{}/bookings/{}/status", ctx.admin_url, booking.id))
        .form(&[("status", "confirmed")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains(r#"class="updated""#));

    let stored = ctx.backends.bookings.list().await.unwrap().remove(0);
    assert_eq!(stored.status, BookingStatus::Confirmed);

    let account = customer
        .get(format!("{}/account", ctx.storefront_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(account.contains(r#"data-status="confirmed""#));
}

#[tokio::test]
async fn test_unknown_status_is_bad_request() {
    let ctx = TestContext::start().await;
    ctx.register("Samir", "0541234567", true).await;
    let admin = ctx.admin_browser("0541234567").await;

    let resp = admin
        .post(format!("{}/bookings/1/status", ctx.admin_url))
        .form(&[("status", "lost")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_users_page_lists_registrations() {
    let ctx = TestContext::start().await;
    ctx.register("Samir", "0541234567", true).await;
    ctx.register("Rana", "0501234567", false).await;
    let admin = ctx.admin_browser("0541234567").await;

    let body = admin
        .get(format!("{}/users", ctx.admin_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Samir"));
    assert!(body.contains("Rana"));
}
