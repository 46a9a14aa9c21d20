//! Integration tests for Tandaro.
//!
//! Both applications are served in-process on ephemeral ports, backed by the
//! in-memory repositories and a temporary media directory shared between
//! them. No database or external service is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tandaro-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use secrecy::SecretString;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tower_sessions::MemoryStore;

use tandaro_admin::config::AdminConfig;
use tandaro_admin::storage::LocalObjectStorage;
use tandaro_core::{Backends, NewUser, Phone, User};
use tandaro_storefront::config::StorefrontConfig;

/// Business number shown on the WhatsApp button.
pub const WHATSAPP_NUMBER: &str = "972501112233";

/// Both applications sharing one set of backends.
pub struct TestContext {
    pub backends: Backends,
    pub storefront_url: String,
    pub admin_url: String,
    media: TempDir,
}

impl TestContext {
    /// Start the storefront and the admin panel.
    ///
    /// # Panics
    ///
    /// Panics if a listener cannot be bound or the media directory cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn start() -> Self {
        let media = tempfile::tempdir().expect("create media dir");
        let backends = Backends::in_memory();

        let storefront_listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind storefront");
        let admin_listener = TcpListener::bind("127.0.0.1:0").await.expect("bind admin");
        let storefront_addr = storefront_listener.local_addr().expect("storefront addr");
        let admin_addr = admin_listener.local_addr().expect("admin addr");
        let storefront_url = format!("http://{storefront_addr}");
        let admin_url = format!("http://{admin_addr}");

        let storefront_config = storefront_config(storefront_addr, media.path().into());
        let storefront_state =
            tandaro_storefront::state::AppState::new(storefront_config.clone(), backends.clone());
        let storefront_sessions = tandaro_storefront::middleware::create_session_layer(
            MemoryStore::default(),
            &storefront_config,
        );
        let storefront = tandaro_storefront::app(storefront_state, storefront_sessions);

        let admin_config = admin_config(admin_addr, media.path().into(), &storefront_url);
        let storage = Arc::new(LocalObjectStorage::new(
            media.path(),
            admin_config.media_public_url.clone(),
        ));
        let admin_state =
            tandaro_admin::state::AppState::new(admin_config.clone(), backends.clone(), storage);
        let admin_sessions =
            tandaro_admin::middleware::create_session_layer(MemoryStore::default(), &admin_config);
        let admin = tandaro_admin::app(admin_state, admin_sessions);

        tokio::spawn(async move {
            let _ = axum::serve(storefront_listener, storefront).await;
        });
        tokio::spawn(async move {
            let _ = axum::serve(admin_listener, admin).await;
        });

        Self {
            backends,
            storefront_url,
            admin_url,
            media,
        }
    }

    /// A fresh browser with its own cookie jar.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn browser() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Register a user directly in the directory.
    ///
    /// # Panics
    ///
    /// Panics if `phone` is invalid or already registered.
    #[allow(clippy::expect_used)]
    pub async fn register(&self, name: &str, phone: &str, is_admin: bool) -> User {
        let phone = Phone::parse(phone).expect("valid phone");
        let user = self
            .backends
            .users
            .create(NewUser {
                name: name.to_string(),
                phone: phone.clone(),
                created_at: Utc::now(),
            })
            .await
            .expect("create user");
        if !is_admin {
            return user;
        }
        self.backends
            .users
            .set_admin(&phone, true)
            .await
            .expect("grant admin")
    }

    /// Signed-in admin browser.
    ///
    /// # Panics
    ///
    /// Panics if the login request fails or is refused.
    #[allow(clippy::expect_used)]
    pub async fn admin_browser(&self, phone: &str) -> Client {
        let client = Self::browser();
        let resp = client
            .post(format!("{}/auth/login", self.admin_url))
            .form(&[("phone", phone)])
            .send()
            .await
            .expect("admin login");
        assert!(resp.status().is_success(), "admin login refused: {}", resp.status());
        client
    }

    /// Objects currently in the media directory under `prefix`.
    #[must_use]
    pub fn stored_files(&self, prefix: &str) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.media.path().join(prefix)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

fn storefront_config(addr: SocketAddr, media_dir: PathBuf) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        media_dir,
        whatsapp_number: WHATSAPP_NUMBER.to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
    }
}

fn admin_config(addr: SocketAddr, media_dir: PathBuf, storefront_url: &str) -> AdminConfig {
    AdminConfig {
        database_url: SecretString::from("postgres://unused"),
        host: addr.ip(),
        port: addr.port(),
        base_url: format!("http://{addr}"),
        media_dir,
        media_public_url: format!("{storefront_url}/media"),
        gallery_prefix: "gallery".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 0.0,
        sentry_traces_sample_rate: 0.0,
        tls: None,
    }
}
