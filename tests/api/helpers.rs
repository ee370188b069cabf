use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use notification_dispatch::{
    configuration::get_configuration,
    domain::{Recipient, Role},
    recipient_store::{InMemoryRecipientStore, RecipientStore, StoreError},
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

// Ensure that the `tracing` stack is only initialised once
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}{}", &self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_welcome(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/v1/notifications/welcome", body).await
    }

    pub async fn post_convocatoria(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/v1/notifications/convocatoria", body)
            .await
    }

    pub async fn post_bulk_email(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/v1/notifications/bulk", body).await
    }

    pub async fn post_bulk_validation(&self, body: &serde_json::Value) -> reqwest::Response {
        self.post_json("/api/v1/notifications/bulk/validate", body)
            .await
    }

    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.api_client
            .get(format!("{}{}", &self.address, path_and_query))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    /// Bodies of every request the mail API received, in arrival order.
    pub async fn sent_emails(&self) -> Vec<serde_json::Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }
}

pub fn recipient(id: i64, role: Role, email: &str) -> Recipient {
    Recipient {
        id,
        name: format!("User {id}"),
        email: email.to_string(),
        role,
    }
}

pub async fn spawn_app(recipients: Vec<Recipient>) -> TestApp {
    spawn_app_with_store(Arc::new(InMemoryRecipientStore::new(recipients))).await
}

pub async fn spawn_app_with_store(store: Arc<dyn RecipientStore>) -> TestApp {
    LazyLock::force(&TRACING);

    let email_server = MockServer::start().await;

    // Randomise configuration to ensure test isolation
    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        // Use a random OS port
        c.application.port = 0;
        // Use the mock server as email API
        c.email_client.base_url = email_server.uri();
        c
    };

    let application = Application::build_with_store(configuration, store)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        email_server,
        api_client: reqwest::Client::new(),
    }
}

/// A store whose backing database is down.
pub struct UnreachableStore;

#[async_trait]
impl RecipientStore for UnreachableStore {
    async fn get_all(&self) -> Result<Vec<Recipient>, StoreError> {
        Err(StoreError::Query(sqlx::Error::PoolTimedOut))
    }

    async fn get_by_id(&self, _id: i64) -> Result<Option<Recipient>, StoreError> {
        Err(StoreError::Query(sqlx::Error::PoolTimedOut))
    }
}
