use std::{sync::Arc, time::Duration};

use anyhow::anyhow;
use axum::{
    Router,
    extract::Request,
    response::Response,
    routing::{get, post},
    serve::Serve,
};
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Span, field, info, info_span};
use uuid::Uuid;

use crate::{
    configuration::{DatabaseSettings, Settings},
    dispatch::PreviewSettings,
    email_client::EmailClient,
    recipient_store::{PgRecipientStore, RecipientStore},
    routes::{
        convocatoria_chosen, get_user, health_check, index, list_users, send_bulk_email,
        user_created, validate_bulk_email, welcome,
    },
};

pub struct AppState {
    pub store: Arc<dyn RecipientStore>,
    pub email_client: EmailClient,
    pub preview: PreviewSettings,
}

pub async fn run(
    listener: TcpListener,
    store: Arc<dyn RecipientStore>,
    email_client: EmailClient,
    preview: PreviewSettings,
) -> anyhow::Result<Serve<TcpListener, Router, Router>> {
    // Shared by every handler through a cheap Arc clone.
    let app_state = Arc::new(AppState {
        store,
        email_client,
        preview,
    });
    let app = Router::new()
        .route("/", get(index))
        .route("/health_check", get(health_check))
        .route("/api/v1/notifications/welcome", post(welcome))
        // path used by the auth service when a user signs up
        .route("/api/v1/notification/usuario-creado/", post(user_created))
        .route(
            "/api/v1/notifications/convocatoria",
            post(convocatoria_chosen),
        )
        .route("/api/v1/notifications/bulk", post(send_bulk_email))
        .route(
            "/api/v1/notifications/bulk/validate",
            post(validate_bulk_email),
        )
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/{id}", get(get_user))
        .with_state(app_state)
        // the frontend calls the service from other origins
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = Uuid::new_v4();
                    info_span!(
                        "http_request",
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        request_id = ?request_id,
                        status = field::Empty,
                    )
                })
                .on_response(|response: &Response, latency: Duration, span: &Span| {
                    let status = response.status();
                    span.record("status", status.as_u16());
                    info!(parent: span, ?status, ?latency, "Response sent");
                }),
        );

    Ok(axum::serve(listener, app))
}

pub struct Application {
    port: u16,
    server: Serve<TcpListener, Router, Router>,
}

impl Application {
    /// Build against the configured Postgres database.
    ///
    /// The pool connects lazily, so a database outage surfaces per request
    /// instead of at startup.
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let connection_pool = get_connection_pool(&configuration.database);
        let store = Arc::new(PgRecipientStore::new(connection_pool));
        Self::build_with_store(configuration, store).await
    }

    pub async fn build_with_store(
        configuration: Settings,
        store: Arc<dyn RecipientStore>,
    ) -> anyhow::Result<Self> {
        let sender_email = configuration
            .email_client
            .sender()
            .map_err(|e| anyhow!("invalid sender email address, {e}"))?;
        let timeout = configuration.email_client.timeout();
        let email_client = EmailClient::new(
            sender_email,
            configuration.email_client.base_url,
            configuration.email_client.authorization_token,
            timeout,
        )?;

        let listener = TcpListener::bind(format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        ))
        .await?;
        let port = listener.local_addr()?.port();
        info!(port, "Listening for notification requests");

        let server = run(listener, store, email_client, configuration.dispatch).await?;

        Ok(Self { server, port })
    }

    pub async fn run_until_stopped(self) -> anyhow::Result<()> {
        Ok(self.server.await?)
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.connect_options())
}
