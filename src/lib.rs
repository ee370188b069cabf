pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod email_client;
pub mod mail_transport;
pub mod notifications;
pub mod recipient_store;
pub mod routes;
pub mod startup;
pub mod telemetry;
