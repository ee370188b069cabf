use std::sync::Arc;

use notification_dispatch::domain::{Recipient, Role};
use serde_json::json;
use wiremock::matchers::any;
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{UnreachableStore, recipient, spawn_app, spawn_app_with_store};

fn students(count: i64) -> Vec<Recipient> {
    (1..=count)
        .map(|id| recipient(id, Role::Student, &format!("student{id}@unal.edu.co")))
        .collect()
}

#[tokio::test]
async fn large_batch_is_flagged_and_nothing_is_sent() {
    // Arrange
    let app = spawn_app(students(150)).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_bulk_validation(&json!({})).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["recipient_count"], 150);
    assert_eq!(report["warnings"], json!(["large recipient count"]));
    let preview = report["preview_sample"].as_array().unwrap();
    assert_eq!(preview.len(), 5);
    assert_eq!(preview[0]["email"], "student1@unal.edu.co");
    assert_eq!(preview[0]["role"], "STUDENT");
    let estimate = report["estimated_duration_seconds"].as_f64().unwrap();
    assert!((estimate - 15.0).abs() < 1e-9);
}

#[tokio::test]
async fn empty_store_warns_about_no_recipients() {
    // Arrange
    let app = spawn_app(vec![]).await;

    // Act
    let response = app.post_bulk_validation(&json!({"filters": null})).await;

    // Assert
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["recipient_count"], 0);
    assert_eq!(report["warnings"], json!(["filter matches no recipients"]));
    assert_eq!(report["preview_sample"], json!([]));
}

#[tokio::test]
async fn filters_are_applied_to_the_preview() {
    // Arrange
    let mut recipients = students(3);
    recipients.push(recipient(4, Role::Admin, "root@unal.edu.co"));
    let app = spawn_app(recipients).await;

    // Act
    let response = app
        .post_bulk_validation(&json!({"filters": {"roles": ["ADMIN"]}}))
        .await;

    // Assert
    let report: serde_json::Value = response.json().await.unwrap();
    assert_eq!(report["recipient_count"], 1);
    assert_eq!(report["warnings"], json!([]));
    assert_eq!(report["preview_sample"][0]["id"], 4);
}

#[tokio::test]
async fn validation_returns_a_503_when_the_store_is_down() {
    // Arrange
    let app = spawn_app_with_store(Arc::new(UnreachableStore)).await;

    // Act
    let response = app.post_bulk_validation(&json!({})).await;

    // Assert
    assert_eq!(503, response.status().as_u16());
}
