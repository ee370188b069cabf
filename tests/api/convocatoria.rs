use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::spawn_app;

fn convocatoria_body(email: &str) -> serde_json::Value {
    json!({
        "user_name": "Ana Torres",
        "user_email": email,
        "title": "Erasmus+ 2026",
        "description": "Full tuition & <em>housing</em>",
        "destination_institution": "Universidad de Salamanca",
        "start_date": "2026-09-01",
        "end_date": "2027-01-31"
    })
}

#[tokio::test]
async fn convocatoria_email_carries_every_field() {
    // Arrange
    let app = spawn_app(vec![]).await;

    Mock::given(path("/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app
        .post_convocatoria(&convocatoria_body("ana@unal.edu.co"))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let result: serde_json::Value = response.json().await.unwrap();
    assert_eq!(result["success"], true);

    let sent = app.sent_emails().await;
    assert_eq!(sent[0]["Subject"], "You have been selected for Erasmus+ 2026");
    let html = sent[0]["HtmlBody"].as_str().unwrap();
    for expected in [
        "Ana Torres",
        "Full tuition & <em>housing</em>",
        "Universidad de Salamanca",
        "2026-09-01",
        "2027-01-31",
    ] {
        assert!(html.contains(expected), "{expected} missing from {html}");
    }
}

#[tokio::test]
async fn convocatoria_returns_a_400_for_an_invalid_email() {
    // Arrange
    let app = spawn_app(vec![]).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.email_server)
        .await;

    // Act
    let response = app.post_convocatoria(&convocatoria_body("ana-at-unal")).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn convocatoria_returns_a_422_when_details_are_missing() {
    // Arrange
    let app = spawn_app(vec![]).await;
    let body = json!({"user_name": "Ana Torres", "user_email": "ana@unal.edu.co"});

    // Act
    let response = app.post_convocatoria(&body).await;

    // Assert
    assert_eq!(422, response.status().as_u16());
}
