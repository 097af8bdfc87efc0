//! Integration test: HTTP serving flow
//! Tests: health → predict → not-found mapping → retrain-and-publish

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use lifeboat::data::load_corpus;
use lifeboat::data::FsCorpusSource;
use lifeboat::inference::InferenceEngine;
use lifeboat::lookup::LookupStore;
use lifeboat::schema::Schema;
use lifeboat::server::{create_router, AppState, ServerConfig};
use lifeboat::training::Trainer;

fn write_corpus_csv(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("titanic.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "PassengerId,Pclass,Sex,Age,SibSp,Parch,Fare,Embarked,Survived"
    )
    .unwrap();
    for i in 0..24 {
        writeln!(
            file,
            "{},{},{},{},0,0,{},{},{}",
            i + 1,
            1 + i % 3,
            if i % 2 == 0 { "female" } else { "male" },
            20 + i,
            7.25 + i as f64,
            ["S", "C", "Q"][i % 3],
            if i % 2 == 0 { 1 } else { 0 }
        )
        .unwrap();
    }
    path
}

async fn serve_test_app(with_model: bool) -> (axum::Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let data_path = write_corpus_csv(dir.path());
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_path: data_path.clone(),
        model_path: dir.path().join("model.json"),
    };

    let state = Arc::new(AppState::new(config));
    if with_model {
        let records = load_corpus(&FsCorpusSource::new(&data_path)).unwrap();
        let schema = Schema::titanic();
        let (artifact, _) = Trainer::default().run(&records, &schema).unwrap();
        let lookup = LookupStore::build(&records, &schema);
        state.install(InferenceEngine::new(artifact, lookup)).await;
    }

    (create_router(state), dir)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 64)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_model_state() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["model_loaded"], true);
}

#[tokio::test]
async fn test_predict_returns_a_verdict() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(post_json(
            "/api/predict",
            serde_json::json!({"PassengerId": "3"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["passenger_id"], "3");
    let status = json["survival_status"].as_str().unwrap();
    assert!(status == "Survived" || status == "Not Survived");
    let confidence = json["confidence"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&confidence));
    assert!(json["features"].is_object());
    assert!(json["features"].get("Survived").is_none());
}

#[tokio::test]
async fn test_predict_accepts_integer_identifier() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(post_json(
            "/api/predict",
            serde_json::json!({"PassengerId": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["passenger_id"], "3");
}

#[tokio::test]
async fn test_predict_unknown_identifier_is_404_with_echo() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(post_json(
            "/api/predict",
            serde_json::json!({"PassengerId": "999"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["error"], true);
    assert!(json["message"].as_str().unwrap().contains("999"));
}

#[tokio::test]
async fn test_predict_without_model_is_not_found() {
    let (app, _dir) = serve_test_app(false).await;
    let response = app
        .oneshot(post_json(
            "/api/predict",
            serde_json::json!({"PassengerId": "1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predict_with_invalid_json_is_client_error() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/predict")
                .header("content-type", "application/json")
                .body(Body::from("not valid json"))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    assert!(
        status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST,
        "expected 422 or 400 for invalid JSON, got: {status}"
    );
}

#[tokio::test]
async fn test_train_publishes_a_model() {
    let (app, dir) = serve_test_app(false).await;

    let response = app
        .clone()
        .oneshot(post_json("/api/train", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["train_accuracy"].as_f64().is_some());
    assert!(dir.path().join("model.json").exists());

    // Predictions work against the freshly published snapshot.
    let response = app
        .oneshot(post_json(
            "/api/predict",
            serde_json::json!({"PassengerId": "1"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_model_info_without_model_is_404() {
    let (app, _dir) = serve_test_app(false).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_model_info_exposes_metadata() {
    let (app, _dir) = serve_test_app(true).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/model")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["train_accuracy"].as_f64().is_some());
    assert!(json["feature_names"].is_array());
    assert_eq!(json["known_passengers"], 24);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _dir) = serve_test_app(false).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
