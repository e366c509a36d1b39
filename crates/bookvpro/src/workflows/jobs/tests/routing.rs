use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::jobs::{job_router, JobId};

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("json encodes")))
        .expect("request builds")
}

#[tokio::test]
async fn start_then_poll_until_completed() {
    let (runner, _) = build_runner();
    let router = job_router(runner.clone());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/start",
            json!({ "keywords": ["코스모스", "무명의 시집"] }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let payload = read_json_body(response).await;
    let job_id = payload["job_id"].as_str().expect("job id").to_string();

    wait_for_completion(&runner, &JobId(job_id.clone())).await;

    let response = router
        .oneshot(
            Request::get(format!("/status/{job_id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["status"], "completed");
    assert_eq!(payload["progress"], 100);
    assert_eq!(payload["results"][0]["title"], "코스모스");
    assert_eq!(payload["results"][0]["seller_count"], 27);
    assert_eq!(payload["results"][1]["grade"], "A");
}

#[tokio::test]
async fn status_of_unknown_job_is_not_found() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(
            Request::get("/status/does-not-exist")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(response).await, json!({ "error": "not found" }));
}

#[tokio::test]
async fn start_rejects_batches_over_the_limit() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(json_request(
            "POST",
            "/start",
            json!({ "keywords": ["1", "2", "3", "4", "5", "6"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn check_returns_results_synchronously() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(json_request(
            "POST",
            "/check",
            json!({ "keywords": ["사피엔스", "", "없는 책"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let results = payload["results"].as_array().expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["has_card"], true);
    assert_eq!(results[0]["grade"], "B");
    assert_eq!(results[1]["link"], "#");
}

#[tokio::test]
async fn analyze_renders_html_table_from_form() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(
            Request::post("/analyze")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "keywords=%EB%AC%B4%EB%AA%85%EC%9D%98+%EC%8B%9C%EC%A7%91%0D%0A%EC%BD%94%EC%8A%A4%EB%AA%A8%EC%8A%A4",
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(read_body(response).await).expect("utf-8 body");
    assert!(html.contains("<td>무명의 시집</td>"));
    assert!(html.contains("<td>코스모스</td>"));
    assert!(html.contains("<td class=\"A\">A</td>"));
}

#[tokio::test]
async fn download_returns_workbook_attachment() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(json_request(
            "POST",
            "/download",
            json!({ "results": [
                { "title": "코스모스", "seller_count": 27, "grade": "B", "link": "https://books.test/코스모스" }
            ] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"result.xlsx\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(read_body(response).await.starts_with(b"PK"));
}

#[tokio::test]
async fn download_as_csv_on_request() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(json_request(
            "POST",
            "/download?format=csv",
            json!({ "results": [
                { "title": "코스모스", "seller_count": 27, "grade": "B", "link": "https://books.test/코스모스" }
            ] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"result.csv\""
    );
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/csv; charset=utf-8"
    );
    let text = String::from_utf8(read_body(response).await).expect("utf-8 body");
    assert!(text.contains("코스모스,0,27,false,B,https://books.test/코스모스"));
}

#[tokio::test]
async fn job_download_exports_stored_results() {
    let (runner, _) = build_runner();
    let job = runner.start(&["무명의 시집"]).expect("job queued");
    wait_for_completion(&runner, &job.job_id).await;

    let router = job_router(runner);
    let response = router
        .clone()
        .oneshot(
            Request::get(format!("/download/{}", job.job_id))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"result.xlsx\""
    );

    let response = router
        .oneshot(
            Request::get(format!("/download/{}?format=csv", job.job_id))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let text = String::from_utf8(read_body(response).await).expect("utf-8 body");
    assert_eq!(text.lines().count(), 2);
    assert!(text.contains("무명의 시집,0,0,false,A"));
}

#[tokio::test]
async fn download_of_unknown_job_is_not_found() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(
            Request::get("/download/does-not-exist")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(read_json_body(response).await, json!({ "error": "not found" }));
}

#[tokio::test]
async fn check_rejects_batches_over_the_limit() {
    let (runner, _) = build_runner();
    let response = job_router(runner)
        .oneshot(json_request(
            "POST",
            "/check",
            json!({ "keywords": ["1", "2", "3", "4", "5", "6"] }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload["error"],
        "too many titles: 6 submitted, limit is 5"
    );
}
