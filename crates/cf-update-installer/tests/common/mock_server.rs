//! Mock server helpers for download and release tests

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve `body` for `GET /stable?release={release}&version={version}`
pub async fn mock_artifact(server: &MockServer, release: &str, version: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path("/stable"))
        .and(query_param("release", release))
        .and(query_param("version", version))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
        .mount(server)
        .await;
}

/// Answer every artifact request with `status`, expecting exactly one request
pub async fn mock_artifact_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/stable"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve a GitHub tag list for `owner/repo`
pub async fn mock_tags(server: &MockServer, owner: &str, repo: &str, names: &[&str]) {
    let body: Vec<_> = names.iter().map(|name| json!({ "name": name })).collect();

    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/tags", owner, repo)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Answer tag requests for `owner/repo` with `status`
pub async fn mock_tags_status(server: &MockServer, owner: &str, repo: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/tags", owner, repo)))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
