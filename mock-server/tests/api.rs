use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Gene};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn form_request(uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

// --- info ---

#[tokio::test]
async fn ping_returns_one_and_sets_cookie() {
    let resp = app().oneshot(get("/info/ping")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(http::header::SET_COOKIE).unwrap();
    assert!(cookie.to_str().unwrap().starts_with("session=mock"));
    let body: Value = body_json(resp).await;
    assert_eq!(body, serde_json::json!({"ping": 1}));
}

// --- lookup ---

#[tokio::test]
async fn lookup_known_gene() {
    let resp = app().oneshot(get("/lookup/id/ENSG00000157764")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let gene: Gene = body_json(resp).await;
    assert_eq!(gene.display_name, "BRAF");
    assert_eq!(gene.species, "homo_sapiens");
}

#[tokio::test]
async fn lookup_expand_adds_transcripts() {
    let resp = app()
        .oneshot(get("/lookup/id/ENSG00000139618?expand=1"))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["display_name"], "BRCA2");
    assert!(body["Transcript"].is_array());
}

#[tokio::test]
async fn lookup_unknown_gene_returns_400_with_error() {
    let resp = app().oneshot(get("/lookup/id/ENSG_NOPE")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["error"], "ID 'ENSG_NOPE' not found");
}

#[tokio::test]
async fn lookup_post_maps_each_id() {
    let resp = app()
        .oneshot(form_request(
            "/lookup/id",
            "ids=ENSG00000157764&ids=ENSG00000228630&ids=missing",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = body_json(resp).await;
    assert_eq!(body["ENSG00000157764"]["display_name"], "BRAF");
    assert_eq!(body["ENSG00000228630"]["biotype"], "lncRNA");
    assert!(body["missing"].is_null());
}

// --- echo ---

#[tokio::test]
async fn echo_get_reflects_query_and_headers() {
    let req = Request::builder()
        .uri("/echo/hello?count=5&feature=gene&feature=exon")
        .header(http::header::USER_AGENT, "test-agent")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(String::new())
        .unwrap();
    let resp = app().oneshot(req).await.unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["word"], "hello");
    assert_eq!(
        body["query"],
        serde_json::json!([["count", "5"], ["feature", "gene"], ["feature", "exon"]])
    );
    assert_eq!(body["user_agent"], "test-agent");
    assert_eq!(body["content_type"], "application/json");
}

#[tokio::test]
async fn echo_post_decodes_form_body() {
    let resp = app()
        .oneshot(form_request("/echo", "species=human&expand=1"))
        .await
        .unwrap();

    let body: Value = body_json(resp).await;
    assert_eq!(body["method"], "POST");
    assert_eq!(body["form"], serde_json::json!([["species", "human"], ["expand", "1"]]));
    assert_eq!(body["body_len"], 22);
}

// --- malformed ---

#[tokio::test]
async fn malformed_body_is_not_json() {
    let resp = app().oneshot(get("/malformed")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = body_bytes(resp).await;
    assert!(serde_json::from_slice::<Value>(&bytes).is_err());
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/no/such/path")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
