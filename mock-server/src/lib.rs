//! A small stand-in for the EnsEMBL REST service.
//!
//! Serves a handful of real paths (`/info/ping`, `/lookup/id/...`) backed by a
//! fixed gene table, plus `/echo` routes that reflect the request back as
//! JSON and a `/malformed` route whose body is not JSON.

use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::{Path, RawQuery},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Gene {
    pub id: String,
    pub display_name: String,
    pub species: String,
    pub object_type: String,
    pub biotype: String,
}

/// Genes known to the mock, keyed by stable id.
pub fn genes() -> BTreeMap<&'static str, Gene> {
    [
        ("ENSG00000157764", "BRAF", "protein_coding"),
        ("ENSG00000139618", "BRCA2", "protein_coding"),
        ("ENSG00000228630", "HOTAIR", "lncRNA"),
    ]
    .into_iter()
    .map(|(id, name, biotype)| {
        (
            id,
            Gene {
                id: id.to_string(),
                display_name: name.to_string(),
                species: "homo_sapiens".to_string(),
                object_type: "Gene".to_string(),
                biotype: biotype.to_string(),
            },
        )
    })
    .collect()
}

pub fn app() -> Router {
    Router::new()
        .route("/info/ping", get(ping))
        .route("/lookup/id/{id}", get(lookup_id))
        .route("/lookup/id", post(lookup_ids))
        .route("/echo/{word}", get(echo_get))
        .route("/echo", post(echo_post))
        .route("/malformed", get(malformed))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn pairs(raw: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(raw.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn ping() -> Response {
    (
        [(header::SET_COOKIE, "session=mock; Path=/; HttpOnly")],
        Json(json!({ "ping": 1 })),
    )
        .into_response()
}

async fn lookup_id(Path(id): Path<String>, RawQuery(query): RawQuery) -> Response {
    let query = pairs(query.as_deref().unwrap_or(""));
    let expand = query.iter().any(|(k, v)| k == "expand" && v == "1");
    match genes().remove(id.as_str()) {
        Some(gene) => {
            let mut body = serde_json::to_value(gene).unwrap_or(Value::Null);
            if expand {
                body["Transcript"] = json!([]);
            }
            Json(body).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("ID '{id}' not found") })),
        )
            .into_response(),
    }
}

async fn lookup_ids(body: Bytes) -> Json<BTreeMap<String, Option<Gene>>> {
    let known = genes();
    let text = String::from_utf8_lossy(&body);
    let found = pairs(&text)
        .into_iter()
        .filter(|(k, _)| k == "ids")
        .map(|(_, id)| {
            let gene = known.get(id.as_str()).cloned();
            (id, gene)
        })
        .collect();
    Json(found)
}

async fn echo_get(
    Path(word): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Json<Value> {
    Json(json!({
        "method": "GET",
        "word": word,
        "query": pairs(query.as_deref().unwrap_or("")),
        "content_type": header_text(&headers, header::CONTENT_TYPE),
        "user_agent": header_text(&headers, header::USER_AGENT),
    }))
}

async fn echo_post(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let content_type = header_text(&headers, header::CONTENT_TYPE);
    let form = match content_type.as_deref() {
        Some("application/x-www-form-urlencoded") => pairs(&String::from_utf8_lossy(&body)),
        _ => Vec::new(),
    };
    Json(json!({
        "method": "POST",
        "content_type": content_type,
        "form": form,
        "body_len": body.len(),
        "user_agent": header_text(&headers, header::USER_AGENT),
    }))
}

async fn malformed() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain")],
        "this is not json {",
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gene_table_is_keyed_by_id() {
        let genes = genes();
        assert_eq!(genes.len(), 3);
        assert_eq!(genes["ENSG00000157764"].display_name, "BRAF");
        assert!(genes.values().all(|g| g.species == "homo_sapiens"));
    }

    #[test]
    fn pairs_keeps_repeated_keys() {
        assert_eq!(
            pairs("ids=A&ids=B&x=1+2"),
            vec![
                ("ids".to_string(), "A".to_string()),
                ("ids".to_string(), "B".to_string()),
                ("x".to_string(), "1 2".to_string()),
            ]
        );
        assert!(pairs("").is_empty());
    }

    #[test]
    fn gene_serializes_to_ensembl_shape() {
        let json = serde_json::to_value(&genes()["ENSG00000139618"]).unwrap();
        assert_eq!(json["id"], "ENSG00000139618");
        assert_eq!(json["display_name"], "BRCA2");
        assert_eq!(json["object_type"], "Gene");
    }
}
