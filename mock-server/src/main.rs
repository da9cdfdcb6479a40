use tokio::net::TcpListener;

/// Serve the mock on `MOCK_ENSEMBL_PORT` (default 3000) for manual runs of
/// `ensembl-rest --server http://127.0.0.1:3000 ...`.
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("MOCK_ENSEMBL_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock EnsEMBL REST listening on http://{addr}");
    mock_server::run(listener).await
}
