mod config;

use anyhow::Context;
use clap::Parser;
use ensembl_core::{DecodePolicy, EnsemblClient, Registry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| config.log_level.clone().into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = build_client(&config)?;

    if config.list {
        for op in client.operations() {
            println!("{:<32} {:<5} {}", op.name(), op.endpoint().method, op.endpoint().url);
        }
        return Ok(());
    }

    let operation = config
        .operation
        .as_deref()
        .context("no operation given")?;
    tracing::info!("Calling {} on {}", operation, client.server());

    let reply = client.invoke(operation, &config.call_params())?;

    if config.record {
        eprintln!("{}", serde_json::to_string_pretty(&reply.record)?);
    }
    if let Some(text) = reply.record.status_text().filter(|_| !reply.record.is_success()) {
        tracing::warn!("HTTP {}: {}", reply.record.status, text);
    }
    println!("{}", serde_json::to_string_pretty(&reply.content)?);

    Ok(())
}

fn build_client(config: &Config) -> anyhow::Result<EnsemblClient> {
    let mut builder = EnsemblClient::builder();
    if let Some(server) = &config.server {
        builder = builder.server(server);
    } else if config.genomes {
        builder = builder.genomes();
    }
    if let Some(proxy) = &config.proxy {
        builder = builder.proxy(proxy);
    }
    if let Some(path) = &config.endpoints {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading endpoint table {}", path.display()))?;
        builder = builder.registry(Registry::from_json(&json)?);
    }
    if config.strict {
        builder = builder.decode_policy(DecodePolicy::Strict);
    }
    Ok(builder.build()?)
}
