//! Document filter - evaluates a composed specification over documents
//!
//! Keeps documents dated before a cutoff whose title and content both
//! mention one of the configured words, and prints their titles.

mod config;
mod specs;

use anyhow::Result;
use spec_rules::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::specs::{build_rule, load_documents, sample_documents};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_filter=info,spec_rules=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting document filter");

    // Load configuration
    let config = Config::from_env()?;
    vocabulary::set_global(config.vocabulary.clone());

    let documents = match &config.input {
        Some(path) => {
            tracing::info!("Loading documents from {}", path.display());
            load_documents(path).await?
        }
        None => sample_documents(),
    };

    // Checkpoint per document so Ctrl+C stops the run between documents
    let rule = build_rule(config.cutoff, &config.words).guarded();
    tracing::info!(rule = %rule.describe(), "Rule ready");

    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    let mut matched = 0usize;
    for doc in &documents {
        match rule.evaluate(&token, doc).await {
            Ok(satisfied) => {
                tracing::debug!(title = %doc.title, satisfied, "Evaluated document");
                if satisfied {
                    matched += 1;
                    println!("{}", doc.title);
                }
            }
            Err(e) if e.is_cancelled() => {
                tracing::warn!("Evaluation cancelled");
                break;
            }
            Err(e) => {
                tracing::error!(title = %doc.title, code = e.error_code(), "Evaluation failed: {}", e);
                return Err(e.into());
            }
        }
    }

    tracing::info!(matched, total = documents.len(), "Document filter finished");
    Ok(())
}
