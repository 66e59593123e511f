use std::sync::Arc;

use ad_operator::{AdOperator, ChatRole, OperatorConfig, TurnOutcome};
use campaign_core::CreativeEngine;
use campaign_store::{FileStorage, ProjectStore};
use campaign_tools::{write_artifact, CampaignDispatcher};
use gemini_brain::GeminiEngine;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const BANNER: &str = "AdOpt operator. Type a request, or /suggest, /backup, /reset, /quit.";

async fn print_suggestions(operator: &AdOperator) {
    for suggestion in operator.suggestions().await {
        println!("  {} {}: {}", suggestion.icon, suggestion.title, suggestion.prompt);
    }
}

async fn backup(operator: &AdOperator) -> Result<(), Box<dyn std::error::Error>> {
    let document = operator.store().create_auto_backup().await?;
    let path = write_artifact(&operator.config().export_dir, "adopt-backup", &document).await?;
    println!(
        "Backed up {} projects to {}",
        document.projects.len(),
        path.display()
    );
    Ok(())
}

async fn run_turn(operator: &AdOperator, line: &str) {
    let start = operator.transcript().len().await;
    let outcome = operator.send_message(line).await;
    if outcome == TurnOutcome::Ignored {
        return;
    }

    // The user line is already on screen
    for entry in operator.transcript().since(start + 1).await {
        match entry.role {
            ChatRole::ToolNotice => println!("  ... {}", entry.text),
            ChatRole::Assistant if entry.is_error => println!("! {}", entry.text),
            ChatRole::Assistant => println!("{}", entry.text),
            ChatRole::User => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = OperatorConfig::from_env()?;
    let engine: Arc<dyn CreativeEngine> = Arc::new(GeminiEngine::from_env()?);

    info!("Opening project store in {}", config.data_dir.display());
    let store = ProjectStore::open(Arc::new(FileStorage::new(&config.data_dir))).await?;
    let dispatcher = Arc::new(CampaignDispatcher::with_config(
        store.clone(),
        Arc::clone(&engine),
        config.dispatcher_config(),
    ));
    let operator = AdOperator::new(engine, dispatcher.clone(), store, config);

    println!("{}", BANNER);
    print_suggestions(&operator).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                operator.reset().await;
                println!("Conversation cleared.");
            }
            "/suggest" => print_suggestions(&operator).await,
            "/backup" => {
                if let Err(e) = backup(&operator).await {
                    warn!("Backup failed: {}", e);
                    println!("! Backup failed: {}", e);
                }
            }
            other => run_turn(&operator, other).await,
        }
    }

    let pending = dispatcher.pending_image_jobs().await;
    if pending > 0 {
        println!("Waiting for {} image jobs to finish...", pending);
        dispatcher.wait_for_image_jobs().await;
    }

    info!("Operator shutting down");
    Ok(())
}
