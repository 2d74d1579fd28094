use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use symphony::config::{Config, LogFormat};
use symphony::fixtures::{DataProvider, FixtureSet};
use symphony::models::{Capability, Role};
use symphony::{ChatProvider, ChatSession, SymphonyError};

#[derive(Parser)]
#[command(name = "symphony")]
#[command(about = "Database co-pilot for the Self-Healing Database Symphony")]
struct Args {
    /// JSON fixture file replacing the built-in dashboard databases
    #[arg(long)]
    fixtures: Option<PathBuf>,

    /// Answer a single question and exit
    #[arg(long)]
    query: Option<String>,

    /// Train the model before answering
    #[arg(long)]
    train: bool,
}

fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "symphony=info".into());

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let mut config = Config::from_env();
    init_logging(config.logging.format);

    if args.fixtures.is_some() {
        config.fixtures_path = args.fixtures.clone();
    }

    let fixtures = match &config.fixtures_path {
        Some(path) => FixtureSet::load(path)?,
        None => FixtureSet::dashboard(),
    };
    tracing::info!(
        databases = fixtures.metric_records().len(),
        "Monitoring databases"
    );

    if let Some(query) = args.query.as_deref() {
        config.assistant.response_latency_ms = 0;
        let mut session = ChatSession::new(config, Arc::new(fixtures));
        if args.train {
            session.train().await;
        }
        if let Some(reply) = session.send(query).await {
            println!("{}", reply.text);
        }
        session.shutdown().await;
        return Ok(());
    }

    let mut provider = ChatProvider::new(ChatSession::new(config, Arc::new(fixtures)));
    provider.open_chat();

    if args.train {
        provider.session_mut()?.train().await;
    }

    print_new_messages(provider.session()?, 0).await?;
    run_repl(&mut provider).await?;

    provider.teardown().await;
    Ok(())
}

async fn run_repl(provider: &mut ChatProvider) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let session = provider.session_mut()?;
        let seen = session.messages().len();

        if let Some(command) = line.strip_prefix('/') {
            if !handle_command(session, command).await? {
                break;
            }
        } else {
            session.send(line).await;
        }

        let session = provider.session()?;
        // "/clear" shrinks the history; show the greeting again.
        let from = if session.messages().len() < seen { 0 } else { seen };
        print_new_messages(session, from).await?;
    }

    Ok(())
}

/// Returns `false` when the REPL should exit.
async fn handle_command(session: &mut ChatSession, command: &str) -> anyhow::Result<bool> {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next();

    match (name, arg) {
        ("quit" | "exit", _) => return Ok(false),
        ("train", _) => {
            session.train().await;
        }
        ("retrain", _) => {
            session.retrain().await;
        }
        ("learn", _) => match session.run_learning_cycle().await {
            Ok(record) => println!("Learning cycle {} completed", record.learning_iterations),
            Err(SymphonyError::NotTrained) => {
                println!("Model must be trained before starting continuous learning")
            }
            Err(e) => return Err(e.into()),
        },
        ("enable", Some(cap)) => match cap.parse::<Capability>() {
            Ok(capability) => {
                session.enable(capability).await;
                println!("{} enabled", capability.display_name());
            }
            Err(e) => println!("{e}"),
        },
        ("disable", Some(cap)) => match cap.parse::<Capability>() {
            Ok(capability) => {
                session.disable(capability).await;
                println!("{} disabled", capability.display_name());
            }
            Err(e) => println!("{e}"),
        },
        ("caps", _) => {
            for (capability, enabled) in session.capabilities().await {
                println!(
                    "  [{}] {} ({})",
                    if enabled { "x" } else { " " },
                    capability.display_name(),
                    capability.key()
                );
            }
        }
        ("models", _) => {
            let training = session.training().await;
            if training.adaptive_models.is_empty() {
                println!("No models trained yet");
            }
            for model in &training.adaptive_models {
                println!("  {model}");
            }
            println!(
                "Accuracy: {:.1}%  Iterations: {}  Knowledge base: {} topics  Analyzed databases: {}",
                training.accuracy,
                training.learning_iterations,
                session.knowledge_topics().await,
                training.database_patterns.len()
            );
        }
        ("issues", _) => {
            for issue in session.data().detected_issues() {
                println!(
                    "  [{}] {}: {} -> {}",
                    issue.severity, issue.database, issue.description, issue.recommendation
                );
            }
        }
        ("events", _) => {
            for event in session.data().healing_events() {
                println!(
                    "  [{}] {} {}: {} ({}, {})",
                    event.status,
                    event.timestamp,
                    event.database,
                    event.description,
                    event.duration,
                    event.impact
                );
            }
        }
        ("insights", _) => {
            for insight in session.data().insights() {
                println!(
                    "  [{}] {} ({}% confidence): {} -> {}",
                    insight.category,
                    insight.title,
                    insight.confidence,
                    insight.description,
                    insight.recommendation
                );
            }
        }
        ("clear", _) => session.clear_chat(),
        _ => println!(
            "Commands: /train /retrain /learn /enable <capability> /disable <capability> /caps /models /issues /events /insights /clear /quit"
        ),
    }

    Ok(true)
}

async fn print_new_messages(session: &ChatSession, from: usize) -> anyhow::Result<()> {
    let mut stdout = tokio::io::stdout();
    for message in session.messages().iter().skip(from) {
        let line = match message.role {
            Role::User => continue,
            Role::Assistant => format!("co-pilot: {}\n", message.text),
            Role::System => format!("-- {} --\n", message.text),
        };
        stdout.write_all(line.as_bytes()).await?;
    }
    stdout.flush().await?;
    Ok(())
}
