use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};

use tutor_hub::catalog::Fixtures;
use tutor_hub::config::AppConfig;
use tutor_hub::messaging::{ChatEvent, Sender};
use tutor_hub::navigation::Navigator;
use tutor_hub::registration::LogSink;
use tutor_hub::shell::{ChatFeed, Outcome, Shell, render};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with rendered views on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env().context("reading configuration")?;
    let today = Utc::now().date_naive();
    let fixtures = Fixtures::from_config(&config)
        .await
        .context("loading fixtures")?
        .rebased(today);

    eprintln!("Tutor Hub v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Role: {}", config.role);
    eprintln!("   Assistant: {}", config.assistant_name);
    match &config.fixtures_path {
        Some(path) => eprintln!("   Fixtures: {}", path.display()),
        None => eprintln!("   Fixtures: built-in"),
    }
    eprintln!("   Type help for commands, quit to exit.\n");

    let assistant_name = config.assistant_name.clone();
    let (fixtures, sink) = (Arc::new(fixtures), Arc::new(LogSink));
    let navigator = Navigator::new(config, fixtures, sink, today)?;
    let mut shell = Shell::new(navigator);

    println!("{}\n", shell.render().await);
    let mut feed = ChatFeed::new(&shell);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    eprint!("> ");
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                };
                match shell.run_line(&line).await {
                    Ok(Outcome::Quit) => break,
                    Ok(Outcome::Output(text)) if text.is_empty() => {}
                    Ok(Outcome::Output(text)) => println!("\n{}\n", text),
                    Err(e) => eprintln!("Error: {}", e),
                }
                // Only a newly mounted screen needs a new subscription.
                feed.follow(&shell);
                eprint!("> ");
            }
            event = feed.next() => {
                if let ChatEvent::MessageAdded { message, .. } = event {
                    if message.sender == Sender::Assistant {
                        println!("\n{}\n", render::chat_message(&message, &assistant_name));
                        eprint!("> ");
                    }
                }
            }
        }
    }

    eprintln!("Goodbye.");
    Ok(())
}
