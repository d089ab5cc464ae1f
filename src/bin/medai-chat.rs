use clap::Parser;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing_subscriber::EnvFilter;

use medai::client::{ChatClient, DEFAULT_SERVICE_URL, LOG_VIEW_LIMIT};
use medai::models::ChatMessage;

/// Terminal chat front-end for the medai answering service.
#[derive(Parser, Debug)]
#[command(name = "medai-chat", version, about, long_about = None)]
struct Args {
    /// Base URL of the answering service
    #[arg(long, default_value = DEFAULT_SERVICE_URL)]
    url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let mut client = ChatClient::new(args.url)?;
    let mut editor = DefaultEditor::new()?;

    println!("{}", "🩺 Medical AI Assistant".bold());
    println!(
        "{}",
        "Ask a question, or use /logs, /history, /quit".dimmed()
    );

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if let Err(e) = editor.add_history_entry(input) {
            tracing::debug!("Could not record input history: {e}");
        }

        match input {
            "/quit" | "/exit" => break,
            "/logs" => {
                println!("{}", "📜 Backend Logs".bold());
                println!("{}", client.fetch_logs(LOG_VIEW_LIMIT).await);
            }
            "/history" => {
                for message in client.transcript() {
                    render(message);
                }
            }
            question => {
                let answer = client.send(question).await.to_string();
                render(&ChatMessage::assistant(answer));
            }
        }
    }

    Ok(())
}

fn render(message: &ChatMessage) {
    let label = match message.role.as_str() {
        "user" => "you".cyan().bold(),
        _ => "assistant".green().bold(),
    };
    println!("{label}: {}", message.content);
}
