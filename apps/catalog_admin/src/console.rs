//! Terminal implementations of the notification and confirmation surfaces.

use std::io::{self, Write};

use anyhow::{Context, Result};
use async_trait::async_trait;
use catalog_core::{ConfirmationGate, Notifier};

pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_success(&self, message: &str) {
        println!("ok: {message}");
    }

    fn notify_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

/// Prompts on stdout and reads one line from stdin. Anything but an explicit
/// yes declines.
pub struct StdinConfirmation;

#[async_trait]
impl ConfirmationGate for StdinConfirmation {
    async fn ask(&self, message: &str, title: &str) -> bool {
        match prompt_line(&format!("{title}\n{message}\n[y/N] ")).await {
            Ok(line) => is_yes(&line),
            Err(err) => {
                tracing::warn!(error = %err, "could not read confirmation; treating as no");
                false
            }
        }
    }
}

/// Prints `prompt` and reads one line from stdin without its line ending.
pub async fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("failed to flush prompt")?;

    let line = tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        io::stdin().read_line(&mut line).map(|_| line)
    })
    .await
    .context("prompt task failed")?
    .context("failed to read stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "s" | "si" | "sí"
    )
}
