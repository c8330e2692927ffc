//! CLI tool for sending site feedback
//!
//! # Usage
//!
//! ```bash
//! feedback --endpoint http://localhost:3000/api/feedback \
//!     --name Ada --contact ada@example.com \
//!     --message "We need a launch site by spring."
//! ```

use clap::Parser;
use feedback_client::{FeedbackForm, Status};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "feedback")]
#[command(about = "Send feedback to the site feedback endpoint", long_about = None)]
struct Cli {
    /// Feedback endpoint URL
    #[arg(short, long, default_value = "http://localhost:3000/api/feedback")]
    endpoint: String,

    /// Your name
    #[arg(short, long, default_value = "")]
    name: String,

    /// Email address or chat handle to reply to
    #[arg(short, long, default_value = "")]
    contact: String,

    /// Message (at least 8 characters)
    #[arg(short, long)]
    message: String,

    #[arg(long, default_value = "", hide = true)]
    website: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let mut form = FeedbackForm::new(cli.endpoint);
    let fields = form.fields_mut();
    fields.name = cli.name;
    fields.contact = cli.contact;
    fields.message = cli.message;
    fields.website = cli.website;

    if !form.can_submit() {
        eprintln!("Error: form is not ready to send (message needs at least 8 characters)");
        std::process::exit(2);
    }

    println!("sending…");
    let status = form.submit().await;

    if let Some(line) = status.render() {
        println!("{}", line);
    }

    if matches!(status, Status::Error(_)) {
        std::process::exit(1);
    }

    Ok(())
}
