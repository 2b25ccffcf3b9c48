use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use autoreserve_server::log_pipeline::Severity;
use autoreserve_server::poller::StatusPoller;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Base URL of the running server.
    #[clap(long, default_value = "http://127.0.0.1:3000")]
    pub server: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start a run and watch it until it settles.
    Start {
        #[clap(long)]
        user_id: String,

        #[clap(long)]
        password: String,

        /// Departure station name.
        #[clap(long)]
        from: String,

        /// Arrival station name.
        #[clap(long)]
        to: String,

        /// Departure date, YYYY-MM-DD.
        #[clap(long)]
        date: String,

        /// Departure time, HH:mm.
        #[clap(long)]
        time: String,

        /// How many result rows to scan per pass.
        #[clap(long, default_value_t = 3)]
        num_to_check: usize,

        /// Apply for the waitlist instead of reserving a seat.
        #[clap(long)]
        waitlist: bool,

        /// Run the browser headless.
        #[clap(long)]
        headless: bool,
    },

    /// Ask the server to stop the active run.
    Stop,

    /// Print the current status snapshot.
    Status,

    /// Watch the active run's log until it settles.
    Watch,
}

fn print_line(message: &str, severity: Severity) {
    let tag = match severity {
        Severity::Info => "INFO",
        Severity::Success => " OK ",
        Severity::Warn => "WARN",
        Severity::Error => "FAIL",
    };
    println!("[{}] {}", tag, message);
}

async fn post_control(client: &reqwest::Client, url: &str, body: Option<serde_json::Value>) -> Result<()> {
    let mut request = client.post(url);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.send().await?;
    let status = response.status();
    let payload: serde_json::Value = response.json().await?;
    let message = payload["message"].as_str().unwrap_or("").to_string();
    if !status.is_success() {
        bail!("{}", message);
    }
    print_line(&message, Severity::Info);
    Ok(())
}

async fn watch(base_url: &str) -> Result<()> {
    let poller = StatusPoller::new(base_url);
    let (message, severity) = poller.watch(print_line).await?;
    print_line(&message, severity);
    if severity == Severity::Error {
        std::process::exit(1);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();
    let base_url = cli_args.server.trim_end_matches('/').to_string();
    let client = reqwest::Client::new();

    match cli_args.command {
        Command::Start {
            user_id,
            password,
            from,
            to,
            date,
            time,
            num_to_check,
            waitlist,
            headless,
        } => {
            let body = json!({
                "userId": user_id,
                "password": password,
                "departureStation": from,
                "arrivalStation": to,
                "date": date,
                "time": time,
                "numToCheck": num_to_check,
                "mode": if waitlist { "waitlist" } else { "reserve" },
                "headless": headless,
            });
            post_control(&client, &format!("{}/start", base_url), Some(body)).await?;
            watch(&base_url).await
        }
        Command::Stop => post_control(&client, &format!("{}/stop", base_url), None).await,
        Command::Status => {
            let poller = StatusPoller::new(&base_url);
            let status = poller.fetch().await?;
            println!("running: {}", status.running);
            println!("state: {:?}", status.state);
            for line in &status.logs {
                let (message, severity) =
                    autoreserve_server::log_pipeline::humanize(
                        autoreserve_server::poller::raw_message(line),
                    );
                print_line(&message, severity);
            }
            Ok(())
        }
        Command::Watch => watch(&base_url).await,
    }
}
