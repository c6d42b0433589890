//! catfacts-cli — skill simulator for a running catfacts-server
//!
//! Builds request envelopes the way the voice platform would, posts them to the
//! skill endpoint, and prints the speech that comes back.
//!
//! # Subcommands
//! - `launch`                 — open the skill without an intent
//! - `intent <NAME>`          — send an intent, e.g. `GetFact` or `AMAZON.StopIntent`
//! - `end [--reason <R>]`     — notify the skill that the session ended
//! - `status`                 — show server health
//! - `render <FILE|->`        — render a JSON array of segments offline

use std::io::Read;

use catfacts_core::skill::{SkillRequest, SkillResponse};
use catfacts_core::speech;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_SERVER: &str = "http://127.0.0.1:8767";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(name = "catfacts-cli", version, about = "Cat Facts skill simulator")]
struct Cli {
    /// Skill server URL (overrides CATFACTS_HTTP_URL env var)
    #[arg(long, env = "CATFACTS_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    /// Session id to attach to requests
    #[arg(long, default_value = "catfacts-cli.session")]
    session: String,

    /// Print the raw response envelope as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open the skill without an intent
    Launch,

    /// Send an intent request
    Intent {
        /// Intent name, e.g. GetFact, AMAZON.HelpIntent, AMAZON.StopIntent
        name: String,
    },

    /// Notify the skill that the session ended
    End {
        #[arg(long, default_value = "USER_INITIATED")]
        reason: String,
    },

    /// Show skill server status
    Status,

    /// Render a JSON array of response segments to SSML without a server
    Render {
        /// Path to a JSON file, or `-` for stdin
        file: String,
    },
}

// ============================================================================
// Output
// ============================================================================

/// Human-readable summary of a response envelope.
pub fn describe_response(resp: &SkillResponse) -> String {
    if resp.is_empty() {
        return "(no speech)\nSession: closed".to_string();
    }

    let mut out = String::new();
    if let Some(speech) = resp.speech() {
        out.push_str(&format!("Speech:   {}\n", speech));
    }
    if let Some(reprompt) = resp.reprompt_speech() {
        out.push_str(&format!("Reprompt: {}\n", reprompt));
    }
    let session = if resp.response.should_end_session {
        "closed"
    } else {
        "open"
    };
    out.push_str(&format!("Session:  {}", session));
    out
}

/// Render a JSON array of segments. Bad entries become the apology paragraph.
pub fn render_document(json: &str) -> anyhow::Result<String> {
    let values: Vec<serde_json::Value> = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("expected a JSON array of segments: {}", e))?;
    Ok(speech::render_values(&values))
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn send(server: &str, request: &SkillRequest, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/", server);
    let resp = match client.post(&url).json(request).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("catfacts-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("catfacts-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    let skill_resp: SkillResponse = resp
        .json()
        .map_err(|e| anyhow::anyhow!("failed to parse response envelope: {}", e))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&skill_resp)?);
    } else {
        println!("{}", describe_response(&skill_resp));
    }
    Ok(())
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/health", server);
    match client.get(&url).send() {
        Ok(r) if r.status().is_success() => {
            let body: serde_json::Value = r.json().unwrap_or_default();
            println!("Cat Facts server: {}", body["status"].as_str().unwrap_or("unknown"));
            println!("Version:          {}", body["version"].as_str().unwrap_or("?"));
            println!("PostgreSQL:       {}", body["postgresql"].as_str().unwrap_or("?"));
            println!("Facts:            {}", body["fact_count"]);
        }
        Ok(r) => {
            eprintln!("catfacts-cli: server unhealthy (HTTP {})", r.status());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("catfacts-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    }
    Ok(())
}

fn do_render(file: &str) -> anyhow::Result<()> {
    let mut json = String::new();
    if file == "-" {
        std::io::stdin().read_to_string(&mut json)?;
    } else {
        json = std::fs::read_to_string(file)?;
    }
    println!("{}", render_document(&json)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    // Renderer diagnostics go to stderr so stdout stays pipeable
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Launch => send(&server, &SkillRequest::launch().with_session(&cli.session, true), cli.json),
        Commands::Intent { name } => send(
            &server,
            &SkillRequest::intent(name).with_session(&cli.session, false),
            cli.json,
        ),
        Commands::End { reason } => send(
            &server,
            &SkillRequest::session_ended(reason).with_session(&cli.session, false),
            cli.json,
        ),
        Commands::Status => do_status(&server),
        Commands::Render { file } => do_render(&file),
    };

    if let Err(e) = result {
        eprintln!("catfacts-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================
