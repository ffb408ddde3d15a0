//! Finance Coach - personal ledger dashboard with an AI finance coach
//!
//! A CLI tool that reads a transactions CSV, reports headline metrics,
//! spending views, rule-based alerts and a what-if projection, and answers
//! questions through a hosted generative-language API.
//!
//! Exit codes:
//!   0 - Success (no alerts, or no --fail-on-alerts set)
//!   1 - Runtime error (unreadable CSV, bad config, write failure, etc.)
//!   2 - Alerts raised and --fail-on-alerts set

mod analysis;
mod cli;
mod coach;
mod config;
mod error;
mod ledger;
mod models;
mod report;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use coach::{AdviceBackend, ChatCommand, ChatSession, GeminiClient};
use config::{Config, CONFIG_FILE_NAME};
use indicatif::{ProgressBar, ProgressStyle};
use models::{Dashboard, Role};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args)?;

    info!("Finance Coach v{}", env!("CARGO_PKG_VERSION"));
    debug!(
        "Input: {:?}, format: {:?}, questions: {}, chat: {}",
        args.input,
        args.format,
        args.ask.len(),
        args.chat
    );

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .finance-coach.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to customize currency, thresholds, fee keywords and the coach model.");
    Ok(())
}

/// Initialize logging on stderr. `RUST_LOG` overrides the flag-derived level.
fn init_logging(args: &Args) -> Result<()> {
    let level = args.log_level().to_string().to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")
}

/// Run one dashboard pass plus any requested coach turns. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("An input CSV is required (--input FILE)")?;

    let ledger = ledger::load_ledger(&input)
        .with_context(|| format!("Failed to load ledger from {}", input.display()))?;

    let mut dashboard =
        analysis::build_dashboard(&ledger, &input.display().to_string(), &config);

    let mut session = if args.wants_coach() {
        start_session(&args, &config, &dashboard)
    } else {
        None
    };

    if let Some(ref mut session) = session {
        for question in &args.ask {
            if let Some(answer) = ask_with_spinner(session, question, args.quiet).await {
                debug!("Coach answered with {} chars", answer.len());
            }
        }
        if session.turns() > 0 {
            dashboard.transcript = session.transcript().to_vec();
        }
    }

    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
        OutputFormat::Text => report::generate_text_report(&dashboard),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !args.quiet {
                println!("✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    if args.chat {
        if let Some(ref mut session) = session {
            run_chat_loop(session, args.quiet).await?;
        }
    }

    if args.fail_on_alerts && !dashboard.alerts.is_empty() {
        eprintln!(
            "\n⛔ {} alert(s) raised. Failing (exit code 2).",
            dashboard.alerts.len()
        );
        return Ok(2);
    }

    Ok(0)
}

/// Create the chat session, or explain why the coach is unavailable.
fn start_session(
    args: &Args,
    config: &Config,
    dashboard: &Dashboard,
) -> Option<ChatSession<GeminiClient>> {
    match GeminiClient::new(args.api_key.clone(), &config.coach) {
        Ok(client) => {
            let context = coach::build_context(dashboard, config.analysis.top_categories);
            Some(ChatSession::new(client, context))
        }
        Err(e) => {
            warn!("Chat coach disabled: {}", e);
            eprintln!(
                "⚠️  Please provide a Gemini API key (--api-key or GEMINI_API_KEY) to use the Chat Coach."
            );
            None
        }
    }
}

/// Show a spinner while the coach is thinking.
fn thinking_spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Thinking...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Ask one question. Failures are reported and leave the transcript untouched.
async fn ask_with_spinner<B: AdviceBackend>(
    session: &mut ChatSession<B>,
    question: &str,
    quiet: bool,
) -> Option<String> {
    let spinner = thinking_spinner(quiet);
    let result = session.ask(question).await.map(|turn| turn.content.clone());
    spinner.finish_and_clear();

    match result {
        Ok(answer) => Some(answer),
        Err(e) => {
            eprintln!("❌ AI Error: {}", e);
            None
        }
    }
}

/// Interactive chat on stdin until /quit or EOF.
async fn run_chat_loop<B: AdviceBackend>(session: &mut ChatSession<B>, quiet: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("\n🤖 Chat with Your AI Finance Coach  (/history, /reset, /quit)");
    if let Some(last) = session.transcript().last() {
        println!("🤖 Coach: {}", last.content);
    }

    loop {
        print!("🧑 You: ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            println!();
            break;
        };

        match ChatCommand::parse(&line) {
            ChatCommand::Empty => continue,
            ChatCommand::Quit => break,
            ChatCommand::Reset => {
                session.reset();
                println!("🤖 Coach: {}", coach::GREETING);
            }
            ChatCommand::History => {
                for turn in session.transcript() {
                    let speaker = match turn.role {
                        Role::Assistant => "🤖 Coach",
                        Role::User => "🧑 You",
                    };
                    println!("{}: {}", speaker, turn.content);
                }
            }
            ChatCommand::Ask(question) => {
                if let Some(answer) = ask_with_spinner(session, question, quiet).await {
                    println!("🤖 Coach: {}", answer);
                }
            }
        }
    }

    info!("Chat ended after {} turns", session.turns());
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
