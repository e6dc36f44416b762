mod ai;
mod app;
mod cli;
mod composer;
mod config;
mod constants;
mod credentials;
mod input;
mod ui;

use anyhow::{Context, Result};
use std::env;
use std::io::{self, IsTerminal, Read};
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::ai::{FlowClient, OpenRouterClient};
use crate::app::App;
use crate::composer::Composer;
use crate::config::Config;
use crate::credentials::ApiKeyStore;

type LiveAi = FlowClient<OpenRouterClient>;

fn setup_logging(to_file: bool) {
    use std::fs::OpenOptions;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hookline=debug"));

    // The TUI owns the terminal, so its logs go to a file in the config directory
    let log_file = to_file
        .then(|| Config::log_path().ok())
        .flatten()
        .and_then(|path| {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir).ok()?;
            }
            OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .ok()
        });

    if let Some(file) = log_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false),
            )
            .init();
    } else if to_file {
        // Writing to stderr would corrupt the TUI; stay silent instead
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::sink))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
}

fn print_usage() {
    eprintln!(
        r#"hookline - Personalized cold emails from your terminal

Usage: hookline [command]

Commands:
    (none)      Start the composer
    generate    Read prospect details from stdin and write an email
                  --name N  --company C  --title T  --demo
    analyze     Read an email from stdin (optional "Subject:" first line) and rate it
                  --audience A  --goal G
    setup       Configure the OpenRouter API key and model
    help        Show this help message

Environment:
    HOOKLINE_API_KEY    OpenRouter API key (overrides config and keyring)
    RUST_LOG            Log filter (default: info,hookline=debug)

Configuration file: ~/.config/hookline/config.toml
"#
    );
}

/// Build the live model client from config and the resolved API key
fn live_ai(config: &Config) -> Result<Arc<LiveAi>> {
    let (api_key, source) = ApiKeyStore::new().resolve(config.ai.api_key.as_deref())?;
    tracing::debug!("Using API key from {}", source);

    let client = OpenRouterClient::new(
        api_key,
        config.ai.model.clone(),
        config.ai.base_url.clone(),
        config.ai.timeout(),
    )?;
    Ok(Arc::new(FlowClient::new(client, config.ai.limits())))
}

fn read_stdin() -> Result<String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read from stdin")?;
    Ok(input)
}

async fn run_generate(args: &[String]) -> Result<()> {
    let args = cli::GenerateArgs::parse(args)?;
    let config = Config::load()?;
    let ai = live_ai(&config)?;

    let details = if args.demo {
        String::new()
    } else {
        if io::stdin().is_terminal() {
            eprintln!("Paste the prospect details, then press Ctrl+D:");
        }
        read_stdin()?
    };

    let mut composer = Composer::new(ai, config.composer.goal.clone());
    if let Err(message) = cli::generate(&mut composer, &args, &details).await {
        eprintln!("{}", message);
        std::process::exit(1);
    }

    print!("{}", cli::format_draft(composer.state()));
    Ok(())
}

async fn run_analyze(args: &[String]) -> Result<()> {
    let args = cli::AnalyzeArgs::parse(args)?;
    let config = Config::load()?;
    let ai = live_ai(&config)?;

    if io::stdin().is_terminal() {
        eprintln!("Paste the email, then press Ctrl+D:");
    }
    let email = read_stdin()?;

    let mut composer = Composer::new(ai, config.composer.goal.clone());
    match cli::analyze(&mut composer, &args, &email).await {
        Ok(result) => {
            print!("{}", cli::format_analysis(&result));
            Ok(())
        }
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
    }
}

fn run_setup() -> Result<()> {
    use std::io::Write;

    println!("Hookline Setup");
    println!("==============\n");

    let mut config = Config::load()?;

    let api_key = loop {
        print!("OpenRouter API key: ");
        io::stdout().flush()?;
        let key = read_secret()?;
        println!();

        if !key.is_empty() {
            break key;
        }
        println!("The API key cannot be empty.");
    };

    print!("Model [{}]: ", config.ai.model);
    io::stdout().flush()?;
    let mut model = String::new();
    io::stdin().read_line(&mut model)?;
    let model = model.trim();
    if !model.is_empty() {
        config.ai.model = model.to_string();
    }

    // The key lives in the keyring or key file, never in the config
    config.ai.api_key = None;
    config.save()?;
    println!("Configuration saved to {}", Config::config_path()?.display());

    let source = ApiKeyStore::new().store(&api_key)?;
    println!("API key stored in {}.", source);

    println!("\nSetup complete! Run 'hookline' to start.");
    Ok(())
}

fn read_secret() -> Result<String> {
    let _guard = DisableEcho::new()?;

    let mut secret = String::new();
    io::stdin().read_line(&mut secret)?;
    Ok(secret.trim().to_string())
}

struct DisableEcho {
    #[cfg(unix)]
    original: libc::termios,
}

impl DisableEcho {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use std::mem::MaybeUninit;
        use std::os::unix::io::AsRawFd;

        let fd = io::stdin().as_raw_fd();
        let mut termios = MaybeUninit::<libc::termios>::uninit();

        unsafe {
            if libc::tcgetattr(fd, termios.as_mut_ptr()) != 0 {
                anyhow::bail!("Failed to get terminal attributes");
            }
            let original = termios.assume_init();
            let mut new = original;
            new.c_lflag &= !libc::ECHO;
            if libc::tcsetattr(fd, libc::TCSANOW, &new) != 0 {
                anyhow::bail!("Failed to set terminal attributes");
            }
            Ok(Self { original })
        }
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }
}

#[cfg(unix)]
impl Drop for DisableEcho {
    fn drop(&mut self) {
        use std::os::unix::io::AsRawFd;
        let fd = io::stdin().as_raw_fd();
        unsafe {
            libc::tcsetattr(fd, libc::TCSANOW, &self.original);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let rest = args.get(2..).unwrap_or_default();

    match args.get(1).map(|s| s.as_str()) {
        Some("help") | Some("--help") | Some("-h") => {
            print_usage();
            Ok(())
        }
        Some("setup") => run_setup(),
        Some("generate") => {
            setup_logging(false);
            run_generate(rest).await
        }
        Some("analyze") => {
            setup_logging(false);
            run_analyze(rest).await
        }
        Some(cmd) => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            std::process::exit(1);
        }
        None => {
            setup_logging(true);

            let config = Config::load()?;
            crate::ui::theme::init_theme(config.ui.theme);

            let ai = match live_ai(&config) {
                Ok(ai) => ai,
                Err(e) => {
                    eprintln!("{:#}", e);
                    eprintln!("\nRun 'hookline setup' to store an OpenRouter API key.");
                    std::process::exit(1);
                }
            };

            let mut app = App::new(&config, ai)?;
            app.run().await
        }
    }
}
