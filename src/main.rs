use anyhow::Result;
use clap::Parser;
use mpvmenu::config::AppConfig;
use mpvmenu::dispatch::{ActionDispatcher, DispatchOutcome};
use mpvmenu::menu::MenuBuilder;
use std::io::Write;
use tracing_subscriber::EnvFilter;

/// mpvmenu - drive a running mpv from your launcher's command menu 🎵
#[derive(Parser, Debug)]
#[command(name = "mpvmenu", version, about)]
struct Args {
    /// Render the menu for a query string (one JSON entry per line)
    #[arg(long, short = 'q')]
    query: Option<String>,

    /// Dispatch a selected entry's action string
    #[arg(long, short = 's')]
    select: Option<String>,

    /// With --select: the chosen entry keeps the menu open
    #[arg(long)]
    keep_open: bool,

    /// With --select: the query that was active at selection time
    #[arg(long, default_value = "")]
    from_query: String,

    /// Generate default config.toml to stdout
    #[arg(long)]
    generate_config: bool,
}

/// Stdout belongs to the menu data, so logs go to a file.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let dir = dirs::state_dir()
        .or_else(dirs::cache_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join("mpvmenu");
    std::fs::create_dir_all(&dir).ok()?;
    let appender = tracing_appender::rolling::never(dir, "mpvmenu.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    if args.generate_config {
        print!("{}", toml::to_string_pretty(&AppConfig::default())?);
        return Ok(());
    }

    let _guard = init_logging();
    let config = AppConfig::load();
    let builder = MenuBuilder::new(config);
    let mut stdout = std::io::stdout().lock();

    if let Some(query) = args.query {
        for entry in builder.render(&query).await {
            writeln!(stdout, "{}", serde_json::to_string(&entry)?)?;
        }
        return Ok(());
    }

    if let Some(action) = args.select {
        let mut dispatcher = ActionDispatcher::new(builder);
        match dispatcher
            .dispatch(&action, args.keep_open, &args.from_query)
            .await
        {
            DispatchOutcome::Closed => {}
            DispatchOutcome::Refresh { query, entries } => {
                writeln!(stdout, "{}", serde_json::to_string(&serde_json::json!({ "query": query }))?)?;
                for entry in entries {
                    writeln!(stdout, "{}", serde_json::to_string(&entry)?)?;
                }
            }
        }
        return Ok(());
    }

    eprintln!("nothing to do: pass --query, --select or --generate-config (see --help)");
    Ok(())
}
