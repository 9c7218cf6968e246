use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use prompt_archive::archive::{
    filter_by_type, find_prompt, prompts_for_week, week_label, PromptType,
};
use prompt_archive::error::{ArchiveError, ErrorCategory};
use prompt_archive::scoring::{explain_author, PointSchedule};
use prompt_archive::source::ArchiveClient;
use prompt_archive::{browser, config, fetch, output};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TypeArg {
    Fanfic,
    FanArt,
}

impl From<TypeArg> for PromptType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Fanfic => PromptType::Fanfic,
            TypeArg::FanArt => PromptType::FanArt,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LeaderboardFormat {
    Table,
    Tsv,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ListFormat {
    Table,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the all-time leaderboard (default if no subcommand)
    Leaderboard {
        /// Only show the top N contributors
        #[arg(short, long)]
        limit: Option<usize>,

        #[arg(short, long, value_enum, default_value_t = LeaderboardFormat::Table)]
        format: LeaderboardFormat,
    },
    /// Show how a contributor's points add up, submission by submission
    Explain {
        /// Author username as it appears on the leaderboard
        username: String,
    },
    /// List all prompts grouped by year
    Prompts {
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<TypeArg>,

        #[arg(short, long, value_enum, default_value_t = ListFormat::Table)]
        format: ListFormat,
    },
    /// Show the prompts of one week with their submissions
    Week {
        /// ISO year
        year: i32,
        /// ISO week number (1-53)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=53))]
        week: u8,
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<TypeArg>,
    },
    /// Open a prompt's discussion thread in the browser
    Open {
        /// ISO year
        year: i32,
        /// ISO week number (1-53)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=53))]
        week: u8,
        #[arg(short = 't', long = "type", value_enum)]
        kind: Option<TypeArg>,
    },
    /// Print the scoring methodology
    Rules,
    /// Create a config file interactively
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "prompt-archive")]
#[command(about = "Weekly writing and art prompt archive with an all-time leaderboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/prompt-archive/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Data source URL (overrides ARCHIVE_DATA_URL and the config file)
    #[arg(long, global = true)]
    data_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_code_for(err: &ArchiveError) -> i32 {
    match err.category() {
        ErrorCategory::Configuration => EXIT_CONFIG,
        ErrorCategory::Transport => EXIT_NETWORK,
        ErrorCategory::MalformedRecord => EXIT_DATA,
    }
}

fn fail(err: &ArchiveError) -> i32 {
    tracing::debug!(error = ?err, "command failed");
    match err.category() {
        ErrorCategory::Configuration => eprintln!("Data source not connected: {}", err),
        _ => eprintln!("Error: {}", err),
    }
    exit_code_for(err)
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match output::format_json(value) {
        Ok(json) => {
            println!("{}", json);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            EXIT_FAILURE
        }
    }
}

/// Degraded-state text for a failed leaderboard load, and whether it goes
/// to stdout. Only the table is replaced by it; TSV and JSON get it on stderr.
fn unavailable_report(err: &ArchiveError, format: LeaderboardFormat) -> (bool, String) {
    let text = output::format_unavailable(err, &PointSchedule::STANDARD);
    (format == LeaderboardFormat::Table, text)
}

async fn run_leaderboard(
    client: &ArchiveClient,
    limit: Option<usize>,
    format: LeaderboardFormat,
    use_colors: bool,
) -> i32 {
    let mut entries = match fetch::fetch_leaderboard(client).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(error = ?e, "leaderboard unavailable");
            let (on_stdout, text) = unavailable_report(&e, format);
            if on_stdout {
                println!("{}", text);
            } else {
                eprintln!("{}", text);
            }
            return exit_code_for(&e);
        }
    };

    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    match format {
        LeaderboardFormat::Table => {
            println!("{}", output::format_leaderboard_table(&entries, use_colors));
            EXIT_SUCCESS
        }
        LeaderboardFormat::Tsv => {
            if !entries.is_empty() {
                println!("{}", output::format_leaderboard_tsv(&entries));
            }
            EXIT_SUCCESS
        }
        LeaderboardFormat::Json => print_json(&entries),
    }
}

async fn run_explain(client: &ArchiveClient, username: &str, use_colors: bool) -> i32 {
    let submissions = match fetch::fetch_submissions(client).await {
        Ok(s) => s,
        Err(e) => return fail(&e),
    };
    let scored = explain_author(&submissions, username, &PointSchedule::STANDARD);
    println!("{}", output::format_explain(username, &scored, use_colors));
    EXIT_SUCCESS
}

async fn run_prompts(
    client: &ArchiveClient,
    kind: Option<PromptType>,
    format: ListFormat,
    use_colors: bool,
) -> i32 {
    let mut prompts = match fetch::fetch_prompts(client).await {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };
    if let Some(kind) = kind {
        prompts = filter_by_type(&prompts, kind).into_iter().cloned().collect();
    }

    match format {
        ListFormat::Table => {
            println!("{}", output::format_prompt_archive(&prompts, use_colors));
            EXIT_SUCCESS
        }
        ListFormat::Json => print_json(&prompts),
    }
}

async fn run_week(
    client: &ArchiveClient,
    year: i32,
    week: u8,
    kind: Option<PromptType>,
    use_colors: bool,
) -> i32 {
    let archive = match fetch::fetch_archive(client).await {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };

    let matching: Vec<_> = prompts_for_week(&archive.prompts, year, week)
        .into_iter()
        .filter(|p| kind.map_or(true, |k| p.kind == k))
        .collect();
    if matching.is_empty() {
        eprintln!("No prompt found for {}.", week_label(week, year));
        return EXIT_FAILURE;
    }

    println!(
        "{}",
        output::format_week_detail(&matching, &archive.submissions, use_colors)
    );
    EXIT_SUCCESS
}

async fn run_open(client: &ArchiveClient, year: i32, week: u8, kind: Option<PromptType>) -> i32 {
    let prompts = match fetch::fetch_prompts(client).await {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let Some(prompt) = find_prompt(&prompts, year, week, kind) else {
        eprintln!("No prompt found for {}.", week_label(week, year));
        return EXIT_FAILURE;
    };

    if let Err(e) = browser::open_url(&prompt.thread_url) {
        eprintln!("Failed to open browser: {:#}", e);
        return EXIT_FAILURE;
    }

    println!(
        "Opening {} {} thread in browser: {}",
        week_label(prompt.week, prompt.iso_year),
        prompt.kind.display_name(),
        prompt.thread_url
    );
    EXIT_SUCCESS
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    prompt_archive::logging::init_logging(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Leaderboard {
        limit: None,
        format: LeaderboardFormat::Table,
    });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    // Commands that never touch the data source
    match command {
        Commands::Init => {
            if let Err(e) = config::init::run_init_wizard(config_path) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
            std::process::exit(EXIT_SUCCESS);
        }
        Commands::Rules => {
            println!("{}", output::format_rules(&PointSchedule::STANDARD));
            std::process::exit(EXIT_SUCCESS);
        }
        _ => {}
    }

    // Load config
    let config = match config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let env_url = config::data_url_from_env();
    let settings =
        match config::resolve_settings(&config, cli.data_url.as_deref(), env_url.as_deref()) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        };
    tracing::debug!(
        configured = settings.data_url.is_some(),
        timeout = ?settings.timeout,
        retries = settings.retries,
        "resolved data source settings"
    );

    let client = match ArchiveClient::new(settings) {
        Ok(c) => c,
        Err(e) => std::process::exit(fail(&e)),
    };

    let use_colors = output::should_use_colors();

    // Route based on subcommand
    let code = match command {
        Commands::Leaderboard { limit, format } => {
            run_leaderboard(&client, limit, format, use_colors).await
        }
        Commands::Explain { username } => run_explain(&client, &username, use_colors).await,
        Commands::Prompts { kind, format } => {
            run_prompts(&client, kind.map(Into::into), format, use_colors).await
        }
        Commands::Week { year, week, kind } => {
            run_week(&client, year, week, kind.map(Into::into), use_colors).await
        }
        Commands::Open { year, week, kind } => {
            run_open(&client, year, week, kind.map(Into::into)).await
        }
        Commands::Init | Commands::Rules => EXIT_SUCCESS,
    };

    tracing::debug!(elapsed = ?start_time.elapsed(), exit_code = code, "done");
    std::process::exit(code);
}
