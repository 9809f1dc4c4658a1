//! namegen — 名称生成命令行工具
//!
//! Usage:
//!   namegen generate [OPTIONS] <description...>   Generate names
//!   namegen favorites [list|toggle <name>|clear]  Manage favorites
//!   namegen history [list|clear]                  Show or clear history
//!   namegen settings [show|set <key> <value>]     Show or change saved settings
//!   namegen export [--format text|json] [--out <path>]
//!   namegen stats                                 Show usage counters

use anyhow::{anyhow, bail, Context};
use namegen::export::DEFAULT_EXPORT_FILE;
use namegen::{AppConfig, ExportFormat, NameCategory, NamePager, NameStudio, Settings, Theme};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("namegen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        command => run(command, &args[2..]).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(command: &str, args: &[String]) -> anyhow::Result<()> {
    let known = [
        "generate",
        "favorites",
        "history",
        "settings",
        "export",
        "stats",
    ];
    if !known.contains(&command) {
        eprintln!("Unknown command: {command}");
        eprintln!();
        print_usage();
        std::process::exit(1);
    }

    let studio = open_studio(args)?;
    match command {
        "generate" => cmd_generate(&studio, args).await,
        "favorites" => cmd_favorites(&studio, args),
        "history" => cmd_history(&studio, args),
        "settings" => cmd_settings(&studio, args),
        "export" => cmd_export(&studio, args),
        _ => cmd_stats(&studio),
    }
}

fn print_usage() {
    println!(
        r#"namegen — 名称生成命令行工具

USAGE:
    namegen <COMMAND> [OPTIONS]

COMMANDS:
    generate [OPTIONS] <description...>     Generate names
        --category <c>                      character | business | place | item | custom
        --count <n>                         Number of names (1-30)
        --per-page <n>                      Names shown per page
        --temperature <t>                   Sampling temperature (0-2)
    favorites [list|toggle <name>|clear]    Manage favorite names
    history [list|clear]                    Show or clear generation history
    settings [show|set <key> <value>]       Show or change saved settings
                                            (set apiKey <key> stores the key in the OS keyring)
    export [--format text|json] [--out <path>]
                                            Export the most recent generation
    stats                                   Show usage counters
    version                                 Show version information
    help                                    Show this help message

GLOBAL OPTIONS:
    --config <path>                         YAML configuration file

ENVIRONMENT:
    OPENROUTER_API_KEY                      API key (after the OS keyring)
    NAMEGEN_CONFIG                          YAML configuration file
    NAMEGEN_DATA_DIR                        Directory for saved data
    RUST_LOG                                Log filter (default namegen=info)"#
    );
}

fn cmd_version() {
    println!("namegen {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn load_config(args: &[String]) -> anyhow::Result<AppConfig> {
    let path = flag_value(args, "--config")
        .map(PathBuf::from)
        .or_else(|| std::env::var("NAMEGEN_CONFIG").ok().map(PathBuf::from));
    let config = match path {
        Some(path) => AppConfig::from_yaml_file(&path)
            .with_context(|| format!("loading {}", path.display()))?
            .with_env_overrides(),
        None => AppConfig::from_env(),
    };
    Ok(config)
}

fn open_studio(args: &[String]) -> anyhow::Result<NameStudio> {
    let config = load_config(args)?;
    NameStudio::open(&config).context("opening local data")
}

/// Positional arguments with `--flag value` pairs removed.
fn positionals(args: &[String], flags: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if flags.contains(&arg.as_str()) || arg == "--config" {
            iter.next();
        } else {
            out.push(arg.clone());
        }
    }
    out
}

fn parse_number<T: std::str::FromStr>(value: &str, what: &str) -> anyhow::Result<T> {
    value
        .parse()
        .map_err(|_| anyhow!("invalid {what}: {value}"))
}

async fn cmd_generate(studio: &NameStudio, args: &[String]) -> anyhow::Result<()> {
    let mut settings = studio.settings()?;
    if let Some(c) = flag_value(args, "--category") {
        settings = settings.with_category(c.parse::<NameCategory>()?);
    }
    if let Some(n) = flag_value(args, "--count") {
        settings = settings.with_num_names(parse_number(n, "count")?);
    }
    if let Some(n) = flag_value(args, "--per-page") {
        settings = settings.with_names_per_page(parse_number(n, "page size")?);
    }
    if let Some(t) = flag_value(args, "--temperature") {
        settings = settings.with_temperature(parse_number(t, "temperature")?);
    }
    let description = positionals(args, &["--category", "--count", "--per-page", "--temperature"])
        .join(" ");
    settings = settings.with_custom_prompt(description);

    let set = studio.generate(&settings).await?;
    if set.is_short_of(settings.num_names) {
        println!("Only {} names were generated", set.len());
    }

    let favorites = studio.favorites()?;
    let mut pager = NamePager::new(set, settings.names_per_page);
    let mut shown = 0;
    loop {
        println!("--- page {}/{} ---", pager.page(), pager.total_pages());
        for name in &pager.visible()[shown..] {
            let mark = if favorites.contains(name) { "*" } else { " " };
            println!("{mark} {name}");
        }
        shown = pager.visible().len();
        if !pager.load_more() {
            break;
        }
    }
    Ok(())
}

fn cmd_favorites(studio: &NameStudio, args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str).unwrap_or("list") {
        "list" => {
            let favorites = studio.favorites()?;
            if favorites.is_empty() {
                println!("No favorites yet.");
            }
            for name in favorites {
                println!("{name}");
            }
        }
        "toggle" => {
            let name = args
                .get(1..)
                .map(|rest| rest.join(" "))
                .filter(|n| !n.trim().is_empty())
                .ok_or_else(|| anyhow!("usage: namegen favorites toggle <name>"))?;
            if studio.toggle_favorite(name.trim())? {
                println!("Added to favorites: {}", name.trim());
            } else {
                println!("Removed from favorites: {}", name.trim());
            }
        }
        "clear" => {
            studio.clear_favorites()?;
            println!("Favorites cleared.");
        }
        other => bail!("unknown favorites action: {other}"),
    }
    Ok(())
}

fn cmd_history(studio: &NameStudio, args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str).unwrap_or("list") {
        "list" => {
            let history = studio.history()?;
            if history.is_empty() {
                println!("No history yet.");
            }
            for item in history {
                println!("[{}] {} ({})", item.timestamp, item.prompt, item.category);
                println!("    {}", item.names.join(", "));
            }
        }
        "clear" => {
            studio.clear_history()?;
            println!("History cleared.");
        }
        other => bail!("unknown history action: {other}"),
    }
    Ok(())
}

fn cmd_settings(studio: &NameStudio, args: &[String]) -> anyhow::Result<()> {
    match args.first().map(String::as_str).unwrap_or("show") {
        "show" => {
            let settings = studio.settings()?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        "set" => {
            let (key, value) = match (args.get(1), args.get(2)) {
                (Some(k), Some(v)) => (k.as_str(), v.as_str()),
                _ => bail!("usage: namegen settings set <key> <value>"),
            };
            if key == "apiKey" {
                namegen::credentials::store_api_key(value)?;
                println!("API key saved to the system keyring.");
                return Ok(());
            }
            let settings = apply_setting(studio.settings()?, key, value)?;
            studio.save_settings(&settings)?;
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        other => bail!("unknown settings action: {other}"),
    }
    Ok(())
}

fn apply_setting(settings: Settings, key: &str, value: &str) -> anyhow::Result<Settings> {
    let updated = match key {
        "theme" => settings.with_theme(value.parse::<Theme>()?),
        "category" => settings.with_category(value.parse::<NameCategory>()?),
        "customPrompt" | "prompt" => settings.with_custom_prompt(value),
        "numNames" | "count" => settings.with_num_names(parse_number(value, key)?),
        "namesPerPage" | "per-page" => settings.with_names_per_page(parse_number(value, key)?),
        "temperature" => settings.with_temperature(parse_number(value, key)?),
        "maxLength" => settings.with_max_length(parse_number(value, key)?),
        other => bail!("unknown setting: {other}"),
    };
    Ok(updated)
}

fn cmd_export(studio: &NameStudio, args: &[String]) -> anyhow::Result<()> {
    let format = match flag_value(args, "--format") {
        Some(f) => f.parse::<ExportFormat>()?,
        None => ExportFormat::Text,
    };
    let out = flag_value(args, "--out").map(PathBuf::from).unwrap_or_else(|| {
        PathBuf::from(DEFAULT_EXPORT_FILE).with_extension(format.extension())
    });

    let history = studio.history()?;
    let latest = history
        .first()
        .ok_or_else(|| anyhow!("nothing to export: generate some names first"))?;
    studio
        .export_to_file(&latest.names, format, &out)
        .with_context(|| format!("writing {}", out.display()))?;
    println!("Exported {} names to {}", latest.names.len(), out.display());
    Ok(())
}

fn cmd_stats(studio: &NameStudio) -> anyhow::Result<()> {
    let a = studio.analytics()?;
    println!("API calls:        {}", a.api_calls);
    println!("Last API call:    {}", a.last_api_call);
    println!("Names generated:  {}", a.generated_names);
    println!("Favorites:        {}", a.favorites);
    println!("Exports:          {}", a.exports);
    Ok(())
}
