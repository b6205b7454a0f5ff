use anyhow::{Context, Result};
use catalog::{Catalog, DemoTable, SignRecord, TasteInput, demo_key};
use clap::{Parser, Subcommand};
use colored::Colorize;
use server::{ResolutionPath, Settings, ZodiacOrchestrator};
use std::path::PathBuf;
use std::time::Instant;

/// Cultural Zodiac - taste-driven sign oracle
#[derive(Parser)]
#[command(name = "zodiac")]
#[command(about = "Assign a Cultural Zodiac sign from a list of tastes", long_about = None)]
struct Cli {
    /// Sign catalog to use instead of the embedded one
    #[arg(short, long, env = "ZODIAC_CATALOG_PATH", global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every sign, grouped by constellation
    Signs,

    /// Show the demo key for a set of tastes and whether it is pre-baked
    DemoKey {
        /// Taste name (repeat for several)
        #[arg(long = "name", required = true)]
        names: Vec<String>,
    },

    /// Resolve one reading against the configured services
    Read {
        /// Taste name (repeat for several)
        #[arg(long = "name", required = true)]
        names: Vec<String>,

        /// Category attached to every taste
        #[arg(long = "type", default_value = "movie")]
        kind: String,

        /// Print the full response envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the HTTP server
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if matches!(cli.command, Commands::Serve) {
        server::init_tracing();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Signs => handle_signs(&load_catalog(cli.catalog.as_ref())?),
        Commands::DemoKey { names } => handle_demo_key(&load_catalog(cli.catalog.as_ref())?, &names)?,
        Commands::Read { names, kind, json } => {
            handle_read(cli.catalog, &names, &kind, json).await?
        }
        Commands::Serve => handle_serve(cli.catalog).await?,
    }

    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load_from_file(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display())),
        None => Catalog::embedded().context("Failed to load embedded catalog"),
    }
}

/// Handle the 'signs' command
fn handle_signs(catalog: &Catalog) {
    println!(
        "{}",
        format!(
            "{} signs in {} constellations",
            catalog.len(),
            catalog.constellation_count()
        )
        .bold()
        .blue()
    );

    for (constellation, signs) in catalog.constellations() {
        println!("\n{}", constellation.bold());
        for sign in signs {
            print_sign_line(sign);
        }
    }

    let dangling = catalog.dangling_compatibility();
    if !dangling.is_empty() {
        println!(
            "\n{} {} signs name no catalog partner",
            "!".yellow(),
            dangling.len()
        );
    }
}

fn print_sign_line(sign: &SignRecord) {
    let rare = if sign.rare { " rare".magenta().to_string() } else { String::new() };
    println!(
        "  {} {} [{} / {}] absurdity {}{}",
        sign.emoji,
        sign.name.green(),
        sign.mood,
        sign.era,
        sign.absurdity,
        rare
    );
}

/// Handle the 'demo-key' command
fn handle_demo_key(catalog: &Catalog, names: &[String]) -> Result<()> {
    let demos = DemoTable::embedded(catalog).context("Failed to load demo table")?;
    let key = demo_key(names);

    println!("{} {}", "Demo key:".bold(), key);
    match demos.get(&key) {
        Some(result) => println!("{} pre-baked reading: {}", "✓".green(), result.name()),
        None => {
            println!("{} no pre-baked reading", "✗".red());
            println!("Known demo keys:");
            for known in demos.keys() {
                println!("  - {}", known);
            }
        }
    }
    Ok(())
}

/// Handle the 'read' command
async fn handle_read(
    catalog: Option<PathBuf>,
    names: &[String],
    kind: &str,
    json: bool,
) -> Result<()> {
    let settings = load_settings(catalog)?;
    let orchestrator =
        ZodiacOrchestrator::from_settings(&settings).context("Failed to build orchestrator")?;

    let inputs: Vec<TasteInput> = names
        .iter()
        .map(|name| TasteInput::new(name.as_str(), kind))
        .collect();

    let start = Instant::now();
    let reading = orchestrator.resolve(&inputs).await;
    let elapsed = start.elapsed();

    if json {
        let envelope = orchestrator.assemble(reading.result);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let result = &reading.result;
    println!(
        "{} {} {}",
        result.sign.emoji,
        result.name().bold().green(),
        format!("({})", path_label(reading.path)).dimmed()
    );
    println!("{}Constellation: {}", "• ".cyan(), result.sign.constellation);
    println!("{}Prophecy: {}", "• ".cyan(), result.prophecy);
    println!("{}Symbolism: {}", "• ".cyan(), result.symbolism);
    println!("{}Tags: {}", "• ".cyan(), result.taste_tags.join(", "));
    println!(
        "{}Taste twin: {} {} - {}",
        "• ".cyan(),
        result.taste_twin.emoji,
        result.taste_twin.name,
        result.taste_twin.bio
    );
    println!("Resolved in {:?}", elapsed);
    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(catalog: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(catalog)?;
    server::serve(settings).await.context("Server stopped with an error")
}

fn load_settings(catalog: Option<PathBuf>) -> Result<Settings> {
    let mut settings = Settings::from_env().context("Failed to load settings")?;
    if catalog.is_some() {
        settings.catalog_path = catalog;
    }
    Ok(settings)
}

fn path_label(path: ResolutionPath) -> &'static str {
    match path {
        ResolutionPath::Demo => "demo",
        ResolutionPath::Oracle => "oracle",
        ResolutionPath::OracleChoice => "oracle's choice",
        ResolutionPath::Fallback => "fated fallback",
    }
}
