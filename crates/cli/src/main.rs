use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use deckhand_core::{Card, DeckBuilder, DeckRegistry, DeckRules, DeckState, RngState};
use deckhand_data::{
    companion_file_name, export_companion, export_full, load_config, load_deck_file,
    load_registry_decks, load_rules, save_deck_file, table_link, AppConfig, ImportedDeck,
    FULL_EXPORT_FILE_NAME,
};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Inspect, sort and convert trading card deck files")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON config with `rules`, `table` and `catalog` sections
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// JSON deck rules; overrides the config's `rules` section
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Totals, per-category counts, price and playability
    Stats { deck: PathBuf },
    /// Grouped view with copy counts
    List { deck: PathBuf },
    /// Canonical sort, written in the full layout
    Sort {
        deck: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rewrite a deck file in another layout
    Convert {
        deck: PathBuf,
        #[arg(long, value_enum)]
        to: Layout,
        /// Deck name for the companion layout
        #[arg(long)]
        name: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the virtual tabletop URL
    TableLink { deck: PathBuf },
    /// Shuffle and deal an opening hand plus prize cards
    Deal {
        deck: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load several decks side by side
    Registry {
        #[arg(required = true)]
        decks: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Layout {
    Full,
    Companion,
}

fn main() {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };
    if let Some(path) = &args.rules {
        config.rules = load_rules(path)?;
    }
    debug!(rules = ?config.rules, "configuration loaded");

    match args.command {
        Command::Stats { deck } => stats(&deck, &config.rules),
        Command::List { deck } => list(&deck, &config.rules),
        Command::Sort { deck, output } => sort(&deck, output.as_deref(), &config.rules),
        Command::Convert {
            deck,
            to,
            name,
            output,
        } => convert(&deck, to, name, output.as_deref()),
        Command::TableLink { deck } => table(&deck, &config),
        Command::Deal { deck, seed } => deal(&deck, seed, config.rules),
        Command::Registry { decks } => registry(&decks, &config.rules),
    }
}

fn open_deck(path: &Path, rules: &DeckRules) -> anyhow::Result<(ImportedDeck, DeckState)> {
    let imported = load_deck_file(path)?;
    let mut deck = DeckState::with_rules(rules);
    deck.replace_all(imported.cards.clone());
    Ok((imported, deck))
}

fn format_price(amount: f64) -> String {
    format!("${amount:.2}")
}

fn card_line(card: &Card) -> String {
    let mut line = card.name.clone();
    if let (Some(set), Some(number)) = (card.set_id(), card.number.as_deref()) {
        line.push_str(&format!(" ({set} {number})"));
    }
    if let Some(quote) = card.price() {
        line.push_str(&format!(" {}", format_price(quote.amount)));
    }
    line
}

fn stats(path: &Path, rules: &DeckRules) -> anyhow::Result<()> {
    let (imported, deck) = open_deck(path, rules)?;
    let stats = deck.stats();
    println!("deck: {}", imported.name);
    println!("cards: {}", stats.total);
    println!("pokémon: {}", stats.creatures);
    println!("trainer: {}", stats.modifiers);
    println!("energy: {}", stats.resources);
    if stats.uncategorized > 0 {
        println!("other: {}", stats.uncategorized);
    }
    println!("price: {}", format_price(stats.price));
    let playable = if deck.is_playable() {
        "yes".to_string()
    } else {
        format!("no (needs {})", deck.playable_minimum())
    };
    println!("playable: {playable}");
    Ok(())
}

fn list(path: &Path, rules: &DeckRules) -> anyhow::Result<()> {
    let (_, deck) = open_deck(path, rules)?;
    for group in deck.groups() {
        println!("{}x {}", group.count, card_line(group.card));
    }
    Ok(())
}

fn write_or_print(output: Option<&Path>, body: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            save_deck_file(path, body)?;
            println!("wrote {}", path.display());
        }
        None => println!("{body}"),
    }
    Ok(())
}

fn sort(path: &Path, output: Option<&Path>, rules: &DeckRules) -> anyhow::Result<()> {
    let (_, mut deck) = open_deck(path, rules)?;
    deck.sort();
    let body = export_full(deck.cards())?;
    write_or_print(output, &body)
}

fn millis_since_epoch() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

fn convert(
    path: &Path,
    layout: Layout,
    name: Option<String>,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let imported = load_deck_file(path)?;
    match layout {
        Layout::Full => {
            let body = export_full(&imported.cards)?;
            let output = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| FULL_EXPORT_FILE_NAME.into());
            write_or_print(Some(&output), &body)
        }
        Layout::Companion => {
            let name = name.unwrap_or(imported.name);
            let mut rng = RngState::from_entropy();
            let body = export_companion(&name, &imported.cards, millis_since_epoch(), &mut rng)?;
            let output = output
                .map(Path::to_path_buf)
                .unwrap_or_else(|| companion_file_name(&name).into());
            write_or_print(Some(&output), &body)
        }
    }
}

fn table(path: &Path, config: &AppConfig) -> anyhow::Result<()> {
    let imported = load_deck_file(path)?;
    let link = table_link(&imported.cards, &config.table)?;
    if link.skipped > 0 {
        eprintln!("{} cards without images were left out", link.skipped);
    }
    if link.oversized {
        warn!(len = link.url.len(), "link may be too long for some browsers");
    }
    println!("{}", link.url);
    Ok(())
}

fn deal(path: &Path, seed: Option<u64>, rules: DeckRules) -> anyhow::Result<()> {
    let imported = load_deck_file(path)?;
    let seed = seed.unwrap_or_else(|| RngState::from_entropy().seed());
    let mut app = DeckBuilder::new(rules, seed);
    app.import_into_active(imported.cards);
    let dealt = app
        .deal()
        .with_context(|| format!("deal from {}", path.display()))?;
    println!("seed: {seed}");
    println!("hand:");
    for card in &dealt.hand {
        println!("  {}", card_line(card));
    }
    println!("prizes:");
    for card in &dealt.prizes {
        println!("  {}", card_line(card));
    }
    Ok(())
}

fn registry(paths: &[PathBuf], rules: &DeckRules) -> anyhow::Result<()> {
    let mut registry = DeckRegistry::with_rules(rules);
    let report = load_registry_decks(&mut registry, paths);
    for error in &report.errors {
        eprintln!("{error}");
    }
    if registry.is_empty() {
        bail!("no deck could be loaded");
    }
    for (index, deck) in registry.iter().enumerate() {
        let preview = registry
            .preview(index)
            .map(|preview| preview.primary.name.as_str())
            .unwrap_or("-");
        println!(
            "{}  {} cards  {}  [{}]",
            deck.name,
            deck.cards.len(),
            format_price(deck.price),
            preview
        );
    }
    println!("total: {}", format_price(registry.total_price()));
    Ok(())
}
