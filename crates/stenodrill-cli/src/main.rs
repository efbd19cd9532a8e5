use anyhow::Context;
use clap::{Parser, ValueEnum};
use crossbeam_channel::{unbounded, Sender};
use std::io::BufRead;
use std::path::{Path, PathBuf};
use stenodrill_core::dictionary::{self, Dictionary, DictionaryEntry};
use stenodrill_core::engine::{PracticeConfig, PracticeSession, SessionUpdate, WordOrder, WordPrompt};
use stenodrill_core::input::{input_queue, InputSender};
use stenodrill_core::parser::{format_stroke, parse_outline};
use tracing::{debug, info, trace};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stenodrill", about = "Steno chord trainer")]
struct Cli {
    /// Directory holding training.txt and the optional phrase lists
    #[arg(long, default_value = "dictionaries")]
    dict_dir: PathBuf,
    /// Word list to use instead of the directory
    #[arg(long)]
    dictionary: Option<PathBuf>,
    /// Phrase list resolved against --dictionary
    #[arg(long, requires = "dictionary")]
    phrases: Option<PathBuf>,
    /// Practice settings (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Word order, overrides the config file
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Seed for random word order
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    Sequential,
    Random,
}

impl From<OrderArg> for WordOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::Sequential => WordOrder::Sequential,
            OrderArg::Random => WordOrder::Random,
        }
    }
}

/// What the stdin thread tells the main loop after each line.
enum ReaderMsg {
    /// Key events for one line are in the input queue.
    Written,
    Invalid(String),
    Skip,
    Quit,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let entries = load_entries(&cli)?;
    let mut session = PracticeSession::new(entries, config)?;

    let (input_tx, input_rx) = input_queue();
    let (msg_tx, msg_rx) = unbounded();
    std::thread::spawn(move || {
        info!("Reader thread started");
        if let Err(e) = read_stdin(&input_tx, &msg_tx) {
            tracing::error!("Reader stopped: {}", e);
        }
    });

    println!("Type strokes in steno notation ('/' between strokes). :skip, :quit");
    print_prompt(&session.prompt());

    for msg in msg_rx {
        match msg {
            ReaderMsg::Written => {
                for update in session.drain_input(&input_rx) {
                    print_update(&update)?;
                }
            }
            ReaderMsg::Invalid(err) => println!("  ? {}", err),
            ReaderMsg::Skip => {
                let skipped = session.current_entry().word().to_string();
                let prompt = session.skip_word();
                println!("  skipped {:?}", skipped);
                print_prompt(&prompt);
            }
            ReaderMsg::Quit => break,
        }
    }

    println!("Final streak: {}", session.streak());
    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<PracticeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => PracticeConfig::default(),
    };

    if let Some(order) = cli.order {
        config.order = order.into();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    debug!("Config: {:?}", config);
    Ok(config)
}

fn load_entries(cli: &Cli) -> anyhow::Result<Vec<DictionaryEntry>> {
    let Some(words) = &cli.dictionary else {
        let dict = Dictionary::load_default(&cli.dict_dir)
            .with_context(|| format!("failed to load dictionaries from {}", cli.dict_dir.display()))?;
        return Ok(dict.into_entries());
    };

    let mut entries = dictionary::load_dictionary(words).with_context(|| context_for(words))?;
    if let Some(phrases) = &cli.phrases {
        let lookup = dictionary::build_word_lookup(&entries);
        entries.extend(dictionary::load_phrases(phrases, &lookup).with_context(|| context_for(phrases))?);
    }
    info!("Loaded {} entries", entries.len());
    Ok(entries)
}

fn context_for(path: &Path) -> String {
    format!("failed to load {}", path.display())
}

fn read_stdin(input: &InputSender, msgs: &Sender<ReaderMsg>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let Some(msg) = handle_line(&line, input)? else {
            continue;
        };

        let quit = matches!(msg, ReaderMsg::Quit);
        if msgs.send(msg).is_err() || quit {
            break;
        }
    }
    Ok(())
}

/// A line is a command or one outline. Every stroke of an outline becomes
/// key-downs for all its keys followed by key-ups, as a keyboard would send them.
fn handle_line(line: &str, input: &InputSender) -> anyhow::Result<Option<ReaderMsg>> {
    let msg = match line.trim() {
        "" => return Ok(None),
        ":quit" | ":q" => ReaderMsg::Quit,
        ":skip" | ":s" => ReaderMsg::Skip,
        cmd if cmd.starts_with(':') => ReaderMsg::Invalid(format!("unknown command {}", cmd)),
        text => match parse_outline(text) {
            Ok(outline) => {
                for chord in outline.into_iter().filter(|c| !c.is_empty()) {
                    for key in chord.iter() {
                        input.key_down(key.name())?;
                    }
                    for key in chord.iter() {
                        input.key_up(key.name())?;
                    }
                }
                ReaderMsg::Written
            }
            Err(e) => ReaderMsg::Invalid(e.to_string()),
        },
    };
    Ok(Some(msg))
}

fn print_prompt(prompt: &WordPrompt) {
    let strokes = if prompt.total_strokes == 1 { "stroke" } else { "strokes" };
    println!();
    println!("> {}  ({} {})", prompt.word, prompt.total_strokes, strokes);
    println!("  hint: {}", prompt.hint);
}

fn print_update(update: &SessionUpdate) -> anyhow::Result<()> {
    match update {
        SessionUpdate::Colors(colors) => {
            trace!("Colors: {}", serde_json::to_string(colors)?);
        }
        SessionUpdate::StrokeAccepted { position, total } => {
            println!("  ok {}/{}", position, total);
        }
        SessionUpdate::WordCompleted { word, streak } => {
            println!("  correct: {} (streak {})", word, streak);
        }
        SessionUpdate::WordLoaded(prompt) => print_prompt(prompt),
        SessionUpdate::Missed { chord, expected } => {
            let expected: Vec<_> = expected.iter().map(|c| format_stroke(*c)).collect();
            println!(
                "  miss: wrote {}, expected {}. Start the word again.",
                format_stroke(*chord),
                expected.join(" or ")
            );
        }
    }
    Ok(())
}
