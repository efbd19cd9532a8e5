use stenodrill_core::dictionary::Dictionary;
use stenodrill_core::parser::format_outline;
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dictionaries"));
    println!("Loading {:?}", dir);

    let dict = Dictionary::load_default(&dir)?;
    println!("Loaded {} entries.", dict.len());

    for entry in dict.entries() {
        let outlines: Vec<_> = entry.outlines().iter().map(|o| format_outline(o)).collect();
        println!("  {}: {}", entry.word(), outlines.join(", "));
    }

    Ok(())
}
