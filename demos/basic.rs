use std::path::PathBuf;

use anyhow::Result;

use roster_scanner::{
    load_game_system_group, parse_roster, RosterScannerConfig, SystemRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let data_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures"));
    let export_path = std::env::args()
        .nth(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/reaver_patrol.txt"));

    let config = RosterScannerConfig::default();

    // Load the game system and its catalogues
    println!("\n=== Loading schema documents ===");
    let outcome = load_game_system_group(&data_dir, &config).await?;
    if outcome.is_failed() {
        for failure in &outcome.failures {
            println!("Failed: {} ({})", failure.path.display(), failure.error);
        }
        anyhow::bail!("schema load failed, not parsing");
    }
    println!(
        "Loaded {} ({} catalogues)",
        outcome.group.game_system().name.as_deref().unwrap_or("<unnamed>"),
        outcome.group.catalogues().len()
    );

    let mut registry = SystemRegistry::new();
    registry.register(outcome.group);

    // Parse a roster export against it
    println!("\n=== Parsing roster export ===");
    let export = std::fs::read_to_string(&export_path)?;
    match parse_roster(&registry, &export, &config) {
        Ok(result) => {
            println!("Roster: {}", result.roster.name);
            for force in &result.roster.forces {
                println!(
                    "  Force: {} ({} selections)",
                    force.name,
                    force.selections.len()
                );
                for selection in &force.selections {
                    println!("    - {}x {}", selection.number, selection.name);
                    for child in &selection.selections {
                        println!("      . {}x {}", child.number, child.name);
                    }
                }
            }
            println!(
                "Resolved {} selections, skipped {}",
                result.stats.selections, result.stats.skipped
            );
            for unresolved in &result.stats.unresolved {
                println!(
                    "  Unresolved: {} (similar: {})",
                    unresolved.name,
                    unresolved.suggestions.join(", ")
                );
            }
        }
        Err(e) => println!("Error parsing roster: {}", e),
    }

    Ok(())
}
