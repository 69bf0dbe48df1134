use std::path::PathBuf;

use anyhow::Result;

use roster_scanner::{
    load_game_system_group, parse_roster, RosterScannerConfig, SystemRegistry,
};

#[tokio::main]
async fn main() -> Result<()> {
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
    let outcome = load_game_system_group(&data_dir, &config).await?;
    if outcome.is_failed() {
        anyhow::bail!("schema load failed, not parsing");
    }

    let mut registry = SystemRegistry::new();
    registry.register(outcome.group);

    let export = std::fs::read_to_string(&export_path)?;
    let result = parse_roster(&registry, &export, &config)?;

    // Per-cost-type totals across the whole roster
    println!("\n=== {} ===", result.roster.name);
    for cost in &result.roster.costs {
        println!("{:>10}: {}", cost.name, cost.value);
    }

    // Break totals down per force
    for force in &result.roster.forces {
        let mut per_force = std::collections::HashMap::new();
        for selection in &force.selections {
            sum_costs(selection, &mut per_force);
        }
        println!("\n{}", force.name);
        for (name, value) in per_force {
            println!("{:>10}: {}", name, value);
        }
    }

    Ok(())
}

fn sum_costs(
    selection: &roster_scanner::roster::Selection,
    totals: &mut std::collections::HashMap<String, f64>,
) {
    for cost in &selection.costs {
        *totals.entry(cost.name.clone()).or_insert(0.0) += cost.value * f64::from(selection.number);
    }
    for child in &selection.selections {
        sum_costs(child, totals);
    }
}
