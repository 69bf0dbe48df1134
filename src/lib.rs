pub mod loader;
pub mod registry;
pub mod resolver;
pub mod roster;
pub mod schema;
pub mod types;

pub use types::{
    RosterParseStats,
    RosterScannerConfig,
    UnresolvedName,
};

pub use registry::SystemRegistry;

pub use loader::{
    load_game_system_group,
    LoadOutcome,
};

pub use roster::{
    load_roster,
    parse_roster,
    parse_roster_task,
    save_roster,
    Force,
    Roster,
    RosterParseResult,
    Selection,
};

pub use schema::{
    GameSystemGroup,
    NameMatch,
};
