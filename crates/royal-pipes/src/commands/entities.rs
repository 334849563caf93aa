//! Entities command: most mentioned people or places.

use clap::Args;
use royal_pipes_core::RequestCache;
use royal_pipes_core::source::EntitySource;
use tracing::{debug, instrument};

use super::style::Styled;

/// Arguments for the `entities` subcommand.
#[derive(Args, Debug)]
pub struct EntitiesArgs {
    /// Which entity table to rank.
    #[arg(value_enum)]
    pub kind: EntitySource,

    /// Number of entities to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

/// Rank the most mentioned people or places.
#[instrument(name = "cmd_entities", skip_all, fields(kind = %args.kind, limit = args.limit))]
pub fn cmd_entities(
    args: EntitiesArgs,
    global_json: bool,
    cache: &RequestCache<'_>,
) -> anyhow::Result<()> {
    debug!("executing entities command");

    let entities = cache.most_used_entities(args.limit, args.kind)?;

    if global_json {
        return super::print_json(&entities);
    }
    if entities.is_empty() {
        println!("{}", format!("no {} mentions", args.kind).yellow());
        return Ok(());
    }
    for (rank, entry) in entities.iter().enumerate() {
        println!(
            "{:>3}. {}  {}  {}",
            rank + 1,
            entry.entity.bold(),
            entry.total_count.green(),
            format!("in {} speeches", entry.speech_count).dimmed()
        );
    }
    Ok(())
}
