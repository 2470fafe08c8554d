//! Search command implementation.

use crate::cli::{preflight, Output};
use crate::config::Settings;
use crate::resolver::{QueryResolver, Resolution, NO_RESULTS_MESSAGE};
use anyhow::Result;

/// Run the search command.
pub async fn run_search(query: &str, limit: Option<usize>, settings: Settings) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        Output::warning("Nothing to search for.");
        return Ok(());
    }

    preflight::check(&settings)?;

    let resolver = QueryResolver::from_settings(&settings)?;
    let limit = settings.clamp_limit(limit.unwrap_or(settings.search.default_limit));

    let spinner = Output::spinner("Searching...");
    let result = resolver.resolve(query, limit).await;
    spinner.finish_and_clear();

    match result {
        Ok(Resolution::Records(records)) if records.is_empty() => {
            Output::warning("No results found matching your query.");
        }
        Ok(Resolution::Records(records)) => {
            Output::success(&format!("Results for: \"{}\"", query));
            for record in &records {
                Output::search_result(record);
            }
            if let Some(next) = settings.next_limit(limit) {
                println!();
                Output::info(&format!("Show more with --limit {}", next));
            }
        }
        Ok(Resolution::NoResults) => {
            Output::warning(NO_RESULTS_MESSAGE);
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
