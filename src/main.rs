mod domain;
mod clients;
mod messages;
mod error;
mod config;
mod source;

mod cache_actor;
mod repository_actor;
mod search_actor;

mod app_system;

#[cfg(test)]
mod mock_framework;

use clap::Parser;
use tracing::{debug, error, info, Instrument};

use crate::app_system::{setup_tracing, DirectorySystem};
use crate::config::{Cli, DirectoryConfig};
use crate::domain::{ColorMode, ProfileDetails};
use crate::search_actor::visible_range;

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let cli = Cli::parse();
    let color_mode = if cli.dark { ColorMode::Dark } else { ColorMode::Light };

    info!("Starting user directory");
    let mut system = DirectorySystem::new(DirectoryConfig::from(&cli))?;

    let span = tracing::info_span!("load_users");
    let snapshot = async {
        info!("Loading users");
        system
            .repository_client
            .activate()
            .await
            .map_err(|e| e.to_string())?;
        system
            .repository_client
            .wait_until_settled()
            .await
            .map_err(|e| e.to_string())
    }
    .instrument(span)
    .await?;

    let snapshot = if cli.refresh {
        info!("Refreshing users");
        system.refresh().await?
    } else {
        snapshot
    };

    match &snapshot.error {
        Some(e) => error!(error = %e, "Could not load users"),
        None => info!(user_count = snapshot.users.len(), "Users loaded"),
    }

    // Opened after loading so the session starts from the settled list.
    let session = system.open_search(color_mode);
    let view = if cli.query.is_empty() {
        session.view()
    } else {
        session
            .type_query(cli.query.clone())
            .await
            .map_err(|e| e.to_string())?;
        session
            .wait_for_query(&cli.query)
            .await
            .map_err(|e| e.to_string())?
    };

    if view.items.is_empty() {
        println!("No users found.");
    }
    // One terminal line per item; the last row is inclusive.
    let range = visible_range(
        view.items.len(),
        cli.scroll as f64,
        1.0,
        cli.rows.saturating_sub(1) as f64,
        0,
    );
    debug!(
        start = range.start,
        end = range.end,
        offset_y = range.offset_y,
        total_height = range.total_height,
        "Printing visible rows"
    );
    for item in &view.items[range.indices()] {
        println!("{:>3}. {} [{}] {}", item.index, item.label, item.initials, item.avatar_color);
    }
    let hidden = view.items.len() - range.indices().len();
    if hidden > 0 {
        println!("... {hidden} more (use --scroll and --rows)");
    }

    if let Some(index) = cli.select {
        match session.select_item(index).await {
            Ok(user) => println!("\n{}", ProfileDetails::new(&user, color_mode)),
            Err(e) => error!(error = %e, "Selection failed"),
        }
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
