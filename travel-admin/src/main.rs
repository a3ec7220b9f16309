// Travel admin console
// Entry point: opens the configured store and loads the manager sections

use anyhow::Context;
use travel_admin::app::AppState;
use travel_admin::config::ConsoleConfig;
use travel_admin::console::{Console, Section};
use travel_admin::models::Entity;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "travel_admin=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting travel admin console");

    let config = ConsoleConfig::from_env().context("Failed to read configuration")?;
    let state = AppState::open(&config)
        .await
        .context("Failed to open document store")?;

    // An optional route argument narrows the run to one section
    let sections = match std::env::args().nth(1) {
        Some(route) => vec![Section::from_route(&route)],
        None => Section::ALL.to_vec(),
    };

    for section in sections {
        match section {
            Section::Reviews => show(section, &state.reviews).await?,
            Section::Users => show(section, &state.users).await?,
            Section::Categories => show(section, &state.categories).await?,
            Section::Places => show(section, &state.places).await?,
        }
    }

    Ok(())
}

async fn show<E: Entity>(section: Section, console: &Console<E>) -> anyhow::Result<()> {
    let mut view = console.new_view();
    console.load(&mut view).await;

    if let Some(error) = &view.error {
        tracing::error!("{} ({}): {}", section.label(), section.route(), error);
        return Ok(());
    }

    tracing::info!(
        "{} ({}): {} records",
        section.label(),
        section.route(),
        view.records.len()
    );
    println!("{}", serde_json::to_string_pretty(&view.records)?);
    Ok(())
}
