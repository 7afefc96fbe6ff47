//! Long-running `watch` command: stale-while-revalidate loading with every
//! state transition logged, until Ctrl-C or SIGTERM.

use std::sync::Arc;

use heero_core::AppConfig;
use heero_map::MapState;
use heero_store::{load_colors, KeyValueStore, LoadState, RevalidatorConfig};

use crate::context::{apply_records, build_loader, open_store};

/// Run the revalidator and feed each published record set into a
/// [`MapState`], persisting colors whenever new categories appear.
///
/// # Errors
///
/// Returns an error if the sources file is invalid or the loader cannot be
/// built. Load failures are logged, not returned.
pub(crate) async fn run_watch(config: &AppConfig) -> anyhow::Result<()> {
    let loader = Arc::new(build_loader(config)?);
    let store: Arc<dyn KeyValueStore> = Arc::new(open_store(config));
    let revalidator = RevalidatorConfig::from_app_config(config);
    tracing::info!(
        sources = loader.sources().len(),
        ttl_secs = revalidator.ttl.as_secs(),
        interval_secs = revalidator.interval.as_secs(),
        cache_dir = %config.cache_dir.display(),
        "watching locations"
    );

    let handle = heero_store::spawn(Arc::clone(&store), loader, revalidator);
    let mut updates = handle.subscribe();
    let mut state = MapState::new(load_colors(store.as_ref()));

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    tracing::warn!("revalidator stopped");
                    break;
                }
                let current = updates.borrow_and_update().clone();
                apply_state(&mut state, store.as_ref(), current);
            }
            () = &mut shutdown => break,
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn apply_state(state: &mut MapState, store: &dyn KeyValueStore, current: LoadState) {
    match current {
        LoadState::Loading => tracing::debug!("loading locations"),
        LoadState::Ready {
            records,
            origin,
            generation,
        } => {
            let update = apply_records(state, store, records);
            tracing::info!(
                generation,
                origin = ?origin,
                records = state.records().len(),
                visible = state.visible_records().len(),
                new_categories = update.new_categories.len(),
                "locations updated"
            );
        }
        LoadState::Failed { message } => {
            tracing::error!(error = %message, "no locations available");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
