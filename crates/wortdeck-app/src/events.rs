use kanal::AsyncReceiver;
use wortdeck_core::{GenerationEvent, ProfileOrchestrator};

use crate::presenter;

/// Coordination loop: the single context that consumes job events and
/// mutates orchestrator state. Runs until every requested facet of the
/// current request settled (or the profile failed terminally).
pub async fn run_generation(
    orchestrator: &mut ProfileOrchestrator,
    events_rx: &AsyncReceiver<GenerationEvent>,
) -> anyhow::Result<()> {
    while !orchestrator.is_settled() {
        tokio::select! {
            event = events_rx.recv() => {
                orchestrator.handle_event(event?);
                presenter::present(orchestrator);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                anyhow::bail!("interrupted before generation finished");
            }
        }
    }

    Ok(())
}
