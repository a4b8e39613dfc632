//! One-shot CLI commands.

use gamehooks_registry::{DeliveryResult, WebhookRegistry};

/// Print every registered endpoint as pretty JSON.
pub(crate) async fn list_endpoints(
    registry: &WebhookRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let endpoints = registry.list().await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({ "endpoints": endpoints }))?
    );
    Ok(())
}

/// Print the event catalog, one name per line.
pub(crate) fn list_events(registry: &WebhookRegistry) {
    let events = registry.list_available_events();
    if events.is_empty() {
        println!("No events in catalog.");
        return;
    }
    for event in events {
        println!("{}", event);
    }
}

/// Fire `event` and wait for every delivery to finish.
///
/// Returns the number of failed deliveries.
pub(crate) async fn fire_event(
    registry: &WebhookRegistry,
    event: &str,
    payload: &str,
) -> Result<usize, Box<dyn std::error::Error>> {
    let payload: serde_json::Value = serde_json::from_str(payload)?;

    let outcomes = registry.handle_event(event, &payload).await.join().await;
    if outcomes.is_empty() {
        println!("No enabled endpoint subscribes to '{}'.", event);
        return Ok(0);
    }

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            DeliveryResult::Delivered { status } => {
                println!("  ok    {} {} (HTTP {})", outcome.endpoint_id, outcome.url, status);
            }
            DeliveryResult::Failed { reason } => {
                failed += 1;
                println!("  FAIL  {} {}: {}", outcome.endpoint_id, outcome.url, reason);
            }
        }
    }
    println!(
        "Delivered '{}' to {}/{} endpoint(s).",
        event,
        outcomes.len() - failed,
        outcomes.len()
    );

    Ok(failed)
}
