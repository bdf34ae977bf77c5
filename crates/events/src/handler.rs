use tradeledger_core::Aggregate;

use crate::Event;

/// Execute an aggregate command in place (no IO, no async).
///
/// 1. **Decide**: `aggregate.handle(command)` validates and returns events
///    without touching state.
/// 2. **Evolve**: each event is applied in order.
///
/// If `handle` rejects the command nothing is applied, so a failed command
/// leaves the aggregate exactly as it was.
pub fn execute<A>(aggregate: &mut A, command: &A::Command) -> Result<Vec<A::Event>, A::Error>
where
    A: Aggregate,
    A::Event: Event,
{
    let events = A::handle(aggregate, command)?;
    for ev in &events {
        tracing::trace!(event_type = ev.event_type(), "applying event");
        A::apply(aggregate, ev);
    }
    Ok(events)
}
