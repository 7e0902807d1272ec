//! EventPublisher port - Interface for pushing dashboard events to viewers.
//!
//! Producers (workload generator, health monitor) publish events without
//! knowing how they reach the viewers.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::DashboardEvent;

/// Port for publishing dashboard events.
///
/// Implementations must ensure:
/// - Events from a single caller reach each viewer in submission order
/// - Delivery is best-effort: a slow viewer never blocks the publisher
///   beyond the implementation's queueing
/// - An error is returned only when the distribution point is gone
///
/// # Example
///
/// ```ignore
/// publisher.publish(DashboardEvent::RecordProduced(bid)).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event to every connected viewer.
    async fn publish(&self, event: DashboardEvent) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn EventPublisher) {}
}
