//! Fan-out of publications to registered views.

use crate::Publication;

/// A view that renders dashboard publications.
///
/// The dashboard makes no assumption about how a view draws itself; it
/// only guarantees that every publication is internally consistent.
pub trait ViewConsumer: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    /// Renders one publication.
    fn render(&self, publication: &Publication);
}

/// Delivers each publication to every registered consumer, in
/// registration order.
#[derive(Default)]
pub struct ViewNotifier {
    consumers: Vec<Box<dyn ViewConsumer>>,
}

impl ViewNotifier {
    /// Creates a notifier with no consumers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a consumer.
    pub fn register(&mut self, consumer: Box<dyn ViewConsumer>) {
        log::debug!("Registered view consumer '{}'", consumer.name());
        self.consumers.push(consumer);
    }

    /// Pushes `publication` to every consumer.
    pub fn publish(&self, publication: &Publication) {
        log::trace!(
            "Publishing #{} to {} consumers",
            publication.sequence,
            self.consumers.len()
        );
        for consumer in &self.consumers {
            consumer.render(publication);
        }
    }

    /// Number of registered consumers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.consumers.len()
    }

    /// Whether no consumer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.consumers.is_empty()
    }
}

impl std::fmt::Debug for ViewNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewNotifier")
            .field(
                "consumers",
                &self.consumers.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
