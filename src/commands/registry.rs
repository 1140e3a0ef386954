//! Intent handler registry
//!
//! - **Version**: 2.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 2.0.0: Ordered dispatch; the first handler to claim a message wins
//! - 1.0.0: Initial implementation for handler dispatch

use anyhow::Result;
use log::debug;
use std::sync::Arc;

use super::context::CommandContext;
use super::handler::{InboundMessage, IntentHandler, Outcome};

/// Ordered list of intent handlers
///
/// Registration order is priority order.
///
/// # Example
///
/// ```ignore
/// let mut registry = IntentRegistry::new();
/// registry.register(Arc::new(UtilityHandler));
/// registry.register(Arc::new(InlineTransactionHandler));
///
/// if let Some(name) = registry.dispatch(&ctx, &message).await? {
///     debug!("handled by {name}");
/// }
/// ```
#[derive(Clone)]
pub struct IntentRegistry {
    handlers: Vec<Arc<dyn IntentHandler>>,
}

impl IntentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Append a handler at the lowest priority so far
    pub fn register(&mut self, handler: Arc<dyn IntentHandler>) {
        self.handlers.push(handler);
    }

    /// Offer the message to each handler in order
    ///
    /// Returns the name of the handler that consumed it, or `None` when no
    /// handler did.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        message: &InboundMessage,
    ) -> Result<Option<&'static str>> {
        for handler in &self.handlers {
            if handler.handle(ctx, message).await? == Outcome::Handled {
                debug!("Message from user {} handled by {}", message.user_id, handler.name());
                return Ok(Some(handler.name()));
            }
        }
        Ok(None)
    }

    /// Handler names in priority order
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.iter().map(|h| h.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for IntentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::test_context;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Claims messages starting with `prefix` and counts every offer
    struct MockHandler {
        name: &'static str,
        prefix: &'static str,
        offered: AtomicUsize,
    }

    impl MockHandler {
        fn new(name: &'static str, prefix: &'static str) -> Arc<Self> {
            Arc::new(Self {
                name,
                prefix,
                offered: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl IntentHandler for MockHandler {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn handle(&self, _ctx: &CommandContext, message: &InboundMessage) -> Result<Outcome> {
            self.offered.fetch_add(1, Ordering::SeqCst);
            if message.text.starts_with(self.prefix) {
                Ok(Outcome::Handled)
            } else {
                Ok(Outcome::Skipped)
            }
        }
    }

    #[test]
    fn test_registry_new_is_empty() {
        let registry = IntentRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_registry_keeps_registration_order() {
        let mut registry = IntentRegistry::default();
        registry.register(MockHandler::new("first", "a"));
        registry.register(MockHandler::new("second", "b"));
        assert_eq!(registry.names(), vec!["first", "second"]);
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_stops_at_first_claim() {
        let (_dir, ctx, _outbound, _clock) = test_context().await;
        let broad = MockHandler::new("broad", "");
        let never = MockHandler::new("never", "");
        let mut registry = IntentRegistry::new();
        registry.register(broad.clone());
        registry.register(never.clone());

        let handled = registry.dispatch(&ctx, &InboundMessage::new(1, "hi")).await.unwrap();
        assert_eq!(handled, Some("broad"));
        assert_eq!(never.offered.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dispatch_unclaimed_returns_none() {
        let (_dir, ctx, _outbound, _clock) = test_context().await;
        let only = MockHandler::new("only", "/x");
        let mut registry = IntentRegistry::new();
        registry.register(only.clone());

        let handled = registry.dispatch(&ctx, &InboundMessage::new(1, "hello")).await.unwrap();
        assert_eq!(handled, None);
        assert_eq!(only.offered.load(Ordering::SeqCst), 1);
    }
}
