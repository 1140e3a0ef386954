//! Per-intent handler implementations
//!
//! - **Version**: 3.0.0
//! - **Since**: 3.38.0
//!
//! ## Changelog
//! - 3.0.0: Text intents for reminders, ledger, timezones and feature flags
//! - 1.0.0: Initial extraction from monolithic command_handler.rs

pub mod admin;
pub mod cash;
pub mod remind;
pub mod timezone;
pub mod utility;

use std::sync::Arc;

use super::handler::IntentHandler;

/// Create all intent handlers in priority order
///
/// Commands come first. After them the order is load-bearing: an inline
/// transaction, then a pending category, then time expressions, and last a
/// pending reminder body.
pub fn create_all_handlers() -> Vec<Arc<dyn IntentHandler>> {
    vec![
        Arc::new(remind::RemindHandler),
        Arc::new(utility::UtilityHandler),
        Arc::new(timezone::TimezoneHandler),
        Arc::new(admin::AdminHandler),
        Arc::new(cash::CashHandler),
        Arc::new(cash::InlineTransactionHandler),
        Arc::new(cash::PendingCategoryHandler),
        Arc::new(remind::TimeExpressionHandler),
        Arc::new(remind::InlineReminderHandler),
        Arc::new(remind::PendingReminderHandler),
    ]
}

/// Lowercased first token and the trimmed remainder
pub(crate) fn split_command(text: &str) -> (String, &str) {
    let text = text.trim();
    match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head.to_lowercase(), rest.trim()),
        None => (text.to_lowercase(), ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("/CASH  week "), ("/cash".to_string(), "week"));
        assert_eq!(split_command("/settz"), ("/settz".to_string(), ""));
        assert_eq!(
            split_command("/cash 01-10-25 - 14-10-25"),
            ("/cash".to_string(), "01-10-25 - 14-10-25")
        );
    }

    #[test]
    fn test_freeform_handlers_follow_commands() {
        let names: Vec<_> = create_all_handlers().iter().map(|h| h.name()).collect();
        let tail = &names[names.len() - 5..];
        assert_eq!(
            tail,
            [
                "inline_transaction",
                "pending_category",
                "time_expression",
                "inline_reminder",
                "pending_reminder"
            ]
        );
    }
}
