//! Ledger rendering for chat replies

use crate::database::Transaction;
use crate::features::time::Zone;

/// Signed amount with an explicit `+` for income
pub fn format_amount(amount: i64) -> String {
    format!("{amount:+}")
}

/// One `DD.MM +300 — Category` line per entry, in the given order
pub fn format_ledger(transactions: &[Transaction], zone: &Zone) -> String {
    transactions
        .iter()
        .map(|t| {
            let local = zone.to_local(t.occurred_at);
            format!(
                "{} {} — {}",
                local.format("%d.%m"),
                format_amount(t.amount),
                t.category
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
