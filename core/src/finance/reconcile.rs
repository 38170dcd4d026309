//! Invoice balance and status derivation, plus payment reversal
//!
//! These are the pure reads of the finance module. Nothing here caches:
//! every call walks the full payment ledger, so the numbers are correct by
//! construction after any sequence of posts and reversals.

use crate::events::{Event, EventLog};
use crate::finance::FinanceError;
use crate::models::invoice::{Invoice, InvoiceStatus};
use crate::models::state::FinanceLedger;

/// Sum of Posted payments against an invoice. Reversed entries are excluded.
pub fn posted_total(ledger: &FinanceLedger, invoice_id: &str) -> i64 {
    ledger
        .payments_for_invoice(invoice_id)
        .iter()
        .filter(|p| p.is_posted())
        .map(|p| p.amount_paid())
        .sum()
}

/// Outstanding balance of an invoice, floored at zero.
pub fn balance(ledger: &FinanceLedger, invoice: &Invoice) -> i64 {
    (invoice.total_amount() - posted_total(ledger, invoice.id())).max(0)
}

/// Derive the invoice status from the ledger.
///
/// - balance zero: `Paid`
/// - anything posted but balance outstanding: `PartiallyPaid`
/// - nothing posted: `Unpaid`
pub fn derive_status(ledger: &FinanceLedger, invoice: &Invoice) -> InvoiceStatus {
    let paid = posted_total(ledger, invoice.id());
    if invoice.total_amount() - paid <= 0 {
        InvoiceStatus::Paid
    } else if paid > 0 {
        InvoiceStatus::PartiallyPaid
    } else {
        InvoiceStatus::Unpaid
    }
}

/// Soft-reverse a posted payment.
///
/// The entry stays in the ledger with status Reversed; the owning invoice's
/// balance and status simply derive differently on the next read. Reversing
/// an already-reversed payment is rejected.
pub fn reverse_payment(
    ledger: &mut FinanceLedger,
    log: &mut EventLog,
    payment_id: &str,
    now_ms: u64,
) -> Result<(), FinanceError> {
    let (invoice_id, amount) = {
        let payment = ledger
            .get_payment_mut(payment_id)
            .ok_or_else(|| FinanceError::PaymentNotFound(payment_id.to_string()))?;
        payment.reverse()?;
        (payment.invoice_id().to_string(), payment.amount_paid())
    };

    log.record(Event::PaymentReversed {
        at_ms: now_ms,
        payment_id: payment_id.to_string(),
        invoice_id,
        amount,
    });

    Ok(())
}
