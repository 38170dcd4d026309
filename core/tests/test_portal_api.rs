//! End-to-end tests through the StudentPortalFinanceApi boundary

use std::collections::HashMap;

use school_portal_core_rs::portal::{
    ConfirmPaymentInput, ConfirmPaymentStatus, CreatePaymentIntentInput, InMemoryPortal,
    StudentPortalFinanceApi,
};
use school_portal_core_rs::{
    Event, FinanceError, Invoice, InvoiceItem, InvoiceStatus, PaymentMethod,
};

fn tuition_invoice(student: &str, amount: i64, created_at: u64) -> Invoice {
    Invoice::new(
        student.to_string(),
        "2025/2026".to_string(),
        vec![InvoiceItem {
            fee_structure_id: "FEE-TUITION".to_string(),
            description: "Tuition - First Term".to_string(),
            amount,
        }],
        created_at,
    )
}

fn confirm(portal: &mut InMemoryPortal, intent_id: &str, reference: &str) -> ConfirmPaymentStatus {
    portal
        .confirm_payment(ConfirmPaymentInput {
            intent_id: intent_id.to_string(),
            payment_method: PaymentMethod::Transfer,
            reference: reference.to_string(),
            payload: HashMap::new(),
        })
        .unwrap()
        .status
}

#[test]
fn test_pay_invoice_to_zero_through_the_portal() {
    let mut portal = InMemoryPortal::new();
    let invoice_id = portal.add_invoice(tuition_invoice("STU-001", 200_000, 0));

    for amount in [120_000, 80_000] {
        let intent = portal
            .create_payment_intent(CreatePaymentIntentInput {
                invoice_id: invoice_id.clone(),
                amount,
                payment_method: PaymentMethod::Transfer,
            })
            .unwrap();
        assert_eq!(
            confirm(&mut portal, intent.id(), intent.reference()),
            ConfirmPaymentStatus::Successful
        );
    }

    let views = portal.get_my_invoices("STU-001");
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].balance, 0);
    assert_eq!(views[0].status, InvoiceStatus::Paid);

    let payments = portal.get_my_payments("STU-001");
    assert_eq!(payments.len(), 2);
    assert!(payments.iter().all(|p| p.is_posted()));

    // No further intent can be created on a settled invoice
    let result = portal.create_payment_intent(CreatePaymentIntentInput {
        invoice_id,
        amount: 1,
        payment_method: PaymentMethod::Cash,
    });
    assert!(matches!(
        result,
        Err(FinanceError::AmountExceedsBalance { balance: 0, .. })
    ));
}

#[test]
fn test_views_update_between_reads() {
    let mut portal = InMemoryPortal::new();
    let invoice_id = portal.add_invoice(tuition_invoice("STU-001", 200_000, 0));

    assert_eq!(portal.get_my_invoices("STU-001")[0].status, InvoiceStatus::Unpaid);

    let intent = portal
        .create_payment_intent(CreatePaymentIntentInput {
            invoice_id,
            amount: 50_000,
            payment_method: PaymentMethod::Pos,
        })
        .unwrap();

    // Intent alone changes nothing
    assert_eq!(portal.get_my_invoices("STU-001")[0].balance, 200_000);

    confirm(&mut portal, intent.id(), intent.reference());
    let view = &portal.get_my_invoices("STU-001")[0];
    assert_eq!(view.balance, 150_000);
    assert_eq!(view.status, InvoiceStatus::PartiallyPaid);
}

#[test]
fn test_declined_settlement_round_trip() {
    let mut portal = InMemoryPortal::with_declining_gateway("Issuer unavailable");
    let invoice_id = portal.add_invoice(tuition_invoice("STU-001", 200_000, 0));

    let intent = portal
        .create_payment_intent(CreatePaymentIntentInput {
            invoice_id,
            amount: 100_000,
            payment_method: PaymentMethod::Online,
        })
        .unwrap();

    let response = portal
        .confirm_payment(ConfirmPaymentInput {
            intent_id: intent.id().to_string(),
            payment_method: PaymentMethod::Online,
            reference: intent.reference().to_string(),
            payload: HashMap::new(),
        })
        .unwrap();

    assert_eq!(response.status, ConfirmPaymentStatus::Failed);
    assert_eq!(response.message.as_deref(), Some("Issuer unavailable"));
    assert!(portal.get_my_payments("STU-001").is_empty());

    // The decline is in the audit trail
    assert!(portal
        .events()
        .events()
        .iter()
        .any(|e| matches!(e, Event::SettlementDeclined { .. })));
}

#[test]
fn test_students_are_isolated() {
    let mut portal = InMemoryPortal::new();
    portal.add_invoice(tuition_invoice("STU-001", 200_000, 0));
    portal.add_invoice(tuition_invoice("STU-002", 150_000, 1));

    assert_eq!(portal.get_my_invoices("STU-001").len(), 1);
    assert_eq!(portal.get_my_invoices("STU-002").len(), 1);
    assert_eq!(portal.get_my_invoices("STU-001")[0].invoice.total_amount(), 200_000);
    assert!(portal.get_my_invoices("STU-404").is_empty());
}
