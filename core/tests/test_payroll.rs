//! Integration tests for payroll aggregation and run lifecycle

use school_portal_core_rs::{
    net_pay, EventLog, FinanceLedger, PayrollError, PayrollRun, RunStatus, SalaryComponent,
    SalaryStructure, StaffSalaryAssignment,
};

fn grade_structure() -> SalaryStructure {
    SalaryStructure::new(
        "Teaching Grade 1".to_string(),
        300_000,
        vec![
            SalaryComponent { name: "Housing".to_string(), amount: 60_000 },
            SalaryComponent { name: "Transport".to_string(), amount: 20_000 },
        ],
        vec![
            SalaryComponent { name: "Pension".to_string(), amount: 24_000 },
            SalaryComponent { name: "Tax".to_string(), amount: 30_000 },
        ],
    )
}

#[test]
fn test_full_run_from_assignments_to_expense() {
    let structure = grade_structure();

    let plain = StaffSalaryAssignment::new("STF-001".to_string(), structure.id().to_string());
    let custom = StaffSalaryAssignment::new("STF-002".to_string(), structure.id().to_string())
        .with_custom_base(350_000)
        .with_custom_deductions(vec![SalaryComponent {
            name: "Salary advance".to_string(),
            amount: 50_000,
        }]);

    // 300_000 + 80_000 - 54_000
    assert_eq!(net_pay(&plain, &structure), 326_000);
    // 350_000 + 80_000 - 104_000
    assert_eq!(net_pay(&custom, &structure), 326_000);

    let mut run = PayrollRun::new("2026-08".to_string(), 100);
    for (assignment, staff) in [(&plain, "STF-001"), (&custom, "STF-002")] {
        run.add_entry(staff.to_string(), net_pay(assignment, &structure));
    }
    assert_eq!(run.status(), RunStatus::Pending);
    assert_eq!(run.total_net_pay(), 652_000);

    let mut ledger = FinanceLedger::new();
    let mut log = EventLog::new();

    run.approve().unwrap();
    run.disburse(&mut ledger, &mut log, 200).unwrap();

    assert_eq!(run.status(), RunStatus::Disbursed);
    assert_eq!(ledger.expenses().len(), 1);
    assert_eq!(ledger.expenses()[0].amount(), 652_000);
    assert_eq!(ledger.expenses()[0].category(), "Payroll");
    assert_eq!(log.len(), 1);
}

#[test]
fn test_approval_is_required_and_single_shot() {
    let mut run = PayrollRun::new("2026-08".to_string(), 0);
    run.add_entry("STF-001".to_string(), 100_000);

    let mut ledger = FinanceLedger::new();
    let mut log = EventLog::new();

    assert_eq!(
        run.disburse(&mut ledger, &mut log, 1),
        Err(PayrollError::NotApproved)
    );

    run.approve().unwrap();
    assert_eq!(run.approve(), Err(PayrollError::NotPending));

    run.disburse(&mut ledger, &mut log, 2).unwrap();
    assert_eq!(
        run.disburse(&mut ledger, &mut log, 3),
        Err(PayrollError::NotApproved)
    );
    assert_eq!(ledger.expenses().len(), 1);
}

#[test]
fn test_net_pay_custom_allowances_stack() {
    let structure = grade_structure();
    let assignment = StaffSalaryAssignment::new("STF-003".to_string(), structure.id().to_string())
        .with_custom_allowances(vec![SalaryComponent {
            name: "HOD duty".to_string(),
            amount: 40_000,
        }]);

    // Custom allowances add to the structure's, they do not replace them
    assert_eq!(net_pay(&assignment, &structure), 366_000);
}
