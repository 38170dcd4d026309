//! Payroll aggregation
//!
//! Net pay is a pure computation over a staff member's salary assignment
//! joined with its salary structure. A payroll run collects the entries for
//! a period and moves Pending -> Approved -> Disbursed; disbursement is
//! terminal (there is no reversal path) and posts one expense to the
//! finance ledger.
//!
//! CRITICAL: All money values are i64 (minor currency units)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{Event, EventLog};
use crate::models::state::FinanceLedger;

/// A named allowance or deduction line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    pub name: String,
    pub amount: i64,
}

fn component_sum(components: &[SalaryComponent]) -> i64 {
    components.iter().map(|c| c.amount).sum()
}

/// A grade-level salary definition shared by many staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryStructure {
    id: String,
    name: String,
    base_salary: i64,
    allowances: Vec<SalaryComponent>,
    deductions: Vec<SalaryComponent>,
}

impl SalaryStructure {
    pub fn new(
        name: String,
        base_salary: i64,
        allowances: Vec<SalaryComponent>,
        deductions: Vec<SalaryComponent>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            base_salary,
            allowances,
            deductions,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_salary(&self) -> i64 {
        self.base_salary
    }

    pub fn allowances(&self) -> &[SalaryComponent] {
        &self.allowances
    }

    pub fn deductions(&self) -> &[SalaryComponent] {
        &self.deductions
    }
}

/// One staff member's link to a structure, with optional per-staff overrides.
///
/// A custom base salary replaces the structure's base; custom allowances and
/// deductions are added on top of the structure's lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffSalaryAssignment {
    id: String,
    staff_id: String,
    structure_id: String,
    custom_base_salary: Option<i64>,
    custom_allowances: Option<Vec<SalaryComponent>>,
    custom_deductions: Option<Vec<SalaryComponent>>,
}

impl StaffSalaryAssignment {
    pub fn new(staff_id: String, structure_id: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            staff_id,
            structure_id,
            custom_base_salary: None,
            custom_allowances: None,
            custom_deductions: None,
        }
    }

    pub fn with_custom_base(mut self, base_salary: i64) -> Self {
        self.custom_base_salary = Some(base_salary);
        self
    }

    pub fn with_custom_allowances(mut self, allowances: Vec<SalaryComponent>) -> Self {
        self.custom_allowances = Some(allowances);
        self
    }

    pub fn with_custom_deductions(mut self, deductions: Vec<SalaryComponent>) -> Self {
        self.custom_deductions = Some(deductions);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn staff_id(&self) -> &str {
        &self.staff_id
    }

    pub fn structure_id(&self) -> &str {
        &self.structure_id
    }
}

/// Net pay for one assignment joined with its structure.
///
/// `(custom base ?? structure base) + custom allowances + structure
/// allowances - custom deductions - structure deductions`.
pub fn net_pay(assignment: &StaffSalaryAssignment, structure: &SalaryStructure) -> i64 {
    let base = assignment
        .custom_base_salary
        .unwrap_or(structure.base_salary);
    let allowances = assignment
        .custom_allowances
        .as_deref()
        .map(component_sum)
        .unwrap_or(0)
        + component_sum(&structure.allowances);
    let deductions = assignment
        .custom_deductions
        .as_deref()
        .map(component_sum)
        .unwrap_or(0)
        + component_sum(&structure.deductions);

    base + allowances - deductions
}

/// One staff line inside a payroll run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollEntry {
    pub staff_id: String,
    pub net_pay: i64,
}

/// Lifecycle state of a payroll run. Disbursed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Pending,
    Approved,
    Disbursed,
}

/// Errors raised by payroll run transitions
#[derive(Debug, Error, PartialEq)]
pub enum PayrollError {
    #[error("Payroll run is not pending")]
    NotPending,

    #[error("Payroll run is not approved")]
    NotApproved,
}

/// A general-ledger expense entry; payroll disbursements land here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    id: String,
    description: String,
    category: String,
    amount: i64,
    created_at: u64,
}

impl Expense {
    pub fn new(description: String, category: String, amount: i64, created_at: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            description,
            category,
            amount,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

/// A payroll run for one period
///
/// # Example
/// ```
/// use school_portal_core_rs::payroll::{
///     net_pay, PayrollRun, SalaryComponent, SalaryStructure, StaffSalaryAssignment,
/// };
///
/// let structure = SalaryStructure::new(
///     "Teaching Grade 2".to_string(),
///     250_000,
///     vec![SalaryComponent { name: "Housing".to_string(), amount: 50_000 }],
///     vec![SalaryComponent { name: "Pension".to_string(), amount: 20_000 }],
/// );
/// let assignment = StaffSalaryAssignment::new("STF-001".to_string(), structure.id().to_string());
///
/// let mut run = PayrollRun::new("2026-08".to_string(), 0);
/// run.add_entry("STF-001".to_string(), net_pay(&assignment, &structure));
/// assert_eq!(run.total_net_pay(), 280_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollRun {
    /// Unique run identifier (UUID)
    id: String,

    /// Payroll period, e.g. "2026-08"
    period: String,

    /// One line per staff member
    entries: Vec<PayrollEntry>,

    /// Current lifecycle state
    status: RunStatus,

    /// Creation timestamp (unix millis)
    created_at: u64,
}

impl PayrollRun {
    pub fn new(period: String, created_at: u64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            period,
            entries: Vec::new(),
            status: RunStatus::Pending,
            created_at,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn period(&self) -> &str {
        &self.period
    }

    pub fn entries(&self) -> &[PayrollEntry] {
        &self.entries
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Total net pay across entries (derived, never stored).
    pub fn total_net_pay(&self) -> i64 {
        self.entries.iter().map(|e| e.net_pay).sum()
    }

    /// Entries may only be added while the run is still Pending.
    pub fn add_entry(&mut self, staff_id: String, net_pay: i64) {
        assert!(
            self.status == RunStatus::Pending,
            "entries can only be added to a pending run"
        );
        self.entries.push(PayrollEntry { staff_id, net_pay });
    }

    /// Pending -> Approved.
    pub fn approve(&mut self) -> Result<(), PayrollError> {
        if self.status != RunStatus::Pending {
            return Err(PayrollError::NotPending);
        }
        self.status = RunStatus::Approved;
        Ok(())
    }

    /// Approved -> Disbursed (terminal). Appends one expense covering the
    /// whole run to the finance ledger's general ledger.
    pub fn disburse(
        &mut self,
        ledger: &mut FinanceLedger,
        log: &mut EventLog,
        now_ms: u64,
    ) -> Result<(), PayrollError> {
        if self.status != RunStatus::Approved {
            return Err(PayrollError::NotApproved);
        }
        self.status = RunStatus::Disbursed;

        let total = self.total_net_pay();
        ledger.append_expense(Expense::new(
            format!("Payroll disbursement {}", self.period),
            "Payroll".to_string(),
            total,
            now_ms,
        ));
        log.record(Event::PayrollDisbursed {
            at_ms: now_ms,
            run_id: self.id.clone(),
            total_net_pay: total,
        });

        Ok(())
    }
}
