//! PyO3 wrapper for the in-memory student portal
//!
//! This module provides the Python interface to the Rust portal core.

use pyo3::prelude::*;
use pyo3::types::PyDict;

use super::types::{
    finance_error_to_py, parse_confirm_input, parse_create_intent_input, to_py,
};
use crate::models::invoice::{Invoice, InvoiceItem};
use crate::portal::{InMemoryPortal, StudentPortalFinanceApi};

/// Python wrapper for the in-memory finance portal
///
/// # Example (from Python)
///
/// ```python
/// from school_portal_core_rs import StudentPortal
///
/// portal = StudentPortal()
/// invoice_id = portal.add_invoice("STU-001", "2025/2026", [
///     {"fee_structure_id": "FEE-TUITION", "description": "Tuition", "amount": 200_000},
/// ])
///
/// intent = portal.create_payment_intent({
///     "invoice_id": invoice_id,
///     "amount": 100_000,
///     "payment_method": "Transfer",
/// })
/// result = portal.confirm_payment({
///     "intent_id": intent["id"],
///     "payment_method": "Transfer",
///     "reference": intent["reference"],
///     "payload": {},
/// })
/// assert result["status"] == "Successful"
/// ```
#[pyclass(name = "StudentPortal")]
pub struct PyStudentPortal {
    inner: InMemoryPortal,
}

#[pymethods]
impl PyStudentPortal {
    #[new]
    fn new() -> Self {
        PyStudentPortal {
            inner: InMemoryPortal::new(),
        }
    }

    /// Portal whose gateway declines every settlement (for failure-path
    /// testing from the host side).
    #[staticmethod]
    fn declining(reason: &str) -> Self {
        PyStudentPortal {
            inner: InMemoryPortal::with_declining_gateway(reason),
        }
    }

    /// Register an invoice and return its id.
    ///
    /// `items` is a list of dicts with `fee_structure_id`, `description`
    /// and `amount` keys.
    fn add_invoice(&mut self, student_id: &str, session: &str, items: Vec<&PyDict>) -> PyResult<String> {
        let mut parsed = Vec::with_capacity(items.len());
        for item in items {
            parsed.push(InvoiceItem {
                fee_structure_id: item
                    .get_item("fee_structure_id")?
                    .map(|v| v.extract())
                    .transpose()?
                    .unwrap_or_default(),
                description: item
                    .get_item("description")?
                    .map(|v| v.extract())
                    .transpose()?
                    .unwrap_or_default(),
                amount: item
                    .get_item("amount")?
                    .map(|v| v.extract())
                    .transpose()?
                    .unwrap_or(0),
            });
        }
        if parsed.is_empty() || parsed.iter().any(|i| i.amount <= 0) {
            return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(
                "invoice needs at least one item with a positive amount",
            ));
        }
        Ok(self.inner.add_invoice(Invoice::new(
            student_id.to_string(),
            session.to_string(),
            parsed,
            0,
        )))
    }

    /// List the student's invoices with derived balance and status.
    fn get_my_invoices(&self, py: Python, student_id: &str) -> PyResult<PyObject> {
        to_py(py, &self.inner.get_my_invoices(student_id))
    }

    /// List the student's payments (posted and reversed).
    fn get_my_payments(&self, py: Python, student_id: &str) -> PyResult<PyObject> {
        to_py(py, &self.inner.get_my_payments(student_id))
    }

    /// Validate and create a payment intent.
    fn create_payment_intent(&mut self, py: Python, input: &PyDict) -> PyResult<PyObject> {
        let input = parse_create_intent_input(input)?;
        let intent = self
            .inner
            .create_payment_intent(input)
            .map_err(finance_error_to_py)?;
        to_py(py, &intent)
    }

    /// Confirm an intent. Declines are reported in the returned dict
    /// (`status == "Failed"` plus `message`), not raised.
    fn confirm_payment(&mut self, py: Python, input: &PyDict) -> PyResult<PyObject> {
        let input = parse_confirm_input(input)?;
        let response = self
            .inner
            .confirm_payment(input)
            .map_err(finance_error_to_py)?;
        to_py(py, &response)
    }

    /// Audit events recorded so far.
    fn events(&self, py: Python) -> PyResult<PyObject> {
        to_py(py, self.inner.events())
    }
}
