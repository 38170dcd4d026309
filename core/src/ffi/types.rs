//! Type conversion utilities for FFI boundary
//!
//! Converts between Rust types and PyO3-compatible types (PyDict, PyList).
//! Outbound conversion goes through serde_json so every serializable domain
//! type crosses the boundary the same way.

use pyo3::exceptions::{PyLookupError, PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::finance::FinanceError;
use crate::models::payment::PaymentMethod;
use crate::portal::{ConfirmPaymentInput, CreatePaymentIntentInput};

/// Extract a required field from a Python dict with a clear error message.
fn extract_required<'a, T: FromPyObject<'a>>(dict: &'a PyDict, key: &str) -> PyResult<T> {
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<PyValueError, _>(format!("Missing required field '{}'", key))
        })?
        .extract()
}

/// Extract an optional field from a Python dict.
fn extract_optional<'a, T: FromPyObject<'a>>(dict: &'a PyDict, key: &str) -> PyResult<Option<T>> {
    match dict.get_item(key)? {
        Some(value) => Ok(Some(value.extract()?)),
        None => Ok(None),
    }
}

/// Parse a payment method from its wire name (`Cash`, `Transfer`, `POS`,
/// `Online`).
pub fn parse_payment_method(name: &str) -> PyResult<PaymentMethod> {
    match name {
        "Cash" => Ok(PaymentMethod::Cash),
        "Transfer" => Ok(PaymentMethod::Transfer),
        "POS" => Ok(PaymentMethod::Pos),
        "Online" => Ok(PaymentMethod::Online),
        other => Err(PyErr::new::<PyValueError, _>(format!(
            "Unknown payment method '{}'",
            other
        ))),
    }
}

/// Parse a `create_payment_intent` input dict.
pub fn parse_create_intent_input(dict: &PyDict) -> PyResult<CreatePaymentIntentInput> {
    let method: String = extract_required(dict, "payment_method")?;
    Ok(CreatePaymentIntentInput {
        invoice_id: extract_required(dict, "invoice_id")?,
        amount: extract_required(dict, "amount")?,
        payment_method: parse_payment_method(&method)?,
    })
}

/// Parse a `confirm_payment` input dict.
pub fn parse_confirm_input(dict: &PyDict) -> PyResult<ConfirmPaymentInput> {
    let method: String = extract_required(dict, "payment_method")?;
    let payload: Option<HashMap<String, String>> = extract_optional(dict, "payload")?;
    Ok(ConfirmPaymentInput {
        intent_id: extract_required(dict, "intent_id")?,
        payment_method: parse_payment_method(&method)?,
        reference: extract_required(dict, "reference")?,
        payload: payload.unwrap_or_default(),
    })
}

/// Convert a serde_json value into the corresponding Python object.
pub fn json_value_to_py(py: Python<'_>, value: &Value) -> PyResult<PyObject> {
    Ok(match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.into_py(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_py(py)
            } else if let Some(u) = n.as_u64() {
                u.into_py(py)
            } else {
                n.as_f64().unwrap_or(0.0).into_py(py)
            }
        }
        Value::String(s) => s.into_py(py),
        Value::Array(items) => {
            let list = PyList::empty(py);
            for item in items {
                list.append(json_value_to_py(py, item)?)?;
            }
            list.into_py(py)
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, item) in map {
                dict.set_item(key, json_value_to_py(py, item)?)?;
            }
            dict.into_py(py)
        }
    })
}

/// Serialize any domain value to a Python object via serde_json.
pub fn to_py<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let json = serde_json::to_value(value)
        .map_err(|e| PyErr::new::<PyRuntimeError, _>(format!("Serialization failed: {}", e)))?;
    json_value_to_py(py, &json)
}

/// Map finance errors onto Python exception types.
pub fn finance_error_to_py(err: FinanceError) -> PyErr {
    match err {
        FinanceError::InvoiceNotFound(_)
        | FinanceError::IntentNotFound(_)
        | FinanceError::PaymentNotFound(_) => PyErr::new::<PyLookupError, _>(err.to_string()),
        FinanceError::InvalidAmount { .. } | FinanceError::AmountExceedsBalance { .. } => {
            PyErr::new::<PyValueError, _>(err.to_string())
        }
        other => PyErr::new::<PyRuntimeError, _>(other.to_string()),
    }
}
