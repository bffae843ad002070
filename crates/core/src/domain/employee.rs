use serde::{Deserialize, Serialize};

/// Directory identity embedded by value in requests. Supplied by the
/// external identity provider; never mutated locally.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "empNumber")]
    pub emp_number: String,
    #[serde(rename = "empName")]
    pub emp_name: String,
    pub email: String,
}

impl Employee {
    pub fn new(
        emp_number: impl Into<String>,
        emp_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self { emp_number: emp_number.into(), emp_name: emp_name.into(), email: email.into() }
    }
}
