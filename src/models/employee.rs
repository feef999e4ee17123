//! Employee roster entry.

use serde::{Deserialize, Serialize};

/// One employee on the roster a report is generated for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub department: Option<String>,
}

impl Employee {
    /// Create a roster entry without a department.
    pub fn new(id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            full_name: full_name.into(),
            department: None,
        }
    }

    /// Set the department.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }
}
