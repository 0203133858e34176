use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Permission class assigned to a user. A freshly registered user has
/// no role yet, modeled as `Option<Role>` on [`User`]. Route
/// requirements compare against this with exact-match semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Employee,
    Supervisor,
    Manager,
    Hr,
    Account,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Supervisor => "supervisor",
            Role::Manager => "manager",
            Role::Hr => "hr",
            Role::Account => "account",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "supervisor" => Ok(Role::Supervisor),
            "manager" => Ok(Role::Manager),
            "hr" => Ok(Role::Hr),
            "account" => Ok(Role::Account),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// A reimbursement request. Created by an employee, then moved through
/// the approval chain by approver roles. The client never mutates a
/// claim after submission, it only re-fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub relation: String,
    pub description: String,
    pub amount: f64,
    pub status: ClaimStatus,
    #[serde(default)]
    pub document_path: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// The employee's claims partitioned by status. A derived cache, only
/// refreshed by explicit fetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedClaims {
    #[serde(default)]
    pub pending: Vec<Claim>,
    #[serde(default)]
    pub approved: Vec<Claim>,
    #[serde(default)]
    pub rejected: Vec<Claim>,
}
