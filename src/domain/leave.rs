use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::error::DomainError;

/// Leave categories offered by the request form. Only annual leave draws
/// down the balance; the other categories are recorded but leave it
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LeaveType {
    Annual,
    Sick,
    Important,
    Maternity,
    Unpaid,
}

impl LeaveType {
    pub fn as_str(&self) -> &str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Important => "important",
            LeaveType::Maternity => "maternity",
            LeaveType::Unpaid => "unpaid",
        }
    }

    pub fn consumes_balance(&self) -> bool {
        matches!(self, LeaveType::Annual)
    }
}

/// Remaining paid leave days for one user. The ledger below is the only
/// place allowed to compute a new value, and it never goes negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LeaveBalance {
    pub remaining_days: i64,
}

/// Inclusive day count of a leave period: a single-day request counts as 1.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Result<i64, DomainError> {
    if end < start {
        return Err(DomainError::InvalidRange);
    }
    Ok((end - start).num_days() + 1)
}

/// Validates a request against the balance and returns the balance after
/// deduction. All-or-nothing: on any error the caller's balance is exactly
/// what it was.
pub fn request_deduction(
    balance: LeaveBalance,
    leave_type: LeaveType,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<LeaveBalance, DomainError> {
    let days = inclusive_days(start, end)?;

    if !leave_type.consumes_balance() {
        return Ok(balance);
    }

    if days > balance.remaining_days {
        return Err(DomainError::InsufficientBalance);
    }

    Ok(LeaveBalance {
        remaining_days: balance.remaining_days - days,
    })
}
