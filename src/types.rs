use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::LendingError;

/// unique identifier for a user
pub type UserId = Uuid;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a wallet transaction
pub type TransactionId = Uuid;

/// loan products offered by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// standard interest-bearing consumer loan
    Personal,
    /// zero-interest installment loan against a merchant invoice
    Purchase,
}

impl LoanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanType::Personal => "personal",
            LoanType::Purchase => "purchase",
        }
    }
}

impl fmt::Display for LoanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanType {
    type Err = LendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(LoanType::Personal),
            "purchase" => Ok(LoanType::Purchase),
            other => Err(LendingError::InvalidLoanType {
                requested: other.to_string(),
            }),
        }
    }
}

/// loan lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// application submitted, awaiting admin review
    Pending,
    /// passed review, funds not yet released
    Approved,
    /// declined at review; terminal
    Rejected,
    /// principal credited to the borrower's wallet
    Disbursed,
    /// fully repaid; terminal
    Completed,
}

impl LoanStatus {
    /// legal transitions; approval and disbursement are separate gates
    pub fn can_transition_to(&self, next: LoanStatus) -> bool {
        use LoanStatus::*;
        matches!(
            (self, next),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Disbursed) | (Disbursed, Completed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoanStatus::Rejected | LoanStatus::Completed)
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Disbursed => "disbursed",
            LoanStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// ledger entry kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    LoanDisbursement,
    LoanPayment,
}

impl TransactionKind {
    /// whether this kind increases the wallet balance
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            TransactionKind::Deposit | TransactionKind::LoanDisbursement
        )
    }
}

/// a validated loan application as submitted by the borrower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanApplication {
    pub user_id: UserId,
    pub loan_type: LoanType,
    pub principal: Money,
    pub term_months: u32,
    pub purpose: Option<String>,
    pub declared_monthly_income: Option<Money>,
    pub occupation: Option<String>,
    /// merchant invoice backing a purchase loan; unique across the book
    pub invoice_code: Option<String>,
}

impl LoanApplication {
    pub fn new(user_id: UserId, loan_type: LoanType, principal: Money, term_months: u32) -> Self {
        Self {
            user_id,
            loan_type,
            principal,
            term_months,
            purpose: None,
            declared_monthly_income: None,
            occupation: None,
            invoice_code: None,
        }
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn with_invoice_code(mut self, code: impl Into<String>) -> Self {
        self.invoice_code = Some(code.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_type_parsing() {
        assert_eq!("personal".parse::<LoanType>().unwrap(), LoanType::Personal);
        assert_eq!("purchase".parse::<LoanType>().unwrap(), LoanType::Purchase);

        let err = "payday".parse::<LoanType>().unwrap_err();
        assert!(matches!(err, LendingError::InvalidLoanType { requested } if requested == "payday"));
    }

    #[test]
    fn test_status_machine() {
        use LoanStatus::*;
        assert!(Pending.can_transition_to(Approved));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Approved.can_transition_to(Disbursed));
        assert!(Disbursed.can_transition_to(Completed));

        // no skipping the review gate
        assert!(!Pending.can_transition_to(Disbursed));
        assert!(!Approved.can_transition_to(Completed));
        assert!(!Rejected.can_transition_to(Approved));
        assert!(!Completed.can_transition_to(Disbursed));
    }

    #[test]
    fn test_transaction_direction() {
        assert!(TransactionKind::Deposit.is_credit());
        assert!(TransactionKind::LoanDisbursement.is_credit());
        assert!(!TransactionKind::Withdrawal.is_credit());
        assert!(!TransactionKind::LoanPayment.is_credit());
    }
}
