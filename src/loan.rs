use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::terms::LoanTerms;
use crate::types::{LoanApplication, LoanId, LoanStatus, LoanType, UserId};

/// a consumer loan and its repayment state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub user_id: UserId,
    pub loan_type: LoanType,
    pub principal: Money,
    pub terms: LoanTerms,

    // application metadata
    pub purpose: Option<String>,
    pub declared_monthly_income: Option<Money>,
    pub occupation: Option<String>,
    pub invoice_code: Option<String>,

    // lifecycle
    pub status: LoanStatus,
    pub applied_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub disbursed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    // repayment tracking
    pub total_paid: Money,
    pub payment_count: u32,
    pub last_payment_amount: Option<Money>,
    pub last_payment_date: Option<DateTime<Utc>>,
}

impl Loan {
    /// open a loan from a priced application; starts in Pending
    pub fn open(application: LoanApplication, terms: LoanTerms, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: application.user_id,
            loan_type: application.loan_type,
            principal: application.principal,
            terms,
            purpose: application.purpose,
            declared_monthly_income: application.declared_monthly_income,
            occupation: application.occupation,
            invoice_code: application.invoice_code,
            status: LoanStatus::Pending,
            applied_at: now,
            decided_at: None,
            disbursed_at: None,
            completed_at: None,
            total_paid: Money::ZERO,
            payment_count: 0,
            last_payment_amount: None,
            last_payment_date: None,
        }
    }

    /// amount still owed against the interest-inclusive total
    pub fn outstanding(&self) -> Money {
        (self.terms.total_amount - self.total_paid).max(Money::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.status == LoanStatus::Completed
    }

    fn transition(&mut self, next: LoanStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(LendingError::InvalidStatusTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// pass admin review
    pub fn approve(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(LoanStatus::Approved)?;
        self.decided_at = Some(now);
        Ok(())
    }

    /// decline at admin review
    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(LoanStatus::Rejected)?;
        self.decided_at = Some(now);
        Ok(())
    }

    /// record that the principal has been credited to the borrower's wallet
    pub fn mark_disbursed(&mut self, now: DateTime<Utc>) -> Result<()> {
        self.transition(LoanStatus::Disbursed)?;
        self.disbursed_at = Some(now);
        Ok(())
    }

    /// apply a repayment; settles the loan once the total is covered
    ///
    /// Callers must validate the amount against `outstanding()` before the
    /// paired wallet debit so the two mutations cannot diverge.
    pub fn record_payment(&mut self, amount: Money, now: DateTime<Utc>) -> Result<()> {
        if self.status != LoanStatus::Disbursed {
            return Err(LendingError::LoanNotPayable {
                status: self.status,
            });
        }
        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }
        if amount > self.outstanding() {
            return Err(LendingError::PaymentExceedsBalance {
                outstanding: self.outstanding(),
                requested: amount,
            });
        }

        self.total_paid += amount;
        self.payment_count += 1;
        self.last_payment_amount = Some(amount);
        self.last_payment_date = Some(now);

        if self.outstanding().is_zero() {
            self.transition(LoanStatus::Completed)?;
            self.completed_at = Some(now);
        }

        Ok(())
    }
}
