use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LendingConfig;
use crate::decimal::{Money, Rate};
use crate::types::LoanType;

/// priced terms for a loan application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub interest_rate: Rate,
    pub monthly_payment: Money,
    pub total_amount: Money,
}

impl LoanTerms {
    /// price a loan from raw inputs
    ///
    /// Bounds on principal and term are the caller's responsibility; this is
    /// a pure calculation. The total is derived from the rounded monthly
    /// payment, so it may drift by a few minor units from an exact
    /// amortization schedule.
    pub fn compute(principal: Money, interest_rate: Rate, term_months: u32) -> Self {
        let monthly_payment = if interest_rate.is_zero() {
            // even split of principal across the term
            principal / Decimal::from(term_months)
        } else {
            emi_payment(principal, interest_rate, term_months)
        };

        let total_amount = monthly_payment * Decimal::from(term_months);

        Self {
            interest_rate,
            monthly_payment,
            total_amount,
        }
    }

    /// price a loan using the configured rate schedule
    pub fn quote(
        config: &LendingConfig,
        loan_type: LoanType,
        principal: Money,
        term_months: u32,
    ) -> Self {
        Self::compute(principal, config.rate_for(loan_type), term_months)
    }

    /// interest cost over the life of the loan
    pub fn total_interest(&self, principal: Money) -> Money {
        (self.total_amount - principal).max(Money::ZERO)
    }
}

/// equal monthly installment: P * r * (1+r)^n / ((1+r)^n - 1)
fn emi_payment(principal: Money, annual_rate: Rate, term_months: u32) -> Money {
    let r = annual_rate.monthly_rate();

    let mut compound = Decimal::ONE;
    let base = Decimal::ONE + r;
    for _ in 0..term_months {
        compound *= base;
    }

    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}

/// one row of a repayment schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub installment_number: u32,
    pub beginning_balance: Money,
    pub payment_amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub ending_balance: Money,
}

/// full month-by-month repayment schedule for a priced loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepaymentSchedule {
    pub principal: Money,
    pub interest_rate: Rate,
    pub term_months: u32,
    pub installments: Vec<ScheduledInstallment>,
    pub total_interest: Money,
    pub total_payment: Money,
}

impl RepaymentSchedule {
    /// expand priced terms into per-month installments
    pub fn generate(principal: Money, terms: &LoanTerms, term_months: u32) -> Self {
        let monthly_rate = terms.interest_rate.monthly_rate();
        let payment = terms.monthly_payment;

        let mut installments = Vec::with_capacity(term_months as usize);
        let mut balance = principal;

        for i in 1..=term_months {
            let interest_portion = Money::from_decimal(balance.as_decimal() * monthly_rate);
            let mut principal_portion = payment - interest_portion;
            let mut payment_amount = payment;

            // final installment clears residual rounding drift
            if i == term_months {
                principal_portion = balance;
                payment_amount = principal_portion + interest_portion;
            }

            let ending_balance = (balance - principal_portion).max(Money::ZERO);

            installments.push(ScheduledInstallment {
                installment_number: i,
                beginning_balance: balance,
                payment_amount,
                principal_portion,
                interest_portion,
                ending_balance,
            });

            balance = ending_balance;
        }

        let total_interest = installments.iter().map(|p| p.interest_portion).sum();
        let total_payment = installments.iter().map(|p| p.payment_amount).sum();

        Self {
            principal,
            interest_rate: terms.interest_rate,
            term_months,
            installments,
            total_interest,
            total_payment,
        }
    }
}
