use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::types::{LoanId, TransactionId, TransactionKind, UserId};

/// immutable ledger entry
///
/// `amount` is signed: positive for credits, negative for debits. The sum of
/// signed amounts over a wallet's ledger always equals its stored balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub balance_after: Money,
    /// originating loan for disbursements and loan payments
    pub reference: Option<LoanId>,
    pub timestamp: DateTime<Utc>,
}

/// per-user cash wallet backed by an append-only ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: UserId,
    balance: Money,
    transactions: Vec<WalletTransaction>,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            balance: Money::ZERO,
            transactions: Vec::new(),
            created_at: now,
        }
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn transactions(&self) -> &[WalletTransaction] {
        &self.transactions
    }

    /// increase the balance and append the matching ledger row
    pub fn credit(
        &mut self,
        amount: Money,
        kind: TransactionKind,
        reference: Option<LoanId>,
        now: DateTime<Utc>,
    ) -> Result<WalletTransaction> {
        debug_assert!(kind.is_credit());

        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }

        Ok(self.post(amount, kind, reference, now))
    }

    /// decrease the balance and append the matching ledger row
    ///
    /// Sufficiency is checked before any mutation: a failed debit leaves the
    /// balance untouched and appends nothing.
    pub fn debit(
        &mut self,
        amount: Money,
        kind: TransactionKind,
        reference: Option<LoanId>,
        now: DateTime<Utc>,
    ) -> Result<WalletTransaction> {
        debug_assert!(!kind.is_credit());

        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }
        if amount > self.balance {
            return Err(LendingError::InsufficientFunds {
                available: self.balance,
                requested: amount,
            });
        }

        Ok(self.post(-amount, kind, reference, now))
    }

    /// balance mutation and ledger append as one step; callers validate first
    fn post(
        &mut self,
        signed_amount: Money,
        kind: TransactionKind,
        reference: Option<LoanId>,
        now: DateTime<Utc>,
    ) -> WalletTransaction {
        self.balance += signed_amount;
        let tx = WalletTransaction {
            id: Uuid::new_v4(),
            kind,
            amount: signed_amount,
            balance_after: self.balance,
            reference,
            timestamp: now,
        };
        self.transactions.push(tx.clone());
        tx
    }

    /// signed sum of every ledger row
    pub fn ledger_sum(&self) -> Money {
        self.transactions.iter().map(|t| t.amount).sum()
    }

    /// audit invariant: ledger replays to the stored balance, the last row's
    /// snapshot matches it, and the balance never went negative
    pub fn reconciles(&self) -> bool {
        let mut running = Money::ZERO;
        for tx in &self.transactions {
            running += tx.amount;
            if running.is_negative() || tx.balance_after != running {
                return false;
            }
        }
        running == self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallet() -> Wallet {
        Wallet::new(Uuid::new_v4(), Utc::now())
    }

    #[test]
    fn test_credit_appends_and_snapshots() {
        let now = Utc::now();
        let mut w = wallet();

        let tx = w
            .credit(Money::from_major(10_000), TransactionKind::Deposit, None, now)
            .unwrap();
        assert_eq!(tx.amount, Money::from_major(10_000));
        assert_eq!(tx.balance_after, Money::from_major(10_000));

        assert_eq!(w.balance(), Money::from_major(10_000));
        assert_eq!(w.transactions().len(), 1);
        assert!(w.reconciles());
    }

    #[test]
    fn test_debit_decreases_balance() {
        let now = Utc::now();
        let mut w = wallet();
        w.credit(Money::from_major(10_000), TransactionKind::Deposit, None, now)
            .unwrap();

        let tx = w
            .debit(Money::from_major(4_000), TransactionKind::Withdrawal, None, now)
            .unwrap();
        assert_eq!(tx.amount, Money::from_major(-4_000));
        assert_eq!(tx.balance_after, Money::from_major(6_000));
        assert_eq!(w.balance(), Money::from_major(6_000));
        assert!(w.reconciles());
    }

    #[test]
    fn test_insufficient_funds_leaves_no_trace() {
        let now = Utc::now();
        let mut w = wallet();
        w.credit(Money::from_major(10_000), TransactionKind::Deposit, None, now)
            .unwrap();

        let err = w
            .debit(Money::from_major(15_000), TransactionKind::Withdrawal, None, now)
            .unwrap_err();
        assert!(matches!(
            err,
            LendingError::InsufficientFunds { available, requested }
                if available == Money::from_major(10_000) && requested == Money::from_major(15_000)
        ));

        // no row appended, balance unchanged
        assert_eq!(w.balance(), Money::from_major(10_000));
        assert_eq!(w.transactions().len(), 1);
        assert!(w.reconciles());
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let now = Utc::now();
        let mut w = wallet();

        assert!(w.credit(Money::ZERO, TransactionKind::Deposit, None, now).is_err());
        assert!(w
            .credit(Money::from_major(-100), TransactionKind::Deposit, None, now)
            .is_err());
        assert!(w.debit(Money::ZERO, TransactionKind::Withdrawal, None, now).is_err());
        assert!(w.transactions().is_empty());
    }

    #[test]
    fn test_ledger_replays_to_balance() {
        let now = Utc::now();
        let mut w = wallet();

        w.credit(Money::from_major(5_000), TransactionKind::Deposit, None, now)
            .unwrap();
        w.credit(Money::from_minor(2_550_25), TransactionKind::LoanDisbursement, Some(Uuid::new_v4()), now)
            .unwrap();
        w.debit(Money::from_major(3_000), TransactionKind::Withdrawal, None, now)
            .unwrap();
        w.debit(Money::from_minor(1_200_75), TransactionKind::LoanPayment, Some(Uuid::new_v4()), now)
            .unwrap();

        assert_eq!(w.ledger_sum(), w.balance());
        assert!(w.reconciles());
        assert_eq!(
            w.transactions().last().unwrap().balance_after,
            w.balance()
        );
    }

    #[test]
    fn test_exact_balance_debit_allowed() {
        let now = Utc::now();
        let mut w = wallet();
        w.credit(Money::from_major(500), TransactionKind::Deposit, None, now)
            .unwrap();

        w.debit(Money::from_major(500), TransactionKind::Withdrawal, None, now)
            .unwrap();
        assert_eq!(w.balance(), Money::ZERO);
        assert!(w.reconciles());
    }
}
