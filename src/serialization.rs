/// serialization support for the API layer
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::types::{LoanId, LoanStatus, LoanType, TransactionId, TransactionKind, UserId};
use crate::wallet::{Wallet, WalletTransaction};

/// serializable view of a loan
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub user_id: UserId,
    pub loan_type: LoanType,
    pub status: LoanStatus,
    pub principal: Money,
    pub interest_rate: Rate,
    pub monthly_payment: Money,
    pub total_amount: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    pub payment_count: u32,
    pub applied_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub disbursed_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            id: loan.id,
            user_id: loan.user_id,
            loan_type: loan.loan_type,
            status: loan.status,
            principal: loan.principal,
            interest_rate: loan.terms.interest_rate,
            monthly_payment: loan.terms.monthly_payment,
            total_amount: loan.terms.total_amount,
            total_paid: loan.total_paid,
            outstanding: loan.outstanding(),
            payment_count: loan.payment_count,
            applied_at: loan.applied_at,
            decided_at: loan.decided_at,
            disbursed_at: loan.disbursed_at,
            completed_at: loan.completed_at,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// serializable view of a single ledger row
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: TransactionId,
    pub kind: TransactionKind,
    pub amount: Money,
    pub balance_after: Money,
    pub reference: Option<LoanId>,
    pub timestamp: DateTime<Utc>,
}

impl TransactionView {
    pub fn from_transaction(tx: &WalletTransaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind,
            amount: tx.amount,
            balance_after: tx.balance_after,
            reference: tx.reference,
            timestamp: tx.timestamp,
        }
    }
}

/// serializable view of a wallet and its ledger
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletView {
    pub user_id: UserId,
    pub balance: Money,
    pub transaction_count: usize,
    pub created_at: DateTime<Utc>,
    pub transactions: Vec<TransactionView>,
}

impl WalletView {
    pub fn from_wallet(wallet: &Wallet) -> Self {
        Self {
            user_id: wallet.user_id,
            balance: wallet.balance(),
            transaction_count: wallet.transactions().len(),
            created_at: wallet.created_at,
            transactions: wallet
                .transactions()
                .iter()
                .map(TransactionView::from_transaction)
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    use crate::decimal::Rate;
    use crate::terms::LoanTerms;
    use crate::types::LoanApplication;

    #[test]
    fn test_loan_view_json() {
        let user_id = Uuid::new_v4();
        let application =
            LoanApplication::new(user_id, LoanType::Personal, Money::from_major(1_000_000), 12);
        let terms = LoanTerms::compute(application.principal, Rate::from_percentage(3), 12);
        let loan = Loan::open(application, terms, Utc::now());

        let view = LoanView::from_loan(&loan);
        let json = view.to_json_pretty().unwrap();

        assert!(json.contains("\"loan_type\": \"personal\""));
        assert!(json.contains("\"status\": \"pending\""));
        assert!(json.contains("84693.70"));

        let parsed: LoanView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.outstanding, view.outstanding);
    }

    #[test]
    fn test_wallet_view_json() {
        let now = Utc::now();
        let mut wallet = Wallet::new(Uuid::new_v4(), now);
        wallet
            .credit(Money::from_major(10_000), TransactionKind::Deposit, None, now)
            .unwrap();

        let view = WalletView::from_wallet(&wallet);
        let json = view.to_json_pretty().unwrap();

        assert!(json.contains("\"kind\": \"deposit\""));
        assert_eq!(view.transaction_count, 1);

        let parsed: WalletView = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.balance, Money::from_major(10_000));
    }
}
