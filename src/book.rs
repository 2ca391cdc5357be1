use std::collections::HashMap;

use hourglass_rs::SafeTimeProvider;

use crate::config::LendingConfig;
use crate::decimal::Money;
use crate::errors::{LendingError, Result};
use crate::events::{Event, EventStore};
use crate::loan::Loan;
use crate::terms::LoanTerms;
use crate::types::{LoanApplication, LoanId, LoanStatus, TransactionKind, UserId};
use crate::wallet::{Wallet, WalletTransaction};

/// receipt for a wallet-funded loan payment
#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub transaction: WalletTransaction,
    pub loan_outstanding: Money,
    pub loan_settled: bool,
}

/// the loan book: every wallet and loan, plus the policy that governs them
///
/// All mutating operations take `&mut self`, so concurrent callers are
/// serialized by the exclusive borrow. Each operation validates fully before
/// mutating; a returned error means no state changed.
pub struct LendingBook {
    config: LendingConfig,
    wallets: HashMap<UserId, Wallet>,
    loans: HashMap<LoanId, Loan>,
    pub events: EventStore,
}

impl LendingBook {
    pub fn new(config: LendingConfig) -> Self {
        Self {
            config,
            wallets: HashMap::new(),
            loans: HashMap::new(),
            events: EventStore::new(),
        }
    }

    pub fn config(&self) -> &LendingConfig {
        &self.config
    }

    /// price an application without persisting anything
    pub fn quote(&self, application: &LoanApplication) -> Result<LoanTerms> {
        self.config
            .validate_application(application.principal, application.term_months)?;
        Ok(LoanTerms::quote(
            &self.config,
            application.loan_type,
            application.principal,
            application.term_months,
        ))
    }

    /// submit a loan application; the loan starts in Pending
    pub fn apply_for_loan(
        &mut self,
        application: LoanApplication,
        time: &SafeTimeProvider,
    ) -> Result<LoanId> {
        let terms = self.quote(&application)?;

        if let Some(code) = &application.invoice_code {
            let taken = self
                .loans
                .values()
                .any(|l| l.invoice_code.as_deref() == Some(code.as_str()));
            if taken {
                return Err(LendingError::DuplicateInvoiceCode { code: code.clone() });
            }
        }

        let loan = Loan::open(application, terms, time.now());
        let loan_id = loan.id;

        self.events.emit(Event::LoanApplied {
            loan_id,
            user_id: loan.user_id,
            loan_type: loan.loan_type,
            principal: loan.principal,
            monthly_payment: loan.terms.monthly_payment,
            total_amount: loan.terms.total_amount,
            timestamp: loan.applied_at,
        });

        self.loans.insert(loan_id, loan);
        Ok(loan_id)
    }

    /// admin review: approve a pending loan
    pub fn approve_loan(&mut self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<()> {
        let now = time.now();
        let loan = self.loan_mut(loan_id)?;
        loan.approve(now)?;

        self.events.emit(Event::LoanApproved {
            loan_id,
            timestamp: now,
        });
        Ok(())
    }

    /// admin review: reject a pending loan
    pub fn reject_loan(&mut self, loan_id: LoanId, time: &SafeTimeProvider) -> Result<()> {
        let now = time.now();
        let loan = self.loan_mut(loan_id)?;
        loan.reject(now)?;

        self.events.emit(Event::LoanRejected {
            loan_id,
            timestamp: now,
        });
        Ok(())
    }

    /// release an approved loan's principal into the borrower's wallet
    ///
    /// The wallet credit and the status transition form one all-or-nothing
    /// step: the transition is validated before the credit, and the credit
    /// cannot fail once validation has passed.
    pub fn disburse_loan(
        &mut self,
        loan_id: LoanId,
        time: &SafeTimeProvider,
    ) -> Result<WalletTransaction> {
        let now = time.now();

        let (user_id, principal) = {
            let loan = self.loan_ref(loan_id)?;
            if loan.status != LoanStatus::Approved {
                return Err(LendingError::InvalidStatusTransition {
                    from: loan.status,
                    to: LoanStatus::Disbursed,
                });
            }
            (loan.user_id, loan.principal)
        };

        let opened = !self.wallets.contains_key(&user_id);
        let wallet = self
            .wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id, now));
        let tx = wallet.credit(principal, TransactionKind::LoanDisbursement, Some(loan_id), now)?;
        let balance = wallet.balance();

        self.loan_mut(loan_id)?.mark_disbursed(now)?;

        if opened {
            self.events.emit(Event::WalletOpened {
                user_id,
                timestamp: now,
            });
        }
        self.events.emit(Event::LoanDisbursed {
            loan_id,
            user_id,
            amount: principal,
            wallet_balance: balance,
            timestamp: now,
        });

        Ok(tx)
    }

    /// credit external funds into a user's wallet, creating it on first use
    pub fn deposit(
        &mut self,
        user_id: UserId,
        amount: Money,
        time: &SafeTimeProvider,
    ) -> Result<WalletTransaction> {
        let now = time.now();
        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }

        let opened = !self.wallets.contains_key(&user_id);
        let wallet = self
            .wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id, now));
        let tx = wallet.credit(amount, TransactionKind::Deposit, None, now)?;
        let balance = wallet.balance();

        if opened {
            self.events.emit(Event::WalletOpened {
                user_id,
                timestamp: now,
            });
        }
        self.events.emit(Event::FundsDeposited {
            user_id,
            amount,
            balance_after: balance,
            timestamp: now,
        });

        Ok(tx)
    }

    /// debit funds out of a user's wallet
    pub fn withdraw(
        &mut self,
        user_id: UserId,
        amount: Money,
        time: &SafeTimeProvider,
    ) -> Result<WalletTransaction> {
        let now = time.now();
        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }

        // missing wallets self-heal as empty; the debit then reports the
        // real problem (insufficient funds) instead of a lookup error
        let wallet = self
            .wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id, now));
        let tx = wallet.debit(amount, TransactionKind::Withdrawal, None, now)?;
        let balance = wallet.balance();

        self.events.emit(Event::FundsWithdrawn {
            user_id,
            amount,
            balance_after: balance,
            timestamp: now,
        });

        Ok(tx)
    }

    /// repay a disbursed loan from the borrower's wallet
    ///
    /// Loan checks run before the wallet debit; once the debit succeeds the
    /// loan update cannot fail, so the pair is all-or-nothing.
    pub fn pay_loan_from_wallet(
        &mut self,
        user_id: UserId,
        loan_id: LoanId,
        amount: Money,
        time: &SafeTimeProvider,
    ) -> Result<PaymentReceipt> {
        let now = time.now();

        if !amount.is_positive() {
            return Err(LendingError::InvalidAmount { amount });
        }

        {
            let loan = self.loan_ref(loan_id)?;
            if loan.user_id != user_id {
                return Err(LendingError::NotLoanOwner { loan_id });
            }
            if loan.status != LoanStatus::Disbursed {
                return Err(LendingError::LoanNotPayable {
                    status: loan.status,
                });
            }
            if amount > loan.outstanding() {
                return Err(LendingError::PaymentExceedsBalance {
                    outstanding: loan.outstanding(),
                    requested: amount,
                });
            }
        }

        let wallet = self
            .wallets
            .entry(user_id)
            .or_insert_with(|| Wallet::new(user_id, now));
        let tx = wallet.debit(amount, TransactionKind::LoanPayment, Some(loan_id), now)?;

        let loan = self.loan_mut(loan_id)?;
        loan.record_payment(amount, now)?;
        let outstanding = loan.outstanding();
        let settled = loan.is_settled();

        self.events.emit(Event::LoanPaymentReceived {
            loan_id,
            user_id,
            amount,
            outstanding,
            timestamp: now,
        });
        if settled {
            self.events.emit(Event::LoanSettled {
                loan_id,
                timestamp: now,
            });
        }

        Ok(PaymentReceipt {
            transaction: tx,
            loan_outstanding: outstanding,
            loan_settled: settled,
        })
    }

    pub fn wallet(&self, user_id: UserId) -> Option<&Wallet> {
        self.wallets.get(&user_id)
    }

    /// current balance; zero for users without a wallet yet
    pub fn balance_of(&self, user_id: UserId) -> Money {
        self.wallets
            .get(&user_id)
            .map(|w| w.balance())
            .unwrap_or(Money::ZERO)
    }

    pub fn loan(&self, loan_id: LoanId) -> Option<&Loan> {
        self.loans.get(&loan_id)
    }

    pub fn loans_of_user(&self, user_id: UserId) -> Vec<&Loan> {
        self.loans.values().filter(|l| l.user_id == user_id).collect()
    }

    fn loan_ref(&self, loan_id: LoanId) -> Result<&Loan> {
        self.loans
            .get(&loan_id)
            .ok_or(LendingError::LoanNotFound { id: loan_id })
    }

    fn loan_mut(&mut self, loan_id: LoanId) -> Result<&mut Loan> {
        self.loans
            .get_mut(&loan_id)
            .ok_or(LendingError::LoanNotFound { id: loan_id })
    }
}
