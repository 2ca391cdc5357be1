use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, LoanStatus};

#[derive(Error, Debug)]
pub enum LendingError {
    #[error("invalid loan type: {requested}")]
    InvalidLoanType {
        requested: String,
    },

    #[error("invalid amount: {amount}")]
    InvalidAmount {
        amount: Money,
    },

    #[error("insufficient funds: available {available}, requested {requested}")]
    InsufficientFunds {
        available: Money,
        requested: Money,
    },

    #[error("principal out of bounds: must be between {minimum} and {maximum}, requested {requested}")]
    PrincipalOutOfBounds {
        minimum: Money,
        maximum: Money,
        requested: Money,
    },

    #[error("term out of bounds: must be between {minimum} and {maximum} months, requested {requested}")]
    TermOutOfBounds {
        minimum: u32,
        maximum: u32,
        requested: u32,
    },

    #[error("invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: LoanStatus,
        to: LoanStatus,
    },

    #[error("loan not found: {id}")]
    LoanNotFound {
        id: LoanId,
    },

    #[error("loan not payable: current status is {status}")]
    LoanNotPayable {
        status: LoanStatus,
    },

    #[error("loan {loan_id} does not belong to the requesting user")]
    NotLoanOwner {
        loan_id: LoanId,
    },

    #[error("invoice code already used: {code}")]
    DuplicateInvoiceCode {
        code: String,
    },

    #[error("payment exceeds loan balance: outstanding {outstanding}, requested {requested}")]
    PaymentExceedsBalance {
        outstanding: Money,
        requested: Money,
    },
}

pub type Result<T> = std::result::Result<T, LendingError>;
