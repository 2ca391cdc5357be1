pub mod book;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod loan;
pub mod serialization;
pub mod terms;
pub mod types;
pub mod wallet;

// re-export key types
pub use book::{LendingBook, PaymentReceipt};
pub use config::{LendingConfig, RateSchedule};
pub use decimal::{Money, Rate};
pub use errors::{LendingError, Result};
pub use events::{Event, EventStore};
pub use loan::Loan;
pub use serialization::{LoanView, TransactionView, WalletView};
pub use terms::{LoanTerms, RepaymentSchedule, ScheduledInstallment};
pub use types::{
    LoanApplication, LoanId, LoanStatus, LoanType, TransactionId, TransactionKind, UserId,
};
pub use wallet::{Wallet, WalletTransaction};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
