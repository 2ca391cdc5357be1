use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::{LoanId, LoanType, UserId};

/// all events emitted by the lending book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // loan lifecycle
    LoanApplied {
        loan_id: LoanId,
        user_id: UserId,
        loan_type: LoanType,
        principal: Money,
        monthly_payment: Money,
        total_amount: Money,
        timestamp: DateTime<Utc>,
    },
    LoanApproved {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanRejected {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },
    LoanDisbursed {
        loan_id: LoanId,
        user_id: UserId,
        amount: Money,
        wallet_balance: Money,
        timestamp: DateTime<Utc>,
    },
    LoanPaymentReceived {
        loan_id: LoanId,
        user_id: UserId,
        amount: Money,
        outstanding: Money,
        timestamp: DateTime<Utc>,
    },
    LoanSettled {
        loan_id: LoanId,
        timestamp: DateTime<Utc>,
    },

    // wallet
    WalletOpened {
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },
    FundsDeposited {
        user_id: UserId,
        amount: Money,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    },
    FundsWithdrawn {
        user_id: UserId,
        amount: Money,
        balance_after: Money,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_take_drains_store() {
        let mut store = EventStore::new();
        store.emit(Event::WalletOpened {
            user_id: Uuid::new_v4(),
            timestamp: Utc::now(),
        });

        assert_eq!(store.events().len(), 1);
        let drained = store.take_events();
        assert_eq!(drained.len(), 1);
        assert!(store.events().is_empty());
    }
}
