use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LendingError, Result};
use crate::types::LoanType;

/// annual interest rate per loan product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSchedule {
    pub personal: Rate,
    pub purchase: Rate,
}

impl RateSchedule {
    pub fn rate_for(&self, loan_type: LoanType) -> Rate {
        match loan_type {
            LoanType::Personal => self.personal,
            LoanType::Purchase => self.purchase,
        }
    }
}

impl Default for RateSchedule {
    fn default() -> Self {
        Self {
            personal: Rate::from_percentage(3),
            purchase: Rate::ZERO,
        }
    }
}

/// lending policy: rate schedule plus application bounds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LendingConfig {
    pub rates: RateSchedule,
    pub min_principal: Money,
    pub max_principal: Money,
    pub min_term_months: u32,
    pub max_term_months: u32,
}

impl Default for LendingConfig {
    fn default() -> Self {
        Self {
            rates: RateSchedule::default(),
            min_principal: Money::from_major(100_000),
            max_principal: Money::from_major(10_000_000),
            min_term_months: 1,
            max_term_months: 60,
        }
    }
}

impl LendingConfig {
    pub fn rate_for(&self, loan_type: LoanType) -> Rate {
        self.rates.rate_for(loan_type)
    }

    /// validate principal and term against policy bounds
    pub fn validate_application(&self, principal: Money, term_months: u32) -> Result<()> {
        if principal < self.min_principal || principal > self.max_principal {
            return Err(LendingError::PrincipalOutOfBounds {
                minimum: self.min_principal,
                maximum: self.max_principal,
                requested: principal,
            });
        }

        if term_months < self.min_term_months || term_months > self.max_term_months {
            return Err(LendingError::TermOutOfBounds {
                minimum: self.min_term_months,
                maximum: self.max_term_months,
                requested: term_months,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_schedule() {
        let config = LendingConfig::default();
        assert_eq!(config.rate_for(LoanType::Personal), Rate::from_percentage(3));
        assert!(config.rate_for(LoanType::Purchase).is_zero());
    }

    #[test]
    fn test_application_bounds() {
        let config = LendingConfig::default();

        assert!(config.validate_application(Money::from_major(100_000), 1).is_ok());
        assert!(config.validate_application(Money::from_major(10_000_000), 60).is_ok());

        let err = config
            .validate_application(Money::from_major(99_999), 12)
            .unwrap_err();
        assert!(matches!(err, LendingError::PrincipalOutOfBounds { .. }));

        let err = config
            .validate_application(Money::from_major(500_000), 61)
            .unwrap_err();
        assert!(matches!(err, LendingError::TermOutOfBounds { .. }));

        let err = config
            .validate_application(Money::from_major(500_000), 0)
            .unwrap_err();
        assert!(matches!(err, LendingError::TermOutOfBounds { .. }));
    }
}
