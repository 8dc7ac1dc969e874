//! Level-payment loan with an interest-only grace period.

use serde::Serialize;

/// Debt service for one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DebtService {
    pub interest: f64,
    pub principal: f64,
    /// `interest + principal`.
    pub payment: f64,
    /// Balance left after this year's payment.
    pub remaining: f64,
}

/// Annuity payment for `principal` at periodic `rate` over `periods`.
///
/// A zero rate falls back to straight-line principal division.
pub fn annuity_payment(principal: f64, rate: f64, periods: u32) -> f64 {
    let n = f64::from(periods.max(1));
    if rate == 0.0 {
        principal / n
    } else {
        principal * rate / (1.0 - (1.0 + rate).powf(-n))
    }
}

/// Amortization state of a loan, advanced one year at a time.
#[derive(Debug, Clone)]
pub struct Loan {
    /// Annual interest rate as a fraction.
    rate: f64,
    term: u32,
    grace: u32,
    payment: f64,
    balance: f64,
}

impl Loan {
    /// Creates a loan. `rate_pct` is the annual interest rate in percent.
    pub fn new(principal: f64, rate_pct: f64, term: u32, grace: u32) -> Self {
        let rate = rate_pct / 100.0;
        let payment = annuity_payment(principal, rate, term.saturating_sub(grace));
        tracing::debug!(principal, rate, term, grace, payment, "loan amortization");
        Self {
            rate,
            term,
            grace,
            payment,
            balance: principal.max(0.0),
        }
    }

    /// Level payment after the grace period.
    pub fn payment(&self) -> f64 {
        self.payment
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    /// Services the loan for `year` (1-based) and returns the split.
    ///
    /// During the grace period only interest is paid. Afterwards the level
    /// payment is split into interest and principal, and the final payment
    /// is clamped so it never overpays the balance. Balances below one
    /// currency unit are written off.
    pub fn service(&mut self, year: u32) -> DebtService {
        if self.balance <= 0.0 || year > self.term {
            return DebtService {
                remaining: self.balance,
                ..DebtService::default()
            };
        }

        let interest = self.balance * self.rate;
        let principal = if year <= self.grace {
            0.0
        } else {
            let mut payment = self.payment;
            if self.balance + interest < payment + 1.0 {
                payment = self.balance + interest;
            }
            payment - interest
        };

        self.balance -= principal;
        if self.balance < 1.0 {
            self.balance = 0.0;
        }

        DebtService {
            interest,
            principal,
            payment: interest + principal,
            remaining: self.balance,
        }
    }
}
