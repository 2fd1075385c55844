use crate::resources::products::Mortgage;

/// A borrower's requirements: how much they want to borrow and the most
/// they will pay in fees, both in whole currency units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourcingRun {
    pub loan_amount: i64,
    /// Zero or less accepts any fee.
    pub max_cost: i64,
}

impl SourcingRun {
    pub fn new(loan_amount: i64, max_cost: i64) -> Self {
        Self { loan_amount, max_cost }
    }

    /// Fee payable on this run's loan amount.
    pub fn fee_cost(&self, mortgage: &Mortgage) -> i64 {
        mortgage.fee.cost(self.loan_amount)
    }

    pub fn matches(&self, mortgage: &Mortgage) -> bool {
        self.max_cost <= 0 || self.fee_cost(mortgage) <= self.max_cost
    }
}
