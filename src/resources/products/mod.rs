//! Product records and their accessors, grouped by product family.
//!
//! Obtain a [`ProductsService`] from [`Client::products`]. It shares the
//! client's transport, auth provider and error sink.

mod bank_account;
mod loan;
mod mortgage;

pub use bank_account::{BankAccount, ListBankAccountsResponse, NewBankAccountRequest};
pub use loan::{ListLoansResponse, Loan, NewLoanRequest};
pub use mortgage::{ListMortgagesResponse, Mortgage, MortgageProductFilters, NewMortgageRequest};

use crate::http::{Client, QueryValue, ToQuery};

/// Accessors for every product family.
#[derive(Clone)]
pub struct ProductsService {
    client: Client,
}

impl Client {
    pub fn products(&self) -> ProductsService {
        ProductsService { client: self.clone() }
    }
}

/// Filters accepted by the bank account and loan listings. The service
/// defines none yet, so listing returns every product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProductFilters {}

impl ToQuery for ProductFilters {
    fn to_query(&self) -> Vec<(&'static str, QueryValue)> {
        Vec::new()
    }
}
