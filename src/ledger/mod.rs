//! Derived list views over the tracked entities and the ledger that owns them.

pub mod criteria;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod view;

pub use criteria::{EntrySort, FilterCriteria, PaymentSort, SortCriteria, ViewScope, ViewScopeName};
pub use ledger::{ExpenseList, IncomeList, Ledger, LoadReport, PaymentList};
pub use view::{DerivedView, Projection};
