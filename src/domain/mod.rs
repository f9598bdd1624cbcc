pub mod budget;
pub mod codec;
pub mod common;
pub mod expense;
pub mod income;
pub mod payment;

pub use budget::Budget;
pub use codec::{decode_list, encode_list, EntityKind, StorageCodec};
pub use common::{Displayable, Entry};
pub use expense::Expense;
pub use income::Income;
pub use payment::{Payment, Priority};
