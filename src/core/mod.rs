pub mod clock;
pub mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
