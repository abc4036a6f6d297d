//! Slug keys and the clock

mod clock;
mod slug;

pub use clock::{Clock, FixedClock, SystemClock};
pub use slug::page_key;
