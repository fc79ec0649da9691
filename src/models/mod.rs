pub mod mode;
pub mod reading;
pub mod record;
pub mod session;

pub use mode::{Mode, ModeDurations};
pub use reading::{Reading, MARKED_TIME_FORMAT, OFF_MODE};
pub use record::{RecordError, StoredRecord};
pub use session::{format_hms, round_one_decimal, Session};
