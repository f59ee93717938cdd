pub mod mode;
pub mod table;

pub use mode::ProcessingMode;
pub use table::{MergeError, Table, SOURCE_COLUMN};
