pub mod driver;
pub mod session;


pub use driver::run_import;
pub use session::{Diagnostic, ImportSession, ImportSummary, RowOutcome};
