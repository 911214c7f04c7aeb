mod hours;
mod ledger;
mod student;

pub use hours::*;
pub use ledger::*;
pub use student::*;
