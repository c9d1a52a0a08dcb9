pub mod date;
pub mod enumeration;
pub mod gene;
pub mod individual;
pub mod number;
pub mod printing;
pub mod sql;
pub mod string;
pub mod tracker;

pub use date::DateGene;
pub use enumeration::EnumGene;
pub use gene::Gene;
pub use individual::Individual;
pub use number::IntegerGene;
pub use sql::{ForeignKeyBinding, PrimaryKeyValue, SqlForeignKeyGene, SqlPrimaryKeyGene};
pub use string::{StringGene, StringValue};
pub use tracker::{Feedback, IntervalTracker};
