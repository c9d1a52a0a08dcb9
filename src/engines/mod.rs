pub mod genes;
pub mod search;
