pub mod explanation;
pub mod preferences;
pub mod recommendations;
pub mod weather;
