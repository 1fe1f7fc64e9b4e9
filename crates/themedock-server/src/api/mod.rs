pub mod public;
pub mod themes;
