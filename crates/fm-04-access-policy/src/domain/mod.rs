pub mod access;
pub mod caller;
pub mod commands;
pub mod errors;
