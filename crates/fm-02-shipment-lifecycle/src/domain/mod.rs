pub mod commands;
pub mod config;
pub mod membership;
pub mod rules;
pub mod transitions;
