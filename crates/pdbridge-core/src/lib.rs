pub mod breakpoints;
pub mod commands;
pub mod console;
pub mod errors;
pub mod events;
pub mod history;
pub mod kernel;
pub mod prompt;
