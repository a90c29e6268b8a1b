pub mod cli;
pub mod error;
pub mod form;
pub mod render;
pub mod script;
pub mod session;
pub mod types;
pub mod utils;
