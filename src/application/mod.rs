pub mod assemble;
pub mod error;
pub mod registry;
pub mod render;
pub mod runner;
