pub mod platform;

mod engine;
mod error;

#[cfg(test)]
mod tests;

pub use engine::*;
pub use error::*;
