//! Core data types for the price ticker bot.

pub mod exchange;
pub mod market;
pub mod price;

pub use exchange::*;
pub use market::*;
pub use price::*;
