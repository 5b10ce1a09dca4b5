//! Plain data types shared by the actors, the stores and the workflow.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::*;
pub use order::*;
pub use product::*;
