//! API request handlers

mod badges;
mod health;
mod redirect;

pub use badges::*;
pub use health::*;
pub use redirect::*;
