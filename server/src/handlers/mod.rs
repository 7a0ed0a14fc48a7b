//! Request handlers for the content endpoints.

mod books;
mod courses;
mod decks;
mod reload;
mod search;

pub use books::*;
pub use courses::*;
pub use decks::*;
pub use reload::*;
pub use search::*;
