pub mod card;
pub mod library;
pub mod review;

pub use card::{CardSides, Flashcard};
pub use library::{Library, LibraryStats};
pub use review::ReviewLog;
