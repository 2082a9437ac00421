//! Library model and loader.
//!
//! The library is an ordered list of albums, each with an ordered list of
//! songs. It is built once at startup from a JSON description and never
//! mutated afterwards.

mod load;
mod model;

pub use load::{LibraryError, fetch_library, load_library};
pub use model::{Album, Library, Song, SongPos};
