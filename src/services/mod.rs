pub mod catalog;
pub mod posters;
pub mod recommendations;

pub use catalog::Catalog;
pub use posters::{PosterResolver, PosterSource, TmdbPosterSource};
