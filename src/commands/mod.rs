pub mod details;
pub mod favorites;
pub mod misc;
pub mod search;
pub mod watch;

pub use details::show_details;
pub use favorites::{add_favorite, list_favorites, remove_favorite, show_favorite};
pub use misc::generate_completions;
pub use search::search_repos;
pub use watch::watch;

/// Print an error and exit non-zero.
pub fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}
