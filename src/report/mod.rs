pub mod files;
pub mod leaderboard;

use std::path::PathBuf;

use thiserror::Error;

pub use files::save_ratings;
pub use leaderboard::{last_change_line, progression_report, todays_grid};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error
    }
}
