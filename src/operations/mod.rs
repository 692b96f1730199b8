//! Image operation implementations
//!
//! Each subcommand maps to one `ImageOperation` and the list of files it runs
//! over.

pub mod divider;
pub mod split;
pub mod trim;

use crate::batch;
use crate::config::Task;
use crate::error::GutterError;
use crate::operation::ImageOperation;
use std::path::PathBuf;

/// Build the operation for `task` and collect the files it should process
pub fn for_task(task: &Task) -> Result<(Box<dyn ImageOperation>, Vec<PathBuf>), GutterError> {
    match task {
        Task::Split(config) => {
            tracing::info!("Initializing split operation...");
            let files = batch::discover(&config.source_dir, &config.pattern)?;
            Ok((Box::new(split::Splitter::new(config)), files))
        }
        Task::Trim(config) => {
            tracing::info!("Initializing trim operation...");
            let files = batch::discover(&config.dir, &config.pattern)?;
            Ok((Box::new(trim::BorderTrimmer::new(config)), files))
        }
        Task::CropDivider(config) => {
            tracing::info!("Initializing crop-divider operation...");
            Ok((
                Box::new(divider::DividerCrop::new(config)),
                vec![config.file.clone()],
            ))
        }
    }
}
