use std::{
    fs::{create_dir_all, remove_dir_all},
    path::Path,
};

use anyhow::{Context, Result};

/// Make sure the build directory exists, emptying it unless `keep` is set.
pub fn prepare_build_dir(build_dir: &Path, keep: bool) -> Result<()> {
    if build_dir.exists() && !keep {
        remove_dir_all(build_dir)
            .with_context(|| format!("Failed to remove {}", build_dir.display()))?;
        println!("Removed {}", build_dir.display());
    }
    create_dir_all(build_dir)
        .with_context(|| format!("Failed to create directory: {}", build_dir.display()))
}
