use std::fs;
use std::path::Path;

use ignore::WalkBuilder;

use crate::error::InstallError;

/// Recreates the tree under `src` at `dst`, hidden and VCS files included.
pub fn mirror(src: &Path, dst: &Path) -> Result<(), InstallError> {
    fs::create_dir_all(dst)?;

    for entry in WalkBuilder::new(src).standard_filters(false).build() {
        let entry = entry?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        if relative.as_os_str().is_empty() {
            continue;
        }

        let target = dst.join(relative);
        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), InstallError> {
    let link = fs::read_link(src)?;
    std::os::unix::fs::symlink(link, dst)?;
    Ok(())
}

#[cfg(not(unix))]
fn copy_symlink(src: &Path, dst: &Path) -> Result<(), InstallError> {
    if src.is_dir() {
        return mirror(src, dst);
    }
    fs::copy(src, dst)?;
    Ok(())
}
