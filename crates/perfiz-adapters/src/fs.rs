//! Filesystem staging: templates, simulations and small config files.

use perfiz_domain::{is_simulation, is_stale_simulation};
use perfiz_error::PerfizError;
use perfiz_types::SIMULATION_EXTENSION;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staged {
    Copied,
    AlreadyPresent,
}

pub fn is_dir(path: &Path) -> bool {
    path.is_dir()
}

/// Copy `source` to `target` unless `guard` already exists. Never overwrites.
pub fn copy_if_missing(source: &Path, target: &Path, guard: &Path) -> Result<Staged, PerfizError> {
    if guard.exists() {
        return Ok(Staged::AlreadyPresent);
    }
    copy_file(source, target)?;
    Ok(Staged::Copied)
}

/// Copy a single file, creating the parent directories of `target`.
pub fn copy_file(source: &Path, target: &Path) -> Result<(), PerfizError> {
    create_parent(target)?;
    fs::copy(source, target).map_err(|e| {
        PerfizError::io(
            format!("copy {} -> {}", source.display(), target.display()),
            e,
        )
    })?;
    Ok(())
}

/// Delete simulations from earlier runs below `dir`, keeping bundled ones.
///
/// Returns the removed files. A missing `dir` removes nothing.
pub fn remove_stale_simulations(dir: &Path) -> Result<Vec<PathBuf>, PerfizError> {
    let mut removed = Vec::new();
    for path in simulations_below(dir)? {
        if !is_stale_simulation(&path) {
            continue;
        }
        fs::remove_file(&path)
            .map_err(|e| PerfizError::io(format!("remove {}", path.display()), e))?;
        removed.push(path);
    }
    Ok(removed)
}

/// Copy every simulation below `source_dir` into `target_dir`, keeping the
/// relative directory structure. Other files are skipped.
///
/// Returns the written targets.
pub fn copy_simulations(source_dir: &Path, target_dir: &Path) -> Result<Vec<PathBuf>, PerfizError> {
    let mut copied = Vec::new();
    for path in simulations_below(source_dir)? {
        let relative = path.strip_prefix(source_dir).unwrap_or(&path);
        let target = target_dir.join(relative);
        copy_file(&path, &target)?;
        copied.push(target);
    }
    Ok(copied)
}

fn simulations_below(dir: &Path) -> Result<Vec<PathBuf>, PerfizError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let pattern = format!(
        "{}/**/*.{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        SIMULATION_EXTENSION
    );
    let entries = glob::glob(&pattern).map_err(|e| {
        PerfizError::io(
            format!("scan {}", dir.display()),
            std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()),
        )
    })?;

    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            let context = format!("read {}", e.path().display());
            PerfizError::io(context, e.into_error())
        })?;
        if path.is_file() && is_simulation(&path) {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Write `bytes` to `path` via a temp file in the same directory.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<(), PerfizError> {
    use std::io::Write;

    create_parent(path)?;
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = parent.to_path_buf();
    tmp.push(format!(".{}.tmp", uuid::Uuid::new_v4()));

    {
        let mut f = fs::File::create(&tmp)
            .map_err(|e| PerfizError::io(format!("create temp {}", tmp.display()), e))?;
        f.write_all(bytes)
            .map_err(|e| PerfizError::io(format!("write temp {}", tmp.display()), e))?;
        f.sync_all().ok();
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        PerfizError::io(
            format!("rename {} -> {}", tmp.display(), path.display()),
            e,
        )
    })
}

pub fn create_dir_all(path: &Path) -> Result<(), PerfizError> {
    fs::create_dir_all(path)
        .map_err(|e| PerfizError::io(format!("create dir {}", path.display()), e))
}

/// Remove a directory tree. Returns false when there was nothing to remove.
pub fn remove_dir_if_exists(path: &Path) -> Result<bool, PerfizError> {
    match fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PerfizError::io(format!("remove {}", path.display()), e)),
    }
}

/// Make `path` readable and writable by everyone so containers running as
/// other users can write into it. No-op off unix.
pub fn open_to_all(path: &Path) -> Result<(), PerfizError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o777))
            .map_err(|e| PerfizError::io(format!("chmod {}", path.display()), e))?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

/// `ls -l` style permissions of `path`.
pub fn permissions_string(path: &Path) -> Result<String, PerfizError> {
    let meta =
        fs::metadata(path).map_err(|e| PerfizError::io(format!("stat {}", path.display()), e))?;

    #[cfg(unix)]
    let mode = {
        use std::os::unix::fs::PermissionsExt;
        meta.permissions().mode()
    };
    #[cfg(not(unix))]
    let mode = if meta.permissions().readonly() {
        0o555
    } else {
        0o777
    };

    Ok(perfiz_domain::format_permissions(mode, meta.is_dir()))
}

fn create_parent(path: &Path) -> Result<(), PerfizError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => create_dir_all(parent),
        _ => Ok(()),
    }
}
