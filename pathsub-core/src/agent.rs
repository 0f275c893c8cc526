use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;

/// The filesystem capabilities a batch rename needs.
///
/// Every higher layer (history tracking, committing, rollback) talks to the
/// filesystem only through this trait, so a test double can stand in for
/// the real filesystem.
pub trait Agent {
    /// Move `src` to `dest`. Must fail with `AlreadyExists` rather than
    /// overwrite an existing `dest`, and with `NotFound` if `src` is missing.
    fn move_path(&mut self, src: &Path, dest: &Path) -> io::Result<()>;

    /// Create exactly one directory level. Missing parents are the caller's job.
    fn create_dir(&mut self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&mut self, path: &Path) -> io::Result<()>;
}

impl<A: Agent + ?Sized> Agent for &mut A {
    fn move_path(&mut self, src: &Path, dest: &Path) -> io::Result<()> {
        (**self).move_path(src, dest)
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        (**self).create_dir(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        (**self).remove_dir(path)
    }
}

/// Agent that acts directly on the real filesystem, with no undo tracking.
#[derive(Debug, Default, Clone, Copy)]
pub struct Executive;

impl Executive {
    pub fn new() -> Self {
        Self
    }
}

impl Agent for Executive {
    fn move_path(&mut self, src: &Path, dest: &Path) -> io::Result<()> {
        tracing::debug!("move {} {}", src.display(), dest.display());

        // symlink_metadata so a dangling symlink still counts as a source
        let file_type = fs::symlink_metadata(src)?.file_type();
        let is_dir = file_type.is_dir();

        // Claim the destination exclusively first. A plain rename would
        // silently replace whatever is there.
        if is_dir {
            fs::create_dir(dest)?;
        } else {
            OpenOptions::new().write(true).create_new(true).open(dest)?;
        }

        match fs::rename(src, dest) {
            Ok(()) => Ok(()),
            Err(err) if is_cross_device(&err) => {
                tracing::debug!("{} is on another device, copying", dest.display());
                if let Err(err) = copy_onto(src, dest, file_type) {
                    remove_placeholder(dest, is_dir);
                    return Err(err);
                }
                remove_source(src, dest, is_dir)
            },
            Err(err) => {
                remove_placeholder(dest, is_dir);
                Err(err)
            },
        }
    }

    fn create_dir(&mut self, path: &Path) -> io::Result<()> {
        tracing::debug!("mkdir {}", path.display());
        fs::create_dir(path)
    }

    fn remove_dir(&mut self, path: &Path) -> io::Result<()> {
        tracing::debug!("rmdir {}", path.display());
        fs::remove_dir(path)
    }
}

fn is_cross_device(err: &io::Error) -> bool {
    err.raw_os_error() == Some(18) || err.kind() == io::ErrorKind::CrossesDevices
}

fn remove_placeholder(dest: &Path, is_dir: bool) {
    let cleanup = if is_dir {
        // may hold a partial copy
        fs::remove_dir_all(dest)
    } else {
        fs::remove_file(dest)
    };
    if let Err(err) = cleanup {
        tracing::warn!("Failed to remove placeholder {}: {}", dest.display(), err);
    }
}

/// Copy `src` onto the claimed `dest`.
fn copy_onto(src: &Path, dest: &Path, file_type: fs::FileType) -> io::Result<()> {
    if file_type.is_dir() {
        copy_dir_all(src, dest)
    } else if file_type.is_symlink() {
        fs::remove_file(dest)?;
        copy_symlink(src, dest)
    } else {
        fs::copy(src, dest).map(drop)
    }
}

/// Finish a copying move by removing the original.
fn remove_source(src: &Path, dest: &Path, is_dir: bool) -> io::Result<()> {
    if !is_dir {
        if let Err(err) = fs::remove_file(src) {
            remove_placeholder(dest, false);
            return Err(err);
        }
        return Ok(());
    }

    // A half-removed tree cannot be restored, so the copy stays.
    fs::remove_dir_all(src).inspect_err(|err| {
        tracing::warn!(
            "Copied {} to {} but could not remove the original: {}",
            src.display(),
            dest.display(),
            err
        );
    })
}

/// Recursively copy the contents of `src` into the existing directory `dest`.
fn copy_dir_all(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let target = dest.join(entry.file_name());

        if file_type.is_dir() {
            fs::create_dir(&target)?;
            copy_dir_all(&entry.path(), &target)?;
        } else if file_type.is_symlink() {
            copy_symlink(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(fs::read_link(src)?, dest)
}

#[cfg(windows)]
fn copy_symlink(src: &Path, dest: &Path) -> io::Result<()> {
    let link = fs::read_link(src)?;
    if fs::metadata(src).map(|m| m.is_dir()).unwrap_or(false) {
        std::os::windows::fs::symlink_dir(link, dest)
    } else {
        std::os::windows::fs::symlink_file(link, dest)
    }
}
