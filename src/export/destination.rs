//! Copying export artifacts to their final location

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// First free path for `name` inside `parent`: `name`, then `name 2`,
/// `name 3`, and so on
pub fn unique_destination(parent: &Path, name: &str) -> PathBuf {
    let candidate = parent.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let mut suffix = 2u32;
    loop {
        let candidate = parent.join(format!("{} {}", name, suffix));
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

/// Recursively copy `src` into the new directory `dst`
pub fn copy_dir(src: &Path, dst: &Path) -> io::Result<()> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy the directory `src` into `parent`, keeping its name unless taken
pub fn copy_into(src: &Path, parent: &Path) -> io::Result<PathBuf> {
    let name = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no name"))?;

    fs::create_dir_all(parent)?;
    let destination = unique_destination(parent, &name);
    copy_dir(src, &destination)?;

    tracing::debug!("Copied {:?} to {:?}", src, destination);
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_numeric_suffix_on_collision() {
        let dir = tempdir().unwrap();
        assert_eq!(unique_destination(dir.path(), "Run"), dir.path().join("Run"));

        fs::create_dir(dir.path().join("Run")).unwrap();
        assert_eq!(unique_destination(dir.path(), "Run"), dir.path().join("Run 2"));

        fs::create_dir(dir.path().join("Run 2")).unwrap();
        assert_eq!(unique_destination(dir.path(), "Run"), dir.path().join("Run 3"));
    }

    #[test]
    fn test_copy_into_twice() {
        let src_root = tempdir().unwrap();
        let src = src_root.path().join("Session");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("accel.csv"), "t,x\n").unwrap();
        fs::write(src.join("nested").join("gyro.csv"), "t,y\n").unwrap();

        let dest = tempdir().unwrap();
        let first = copy_into(&src, dest.path()).unwrap();
        let second = copy_into(&src, dest.path()).unwrap();

        assert_eq!(first, dest.path().join("Session"));
        assert_eq!(second, dest.path().join("Session 2"));
        assert_eq!(fs::read_to_string(second.join("accel.csv")).unwrap(), "t,x\n");
        assert_eq!(
            fs::read_to_string(second.join("nested").join("gyro.csv")).unwrap(),
            "t,y\n"
        );
    }
}
