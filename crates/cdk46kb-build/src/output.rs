//! Atomic writes into the data directory.
//!
//! Every output is filled in a temporary file next to its destination and
//! renamed into place, so readers never see a half-written file.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cdk46kb_common::Table;
use tempfile::{NamedTempFile, TempPath};
use tracing::warn;

use crate::error::{BuildError, Result};

pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| BuildError::write(dir, e))
}

fn parent_dir(dest: &Path) -> &Path {
    match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn staging_file(dest: &Path) -> Result<NamedTempFile> {
    let dir = parent_dir(dest);
    ensure_dir(dir)?;
    NamedTempFile::new_in(dir).map_err(|e| BuildError::write(dest, e))
}

fn fill<F>(tmp: &mut NamedTempFile, dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    write(tmp.as_file_mut()).map_err(|e| BuildError::write(dest, e))?;
    tmp.as_file_mut().flush().map_err(|e| BuildError::write(dest, e))?;
    tmp.as_file().sync_all().map_err(|e| BuildError::write(dest, e))
}

/// Write `dest` through a temporary file filled by `write`.
pub fn write_atomic<F>(dest: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let mut tmp = staging_file(dest)?;
    fill(&mut tmp, dest, write)?;
    tmp.persist(dest).map_err(|e| BuildError::write(dest, e.error))?;
    Ok(())
}

pub fn write_bytes(dest: &Path, bytes: &[u8]) -> Result<()> {
    write_atomic(dest, |f| f.write_all(bytes))
}

fn table_to_file(table: &Table, file: &mut File) -> io::Result<()> {
    table
        .to_writer(file)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn write_table(dest: &Path, table: &Table) -> Result<()> {
    write_atomic(dest, |f| table_to_file(table, f))
}

/// A destination renamed into place by [`write_tables`], with the file it
/// replaced moved aside.
struct Replaced {
    dest: PathBuf,
    previous: Option<TempPath>,
}

impl Replaced {
    /// Move the current file at `dest` aside, if there is one.
    fn set_aside(dest: PathBuf) -> Result<Self> {
        if !dest.is_file() {
            return Ok(Self { dest, previous: None });
        }
        let previous = tempfile::Builder::new()
            .prefix(".prev")
            .tempfile_in(parent_dir(&dest))
            .map_err(|e| BuildError::write(&dest, e))?
            .into_temp_path();
        std::fs::rename(&dest, &previous).map_err(|e| BuildError::write(&dest, e))?;
        Ok(Self { dest, previous: Some(previous) })
    }

    /// Put the set-aside file back. Without one, `remove_new` deletes
    /// whatever was renamed into `dest`.
    fn restore(self, remove_new: bool) {
        let result = match &self.previous {
            Some(previous) => std::fs::rename(previous, &self.dest),
            None if remove_new => std::fs::remove_file(&self.dest),
            None => Ok(()),
        };
        if let Err(e) = result {
            warn!(path = %self.dest.display(), "cannot restore previous output: {}", e);
        }
    }
}

/// Stage every table, then rename them all into place. A failure while
/// staging leaves every destination untouched; a failed rename puts back
/// the files already replaced, so the set is written all-or-nothing.
pub fn write_tables(outputs: &[(&Path, &Table)]) -> Result<()> {
    let mut staged: Vec<(NamedTempFile, PathBuf)> = Vec::with_capacity(outputs.len());
    for (dest, table) in outputs {
        let mut tmp = staging_file(dest)?;
        fill(&mut tmp, dest, |f| table_to_file(table, f))?;
        staged.push((tmp, dest.to_path_buf()));
    }

    let mut replaced: Vec<Replaced> = Vec::with_capacity(staged.len());
    for (tmp, dest) in staged {
        let step = match Replaced::set_aside(dest) {
            Ok(step) => step,
            Err(e) => {
                roll_back(replaced);
                return Err(e);
            }
        };
        if let Err(e) = tmp.persist(&step.dest) {
            let err = BuildError::write(&step.dest, e.error);
            step.restore(false);
            roll_back(replaced);
            return Err(err);
        }
        replaced.push(step);
    }
    Ok(())
}

fn roll_back(replaced: Vec<Replaced>) {
    for step in replaced.into_iter().rev() {
        step.restore(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_bytes_creates_parent_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("nested").join("out.txt");
        write_bytes(&dest, b"first").unwrap();
        write_bytes(&dest, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "second");

        // No staging files left behind.
        let entries: Vec<_> = std::fs::read_dir(dest.parent().unwrap()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_tables_writes_all() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = Table::new(["id"]);
        a.push_row(["CDK4"]).unwrap();
        let b = Table::new(["source", "target"]);
        let pa = dir.path().join("a.csv");
        let pb = dir.path().join("b.csv");
        write_tables(&[(pa.as_path(), &a), (pb.as_path(), &b)]).unwrap();
        assert_eq!(std::fs::read_to_string(&pa).unwrap(), "id\nCDK4\n");
        assert_eq!(std::fs::read_to_string(&pb).unwrap(), "source,target\n");
    }

    #[test]
    fn test_write_tables_restores_on_failed_rename() {
        let dir = tempfile::tempdir().unwrap();
        let edges = dir.path().join("tnbc_aug_edges.csv");
        std::fs::write(&edges, "OLD,OLD\n").unwrap();
        // a non-empty directory cannot be replaced by a file
        let nodes = dir.path().join("tnbc_aug_nodes.csv");
        std::fs::create_dir(&nodes).unwrap();
        std::fs::write(nodes.join("keep"), "").unwrap();

        let mut new_edges = Table::new(["source", "target"]);
        new_edges.push_row(["A", "B"]).unwrap();
        let new_nodes = Table::new(["id"]);

        let err = write_tables(&[(edges.as_path(), &new_edges), (nodes.as_path(), &new_nodes)]).unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(std::fs::read_to_string(&edges).unwrap(), "OLD,OLD\n");
        assert!(nodes.join("keep").exists());

        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["tnbc_aug_edges.csv", "tnbc_aug_nodes.csv"]);
    }

    #[test]
    fn test_write_tables_removes_new_file_on_failed_rename() {
        let dir = tempfile::tempdir().unwrap();
        let edges = dir.path().join("edges.csv");
        let nodes = dir.path().join("nodes.csv");
        std::fs::create_dir(&nodes).unwrap();
        std::fs::write(nodes.join("keep"), "").unwrap();

        let table = Table::new(["id"]);
        assert!(write_tables(&[(edges.as_path(), &table), (nodes.as_path(), &table)]).is_err());
        assert!(!edges.exists());
    }
}
