//! Downloadable bundle of the statistics directory.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use cdk46kb_config::Config;

use crate::error::Result;
use crate::output::write_atomic;
use crate::report::StepReport;

/// Regular files of `dir` that are not themselves archives, sorted by name.
pub fn archive_members(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file())
                .filter(|p| !p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("zip")))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

fn write_zip(out: &mut File, members: &[PathBuf]) -> io::Result<()> {
    let mut zip = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for path in members {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        zip.start_file(name, options)?;
        let mut src = File::open(path)?;
        io::copy(&mut src, &mut zip)?;
    }
    zip.finish()?;
    Ok(())
}

pub fn stage_archive(config: &Config) -> Result<Vec<StepReport>> {
    let stats = config.paths.stats_dir();
    let name = config.build.archive_name.as_str();
    let members = archive_members(&stats);
    if members.is_empty() {
        return Ok(vec![StepReport::skipped(
            "archive",
            name,
            format!("nothing to pack in {}", stats.display()),
        )]);
    }
    write_atomic(&stats.join(name), |f| write_zip(f, &members))?;
    Ok(vec![StepReport::done("archive", name, format!("packed {} files", members.len()))])
}
