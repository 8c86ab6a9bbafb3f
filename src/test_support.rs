use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use zip::write::FileOptions;
use zip::CompressionMethod;

/// Writes a ZIP holding the given `(member name, contents)` pairs.
pub fn write_raw_zip(dir: &Path, name: &str, members: &[(&str, &str)]) -> Result<PathBuf> {
    let path = dir.join(name);
    let mut zip = zip::ZipWriter::new(File::create(&path)?);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Stored);
    for (member, contents) in members {
        zip.start_file(*member, options)?;
        zip.write_all(contents.as_bytes())?;
    }
    zip.finish()?;
    Ok(path)
}

/// Writes a single-member ZIP whose CSV member is named after the archive.
pub fn write_zip(dir: &Path, name: &str, csv: &str) -> Result<PathBuf> {
    let member = name.trim_end_matches(".zip").to_string() + ".csv";
    write_raw_zip(dir, name, &[(member.as_str(), csv)])
}
