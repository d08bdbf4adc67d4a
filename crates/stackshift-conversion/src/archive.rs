//! Zip archives in and out of the pipeline

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use std::path::{Component, Path};

use stackshift_config::LimitsConfig;
use stackshift_detect::ProjectFile;
use stackshift_generation::ConvertedFile;
use tracing::{debug, info};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{ConversionError, Result};

/// Directories never worth converting
const SKIPPED_DIRS: &[&str] = &["__MACOSX", ".git", "node_modules"];

/// Forward-slash path with `.` segments dropped; absolute paths and `..` are refused
fn sanitize_entry_path(name: &str) -> Result<String> {
    let mut parts = Vec::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return Err(ConversionError::UnsafePath(name.to_string())),
        }
    }
    Ok(parts.join("/"))
}

fn is_skipped(path: &str) -> bool {
    path.split('/').any(|segment| SKIPPED_DIRS.contains(&segment))
}

fn decode(path: &str, bytes: Vec<u8>) -> ProjectFile {
    let size = bytes.len();
    match String::from_utf8(bytes) {
        Ok(text) if !text.contains('\0') => ProjectFile::new(path, text),
        _ => ProjectFile::binary(path, size),
    }
}

/// Extract the files of an uploaded project archive.
///
/// Directory entries and anything under `__MACOSX/`, `.git/` or
/// `node_modules/` are skipped. Entries that are too large, not UTF-8 or
/// contain NUL bytes come back as binary placeholders. The archive as a
/// whole is rejected when it holds more than `max_files` files or more than
/// `max_total_bytes` of uncompressed data.
pub fn read_project_archive(bytes: &[u8], limits: &LimitsConfig) -> Result<Vec<ProjectFile>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut indices = Vec::new();
    let mut total: u64 = 0;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let path = sanitize_entry_path(entry.name())?;
        if path.is_empty() || is_skipped(&path) {
            continue;
        }
        total = total.saturating_add(entry.size());
        indices.push((i, path));
    }

    if indices.len() > limits.max_files {
        return Err(ConversionError::LimitExceeded {
            limit: "max_files",
            actual: indices.len() as u64,
            max: limits.max_files as u64,
        });
    }
    if total > limits.max_total_bytes {
        return Err(ConversionError::LimitExceeded {
            limit: "max_total_bytes",
            actual: total,
            max: limits.max_total_bytes,
        });
    }

    let mut files = Vec::with_capacity(indices.len());
    for (i, path) in indices {
        let entry = archive.by_index(i)?;
        let declared = entry.size();
        if declared > limits.max_file_size_bytes {
            debug!(path = %path, size = declared, "Entry over size limit");
            files.push(ProjectFile::binary(&path, declared as usize));
            continue;
        }

        // Declared sizes can lie; read one byte past the limit to notice
        let mut content = Vec::with_capacity(declared as usize);
        entry
            .take(limits.max_file_size_bytes + 1)
            .read_to_end(&mut content)?;
        if content.len() as u64 > limits.max_file_size_bytes {
            debug!(path = %path, "Entry over size limit after decompression");
            files.push(ProjectFile::binary(&path, content.len()));
            continue;
        }
        files.push(decode(&path, content));
    }

    info!(files = files.len(), bytes = total, "Read project archive");
    Ok(files)
}

/// Pack converted files into a deflated zip, one entry per `new_path`.
/// Two files with the same path are refused.
pub fn write_converted_archive(files: &[ConvertedFile]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut written = HashSet::with_capacity(files.len());
    for file in files {
        let path = sanitize_entry_path(&file.new_path)?;
        if !written.insert(path.clone()) {
            return Err(ConversionError::InvalidArchive(format!("duplicate entry {}", path)));
        }
        writer.start_file(path, options)?;
        writer.write_all(file.content.as_bytes())?;
    }

    let cursor = writer.finish()?;
    let bytes = cursor.into_inner();
    debug!(files = files.len(), bytes = bytes.len(), "Wrote converted archive");
    Ok(bytes)
}
