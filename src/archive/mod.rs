//! Semi-fat jar writing.
//!
//! The project's own archive is copied as-is, then every packaged file is
//! merged in: jars and zips entry by entry, directories file by file, and
//! anything else as a single top-level entry. Signature files, manifests,
//! licence notices and index lists from merged content are dropped, since
//! they describe the dependency rather than the CorDapp.

use std::collections::{BTreeSet, HashSet};
use std::fs::File;
use std::io::{self, Read, Seek, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use glob::{MatchOptions, Pattern};
use serde::Serialize;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::util::fs::ensure_dir;
use crate::util::hash::sha256_file;

/// Path globs never copied out of merged dependencies.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "META-INF/*.SF",
    "META-INF/*.DSA",
    "META-INF/*.RSA",
    "META-INF/*.EC",
    "META-INF/*.MF",
    "META-INF/LICENSE*",
    "META-INF/NOTICE*",
    "META-INF/INDEX.LIST",
];

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveSummary {
    pub path: PathBuf,
    /// Entries written
    pub entries: usize,
    /// Entries dropped because an earlier entry had the same name
    pub duplicates: usize,
    /// Entries dropped by an exclusion glob
    pub excluded: usize,
    /// Hex SHA-256 of the written archive
    pub sha256: String,
}

/// Writes the merged archive.
#[derive(Debug, Clone)]
pub struct JarWriter {
    excludes: Vec<Pattern>,
}

impl Default for JarWriter {
    fn default() -> Self {
        JarWriter::new()
    }
}

impl JarWriter {
    /// A writer using [`DEFAULT_EXCLUDES`].
    pub fn new() -> Self {
        let excludes = DEFAULT_EXCLUDES
            .iter()
            .filter_map(|p| Pattern::new(p).ok())
            .collect();
        JarWriter { excludes }
    }

    /// Add more exclusion globs.
    pub fn with_extra_excludes(mut self, patterns: &[String]) -> Result<Self> {
        for pattern in patterns {
            let compiled = Pattern::new(pattern)
                .with_context(|| format!("invalid exclude pattern: {}", pattern))?;
            self.excludes.push(compiled);
        }
        Ok(self)
    }

    /// Whether a merged entry name is dropped.
    pub fn is_excluded(&self, entry: &str) -> bool {
        self.excludes
            .iter()
            .any(|p| p.matches_with(entry, MATCH_OPTIONS))
    }

    /// Write `base` followed by `files` into a new archive at `output`.
    ///
    /// The archive is assembled in a temporary file next to `output` and
    /// moved into place only once complete.
    pub fn write(
        &self,
        output: &Path,
        base: Option<&Path>,
        files: &BTreeSet<PathBuf>,
    ) -> Result<ArchiveSummary> {
        let dir = output.parent().unwrap_or(Path::new("."));
        ensure_dir(dir)?;

        let tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;

        let mut merge = Merge::new(tmp.as_file(), self);

        if let Some(base) = base {
            if base.is_file() {
                merge.copy_archive(base, false)?;
            } else {
                tracing::warn!("project archive {} does not exist, skipping", base.display());
            }
        }

        for file in files {
            if Some(file.as_path()) == base {
                continue;
            }
            merge.add_path(file)?;
        }

        let (entries, duplicates, excluded) = merge.finish()?;

        tmp.persist(output)
            .with_context(|| format!("failed to write archive: {}", output.display()))?;

        let sha256 = sha256_file(output)?;
        tracing::info!(
            "wrote {} ({} entries, {} duplicates, {} excluded)",
            output.display(),
            entries,
            duplicates,
            excluded
        );

        Ok(ArchiveSummary {
            path: output.to_path_buf(),
            entries,
            duplicates,
            excluded,
            sha256,
        })
    }
}

struct Merge<'w, W: Write + Seek> {
    zip: ZipWriter<W>,
    writer: &'w JarWriter,
    options: SimpleFileOptions,
    seen: HashSet<String>,
    entries: usize,
    duplicates: usize,
    excluded: usize,
}

impl<'w, W: Write + Seek> Merge<'w, W> {
    fn new(sink: W, writer: &'w JarWriter) -> Self {
        Merge {
            zip: ZipWriter::new(sink),
            writer,
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            seen: HashSet::new(),
            entries: 0,
            duplicates: 0,
            excluded: 0,
        }
    }

    fn add_path(&mut self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return self.add_dir(path);
        }
        if !path.is_file() {
            bail!("packaged file does not exist: {}", path.display());
        }

        if is_archive(path) {
            self.copy_archive(path, true)
        } else {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let mut file = File::open(path)
                .with_context(|| format!("failed to open file: {}", path.display()))?;
            self.add_entry(&name, &mut file, true)
        }
    }

    fn copy_archive(&mut self, path: &Path, apply_excludes: bool) -> Result<()> {
        let file = File::open(path)
            .with_context(|| format!("failed to open archive: {}", path.display()))?;
        let mut archive = ZipArchive::new(file)
            .with_context(|| format!("invalid or corrupt archive: {}", path.display()))?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("failed to read entry {} of {}", i, path.display()))?;
            let name = entry.name().to_string();

            if entry.is_dir() {
                self.add_directory(&name)?;
            } else {
                self.add_entry(&name, &mut entry, apply_excludes)?;
            }
        }

        tracing::debug!("merged {}", path.display());
        Ok(())
    }

    fn add_dir(&mut self, root: &Path) -> Result<()> {
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry
                .with_context(|| format!("failed to walk directory: {}", root.display()))?;
            let relative = entry.path().strip_prefix(root)?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if entry.file_type().is_dir() {
                self.add_directory(&format!("{}/", name))?;
            } else {
                let mut file = File::open(entry.path()).with_context(|| {
                    format!("failed to open file: {}", entry.path().display())
                })?;
                self.add_entry(&name, &mut file, true)?;
            }
        }
        Ok(())
    }

    fn add_directory(&mut self, name: &str) -> Result<()> {
        if self.seen.insert(name.to_string()) {
            self.zip.add_directory(name, self.options)?;
        }
        Ok(())
    }

    fn add_entry(&mut self, name: &str, reader: &mut dyn Read, apply_excludes: bool) -> Result<()> {
        if apply_excludes && self.writer.is_excluded(name) {
            self.excluded += 1;
            return Ok(());
        }
        if !self.seen.insert(name.to_string()) {
            tracing::debug!("duplicate entry {}, keeping the first", name);
            self.duplicates += 1;
            return Ok(());
        }

        self.zip.start_file(name, self.options)?;
        io::copy(reader, &mut self.zip)
            .with_context(|| format!("failed to write entry: {}", name))?;
        self.entries += 1;
        Ok(())
    }

    fn finish(self) -> Result<(usize, usize, usize)> {
        self.zip.finish()?;
        Ok((self.entries, self.duplicates, self.excluded))
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy();
            ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip")
        })
        .unwrap_or(false)
}
