//! Template materialization.
//! Walks a template tree depth-first in file name order and reproduces it
//! under a destination root, renaming stencil files and substituting
//! placeholders in eligible files. The first filesystem error halts the walk;
//! whatever was written before it stays in place.

use globset::GlobSet;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::{
    config::Rules,
    error::{Error, Result},
    ignore::build_ignore_set,
    template::{Substitutor, Variables},
};

/// What to do with a single template entry.
#[derive(Debug, PartialEq, Eq)]
pub enum FileOperation {
    /// Create the directory (and its parents).
    CreateDir { target: PathBuf },
    /// Copy the source bytes unchanged.
    Copy { target: PathBuf },
    /// Write substituted text.
    Write { target: PathBuf, content: String },
}

/// Counts of what a materialization produced.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub directories: usize,
    pub written: usize,
    pub copied: usize,
    pub ignored: usize,
}

/// Strips the marker suffix from a stencil file name.
///
/// Returns the destination name and whether the source was a stencil. A name
/// that consists only of the suffix is left as is.
pub fn resolve_target_name<'n>(file_name: &'n str, marker_suffix: &str) -> (&'n str, bool) {
    match file_name.strip_suffix(marker_suffix) {
        Some(stripped) if !stripped.is_empty() => (stripped, true),
        _ => (file_name, false),
    }
}

/// Decides and applies the operation for each entry of one template tree.
pub struct Processor<'a> {
    template_root: &'a Path,
    output_root: &'a Path,
    rules: &'a Rules,
    substitutor: Substitutor<'a>,
}

impl<'a> Processor<'a> {
    pub fn new(
        template_root: &'a Path,
        output_root: &'a Path,
        variables: &'a Variables,
        rules: &'a Rules,
    ) -> Self {
        Self { template_root, output_root, rules, substitutor: Substitutor::new(variables) }
    }

    fn relative<'p>(&self, path: &'p Path) -> &'p Path {
        path.strip_prefix(self.template_root).unwrap_or(path)
    }

    /// Resolves the operation for a template entry.
    pub fn process(&self, source: &Path, is_dir: bool) -> Result<FileOperation> {
        let relative = self.relative(source);

        if is_dir {
            return Ok(FileOperation::CreateDir { target: self.output_root.join(relative) });
        }

        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                Error::materialize(
                    source,
                    std::io::Error::new(std::io::ErrorKind::InvalidData, "file name is not UTF-8"),
                )
            })?;
        let (target_name, was_stencil) =
            resolve_target_name(file_name, &self.rules.marker_suffix);
        let target = self.output_root.join(relative).with_file_name(target_name);

        if self.rules.eligibility.is_eligible(target_name, was_stencil) {
            let content =
                fs::read_to_string(source).map_err(|e| Error::materialize(source, e))?;
            let content = self.substitutor.substitute(&content).into_owned();
            Ok(FileOperation::Write { target, content })
        } else {
            Ok(FileOperation::Copy { target })
        }
    }

    /// Performs the operation against the filesystem.
    pub fn apply(&self, source: &Path, operation: &FileOperation) -> Result<()> {
        match operation {
            FileOperation::CreateDir { target } => {
                debug!("Creating directory: {}", target.display());
                fs::create_dir_all(target).map_err(|e| Error::materialize(target, e))
            }
            FileOperation::Copy { target } => {
                debug!("Copying file: {}", target.display());
                fs::copy(source, target).map(|_| ()).map_err(|e| Error::materialize(target, e))
            }
            FileOperation::Write { target, content } => {
                debug!("Writing file: {}", target.display());
                fs::write(target, content).map_err(|e| Error::materialize(target, e))
            }
        }
    }
}

fn walk_error(err: walkdir::Error) -> Error {
    match err.path().map(Path::to_path_buf) {
        Some(path) if err.io_error().is_some() => {
            Error::materialize(path, std::io::Error::from(err))
        }
        _ => Error::WalkError(err),
    }
}

fn is_ignored(entry: &DirEntry, template_root: &Path, ignored: &GlobSet) -> bool {
    entry.depth() > 0
        && entry
            .path()
            .strip_prefix(template_root)
            .map(|relative| ignored.is_match(relative))
            .unwrap_or(false)
}

/// Materializes `template_root` into `output_root`.
///
/// # Errors
/// * `Error::TemplateNotFound` if `template_root` is missing or not a directory
/// * `Error::MaterializeError` naming the path of the first failed filesystem operation
pub fn materialize<S: AsRef<Path>, D: AsRef<Path>>(
    template_root: S,
    output_root: D,
    variables: &Variables,
    rules: &Rules,
) -> Result<Report> {
    let template_root = template_root.as_ref();
    let output_root = output_root.as_ref();

    if !template_root.is_dir() {
        return Err(Error::TemplateNotFound {
            template_dir: template_root.display().to_string(),
        });
    }

    info!("Materializing {} into {}", template_root.display(), output_root.display());

    let ignored = build_ignore_set(&rules.ignore)?;
    let processor = Processor::new(template_root, output_root, variables, rules);
    let mut report = Report::default();
    let mut ignored_count = 0;

    let walker = WalkDir::new(template_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let skip = is_ignored(entry, template_root, &ignored);
            if skip {
                debug!("Skipping ignored entry: {}", entry.path().display());
                ignored_count += 1;
            }
            !skip
        });

    for entry in walker {
        let entry = entry.map_err(walk_error)?;
        let source = entry.path();
        let operation = processor.process(source, entry.file_type().is_dir())?;
        processor.apply(source, &operation)?;
        match operation {
            FileOperation::CreateDir { .. } => report.directories += 1,
            FileOperation::Copy { .. } => report.copied += 1,
            FileOperation::Write { .. } => report.written += 1,
        }
    }
    report.ignored = ignored_count;

    info!(
        "Materialized {} directories, {} substituted files, {} copied files ({} ignored)",
        report.directories, report.written, report.copied, report.ignored
    );
    Ok(report)
}
