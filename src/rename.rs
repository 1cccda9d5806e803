//! Canonical file names and collision-safe renaming.
//!
//! Every protocol ends up as
//! `{unit_id}_{serial_number}{phase_suffix}{dedup}.pdf`. The unit id is cut
//! at the first character Windows refuses in file names. When a name is
//! taken, `_1`, `_2`, ... are tried in turn.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ProtoSortError, Result};
use crate::io::{PdfReader, TextExtractor, file_name, is_pdf_name, list_files};
use crate::protocol::{ParsedFields, parse_file};

/// Characters that end the usable part of a unit id.
pub const UNSAFE_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Upper bound on names tried for one file.
pub const MAX_COLLISION_ATTEMPTS: u32 = 10_000;

/// Truncate `raw` at its first unsafe character, dropping that character
/// and everything after it.
pub fn sanitize_unit_id(raw: &str) -> &str {
    match raw.find(&UNSAFE_CHARS[..]) {
        Some(idx) => &raw[..idx],
        None => raw,
    }
}

/// Canonical name of a protocol, before collision handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalName {
    unit_id: String,
    serial_number: String,
    suffix: &'static str,
}

impl CanonicalName {
    /// Build the canonical name from parsed fields. The slot is ignored.
    pub fn from_fields(fields: &ParsedFields) -> Self {
        Self {
            unit_id: sanitize_unit_id(&fields.unit_id).to_string(),
            serial_number: fields.serial_number.clone(),
            suffix: fields.phase().map_or("", |phase| phase.file_suffix()),
        }
    }

    /// Whether the name would be a bare `.pdf`.
    ///
    /// A phase suffix alone is enough to rename: `_As-found.pdf`.
    pub fn is_empty(&self) -> bool {
        self.unit_id.is_empty() && self.serial_number.is_empty() && self.suffix.is_empty()
    }

    /// File name for a dedup index; 0 means no dedup suffix.
    pub fn file_name(&self, index: u32) -> String {
        let unit = if self.unit_id.is_empty() {
            String::new()
        } else {
            format!("{}_", self.unit_id)
        };

        if index == 0 {
            format!("{unit}{}{}.pdf", self.serial_number, self.suffix)
        } else {
            format!("{unit}{}{}_{index}.pdf", self.serial_number, self.suffix)
        }
    }
}

/// Pick the first of `X.pdf`, `X_1.pdf`, `X_2.pdf`, ... not reported taken.
///
/// # Errors
///
/// Returns [`ProtoSortError::CollisionLimit`] after
/// [`MAX_COLLISION_ATTEMPTS`] names.
pub fn resolve_collision(
    name: &CanonicalName,
    mut is_taken: impl FnMut(&str) -> bool,
) -> Result<String> {
    (0..MAX_COLLISION_ATTEMPTS)
        .map(|index| name.file_name(index))
        .find(|candidate| !is_taken(candidate))
        .ok_or_else(|| ProtoSortError::CollisionLimit {
            base: name.file_name(0),
            attempts: MAX_COLLISION_ATTEMPTS,
        })
}

/// What happened (or would happen) to one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RenameOutcome {
    /// File moved to its canonical name.
    Renamed {
        /// Original path.
        from: PathBuf,
        /// New path.
        to: PathBuf,
    },
    /// File already carries its canonical name.
    Unchanged {
        /// File path.
        path: PathBuf,
    },
    /// File left alone.
    Skipped {
        /// File path.
        path: PathBuf,
        /// Why it was not renamed.
        reason: String,
    },
}

impl RenameOutcome {
    /// Path of the file after the operation.
    pub fn final_path(&self) -> &Path {
        match self {
            Self::Renamed { to, .. } => to,
            Self::Unchanged { path } | Self::Skipped { path, .. } => path,
        }
    }

    /// File name of the file after the operation.
    pub fn final_name(&self) -> &str {
        file_name(self.final_path()).unwrap_or_default()
    }
}

/// Whether `post_process` touches a file called `name`.
///
/// With `only_merged`, the extension check is case-sensitive while
/// `merged` matches in any case.
pub fn selects(name: &str, only_merged: bool) -> bool {
    if only_merged {
        name.ends_with(".pdf") && name.to_lowercase().contains("merged")
    } else {
        is_pdf_name(name)
    }
}

/// Renames protocol PDFs to their canonical names.
#[derive(Debug, Clone, Default)]
pub struct Renamer<E = PdfReader> {
    extractor: E,
}

impl Renamer<PdfReader> {
    /// Create a renamer that reads PDFs with `lopdf`.
    pub fn new() -> Self {
        Self::with_extractor(PdfReader::new())
    }
}

impl<E: TextExtractor> Renamer<E> {
    /// Create a renamer over a custom text source.
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    fn canonical_name(&self, path: &Path) -> CanonicalName {
        CanonicalName::from_fields(parse_file(&self.extractor, path).fields())
    }

    /// Rename `folder/filename` to its canonical name.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoSortError::RenameFailed`] when the filesystem refuses
    /// the rename for any reason other than an existing target, and
    /// [`ProtoSortError::CollisionLimit`] if no free name is found.
    pub fn rename_one(&self, folder: &Path, filename: &str) -> Result<RenameOutcome> {
        let source = folder.join(filename);
        let name = self.canonical_name(&source);

        if name.is_empty() {
            warn!(path = %source.display(), "nothing to name the file after, leaving it as is");
            return Ok(RenameOutcome::Skipped {
                path: source,
                reason: "no unit id, serial number or phase found".to_string(),
            });
        }

        for _ in 0..MAX_COLLISION_ATTEMPTS {
            let candidate = resolve_collision(&name, |candidate| {
                let target = folder.join(candidate);
                target != source && occupied(&target)
            })?;
            let target = folder.join(&candidate);

            if target == source {
                debug!(path = %source.display(), "already canonical");
                return Ok(RenameOutcome::Unchanged { path: source });
            }

            match std::fs::rename(&source, &target) {
                Ok(()) => {
                    info!(from = filename, to = %candidate, "renamed");
                    return Ok(RenameOutcome::Renamed {
                        from: source,
                        to: target,
                    });
                }
                // Target appeared between the check and the rename.
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => {
                    return Err(ProtoSortError::RenameFailed {
                        from: source,
                        to: target,
                        source: err,
                    });
                }
            }
        }

        Err(ProtoSortError::CollisionLimit {
            base: name.file_name(0),
            attempts: MAX_COLLISION_ATTEMPTS,
        })
    }

    /// Rename the selected files of `folder` (see [`selects`]).
    ///
    /// The folder listing is taken once up front, so freshly renamed files
    /// are not visited again.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be listed or any rename fails; files
    /// renamed before the failure keep their new names.
    pub fn post_process(&self, folder: &Path, only_merged: bool) -> Result<Vec<RenameOutcome>> {
        let mut outcomes = Vec::new();

        for name in selected_names(folder, only_merged)? {
            outcomes.push(self.rename_one(folder, &name)?);
        }

        Ok(outcomes)
    }

    /// Compute what [`post_process`](Self::post_process) would do without
    /// touching the folder.
    ///
    /// # Errors
    ///
    /// Fails if the folder cannot be listed or a name cannot be resolved.
    pub fn plan(&self, folder: &Path, only_merged: bool) -> Result<Vec<RenameOutcome>> {
        let mut taken: HashSet<PathBuf> = list_files(folder)?.into_iter().collect();

        selected_names(folder, only_merged)?
            .iter()
            .map(|name| self.plan_one(folder, name, &mut taken))
            .collect()
    }

    /// Plan the rename of `folder/filename` against the names in `taken`.
    ///
    /// `taken` holds every occupied path and is updated as if the rename
    /// had happened, so consecutive calls see earlier planned names.
    ///
    /// # Errors
    ///
    /// Returns [`ProtoSortError::CollisionLimit`] if no free name is found.
    pub fn plan_one(
        &self,
        folder: &Path,
        filename: &str,
        taken: &mut HashSet<PathBuf>,
    ) -> Result<RenameOutcome> {
        let source = folder.join(filename);
        let name = self.canonical_name(&source);

        if name.is_empty() {
            return Ok(RenameOutcome::Skipped {
                path: source,
                reason: "no unit id, serial number or phase found".to_string(),
            });
        }

        let candidate = resolve_collision(&name, |candidate| {
            let target = folder.join(candidate);
            target != source && taken.contains(&target)
        })?;
        let target = folder.join(candidate);

        if target == source {
            return Ok(RenameOutcome::Unchanged { path: source });
        }

        taken.remove(&source);
        taken.insert(target.clone());
        Ok(RenameOutcome::Renamed {
            from: source,
            to: target,
        })
    }
}

fn occupied(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok()
}

fn selected_names(folder: &Path, only_merged: bool) -> Result<Vec<String>> {
    let mut names = Vec::new();

    for path in list_files(folder)? {
        match file_name(&path) {
            Some(name) if selects(name, only_merged) => names.push(name.to_string()),
            Some(_) => {}
            None => warn!(path = %path.display(), "skipping file with non UTF-8 name"),
        }
    }

    Ok(names)
}
