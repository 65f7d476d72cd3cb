//! Manifest/include resolution.
//!
//! Reads one root file and, when it is a manifest, recursively merges
//! everything it includes into a single unvalidated definition. Cycle
//! detection uses an explicit stack of in-progress paths handed down
//! through the recursion, so independent loads never share state. A
//! cycle is not an error: the including manifest just skips that entry.

use crate::raw::{self, FORMAT_TAG, RawWorldData};
use driftwood_foundation::{Error, ErrorKind, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Manifests may nest this deep before resolution gives up. Independent
/// of cycle handling.
pub const MAX_INCLUDE_DEPTH: usize = 32;

/// Resolves the file at `path` and everything it includes into one
/// merged, unvalidated definition.
pub fn load_raw(path: impl AsRef<Path>) -> Result<RawWorldData> {
    resolve(path.as_ref(), &mut Vec::new())
}

fn resolve(path: &Path, stack: &mut Vec<PathBuf>) -> Result<RawWorldData> {
    let path = clean_path(path);
    let data = fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
    let header = raw::scan_header(&path, &data)?;

    if !header.format.eq_ignore_ascii_case(FORMAT_TAG) {
        return Err(Error::format(
            &path,
            format!("format = {FORMAT_TAG:?}"),
            format!("format = {:?}", header.format),
        ));
    }

    match header.file_type.to_uppercase().as_str() {
        "DATA" => raw::decode_world(&path, &data),
        "MANIFEST" => resolve_manifest(&path, &data, stack),
        other => Err(Error::format(
            &path,
            "type = \"DATA\" or \"MANIFEST\"",
            format!("type = {other:?}"),
        )),
    }
}

fn resolve_manifest(path: &Path, data: &str, stack: &mut Vec<PathBuf>) -> Result<RawWorldData> {
    if stack.len() >= MAX_INCLUDE_DEPTH {
        return Err(Error::new(ErrorKind::IncludeOverflow {
            path: path.to_path_buf(),
        }));
    }
    if stack.iter().any(|seen| seen == path) {
        // Internal marker, skipped by the including manifest.
        return Err(Error::new(ErrorKind::CircularInclude {
            path: path.to_path_buf(),
        }));
    }

    let manifest = raw::decode_manifest(path, data)?;
    let at_root = stack.is_empty();
    if manifest.files.is_empty() && at_root {
        return Err(Error::new(ErrorKind::EmptyManifest {
            path: path.to_path_buf(),
        }));
    }

    stack.push(path.to_path_buf());
    let merged = include_files(path, &manifest.files, stack);
    stack.pop();
    let (merged, processed) = merged?;

    // A root manifest whose every include was cyclic or self-referential
    // produced nothing usable.
    if at_root && processed == 0 {
        return Err(Error::new(ErrorKind::EmptyManifest {
            path: path.to_path_buf(),
        }));
    }
    Ok(merged)
}

fn include_files(
    manifest_path: &Path,
    files: &[String],
    stack: &mut Vec<PathBuf>,
) -> Result<(RawWorldData, usize)> {
    let dir = manifest_path.parent().unwrap_or_else(|| Path::new(""));
    let mut merged = RawWorldData::default();
    let mut processed = 0;
    for rel in files {
        let included = dir.join(rel);
        let part = match resolve(&included, stack) {
            Ok(part) => part,
            Err(e) if e.is_circular_include() => continue,
            Err(e) => return Err(e),
        };
        merge(&mut merged, part, manifest_path)?;
        processed += 1;
    }
    Ok((merged, processed))
}

// At most one definition in the whole inclusion tree may set the start
// room; entity lists are concatenated in include order.
fn merge(into: &mut RawWorldData, part: RawWorldData, at: &Path) -> Result<()> {
    if !part.world.start.is_empty() {
        if !into.world.start.is_empty() {
            return Err(Error::new(ErrorKind::DuplicateStart {
                path: at.to_path_buf(),
                existing: into.world.start.clone(),
            }));
        }
        into.world.start = part.world.start;
    }
    into.rooms.extend(part.rooms);
    into.npcs.extend(part.npcs);
    into.pronouns.extend(part.pronouns);
    into.items.extend(part.items);
    into.flags.extend(part.flags);
    Ok(())
}

// Lexical normalization so the same file spelled two ways lands on one
// stack entry. Does not touch the filesystem.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for part in path.components() {
        match part {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(".");
    }
    cleaned
}
