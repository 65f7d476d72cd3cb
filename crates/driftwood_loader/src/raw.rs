//! On-disk mirror types and decoding.
//!
//! Every world file is TOML with two header keys at the top level:
//! `format = "DRIFTWOOD"` and `type = "DATA"` or `type = "MANIFEST"`.
//! These types mirror the file layout one key to one field; no checking
//! beyond decode happens here, which is why field docs are elided.
//! [`scan_header`] reads only the header so file dispatch never depends
//! on the body being well formed.

use driftwood_foundation::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// The format tag every world file must declare.
pub const FORMAT_TAG: &str = "DRIFTWOOD";

/// The two header keys shared by all file types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileHeader {
    /// Must be [`FORMAT_TAG`], case-insensitive.
    pub format: String,
    /// "DATA" or "MANIFEST", case-insensitive.
    #[serde(rename = "type")]
    pub file_type: String,
}

/// A manifest file: a list of paths to include, relative to the manifest.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawManifest {
    /// Header format tag.
    pub format: String,
    /// Header type tag.
    #[serde(rename = "type")]
    pub file_type: String,
    /// Included paths in declaration order.
    pub files: Vec<String>,
}

/// A data file body, or several of them merged by the resolver.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWorldData {
    /// Header format tag.
    pub format: String,
    /// Header type tag.
    #[serde(rename = "type")]
    pub file_type: String,
    /// World-level settings.
    pub world: RawWorldMeta,
    /// Room definitions.
    #[serde(rename = "room")]
    pub rooms: Vec<RawRoom>,
    /// NPC definitions.
    #[serde(rename = "npc")]
    pub npcs: Vec<RawNpc>,
    /// Global custom pronoun sets.
    pub pronouns: Vec<RawPronounSet>,
    /// Item definitions.
    #[serde(rename = "item")]
    pub items: Vec<RawItem>,
    /// Flag declarations.
    #[serde(rename = "flag")]
    pub flags: Vec<RawFlag>,
}

/// The `[world]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWorldMeta {
    /// Label of the room the player starts in.
    pub start: String,
}

/// One `[[room]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawRoom {
    pub label: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "exit")]
    pub exits: Vec<RawEgress>,
    #[serde(rename = "detail")]
    pub details: Vec<RawDetail>,
}

/// One `[[room.exit]]` table. A blank label gets one auto-assigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawEgress {
    pub label: String,
    pub dest: String,
    pub description: String,
    pub message: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    #[serde(rename = "if")]
    pub guard: String,
}

/// One `[[room.detail]]` table. A blank label gets one auto-assigned.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawDetail {
    pub label: String,
    pub aliases: Vec<String>,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(rename = "if")]
    pub guard: String,
}

/// One `[[item]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawItem {
    pub label: String,
    pub name: String,
    pub description: String,
    pub aliases: Vec<String>,
    pub tags: Vec<String>,
    /// A room label, or `@INVEN` for the player inventory.
    pub start: String,
    #[serde(rename = "if")]
    pub guard: String,
    #[serde(rename = "use")]
    pub on_use: Vec<RawUseAction>,
}

/// One `[[item.use]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawUseAction {
    /// Required partners: concrete labels or `@`-prefixed tag references.
    pub with: Vec<String>,
    #[serde(rename = "if")]
    pub guard: String,
    #[serde(rename = "do")]
    pub effect: Vec<String>,
}

/// One `[[npc]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawNpc {
    pub label: String,
    pub name: String,
    pub aliases: Vec<String>,
    /// Reference to a named pronoun set. Mutually exclusive with
    /// `custom_pronoun_set`.
    pub pronouns: String,
    pub custom_pronoun_set: Option<RawPronounSet>,
    pub description: String,
    pub start: String,
    pub movement: RawRoute,
    #[serde(rename = "line")]
    pub dialogs: Vec<RawDialogStep>,
    pub tags: Vec<String>,
    #[serde(rename = "if")]
    pub guard: String,
}

/// The `[npc.movement]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawRoute {
    /// "STATIC", "PATROL", or "WANDER".
    pub action: String,
    pub path: Vec<String>,
    pub allowed: Vec<String>,
    pub forbidden: Vec<String>,
}

/// One `[[npc.line]]` dialog step.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawDialogStep {
    /// "LINE", "CHOICE", "END", or "PAUSE".
    pub action: String,
    pub label: String,
    pub content: String,
    pub response: String,
    /// (prompt, target-label) pairs, CHOICE only.
    pub choices: Vec<Vec<String>>,
    #[serde(rename = "continue")]
    pub resume: String,
}

/// One `[[pronouns]]` table, or an NPC's inline `custom_pronoun_set`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
#[allow(missing_docs)]
pub struct RawPronounSet {
    pub label: String,
    pub nominative: String,
    pub objective: String,
    pub possessive: String,
    pub determiner: String,
    pub reflexive: String,
    pub plural: bool,
}

/// One `[[flag]]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawFlag {
    pub label: String,
    /// Initial value; any TOML scalar.
    pub default: Option<toml::Value>,
}

/// Reads the header keys without decoding the body: only the bytes up to
/// the first line that opens a table are fed to the decoder.
pub fn scan_header(path: &Path, data: &str) -> Result<FileHeader> {
    let mut header_len = data.len();
    let mut offset = 0;
    for line in data.split_inclusive('\n') {
        if line.trim_start().starts_with('[') {
            header_len = offset;
            break;
        }
        offset += line.len();
    }
    toml::from_str(&data[..header_len])
        .map_err(|e| Error::decode(path, format!("detecting file type: {e}")))
}

/// Decodes a full data file body.
pub fn decode_world(path: &Path, data: &str) -> Result<RawWorldData> {
    toml::from_str(data).map_err(|e| Error::decode(path, e.to_string()))
}

/// Decodes a manifest body.
pub fn decode_manifest(path: &Path, data: &str) -> Result<RawManifest> {
    toml::from_str(data).map_err(|e| Error::decode(path, e.to_string()))
}
