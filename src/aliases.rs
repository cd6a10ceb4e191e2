use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::normalize::normalize_name;
use crate::roster::PlayerId;

const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("vj edgecomb", "vj edgecombe"),
    ("vj edgecome", "vj edgecombe"),
    ("vj edgecom", "vj edgecombe"),
    ("v j edgecombe", "vj edgecombe"),
    ("valdez drexel v j edgecombe", "vj edgecombe"),
    ("vit krejci", "vít krejčí"),
    ("luka doncic", "luka dončić"),
    ("jakob poeltl", "jakob pöltl"),
    ("lester quiñones", "lester quinones"),
    ("pacome dadiet", "pacôme dadiet"),
    ("monte morris", "monté morris"),
    ("taze moore", "tazé moore"),
    ("isiah crawford", "isaiah crawford"),
    ("hood schifino jalen", "jalen hood schifino"),
    ("hood schifino", "jalen hood schifino"),
    ("dariq miller whitehead", "dariq whitehead"),
];

/// Known misspellings mapped to the name they should be resolved as.
///
/// Keys are stored normalized, so entries may be written in any spelling.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: HashMap<String, String>,
}

impl AliasTable {
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ALIASES.iter().copied())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::default();
        for (alias, target) in pairs {
            table.insert(alias, target);
        }
        table
    }

    pub fn insert(&mut self, alias: &str, target: &str) {
        self.entries
            .insert(normalize_name(alias), target.to_string());
    }

    /// Normalized target for an already normalized name.
    pub fn rewrite(&self, normalized: &str) -> Option<String> {
        self.entries.get(normalized).map(|target| normalize_name(target))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds entries from a JSON object of `{"alias": "target"}`.
    pub fn extend_from_json_file(&mut self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read alias file {}", path.display()))?;
        let parsed: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid alias json in {}", path.display()))?;
        let added = parsed.len();
        for (alias, target) in &parsed {
            self.insert(alias, target);
        }
        Ok(added)
    }
}

/// Explicit ids for players the roster listing does not carry.
#[derive(Debug, Clone, Default)]
pub struct ManualOverrideTable {
    entries: HashMap<String, PlayerId>,
}

impl ManualOverrideTable {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, PlayerId)>) -> Self {
        let mut table = Self::default();
        for (name, id) in pairs {
            table.insert(name, id);
        }
        table
    }

    pub fn insert(&mut self, name: &str, id: PlayerId) {
        self.entries.insert(normalize_name(name), id);
    }

    pub fn get(&self, normalized: &str) -> Option<PlayerId> {
        self.entries.get(normalized).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds entries from a JSON object of `{"name": id}`.
    pub fn extend_from_json_file(&mut self, path: &Path) -> Result<usize> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read manual id file {}", path.display()))?;
        let parsed: HashMap<String, PlayerId> = serde_json::from_str(&raw)
            .with_context(|| format!("invalid manual id json in {}", path.display()))?;
        let added = parsed.len();
        for (name, id) in &parsed {
            self.insert(name, *id);
        }
        Ok(added)
    }
}
