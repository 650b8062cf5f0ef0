//! Column mapping from source headers onto canonical round fields.
//!
//! Feeds rename their fields between revisions (`drawDate` vs `date`,
//! `drawCRS` vs `crsScore`), and the CSV exports use long localized headers.
//! Mapping is done in two passes: exact names first (the canonical name or a
//! configured alias), then substring tokens for whatever is still unresolved.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Logical fields the rest of the pipeline depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Date,
    Score,
    InvitationCount,
    ProgramName,
    DrawNumber,
    /// Optional round sub-category (MPNP "Subtipo"); only mapped when a rule asks for it.
    Subtype,
}

impl CanonicalField {
    /// The five fields every source is expected to provide.
    pub const CORE: [CanonicalField; 5] = [
        CanonicalField::Date,
        CanonicalField::Score,
        CanonicalField::InvitationCount,
        CanonicalField::ProgramName,
        CanonicalField::DrawNumber,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CanonicalField::Date => "date",
            CanonicalField::Score => "score",
            CanonicalField::InvitationCount => "invitation_count",
            CanonicalField::ProgramName => "program_name",
            CanonicalField::DrawNumber => "draw_number",
            CanonicalField::Subtype => "subtype",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How one canonical field is recognized among source columns.
///
/// `exact` aliases are compared against the whole normalized column name.
/// A heuristic match needs at least one `any_of` token (when any are given)
/// and every `all_of` token as substrings. A rule with no tokens only ever
/// matches exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRule {
    pub field: CanonicalField,
    #[serde(default)]
    pub exact: Vec<String>,
    #[serde(default)]
    pub any_of: Vec<String>,
    #[serde(default)]
    pub all_of: Vec<String>,
}

impl FieldRule {
    /// Rule with the default substring tokens for `field`.
    pub fn heuristic(field: CanonicalField) -> Self {
        let (any_of, all_of): (&[&str], &[&str]) = match field {
            CanonicalField::Date => (&["date"], &[]),
            CanonicalField::Score => (&["crs", "score"], &[]),
            CanonicalField::InvitationCount => (&["size", "invitations"], &[]),
            CanonicalField::ProgramName => (&["name", "program"], &[]),
            CanonicalField::DrawNumber => (&[], &["number", "draw"]),
            CanonicalField::Subtype => (&[], &[]),
        };
        Self {
            field,
            exact: Vec::new(),
            any_of: any_of.iter().map(|s| s.to_string()).collect(),
            all_of: all_of.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Add exact column aliases (compared case-insensitively).
    #[must_use]
    pub fn with_exact(mut self, aliases: &[&str]) -> Self {
        self.exact
            .extend(aliases.iter().map(|alias| normalize_column(alias)));
        self
    }

    fn matches_exact(&self, column: &str) -> bool {
        column == self.field.name()
            || self
                .exact
                .iter()
                .any(|alias| normalize_column(alias) == column)
    }

    fn matches_tokens(&self, column: &str) -> bool {
        if self.any_of.is_empty() && self.all_of.is_empty() {
            return false;
        }
        let any = self.any_of.is_empty()
            || self
                .any_of
                .iter()
                .any(|token| column.contains(&normalize_column(token)));
        any && self
            .all_of
            .iter()
            .all(|token| column.contains(&normalize_column(token)))
    }
}

/// Heuristic rules for the five core fields, in canonical order.
pub fn default_rules() -> Vec<FieldRule> {
    CanonicalField::CORE
        .iter()
        .map(|field| FieldRule::heuristic(*field))
        .collect()
}

/// Case-folded, trimmed column name.
pub fn normalize_column(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_lowercase()
}

/// Result of mapping a set of source columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaMap {
    mapping: BTreeMap<CanonicalField, String>,
    #[serde(skip)]
    indices: BTreeMap<CanonicalField, usize>,
    unresolved: BTreeSet<CanonicalField>,
}

impl SchemaMap {
    /// Source column mapped to `field`, if any.
    pub fn column(&self, field: CanonicalField) -> Option<&str> {
        self.mapping.get(&field).map(String::as_str)
    }

    /// Position of the claimed column. Unlike a lookup by name, this stays
    /// correct when a source repeats a header.
    pub fn index(&self, field: CanonicalField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn mapping(&self) -> &BTreeMap<CanonicalField, String> {
        &self.mapping
    }

    /// Fields that had a rule but no matching column.
    pub fn unresolved(&self) -> &BTreeSet<CanonicalField> {
        &self.unresolved
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Map `columns` onto the canonical fields described by `rules`.
///
/// Exact matches are claimed before any substring heuristic runs, so a source
/// already using canonical names maps onto itself. Within a pass the first
/// unclaimed column in iteration order wins, and a column is never given to
/// two fields.
pub fn map_columns<S: AsRef<str>>(columns: &[S], rules: &[FieldRule]) -> SchemaMap {
    let normalized: Vec<String> = columns
        .iter()
        .map(|c| normalize_column(c.as_ref()))
        .collect();
    let mut claimed = vec![false; columns.len()];
    let mut indices: BTreeMap<CanonicalField, usize> = BTreeMap::new();

    for rule in rules {
        if indices.contains_key(&rule.field) {
            continue;
        }
        if let Some(idx) = (0..columns.len()).find(|&i| !claimed[i] && rule.matches_exact(&normalized[i])) {
            claimed[idx] = true;
            indices.insert(rule.field, idx);
        }
    }

    for rule in rules {
        if indices.contains_key(&rule.field) {
            continue;
        }
        if let Some(idx) = (0..columns.len()).find(|&i| !claimed[i] && rule.matches_tokens(&normalized[i])) {
            claimed[idx] = true;
            indices.insert(rule.field, idx);
        }
    }

    let mapping: BTreeMap<CanonicalField, String> = indices
        .iter()
        .map(|(field, &idx)| (*field, columns[idx].as_ref().to_string()))
        .collect();

    let unresolved = rules
        .iter()
        .map(|rule| rule.field)
        .filter(|field| !mapping.contains_key(field))
        .collect();

    SchemaMap {
        mapping,
        indices,
        unresolved,
    }
}
