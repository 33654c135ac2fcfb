//! Combination name decomposition against the part tables.

use crate::models::{BladeLine, DecomposedParts, PartDefinition, PartTables};

/// Lower-case and drop whitespace so "Dran Sword 3-60 F" matches "DranSword3-60F".
fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Longest candidate (by name or abbreviation) that prefixes `input`.
/// Ties keep the earliest table row.
fn longest_prefix<'a, P, I>(input: &str, candidates: I) -> Option<(&'a P, usize)>
where
    P: PartDefinition + 'a,
    I: IntoIterator<Item = &'a P>,
{
    let mut best: Option<(&'a P, usize)> = None;

    for part in candidates {
        let keys = std::iter::once(part.name()).chain(part.abbreviation());
        for key in keys {
            let key = compact(key);
            if key.is_empty() || !input.starts_with(&key) {
                continue;
            }
            if best.map_or(true, |(_, len)| key.len() > len) {
                best = Some((part, key.len()));
            }
        }
    }

    best
}

/// Candidate whose full name or abbreviation equals `input`.
fn exact<'a, P, I>(input: &str, candidates: I) -> Option<&'a P>
where
    P: PartDefinition + 'a,
    I: IntoIterator<Item = &'a P>,
{
    candidates.into_iter().find(|part| {
        compact(part.name()) == input || part.abbreviation().is_some_and(|a| compact(a) == input)
    })
}

/// Split a combination name into its parts.
///
/// Custom-line combinations are read as lockchip, blade, optional assist
/// blade, ratchet, bit. Other lines are read as blade, ratchet, bit, with the
/// blade search restricted to the given line when the table has blades of
/// that line. Slots that cannot be resolved stay `None`.
pub fn decompose(
    name: &str,
    blade_line: Option<BladeLine>,
    tables: &PartTables,
) -> DecomposedParts {
    let mut parts = DecomposedParts::default();
    let full = compact(name);
    let mut rest = full.as_str();

    let is_custom = blade_line == Some(BladeLine::Custom);

    if is_custom {
        if let Some((lockchip, len)) = longest_prefix(rest, &tables.lockchips) {
            parts.lockchip = Some(lockchip.name.clone());
            rest = &rest[len..];
        }
    }

    let line_blades: Vec<_> = match blade_line {
        Some(line) if tables.blades.iter().any(|b| b.line == Some(line)) => tables
            .blades
            .iter()
            .filter(|b| b.line == Some(line))
            .collect(),
        _ => tables.blades.iter().collect(),
    };
    if let Some((blade, len)) = longest_prefix(rest, line_blades) {
        parts.blade = Some(blade.name.clone());
        rest = &rest[len..];
    }

    if is_custom && longest_prefix(rest, &tables.ratchets).is_none() {
        if let Some((assist, len)) = longest_prefix(rest, &tables.assist_blades) {
            parts.assist_blade = Some(assist.name.clone());
            rest = &rest[len..];
        }
    }

    if let Some((ratchet, len)) = longest_prefix(rest, &tables.ratchets) {
        parts.ratchet = Some(ratchet.name.clone());
        rest = &rest[len..];
    }

    let bit = exact(rest, &tables.bits)
        .or_else(|| longest_prefix(rest, &tables.bits).map(|(bit, _)| bit));
    parts.bit = bit.map(|b| b.name.clone());

    parts
}
