// src/normalize/names.rs

use std::collections::HashSet;
use tracing::warn;

/// Make column names unique without dropping any column.
///
/// The first occurrence of a name keeps it. Every later duplicate gets
/// `<name><sep><n>` with the smallest `n >= 1` that is neither an input
/// name nor already assigned, so `["a", "a", "a_1"]` becomes
/// `["a", "a_2", "a_1"]`.
pub fn dedup_names(names: Vec<String>, sep: &str) -> Vec<String> {
    let originals: HashSet<String> = names.iter().cloned().collect();
    if originals.len() == names.len() {
        return names;
    }

    let mut used: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if used.insert(name.clone()) {
            out.push(name);
            continue;
        }
        let mut n = 1usize;
        let renamed = loop {
            let candidate = format!("{}{}{}", name, sep, n);
            if !originals.contains(&candidate) && !used.contains(&candidate) {
                break candidate;
            }
            n += 1;
        };
        warn!(column = %name, renamed = %renamed, "duplicate column name");
        used.insert(renamed.clone());
        out.push(renamed);
    }

    out
}
