//! Field-name similarity heuristics for Oracle-style column naming
//!
//! Column names in the source documents follow a `PREFIX_SUFFIX` convention
//! (`COD_LCT`, `NUM_LANCAMENTO`) with Portuguese abbreviations. The tables
//! below encode that vocabulary.

use std::collections::HashSet;

/// Prefixes that carry the role of a column
pub static DOMAIN_PREFIXES: &[&str] = &[
    "COD_", "NUM_", "ID_", "IND_", "DAT_", "SGL_", "DSC_", "VLR_", "QTD_", "ANO_", "MES_",
];

/// Abbreviation and its expansion
pub static ABBREVIATIONS: &[(&str, &str)] = &[
    ("LCT", "LANCAMENTO"),
    ("CTZ", "CONTABILIZACAO"),
    ("FLC", "FLC"),
    ("FOL", "FOLHA"),
    ("LIN", "LINHA"),
    ("ORG", "ORIGEM"),
    ("CTB", "CONTABIL"),
    ("CNTBL", "CONTABIL"),
    ("LACTO", "LANCAMENTO"),
];

/// Connective words ignored when comparing name tokens
pub static STOP_WORDS: &[&str] = &["DE", "DO", "DA", "EM", "A", "O", "E", "PARA", "COM"];

pub const IDENTICAL_SCORE: f64 = 1.0;
pub const CONTAINS_SCORE: f64 = 0.8;
pub const PREFIX_SCORE: f64 = 0.75;
pub const KEYWORD_SCORE: f64 = 0.7;

/// Upper-case and collapse runs of underscores
pub fn normalize_name(name: &str) -> String {
    let upper = name.trim().to_uppercase();
    let mut out = String::with_capacity(upper.len());
    for c in upper.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Score two field names; both must already be normalized
pub fn name_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        IDENTICAL_SCORE
    } else if a.contains(b) || b.contains(a) {
        CONTAINS_SCORE
    } else if shares_domain_prefix(a, b) {
        PREFIX_SCORE
    } else if shares_keywords(a, b) {
        KEYWORD_SCORE
    } else {
        0.0
    }
}

/// Both names carry the same domain prefix and their suffixes match,
/// directly or through the abbreviation table
pub fn shares_domain_prefix(a: &str, b: &str) -> bool {
    DOMAIN_PREFIXES.iter().any(|prefix| {
        match (a.strip_prefix(prefix), b.strip_prefix(prefix)) {
            (Some(sa), Some(sb)) => sa.contains(sb) || sb.contains(sa) || are_abbreviations(sa, sb),
            _ => false,
        }
    })
}

pub fn expand_abbreviation(token: &str) -> &str {
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == token)
        .map(|(_, full)| *full)
        .unwrap_or(token)
}

pub fn are_abbreviations(a: &str, b: &str) -> bool {
    let ea = expand_abbreviation(a);
    let eb = expand_abbreviation(b);
    ea == eb || ea.contains(eb) || eb.contains(ea)
}

/// Share at least two tokens, or half of the smaller token set
pub fn shares_keywords(a: &str, b: &str) -> bool {
    let wa = keywords(a);
    let wb = keywords(b);
    let shared = wa.intersection(&wb).count();

    if shared >= 2 {
        return true;
    }

    let smaller = wa.len().min(wb.len());
    smaller > 0 && shared as f64 / smaller as f64 >= 0.5
}

fn keywords(name: &str) -> HashSet<&str> {
    name.split('_')
        .filter(|word| !word.is_empty() && !STOP_WORDS.contains(word))
        .collect()
}
