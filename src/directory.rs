// 🏢 Company Directory - Pattern Library for carrier matching
// Normalizes known carrier names into match keys and holds alias overrides
//
// "STARBUCKS *123" style noise does not exist here, but the same problem does:
// - "kel logistics unit D" must resolve to "KEL LOGISTICS INC"
// - "J&P Logistics" must resolve to "J&P LOGISTICS USA INC."
// - Hand-picked aliases win over the full directory

use anyhow::{Context, Result};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::extract::UNKNOWN;

// ============================================================================
// MATCH KEY NORMALIZATION
// ============================================================================

/// Legal-suffix stripper. Must run on the still-spaced, upper-cased name so
/// the suffix is matched as a whole trailing word, not a substring.
fn suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\s+(INC|LLC|CORP|INCORPORATED|CORPORATION)\.?$")
            .expect("suffix regex is valid")
    })
}

/// Build the match key for a canonical carrier name.
///
/// Steps, strictly in order:
/// 1. upper-case
/// 2. remove exactly one trailing legal-suffix token (optional period)
/// 3. delete everything that is not an ASCII letter or digit
pub fn match_key(canonical_name: &str) -> String {
    let upper = canonical_name.to_uppercase();
    let stripped = suffix_re().replace(&upper, "");
    stripped
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Normalize free message text for substring matching.
/// Unlike `match_key`, input text keeps its legal suffixes.
pub fn normalize_text(text: &str) -> String {
    text.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

// ============================================================================
// DIRECTORY ENTRIES
// ============================================================================

/// One scan entry: a normalized key mapping to a canonical carrier name.
///
/// Aliases and directory entries live in a single priority-ordered list so
/// the "aliases first, then directory order, first match wins" rule is one
/// linear scan instead of two separate structures.
#[derive(Debug, Clone)]
pub struct MatchEntry {
    pub key: String,
    pub canonical_name: String,
    pub is_alias: bool,
}

/// Read-only lookup table of known carriers, built once at startup.
///
/// Entry order IS match priority: earlier entries win. The constructor
/// preserves the declared order of the alias map and of the company list,
/// with all aliases ahead of all companies.
pub struct CompanyDirectory {
    entries: Vec<MatchEntry>,
}

impl CompanyDirectory {
    /// Build a directory from canonical names plus an alias map.
    pub fn new(companies: &[&str], aliases: &IndexMap<String, String>) -> Self {
        let mut entries = Vec::with_capacity(aliases.len() + companies.len());

        for (alias, canonical_name) in aliases {
            entries.push(MatchEntry {
                key: normalize_text(alias),
                canonical_name: canonical_name.clone(),
                is_alias: true,
            });
        }

        for name in companies {
            entries.push(MatchEntry {
                key: match_key(name),
                canonical_name: (*name).to_string(),
                is_alias: false,
            });
        }

        CompanyDirectory { entries }
    }

    /// Directory with the built-in carrier list and aliases pre-loaded.
    pub fn with_defaults() -> Self {
        let mut aliases = IndexMap::new();
        for (alias, name) in DEFAULT_ALIASES {
            aliases.insert((*alias).to_string(), (*name).to_string());
        }
        CompanyDirectory::new(DEFAULT_COMPANIES, &aliases)
    }

    /// Load a directory from a JSON file:
    /// `{ "companies": [...], "aliases": { "KELLOG": "KEL LOGISTICS INC" } }`
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read companies file: {:?}", path.as_ref()))?;

        let file: DirectoryFile =
            serde_json::from_str(&content).context("Failed to parse companies JSON")?;

        let companies: Vec<&str> = file.companies.iter().map(String::as_str).collect();
        Ok(CompanyDirectory::new(&companies, &file.aliases))
    }

    /// Match free message text against the directory.
    ///
    /// Returns the canonical name of the first entry whose key is a substring
    /// of the normalized text, or "Unknown". First match in declared order
    /// wins; there is deliberately no longest-match or scoring logic.
    pub fn match_company(&self, text: &str) -> String {
        let normalized = normalize_text(text);

        for entry in &self.entries {
            if !entry.key.is_empty() && normalized.contains(&entry.key) {
                return entry.canonical_name.clone();
            }
        }

        UNKNOWN.to_string()
    }

    /// Number of scan entries (aliases + companies)
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Deserialize)]
struct DirectoryFile {
    companies: Vec<String>,
    #[serde(default)]
    aliases: IndexMap<String, String>,
}

// ============================================================================
// BUILT-IN CARRIER LIST
// ============================================================================

/// Known carriers, in priority order. Order must be preserved: it decides
/// which entry wins when several keys match the same text.
pub const DEFAULT_COMPANIES: &[&str] = &[
    "7 LUV Transporting inc",
    "AAJ COM LLC",
    "Acarsan Inc",
    "AJ PARTNERS LLC",
    "AJS Express LLC",
    "ALL STATE INC",
    "ALLIANSAS INC",
    "ALMA CARRIERS CORP",
    "Amana cargo",
    "AMG LINE LLC",
    "AMPM TRANSPORT INC",
    "ASIL FREIGHT LLC",
    "BALDAN TRANSPORT INC",
    "BARRE LOGISTICS LLC",
    "CASPIAN EXPRESS INC",
    "Chuiko Logistics Corporation",
    "CME TRUCKING LLC",
    "COLD AIRFLOW LLC",
    "Craiden Logistics Inc",
    "DAMY TRANSPORTATION LLC",
    "DLD LOGISTICS LLC",
    "Dos cargo inc",
    "Draw Express inc",
    "DRAWX INC",
    "E & R FREIGHT TRUCKING LLC",
    "EMPOWER LOGISTIC INC",
    "ERI TRUCKING LLC",
    "EURO POWER LLC",
    "FLYING HORSE EXPRESS LLC",
    "FORTUNE TRANSPORTATION INC",
    "Four Ways Logistics II Inc",
    "FREIGHT BRIDGE LLC",
    "Freight Stream Group LLC",
    "FROM POINT TO POINT INC",
    "GMR XPRESS INCORPORATED",
    "GREENWAY TRANSPORT LLC",
    "Heyla Transport LLC",
    "Instant Trucking INC",
    "J&A PRESTIGE TRANSPORT SERVICES LLC",
    "J&P LOGISTICS USA INC.",
    "Javohir TRUCKING LLC",
    "JAY TORRES LLC",
    "JB RUNNER LLC",
    "JMI TRANSPORT LLC",
    "JUZZ FREIGHT INC",
    "KEL LOGISTICS INC",
    "KEL TRANS INC",
    "KG 996 INC",
    "KG LINE GROUP INCORPORATED",
    "KINGS GATE INC",
    "Kuumade Trucking LLC",
    "Losev Trucking LLC",
    "Lyndon Express LLC",
    "MAA USA EXPRESS",
    "MAKGA INC",
    "MAKOVSKI INC",
    "MARRX LLC",
    "MGAL Corp",
    "MOVE OPS",
    "MZX INC",
    "NAIMAN EXPRESS",
    "NEMO EXPRESS INC",
    "NK PERFORMANCE INC",
    "OWNERLER EXPRESS INC",
    "PREMIUM AMERICAN PARTNER INC",
    "RAYNE 2 LOGISTICS INC",
    "RLJ TRUCKING INC",
    "SAKARA LLC",
    "SANLUIS EXPRESS LLC",
    "SCOTT CARTAGE CO INC",
    "Shiba Trucking LLC",
    "STEEL EXPRESS INC",
    "Sterling Express Inc",
    "TAVICO LLC",
    "TRANSNATIONAL EXPERTS INC",
    "Truckzilla INC",
    "TUTASH EXPRESS INC",
    "UK Express INC",
    "United Freight Service Inc",
    "US LOAD RUN INC",
    "USA TRUCKLINK LLC",
    "USTA LOGISTICS INC",
    "UZB TRANS INC",
    "VILA TRUCKING INC",
    "YES WE CAN TRANSPORTATION LLC",
    "ZR Trans LLC",
];

/// Hand-picked abbreviations seen in the chat. Checked before the directory.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("KELLOG", "KEL LOGISTICS INC"),
    ("UNITEDFREIGHT", "United Freight Service Inc"),
    ("GMRXPRESS", "GMR XPRESS INCORPORATED"),
    ("JAVOHIR", "Javohir TRUCKING LLC"),
];

// ============================================================================
// TESTS
// ============================================================================
