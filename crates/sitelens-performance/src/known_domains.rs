//! Score bands for well-known domains, so synthetic demos look realistic.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::PerformanceError;

/// Inclusive range a synthetic performance score is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ScoreBand {
    pub min_score: u8,
    pub max_score: u8,
}

impl ScoreBand {
    /// Band used for any domain not in the table.
    pub const DEFAULT: ScoreBand = ScoreBand {
        min_score: 45,
        max_score: 94,
    };

    #[must_use]
    pub const fn new(min_score: u8, max_score: u8) -> Self {
        Self {
            min_score,
            max_score,
        }
    }

    /// Picks a score inside the band from `seed`.
    #[must_use]
    pub fn pick(self, seed: u32) -> u8 {
        let width = u32::from(self.max_score.saturating_sub(self.min_score)) + 1;
        let offset = u8::try_from(seed % width).unwrap_or(0);
        self.min_score + offset
    }
}

const BUILTIN: &[(&str, ScoreBand)] = &[
    ("google.com", ScoreBand::new(90, 98)),
    ("wikipedia.org", ScoreBand::new(92, 99)),
    ("stripe.com", ScoreBand::new(85, 95)),
    ("github.com", ScoreBand::new(80, 90)),
    ("apple.com", ScoreBand::new(78, 88)),
    ("shopify.com", ScoreBand::new(75, 88)),
    ("microsoft.com", ScoreBand::new(70, 82)),
    ("youtube.com", ScoreBand::new(70, 80)),
    ("netflix.com", ScoreBand::new(68, 80)),
    ("amazon.com", ScoreBand::new(65, 78)),
    ("airbnb.com", ScoreBand::new(60, 75)),
    ("notion.so", ScoreBand::new(60, 72)),
    ("hubspot.com", ScoreBand::new(55, 70)),
    ("facebook.com", ScoreBand::new(55, 70)),
    ("salesforce.com", ScoreBand::new(45, 60)),
];

#[derive(Debug, Deserialize)]
struct KnownDomainEntry {
    domain: String,
    #[serde(flatten)]
    band: ScoreBand,
}

#[derive(Debug, Deserialize)]
struct KnownDomainsFile {
    domains: Vec<KnownDomainEntry>,
}

/// Lookup table from domain to [`ScoreBand`].
///
/// A host matches an entry when it equals the entry's domain or is one of
/// its subdomains (`shop.example.com` matches `example.com`).
#[derive(Debug, Clone)]
pub struct KnownDomains {
    entries: Vec<(String, ScoreBand)>,
}

impl Default for KnownDomains {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnownDomains {
    /// The built-in table.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN
                .iter()
                .map(|(domain, band)| ((*domain).to_string(), *band))
                .collect(),
        }
    }

    /// An empty table: every domain gets [`ScoreBand::DEFAULT`].
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Built-in table with entries from a YAML file layered on top.
    ///
    /// File entries replace built-in entries for the same domain.
    ///
    /// # Errors
    ///
    /// Returns [`PerformanceError`] if the file cannot be read, parsed, or
    /// contains an invalid entry.
    pub fn load(path: &Path) -> Result<Self, PerformanceError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| PerformanceError::KnownDomainsIo {
                path: path.display().to_string(),
                source: e,
            })?;
        Self::builtin().with_yaml(&content)
    }

    fn with_yaml(mut self, content: &str) -> Result<Self, PerformanceError> {
        let file: KnownDomainsFile = serde_yaml::from_str(content)?;
        validate(&file)?;

        for entry in file.domains {
            let domain = normalize_domain(&entry.domain);
            self.entries.retain(|(d, _)| *d != domain);
            self.entries.push((domain, entry.band));
        }
        Ok(self)
    }

    /// Band for `host` (already lowercased, without `www.`).
    #[must_use]
    pub fn band_for(&self, host: &str) -> Option<ScoreBand> {
        self.entries
            .iter()
            .filter(|(domain, _)| {
                host == domain.as_str()
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            // Prefer the most specific match.
            .max_by_key(|(domain, _)| domain.len())
            .map(|(_, band)| *band)
    }
}

fn normalize_domain(raw: &str) -> String {
    let lower = raw.trim().to_ascii_lowercase();
    lower.strip_prefix("www.").unwrap_or(&lower).to_string()
}

fn validate(file: &KnownDomainsFile) -> Result<(), PerformanceError> {
    let mut seen = HashSet::new();
    for entry in &file.domains {
        let domain = normalize_domain(&entry.domain);
        if domain.is_empty() {
            return Err(PerformanceError::KnownDomainsValidation(
                "domain must not be empty".to_string(),
            ));
        }
        if entry.band.min_score > entry.band.max_score || entry.band.max_score > 100 {
            return Err(PerformanceError::KnownDomainsValidation(format!(
                "'{domain}': expected min_score <= max_score <= 100, got {}..{}",
                entry.band.min_score, entry.band.max_score
            )));
        }
        if !seen.insert(domain.clone()) {
            return Err(PerformanceError::KnownDomainsValidation(format!(
                "duplicate domain: '{domain}'"
            )));
        }
    }
    Ok(())
}
