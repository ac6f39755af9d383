use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A candidate domain produced by the generator, normalized and split into
/// its registrable part and public suffix.
///
/// `example.co.uk` splits into registrable part `example` and public suffix
/// `co.uk`. Candidates are equal when their full names are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDomain {
    pub fqdn: String,
    pub registrable_part: String,
    pub public_suffix: String,
}

impl CandidateDomain {
    /// Normalize raw input and derive the suffix split.
    ///
    /// Accepts scheme-prefixed and mixed-case input (`https://Example.COM/`)
    /// since generated text is not always clean.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let fqdn = normalize(input);
        if fqdn.is_empty() {
            return Err(DomainError::InvalidDomainName(input.to_string()));
        }

        let parsed = psl::domain(fqdn.as_bytes())
            .ok_or_else(|| DomainError::InvalidDomainName(fqdn.clone()))?;

        let suffix = std::str::from_utf8(parsed.suffix().as_bytes())
            .map_err(|_| DomainError::InvalidDomainName(fqdn.clone()))?
            .to_string();
        let root = std::str::from_utf8(parsed.as_bytes())
            .map_err(|_| DomainError::InvalidDomainName(fqdn.clone()))?;

        if root.len() <= suffix.len() {
            return Err(DomainError::InvalidDomainName(fqdn));
        }
        let registrable_part = root[..root.len() - suffix.len() - 1].to_string();

        Ok(Self {
            fqdn,
            registrable_part,
            public_suffix: suffix,
        })
    }
}

impl PartialEq for CandidateDomain {
    fn eq(&self, other: &Self) -> bool {
        self.fqdn == other.fqdn
    }
}

impl Eq for CandidateDomain {}

impl Hash for CandidateDomain {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.fqdn.hash(state);
    }
}

fn normalize(input: &str) -> String {
    let mut s = input.trim();
    if let Some(rest) = s.strip_prefix("https://") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("http://") {
        s = rest;
    }
    let s = s.split('/').next().unwrap_or("");
    s.trim().to_lowercase()
}
