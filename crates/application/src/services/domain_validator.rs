//! Pre-enqueue candidate filter.
//!
//! Generated text occasionally contains non-ASCII names, stray prose, or
//! malformed labels. Anything that would make a worker probe blow up is
//! rejected here so it never reaches the queue; the dispatcher
//! short-circuits rejects to `invalid`.

/// Whether a candidate can be safely handed to a check worker.
pub fn is_valid(domain: &str) -> bool {
    let domain = domain.trim();
    if domain.is_empty() {
        return false;
    }

    if domain.contains('\u{fffd}') {
        return false;
    }

    if domain.chars().any(|c| c as u32 > 127) {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    if domain.split('.').any(|label| label.trim().is_empty()) {
        return false;
    }

    // Strict mode enforces STD3 label rules, so names like `bad_.com`
    // fail here instead of producing garbage WHOIS invocations.
    idna::domain_to_ascii_strict(domain).is_ok()
}

/// Split candidates into accepted and rejected, preserving input order.
pub fn filter(domains: &[String]) -> (Vec<String>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();

    for domain in domains {
        if is_valid(domain) {
            valid.push(domain.clone());
        } else {
            invalid.push(domain.clone());
        }
    }

    (valid, invalid)
}
