// src/logging.rs
//! Dev logging helpers. Raw tweet text is never logged; a short hash stands in.

use once_cell::sync::Lazy;

pub const ENV_DEV_LOG: &str = "CHRONOMOOD_DEV_LOG";
pub const ENV_RUNTIME: &str = "CHRONOMOOD_ENV";

/// Default filter when neither `RUST_LOG` nor config provide one.
pub const DEFAULT_LOG_FILTER: &str = "chronomood=info,warn";

static DEV_LOG: Lazy<bool> = Lazy::new(|| {
    dev_logging_from(
        std::env::var(ENV_DEV_LOG).ok().as_deref(),
        std::env::var(ENV_RUNTIME).ok().as_deref(),
    )
});

/// Per-text dev logs: CHRONOMOOD_DEV_LOG=1 AND dev env
/// (debug build or CHRONOMOOD_ENV in {local, development, dev}). Read once.
pub fn dev_logging_enabled() -> bool {
    *DEV_LOG
}

fn dev_logging_from(flag: Option<&str>, runtime: Option<&str>) -> bool {
    if flag != Some("1") {
        return false;
    }
    if cfg!(debug_assertions) {
        return true;
    }
    matches!(
        runtime.unwrap_or_default().to_ascii_lowercase().as_str(),
        "local" | "development" | "dev"
    )
}

/// First 6 bytes of SHA-256 as hex; stable id for a text in logs.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
