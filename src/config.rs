// src/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::lexicon::Lexicon;
use crate::logging::DEFAULT_LOG_FILTER;

pub const ENV_CONFIG_PATH: &str = "CHRONOMOOD_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "config/chronomood.toml";

fn default_terms_limit() -> usize {
    50
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub lexicon: LexiconSection,
    pub terms: TermsSection,
    pub log: LogSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LexiconSection {
    /// JSON `{token: weight}` merged over the built-in lexicon.
    pub extra_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TermsSection {
    pub limit: usize,
    pub extra_stopwords: Vec<String>,
}

impl Default for TermsSection {
    fn default() -> Self {
        Self {
            limit: default_terms_limit(),
            extra_stopwords: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let mut cfg: AppConfig = toml::from_str(s)?;

        // Sanitize
        if cfg.terms.limit == 0 {
            cfg.terms.limit = default_terms_limit();
        }
        if cfg.log.filter.trim().is_empty() {
            cfg.log.filter = default_log_filter();
        }
        cfg.terms.extra_stopwords = clean_list(std::mem::take(&mut cfg.terms.extra_stopwords));

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve config using env var + fallbacks:
    /// 1) $CHRONOMOOD_CONFIG_PATH (must exist)
    /// 2) config/chronomood.toml
    /// 3) built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if pb.exists() {
                return Self::load_from(&pb);
            } else {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::load_from(&default_p);
        }
        Ok(Self::default())
    }

    /// Built-in lexicon, with `[lexicon] extra_path` layered on top if set.
    pub fn build_lexicon(&self) -> Result<Arc<Lexicon>> {
        let builtin = Lexicon::builtin();
        match &self.lexicon.extra_path {
            None => Ok(builtin),
            Some(p) => {
                let extra = Lexicon::load(p)?;
                info!(
                    target: "chronomood::lexicon",
                    path = %p.display(),
                    extra = extra.len(),
                    "merging extra lexicon"
                );
                Ok(Arc::new(builtin.merged_with(&extra)))
            }
        }
    }
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    let mut set = BTreeSet::new();
    for it in items {
        let t = it.trim().to_lowercase();
        if !t.is_empty() {
            set.insert(t);
        }
    }
    set.into_iter().collect()
}
