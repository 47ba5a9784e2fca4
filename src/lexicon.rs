//! # Lexicon Store
//!
//! Static token → intensity table plus the fixed modifier rules the scorer
//! applies around it.
//!
//! - Built-in table is `lexicon.json` at the crate root, embedded at compile
//!   time and parsed once.
//! - Weights live in `[-4.0, 4.0]`; anything outside is clamped on load.
//! - Keys are case-normalized (lowercase), so lookups are case-insensitive.
//! - Modifier words (negators, intensifiers, "but") never carry a weight of
//!   their own; the scorer treats them purely as context.
//!
//! A `Lexicon` is immutable after construction and shared via `Arc`.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lowest/highest weight a lexicon entry may carry.
pub const MIN_WEIGHT: f64 = -4.0;
pub const MAX_WEIGHT: f64 = 4.0;

/// Additive step of an intensifier ("very good") / dampener ("slightly good").
pub const B_INCR: f64 = 0.293;
pub const B_DECR: f64 = -0.293;

/// Magnitude added to an ALL-CAPS word when the text mixes cases.
pub const C_INCR: f64 = 0.733;

/// Multiplier applied to a word inside a negation window.
pub const N_SCALAR: f64 = -0.74;

/// How many preceding tokens a negator/intensifier reaches.
pub const MODIFIER_SCOPE: usize = 3;

/// Intensifier decay by distance (1, 2, 3 tokens back).
pub const INTENSIFIER_DECAY: [f64; MODIFIER_SCOPE] = [1.0, 0.95, 0.90];

/// Trailing `!` emphasis: per mark, capped.
pub const EXCLAMATION_INCR: f64 = 0.292;
pub const MAX_EXCLAMATIONS: u8 = 4;

/// Trailing `??` emphasis: per mark (only for runs of two or more), capped.
pub const QUESTION_INCR: f64 = 0.18;
pub const MAX_QUESTIONS: u8 = 3;

/// Contrast ("but"): clauses before are damped, clauses after amplified.
pub const CONTRAST_BEFORE: f64 = 0.5;
pub const CONTRAST_AFTER: f64 = 1.5;

/// A single lexicon row.
#[derive(Debug, Clone, PartialEq)]
pub struct LexiconEntry {
    pub token: String,
    pub weight: f64,
}

/// How a modifier changes the contribution of the word(s) it reaches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Multiply the affected contribution.
    Scale(f64),
    /// Add to the affected contribution (sign follows the content word).
    Add(f64),
    /// Multiply words before the trigger by `before`, words after by `after`.
    Split { before: f64, after: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModifierKind {
    Negation,
    Intensifier,
    Contrast,
}

/// Fixed contextual rule: `trigger` alters the next `scope` tokens by `effect`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifierRule {
    pub trigger: &'static str,
    pub kind: ModifierKind,
    pub effect: Effect,
    pub scope: usize,
}

const fn negator(trigger: &'static str) -> ModifierRule {
    ModifierRule {
        trigger,
        kind: ModifierKind::Negation,
        effect: Effect::Scale(N_SCALAR),
        scope: MODIFIER_SCOPE,
    }
}

const fn booster(trigger: &'static str) -> ModifierRule {
    ModifierRule {
        trigger,
        kind: ModifierKind::Intensifier,
        effect: Effect::Add(B_INCR),
        scope: MODIFIER_SCOPE,
    }
}

const fn dampener(trigger: &'static str) -> ModifierRule {
    ModifierRule {
        trigger,
        kind: ModifierKind::Intensifier,
        effect: Effect::Add(B_DECR),
        scope: MODIFIER_SCOPE,
    }
}

/// Any `...n't` contraction not listed explicitly ("needn't", "mustn't").
static CONTRACTION_NEGATOR: ModifierRule = negator("n't");

pub static MODIFIERS: &[ModifierRule] = &[
    negator("not"),
    negator("no"),
    negator("never"),
    negator("none"),
    negator("nobody"),
    negator("nothing"),
    negator("nowhere"),
    negator("neither"),
    negator("nor"),
    negator("cannot"),
    negator("without"),
    negator("aint"),
    negator("isnt"),
    negator("arent"),
    negator("wasnt"),
    negator("werent"),
    negator("dont"),
    negator("doesnt"),
    negator("didnt"),
    negator("wont"),
    negator("wouldnt"),
    negator("cant"),
    negator("couldnt"),
    negator("shouldnt"),
    negator("hasnt"),
    negator("havent"),
    negator("hadnt"),
    booster("absolutely"),
    booster("amazingly"),
    booster("awfully"),
    booster("completely"),
    booster("considerably"),
    booster("deeply"),
    booster("enormously"),
    booster("entirely"),
    booster("especially"),
    booster("exceptionally"),
    booster("extremely"),
    booster("freaking"),
    booster("fucking"),
    booster("greatly"),
    booster("highly"),
    booster("hugely"),
    booster("incredibly"),
    booster("intensely"),
    booster("most"),
    booster("particularly"),
    booster("purely"),
    booster("quite"),
    booster("really"),
    booster("remarkably"),
    booster("so"),
    booster("soo"),
    booster("sooo"),
    booster("substantially"),
    booster("super"),
    booster("thoroughly"),
    booster("totally"),
    booster("tremendously"),
    booster("unbelievably"),
    booster("utterly"),
    booster("very"),
    dampener("almost"),
    dampener("barely"),
    dampener("hardly"),
    dampener("kinda"),
    dampener("less"),
    dampener("marginally"),
    dampener("occasionally"),
    dampener("partly"),
    dampener("scarcely"),
    dampener("slightly"),
    dampener("somewhat"),
    dampener("sorta"),
    ModifierRule {
        trigger: "but",
        kind: ModifierKind::Contrast,
        effect: Effect::Split {
            before: CONTRAST_BEFORE,
            after: CONTRAST_AFTER,
        },
        scope: usize::MAX,
    },
];

static MODIFIER_INDEX: Lazy<HashMap<&'static str, &'static ModifierRule>> =
    Lazy::new(|| MODIFIERS.iter().map(|r| (r.trigger, r)).collect());

/// Furthest any negator/intensifier reaches back.
static WINDOW: Lazy<usize> = Lazy::new(|| {
    MODIFIERS
        .iter()
        .chain(std::iter::once(&CONTRACTION_NEGATOR))
        .filter(|r| r.kind != ModifierKind::Contrast)
        .map(|r| r.scope)
        .max()
        .unwrap_or(0)
});

static BUILTIN: Lazy<Arc<Lexicon>> = Lazy::new(|| {
    let raw = include_str!("../lexicon.json");
    Arc::new(Lexicon::from_json_str(raw).expect("valid built-in lexicon"))
});

/// Modifier rule triggered by a lowercase word, if any.
pub fn modifier(word: &str) -> Option<&'static ModifierRule> {
    if let Some(rule) = MODIFIER_INDEX.get(word) {
        return Some(rule);
    }
    if word.len() > 3 && word.ends_with("n't") {
        return Some(&CONTRACTION_NEGATOR);
    }
    None
}

/// Number of preceding tokens the scorer has to look at.
pub fn modifier_window() -> usize {
    *WINDOW
}

pub fn is_negator(word: &str) -> bool {
    matches!(modifier(word), Some(r) if r.kind == ModifierKind::Negation)
}

pub fn is_contrast(word: &str) -> bool {
    matches!(modifier(word), Some(r) if r.kind == ModifierKind::Contrast)
}

/// Additive step for an intensifier/dampener word.
pub fn booster_step(word: &str) -> Option<f64> {
    match modifier(word) {
        Some(ModifierRule {
            kind: ModifierKind::Intensifier,
            effect: Effect::Add(step),
            ..
        }) => Some(*step),
        _ => None,
    }
}

/// Immutable token → weight table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lexicon {
    entries: HashMap<String, f64>,
}

impl Lexicon {
    /// Shared handle to the embedded table.
    pub fn builtin() -> Arc<Lexicon> {
        Arc::clone(&BUILTIN)
    }

    /// Build from entries: keys are trimmed and lowercased, weights clamped,
    /// empty keys and non-finite weights dropped.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = LexiconEntry>,
    {
        let mut map = HashMap::new();
        for LexiconEntry { token, weight } in entries {
            let key = token.trim().to_lowercase();
            if key.is_empty() || !weight.is_finite() {
                warn!(target: "chronomood::lexicon", token = %token, "skipping invalid lexicon entry");
                continue;
            }
            let clamped = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
            if clamped != weight {
                warn!(target: "chronomood::lexicon", token = %key, weight, "weight clamped to [-4, 4]");
            }
            map.insert(key, clamped);
        }
        Self { entries: map }
    }

    /// Parse a JSON object `{ "token": weight, ... }`.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let map: HashMap<String, f64> =
            serde_json::from_str(raw).context("lexicon JSON must be an object of token -> number")?;
        let lex = Self::from_entries(
            map.into_iter()
                .map(|(token, weight)| LexiconEntry { token, weight }),
        );
        debug!(target: "chronomood::lexicon", entries = lex.len(), "lexicon parsed");
        Ok(lex)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading lexicon from {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("parsing lexicon {}", path.display()))
    }

    /// New lexicon with `overrides` layered on top (override wins per token).
    pub fn merged_with(&self, overrides: &Lexicon) -> Lexicon {
        let mut entries = self.entries.clone();
        entries.extend(overrides.entries.iter().map(|(k, v)| (k.clone(), *v)));
        Lexicon { entries }
    }

    /// Case-insensitive lookup.
    pub fn get(&self, token: &str) -> Option<f64> {
        if token.chars().any(char::is_uppercase) {
            self.entries.get(&token.to_lowercase()).copied()
        } else {
            self.entries.get(token).copied()
        }
    }

    /// Weight of `token`, 0.0 when absent.
    #[inline]
    pub fn weight(&self, token: &str) -> f64 {
        self.get(token).unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = LexiconEntry> + '_ {
        self.entries.iter().map(|(token, weight)| LexiconEntry {
            token: token.clone(),
            weight: *weight,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_loads_and_stays_in_range() {
        let lex = Lexicon::builtin();
        assert!(lex.len() > 100);
        assert!(lex
            .entries()
            .all(|e| (MIN_WEIGHT..=MAX_WEIGHT).contains(&e.weight)));
        assert!(lex.weight("good") > 0.0);
        assert!(lex.weight("terrible") < 0.0);
        assert!(lex.weight(":)") > 0.0);
        assert_eq!(lex.weight("table"), 0.0);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let lex = Lexicon::builtin();
        assert_eq!(lex.weight("GOOD"), lex.weight("good"));
        assert_eq!(lex.weight(":D"), lex.weight(":d"));
    }

    #[test]
    fn builtin_has_no_modifier_words() {
        let lex = Lexicon::builtin();
        for rule in MODIFIERS {
            assert!(lex.get(rule.trigger).is_none(), "{} is weighted", rule.trigger);
        }
    }

    #[test]
    fn clamps_and_drops_invalid_entries() {
        let lex = Lexicon::from_entries(vec![
            LexiconEntry { token: " Ecstatic ".into(), weight: 9.0 },
            LexiconEntry { token: "".into(), weight: 1.0 },
            LexiconEntry { token: "nan".into(), weight: f64::NAN },
            LexiconEntry { token: "meh".into(), weight: -0.5 },
        ]);
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.weight("ecstatic"), MAX_WEIGHT);
        assert_eq!(lex.weight("meh"), -0.5);
    }

    #[test]
    fn merge_overrides_per_token() {
        let base = Lexicon::from_json_str(r#"{"good": 1.9, "bad": -2.5}"#).unwrap();
        let extra = Lexicon::from_json_str(r#"{"good": 3.0, "rekt": -3.0}"#).unwrap();
        let merged = base.merged_with(&extra);
        assert_eq!(merged.weight("good"), 3.0);
        assert_eq!(merged.weight("bad"), -2.5);
        assert_eq!(merged.weight("rekt"), -3.0);
    }

    #[test]
    fn rejects_non_object_json() {
        assert!(Lexicon::from_json_str(r#"["good"]"#).is_err());
    }

    #[test]
    fn modifier_lookup() {
        assert!(is_negator("not"));
        assert!(is_negator("isn't"));
        assert!(is_negator("mustn't"));
        assert!(!is_negator("n't"));
        assert!(is_contrast("but"));
        assert_eq!(booster_step("very"), Some(B_INCR));
        assert_eq!(booster_step("slightly"), Some(B_DECR));
        assert_eq!(booster_step("good"), None);
        assert_eq!(modifier_window(), MODIFIER_SCOPE);
        assert_eq!(modifier("not").map(|r| r.effect), Some(Effect::Scale(N_SCALAR)));
        assert!(matches!(
            modifier("but").map(|r| r.effect),
            Some(Effect::Split { .. })
        ));
    }
}
