//! # Polarity Scorer
//!
//! Folds a token sequence into an immutable [`ScoreResult`].
//!
//! Per content word the contribution is:
//! 1. base weight from the lexicon (0 → no contribution at all),
//! 2. + ALL-CAPS boost when the text mixes cases,
//! 3. + intensifiers whose scope reaches it (decayed by distance),
//! 4. × the scale of every negator whose scope reaches it,
//! 5. + trailing `!`/`??` emphasis on the word itself,
//! 6. × the split factor of the first contrast word ("but").
//!
//! Modifier effects and scopes come from `lexicon::MODIFIERS`.
//!
//! The signed total is squashed into the compound score with
//! `s / sqrt(s² + ALPHA)`, which grows sub-linearly and never reaches ±1.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use crate::lexicon::{
    self, Effect, Lexicon, ModifierKind, ModifierRule, C_INCR, EXCLAMATION_INCR,
    INTENSIFIER_DECAY, MAX_EXCLAMATIONS, MAX_QUESTIONS, QUESTION_INCR,
};
use crate::logging::{anon_hash, dev_logging_enabled};
use crate::mood::{classify, MoodLabel};
use crate::normalize::{tokenize, Token};

/// Normalization constant of the compound squash.
pub const ALPHA: f64 = 15.0;

/// Largest magnitude a compound score can take.
pub const MAX_COMPOUND: f64 = 1.0 - f64::EPSILON;

static DEFAULT_ANALYZER: Lazy<SentimentAnalyzer> = Lazy::new(SentimentAnalyzer::new);

/// Result of scoring one text.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreResult {
    /// Sum of positive contributions (>= 0).
    pub positive_sum: f64,
    /// Sum of negative contributions (<= 0).
    pub negative_sum: f64,
    /// Number of tokens that contributed nothing.
    pub neutral_sum: f64,
    /// Normalized polarity in [-1, 1].
    pub compound: f64,
}

impl ScoreResult {
    pub fn mood(&self) -> MoodLabel {
        classify(self.compound)
    }

    /// Shares of positive / negative / neutral mass, each in [0, 1].
    /// All zero for an empty input.
    pub fn proportions(&self) -> (f64, f64, f64) {
        let total = self.positive_sum + self.negative_sum.abs() + self.neutral_sum;
        if total <= 0.0 {
            return (0.0, 0.0, 0.0);
        }
        (
            self.positive_sum / total,
            self.negative_sum.abs() / total,
            self.neutral_sum / total,
        )
    }

    fn accumulate(mut self, contribution: f64) -> Self {
        if contribution > 0.0 {
            self.positive_sum += contribution;
        } else if contribution < 0.0 {
            self.negative_sum += contribution;
        } else {
            self.neutral_sum += 1.0;
        }
        self
    }

    fn finish(mut self) -> Self {
        self.compound = normalize_compound(self.positive_sum + self.negative_sum);
        self
    }
}

/// Text-level outcome: score, label and how many tokens were seen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Analysis {
    pub score: ScoreResult,
    pub mood: MoodLabel,
    pub tokens: usize,
}

/// Squash a signed sum into (-1, 1). Monotonic, overflow-free.
pub fn normalize_compound(sum: f64) -> f64 {
    if sum == 0.0 || sum.is_nan() {
        return 0.0;
    }
    if sum.is_infinite() {
        return MAX_COMPOUND.copysign(sum);
    }
    (sum / sum.hypot(ALPHA.sqrt())).clamp(-MAX_COMPOUND, MAX_COMPOUND)
}

/// Lexicon scorer. Stateless apart from a shared, read-only lexicon, so one
/// instance can serve any number of threads.
#[derive(Debug, Clone)]
pub struct SentimentAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    /// Analyzer over the built-in lexicon.
    pub fn new() -> Self {
        Self::with_lexicon(Lexicon::builtin())
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Score raw text. Never fails.
    pub fn score(&self, text: &str) -> ScoreResult {
        self.analyze(text).score
    }

    /// Score + label + token count.
    pub fn analyze(&self, text: &str) -> Analysis {
        let tokens = tokenize(text);
        let score = self.score_tokens(&tokens);
        let mood = score.mood();

        if dev_logging_enabled() {
            // Never log raw text. Only hashed id + numbers.
            debug!(
                target: "chronomood::score",
                id = %anon_hash(text),
                tokens = tokens.len(),
                compound = score.compound,
                %mood
            );
        }

        Analysis {
            score,
            mood,
            tokens: tokens.len(),
        }
    }

    /// Fold tokens into a `ScoreResult`. Empty input → all zeros.
    pub fn score_tokens(&self, tokens: &[Token]) -> ScoreResult {
        let ctx = Context {
            mixed_case: has_mixed_case(tokens),
            contrast: tokens.iter().enumerate().find_map(|(i, t)| {
                t.modifier
                    .filter(|r| r.kind == ModifierKind::Contrast)
                    .map(|r| (i, r))
            }),
        };
        (0..tokens.len())
            .map(|i| self.contribution(tokens, i, &ctx))
            .fold(ScoreResult::default(), ScoreResult::accumulate)
            .finish()
    }

    /// Signed contribution of token `i` with all modifiers applied.
    fn contribution(&self, tokens: &[Token], i: usize, ctx: &Context) -> f64 {
        let tok = &tokens[i];
        if tok.modifier.is_some() {
            return 0.0;
        }
        let base = self.lexicon.weight(&tok.lower);
        if base == 0.0 {
            return 0.0;
        }
        let sign = base.signum();
        let mut v = base;

        if ctx.mixed_case && tok.is_upper {
            v += sign * C_INCR;
        }

        let mut negation = 1.0;
        for (dist, prev, rule) in reaching(tokens, i) {
            match (rule.kind, rule.effect) {
                (ModifierKind::Intensifier, Effect::Add(step)) => {
                    let mut s = step * sign;
                    if ctx.mixed_case && prev.is_upper {
                        s += sign * C_INCR;
                    }
                    v += s * intensifier_decay(dist);
                }
                (ModifierKind::Negation, Effect::Scale(f)) => negation *= f,
                _ => {}
            }
        }
        // A dampener must not push a weak word across zero.
        if v.signum() != sign {
            v = 0.0;
        }
        v *= negation;

        if v != 0.0 {
            v += v.signum() * emphasis_boost(tok);
        }

        match ctx.contrast {
            Some((c, rule)) => v * contrast_factor(rule, i, c),
            None => v,
        }
    }
}

/// Score with the built-in lexicon.
pub fn score(text: &str) -> ScoreResult {
    DEFAULT_ANALYZER.score(text)
}

struct Context {
    mixed_case: bool,
    /// First contrast word and its rule.
    contrast: Option<(usize, &'static ModifierRule)>,
}

/// Modifier words before `i` whose scope reaches it, nearest first.
fn reaching(
    tokens: &[Token],
    i: usize,
) -> impl Iterator<Item = (usize, &Token, &'static ModifierRule)> {
    (1..=lexicon::modifier_window().min(i)).filter_map(move |dist| {
        let prev = &tokens[i - dist];
        prev.modifier
            .filter(|r| r.kind != ModifierKind::Contrast && dist <= r.scope)
            .map(|r| (dist, prev, r))
    })
}

fn intensifier_decay(dist: usize) -> f64 {
    INTENSIFIER_DECAY
        .get(dist - 1)
        .or(INTENSIFIER_DECAY.last())
        .copied()
        .unwrap_or(1.0)
}

/// Factor a contrast rule at `c` applies to the word at `i`.
fn contrast_factor(rule: &ModifierRule, i: usize, c: usize) -> f64 {
    let (before, after) = match rule.effect {
        Effect::Split { before, after } => (before, after),
        Effect::Scale(f) => (1.0, f),
        Effect::Add(_) => return 1.0,
    };
    if i < c {
        before
    } else if i > c && i - c <= rule.scope {
        after
    } else {
        1.0
    }
}

/// Bounded magnitude added by trailing `!` / `??` on a token.
fn emphasis_boost(tok: &Token) -> f64 {
    let bangs = tok.exclamations.min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_INCR;
    let questions = if tok.questions > 1 {
        tok.questions.min(MAX_QUESTIONS) as f64 * QUESTION_INCR
    } else {
        0.0
    };
    bangs + questions
}

/// Caps emphasis only means something when the text is not shouted entirely.
/// Only a lowercase letter counts against shouting, so "I" or "A1" are neutral.
fn has_mixed_case(tokens: &[Token]) -> bool {
    let mut upper = false;
    let mut lower = false;
    for t in tokens.iter().filter(|t| t.is_word()) {
        if t.is_upper {
            upper = true;
        } else if t.text.chars().any(char::is_lowercase) {
            lower = true;
        }
        if upper && lower {
            return true;
        }
    }
    false
}
