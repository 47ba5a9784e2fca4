// src/normalize.rs
//! Tweet tokenizer: turns raw text into `Token`s while keeping the cues the
//! scorer needs (emoticons, emoji, `!`/`?` run-lengths, ALL-CAPS).

use crate::lexicon::{self, ModifierKind, ModifierRule};
use once_cell::sync::OnceCell;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Emoticon,
    /// Single pictographic character (emoji).
    Symbol,
}

/// A single normalized token. Created per scoring call and dropped after.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface form as written (after entity decoding).
    pub text: String,
    /// Lowercased form used for lexicon lookup.
    pub lower: String,
    pub kind: TokenKind,
    /// Rule this word triggers, if it is a modifier word.
    pub modifier: Option<&'static ModifierRule>,
    /// Word with two or more letters, all uppercase.
    pub is_upper: bool,
    /// Trailing `!` marks attached to this token.
    pub exclamations: u8,
    /// Trailing `?` marks attached to this token.
    pub questions: u8,
}

impl Token {
    fn new(text: &str, kind: TokenKind) -> Self {
        let lower = text.to_lowercase();
        let is_word = kind == TokenKind::Word;
        Self {
            modifier: if is_word { lexicon::modifier(&lower) } else { None },
            is_upper: is_word && is_all_caps(text),
            text: text.to_string(),
            lower,
            kind,
            exclamations: 0,
            questions: 0,
        }
    }

    /// Total emphasis punctuation attached to this token.
    pub fn emphasis(&self) -> u16 {
        self.exclamations as u16 + self.questions as u16
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_negator(&self) -> bool {
        self.modifier_kind() == Some(ModifierKind::Negation)
    }

    pub fn is_intensifier(&self) -> bool {
        self.modifier_kind() == Some(ModifierKind::Intensifier)
    }

    fn modifier_kind(&self) -> Option<ModifierKind> {
        self.modifier.map(|r| r.kind)
    }
}

fn emoticon_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^(?:[<>]?[:;=8][\-o\*']?[\)\]\(\[dDpP/\\:\}\{@\|\*3oO]|[\)\]\(\[dD][\-']?[:;=]|</?3|[xX][dDpP]|\^_*\^)$",
        )
        .expect("emoticon regex")
    })
}

fn piece_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| {
        Regex::new(r"(?P<word>[\p{L}\p{N}](?:[\p{L}\p{N}_']*[\p{L}\p{N}])?)|(?P<marks>[!?]+)|(?P<sym>\p{So})")
            .expect("token regex")
    })
}

/// Tokenize arbitrary text. Never fails; empty or whitespace input gives `[]`.
pub fn tokenize(text: &str) -> Vec<Token> {
    let decoded = html_escape::decode_html_entities(text);
    let folded = decoded.replace(['\u{2019}', '\u{2018}'], "'");

    let mut out: Vec<Token> = Vec::new();
    for chunk in folded.split_whitespace() {
        let core = chunk.trim_end_matches(TRAILING_PUNCT);
        let tail = &chunk[core.len()..];
        if core.is_empty() {
            push_pieces(&mut out, chunk);
            continue;
        }

        if is_emoticon(core) {
            out.push(Token::new(core, TokenKind::Emoticon));
            attach_marks(&mut out, tail);
        } else if let Some((head, emo)) = split_trailing_emoticon(core) {
            // "birthday:)"
            push_pieces(&mut out, head);
            out.push(Token::new(emo, TokenKind::Emoticon));
            attach_marks(&mut out, tail);
        } else if let Some((emo, rest)) = split_leading_emoticon(core) {
            // ":)thanks!"
            out.push(Token::new(emo, TokenKind::Emoticon));
            push_pieces(&mut out, &chunk[core.len() - rest.len()..]);
        } else {
            push_pieces(&mut out, chunk);
        }
    }
    out
}

/// Punctuation that may trail a chunk without belonging to it.
const TRAILING_PUNCT: [char; 5] = ['!', '?', '.', ',', ';'];

/// Longest emoticon we try to peel off a glued chunk, in chars.
const MAX_GLUED_EMOTICON: usize = 5;

fn is_emoticon(s: &str) -> bool {
    emoticon_re().is_match(s)
}

/// A glued emoticon has to open with punctuation, so "boxd" stays a word.
fn is_glued_emoticon(s: &str) -> bool {
    s.chars().next().is_some_and(|c| !c.is_alphanumeric()) && is_emoticon(s)
}

fn split_trailing_emoticon(core: &str) -> Option<(&str, &str)> {
    let n = core.chars().count();
    core.char_indices()
        .skip(n.saturating_sub(MAX_GLUED_EMOTICON))
        .filter(|(i, _)| *i > 0)
        .map(|(i, _)| core.split_at(i))
        .find(|(_, emo)| is_glued_emoticon(emo))
}

fn split_leading_emoticon(core: &str) -> Option<(&str, &str)> {
    let mut ends: Vec<usize> = core
        .char_indices()
        .map(|(i, _)| i)
        .skip(1)
        .take(MAX_GLUED_EMOTICON)
        .collect();
    ends.reverse();
    ends.into_iter()
        .map(|i| core.split_at(i))
        .find(|(emo, _)| is_glued_emoticon(emo))
}

/// Words, `!`/`?` runs and pictographs of a chunk without emoticons.
fn push_pieces(out: &mut Vec<Token>, chunk: &str) {
    for caps in piece_re().captures_iter(chunk) {
        if let Some(m) = caps.name("word") {
            out.push(Token::new(m.as_str(), TokenKind::Word));
        } else if let Some(m) = caps.name("marks") {
            attach_marks(out, m.as_str());
        } else if let Some(m) = caps.name("sym") {
            out.push(Token::new(m.as_str(), TokenKind::Symbol));
        }
    }
}

/// Hang a `!`/`?` run onto the previous token; dropped if there is none.
fn attach_marks(tokens: &mut [Token], marks: &str) {
    let Some(last) = tokens.last_mut() else {
        return;
    };
    for c in marks.chars() {
        match c {
            '!' => last.exclamations = last.exclamations.saturating_add(1),
            '?' => last.questions = last.questions.saturating_add(1),
            _ => {}
        }
    }
}

fn is_all_caps(word: &str) -> bool {
    let mut letters = 0usize;
    for c in word.chars().filter(|c| c.is_alphabetic()) {
        if !c.is_uppercase() {
            return false;
        }
        letters += 1;
    }
    letters >= 2
}
