//! Pinyin transliteration engine
//!
//! Converts a syllable descriptor `(initial, final, tone)` into the pinyin
//! spelling as it is actually written, and into the pinyin-tone key used for
//! file names, URLs and deck grouping.
//!
//! Finals follow the usual romanisation tables, with `v` standing in for ü.
//! When a final stands without an initial the written form gains a glide
//! (`i` → `yi`, `u` → `wu`, `un` → `wen`, `iu` → `you`, `ve` → `yue`).

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Consonant prefixes, including the empty (zero) initial
pub const STANDARD_INITIALS: &[&str] = &[
    "",
    "b", "p", "m", "f",
    "d", "t", "n", "l",
    "g", "k", "h",
    "z", "c", "s",
    "zh", "ch", "sh", "r",
    "j", "q", "x",
];

/// Vowel-based endings (`v` = ü)
pub const STANDARD_FINALS: &[&str] = &[
    "a", "ai", "an", "ang", "ao",
    "e", "ei", "en", "eng", "er",
    "i", "ia", "iao", "ie", "iu", "ian", "in", "iang", "ing", "iong",
    "o", "ong", "ou",
    "u", "ua", "uo", "uai", "ui", "uan", "un", "uang", "ueng",
    "v", "ve", "van", "vn",
];

/// Finals written unchanged when there is no initial
const BARE_FINALS: &[&str] = &[
    "a", "ai", "an", "ang", "ao", "e", "ei", "en", "eng", "er", "o", "ong", "ou",
];

/// Finals that gain a leading `y`
const Y_PREFIXED_FINALS: &[&str] = &["i", "in", "ing"];

/// Finals whose leading `i` is written `y`
const Y_GLIDE_FINALS: &[&str] = &["ia", "iao", "ie", "ian", "iang", "iong"];

/// Lexical tone, always in 1..=4
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tone(u8);

/// The four tones in order
pub const TONES: [Tone; 4] = [Tone(1), Tone(2), Tone(3), Tone(4)];

impl Tone {
    /// Create a tone, rejecting anything outside 1..=4
    pub fn new(number: u8) -> Result<Self> {
        if (1..=4).contains(&number) {
            Ok(Self(number))
        } else {
            Err(Error::InvalidInput(format!(
                "tone must be between 1 and 4, got {}",
                number
            )))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| u8::try_from(d).ok())
            .and_then(|d| Self::new(d).ok())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Spell `(initial, final)` the way it is written in pinyin.
///
/// With a non-empty initial the result is the plain concatenation. With the
/// zero initial the substitution rules below apply, first match wins.
///
/// # Errors
/// Returns [`Error::UnknownFinal`] when no rule covers the final. For the
/// standard tables this never happens.
pub fn transliterate(initial: &str, final_: &str) -> Result<String> {
    if !initial.is_empty() {
        return Ok(format!("{}{}", initial, final_));
    }

    if BARE_FINALS.contains(&final_) {
        return Ok(final_.to_string());
    }
    if Y_PREFIXED_FINALS.contains(&final_) {
        return Ok(format!("y{}", final_));
    }
    if Y_GLIDE_FINALS.contains(&final_) {
        return Ok(format!("y{}", &final_[1..]));
    }

    match final_ {
        "iu" => return Ok("you".to_string()),
        "un" => return Ok("wen".to_string()),
        // A lone u keeps its vowel behind the glide
        "u" => return Ok("wu".to_string()),
        _ => {}
    }

    if let Some(rest) = final_.strip_prefix('u') {
        return Ok(format!("w{}", rest));
    }
    // ü is written yu without an initial: ve -> yue, van -> yuan
    if let Some(rest) = final_.strip_prefix('v') {
        return Ok(format!("yu{}", rest));
    }

    Err(Error::UnknownFinal {
        initial: initial.to_string(),
        final_: final_.to_string(),
    })
}

/// Canonical syllable identifier: written spelling plus tone digit.
///
/// Displays as `qu4`; parses back from the same form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PinyinKey {
    spelling: String,
    tone: Tone,
}

impl PinyinKey {
    pub fn new(spelling: impl Into<String>, tone: Tone) -> Self {
        Self {
            spelling: spelling.into(),
            tone,
        }
    }

    /// Bare spelling with the tone stripped
    pub fn spelling(&self) -> &str {
        &self.spelling
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }
}

impl fmt::Display for PinyinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.spelling, self.tone)
    }
}

impl FromStr for PinyinKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        let tone = chars
            .next_back()
            .and_then(Tone::from_digit)
            .ok_or_else(|| Error::InvalidInput(format!("{:?} does not end in a tone digit", s)))?;
        let spelling = chars.as_str();
        if spelling.is_empty() {
            return Err(Error::InvalidInput(format!("{:?} has no spelling", s)));
        }
        Ok(Self::new(spelling, tone))
    }
}

/// One point in the syllable space
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Syllable {
    initial: String,
    final_: String,
    tone: Tone,
}

impl Syllable {
    pub fn new(initial: impl Into<String>, final_: impl Into<String>, tone: Tone) -> Self {
        Self {
            initial: initial.into(),
            final_: final_.into(),
            tone,
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn final_(&self) -> &str {
        &self.final_
    }

    pub fn tone(&self) -> Tone {
        self.tone
    }

    /// Written spelling without tone
    pub fn spelling(&self) -> Result<String> {
        transliterate(&self.initial, &self.final_)
    }

    /// Pinyin-tone key for this syllable
    pub fn key(&self) -> Result<PinyinKey> {
        Ok(PinyinKey::new(self.spelling()?, self.tone))
    }
}

impl fmt::Display for Syllable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?}, {})", self.initial, self.final_, self.tone)
    }
}

/// Ordered initial and final lists the syllable space is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneticTables {
    initials: Vec<String>,
    finals: Vec<String>,
}

impl PhoneticTables {
    pub fn new<I, F>(initials: I, finals: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
    {
        Self {
            initials: initials.into_iter().map(Into::into).collect(),
            finals: finals.into_iter().map(Into::into).collect(),
        }
    }

    /// Full Mandarin initial and final inventory
    pub fn standard() -> Self {
        Self::new(STANDARD_INITIALS.iter().copied(), STANDARD_FINALS.iter().copied())
    }

    pub fn initials(&self) -> &[String] {
        &self.initials
    }

    pub fn finals(&self) -> &[String] {
        &self.finals
    }
}

impl Default for PhoneticTables {
    fn default() -> Self {
        Self::standard()
    }
}
