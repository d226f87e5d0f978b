//! # Tonedeck Common Library
//!
//! Pure building blocks shared by every audio source integration:
//! - Syllable types and the pinyin transliteration engine
//! - Syllable space enumeration and legality filtering
//! - Site profiles (URL templates, initial bucketing) and remote links
//! - Configuration file loading and output path defaults

pub mod config;
pub mod error;
pub mod pinyin;
pub mod site;
pub mod syllables;

pub use error::{Error, Result};
pub use pinyin::{transliterate, PhoneticTables, PinyinKey, Syllable, Tone, TONES};
pub use site::{RemoteLink, SiteProfile};
