//! Audio source site profiles
//!
//! Every site shares the same transliteration engine; what differs is plain
//! data: the URL template, how initials are bucketed into directories, the
//! audio extension, and a few behaviour switches. A profile turns a
//! [`Syllable`] into a [`RemoteLink`].
//!
//! URL templates accept these placeholders:
//! `{pinyin_tone}`, `{pinyin}`, `{initial}`, `{final}`, `{tone}`, `{bucket}`, `{format}`.

use crate::pinyin::{PhoneticTables, PinyinKey, Syllable};
use crate::syllables::{self, AccessOrder, Legality};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const YABLA_URL_TEMPLATE: &str =
    "https://yabla.vo.llnwd.net/media.yabla.com/chinese_static/audio/alicia/{pinyin_tone}{format}";
const DIGMANDARIN_URL_TEMPLATE: &str =
    "https://www.digmandarin.com/tools/sounds/{bucket}/{pinyin_tone}/Audio{format}";

/// Pinyin chart rows used by digmandarin as directory names
const DIGMANDARIN_ROWS: &[(&str, &str)] = &[
    ("", "row1"),
    ("b", "BPMF"), ("p", "BPMF"), ("m", "BPMF"), ("f", "BPMF"),
    ("d", "DTNL"), ("t", "DTNL"), ("n", "DTNL"), ("l", "DTNL"),
    ("g", "GKH"), ("k", "GKH"), ("h", "GKH"),
    ("z", "ZCS"), ("c", "ZCS"), ("s", "ZCS"),
    ("zh", "ZHCHSH"), ("ch", "ZHCHSH"), ("sh", "ZHCHSH"), ("r", "ZHCHSH"),
    ("j", "JQX"), ("q", "JQX"), ("x", "JQX"),
];

const TEMPLATE_PLACEHOLDERS: &[&str] =
    &["pinyin_tone", "pinyin", "initial", "final", "tone", "bucket", "format"];

fn default_format() -> String {
    ".mp3".to_string()
}

fn default_sound_ref() -> String {
    "[sound:{file}]".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

/// Configuration record for one audio source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteProfile {
    /// Site name, also the default file prefix stem and deck tag
    pub name: String,
    /// Resource URL template
    pub url_template: String,
    /// Initial → directory bucket; empty for flat layouts
    #[serde(default)]
    pub buckets: BTreeMap<String, String>,
    /// Audio file extension including the dot
    #[serde(default = "default_format")]
    pub format: String,
    /// Which (initial, final) pairs to request
    #[serde(default)]
    pub legality: Legality,
    /// Skip the remaining tones of a spelling after a not-found response
    #[serde(default = "default_true")]
    pub skip_tone_siblings: bool,
    /// Reject downloads that do not look like audio
    #[serde(default)]
    pub validate_audio: bool,
    /// Deck sound reference; `{file}` is replaced by the audio file name
    #[serde(default = "default_sound_ref")]
    pub sound_ref: String,
    /// Minimum delay between two requests
    #[serde(default)]
    pub request_interval_ms: u64,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl SiteProfile {
    /// Flat layout: one file per pinyin-tone key
    pub fn yabla() -> Self {
        Self {
            name: "yabla".to_string(),
            url_template: YABLA_URL_TEMPLATE.to_string(),
            buckets: BTreeMap::new(),
            format: default_format(),
            legality: Legality::All,
            skip_tone_siblings: true,
            validate_audio: false,
            sound_ref: default_sound_ref(),
            request_interval_ms: 0,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Bucketed by pinyin chart row; the server answers some misses with an
    /// HTML page, hence the audio check.
    pub fn digmandarin() -> Self {
        Self {
            name: "digmandarin".to_string(),
            url_template: DIGMANDARIN_URL_TEMPLATE.to_string(),
            buckets: DIGMANDARIN_ROWS
                .iter()
                .map(|(initial, row)| (initial.to_string(), row.to_string()))
                .collect(),
            format: default_format(),
            legality: Legality::Valid,
            skip_tone_siblings: true,
            validate_audio: true,
            sound_ref: default_sound_ref(),
            request_interval_ms: 0,
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Profiles compiled into the binary
    pub fn builtin() -> Vec<Self> {
        vec![Self::yabla(), Self::digmandarin()]
    }

    /// Check the profile can render URLs and sound references
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config("site name must not be empty".to_string()));
        }
        if self.format.is_empty() {
            return Err(Error::Config(format!("site {}: format must not be empty", self.name)));
        }

        let mut uses_bucket = false;
        render_template(&self.url_template, |name| {
            if name == "bucket" {
                uses_bucket = true;
            }
            if TEMPLATE_PLACEHOLDERS.contains(&name) {
                Ok(String::new())
            } else {
                Err(unknown_placeholder(&self.url_template, name))
            }
        })?;

        if uses_bucket && self.buckets.is_empty() {
            return Err(Error::Config(format!(
                "site {}: url_template uses {{bucket}} but no buckets are configured",
                self.name
            )));
        }

        if !self.sound_ref.contains("{file}") {
            return Err(Error::Config(format!(
                "site {}: sound_ref must contain {{file}}",
                self.name
            )));
        }

        Ok(())
    }

    /// Directory bucket for an initial
    pub fn bucket_for(&self, initial: &str) -> Result<&str> {
        self.buckets.get(initial).map(String::as_str).ok_or_else(|| {
            Error::Config(format!(
                "site {}: no bucket configured for initial {:?}",
                self.name, initial
            ))
        })
    }

    /// Resolve one syllable into its remote link
    pub fn resolve(&self, syllable: &Syllable) -> Result<RemoteLink> {
        let key = syllable.key()?;
        let url = render_template(&self.url_template, |name| match name {
            "pinyin_tone" => Ok(key.to_string()),
            "pinyin" => Ok(key.spelling().to_string()),
            "initial" => Ok(syllable.initial().to_string()),
            "final" => Ok(syllable.final_().to_string()),
            "tone" => Ok(syllable.tone().to_string()),
            "bucket" => self.bucket_for(syllable.initial()).map(str::to_string),
            "format" => Ok(self.format.clone()),
            other => Err(unknown_placeholder(&self.url_template, other)),
        })?;

        Ok(RemoteLink {
            syllable: syllable.clone(),
            key,
            url,
        })
    }

    /// Enumerate, order and resolve the full link set for this site
    pub fn links(&self, tables: &PhoneticTables, order: AccessOrder) -> Result<Vec<RemoteLink>> {
        let mut syllables = syllables::enumerate(tables, self.legality);
        order.apply(&mut syllables);
        syllables.iter().map(|s| self.resolve(s)).collect()
    }

    /// Deck reference token for an audio file
    pub fn sound_ref_for(&self, file_name: &str) -> String {
        render_sound_ref(&self.sound_ref, file_name)
    }
}

/// A syllable resolved against one site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteLink {
    pub syllable: Syllable,
    pub key: PinyinKey,
    pub url: String,
}

impl RemoteLink {
    /// Bare spelling (tone stripped)
    pub fn spelling(&self) -> &str {
        self.key.spelling()
    }

    pub fn file_name(&self, prefix: &str, format: &str) -> String {
        audio_file_name(prefix, &self.key, format)
    }
}

/// Local file name for a key: `{prefix}{pinyin_tone}{format}`
pub fn audio_file_name(prefix: &str, key: &PinyinKey, format: &str) -> String {
    format!("{}{}{}", prefix, key, format)
}

/// Fill `{file}` in a deck sound reference template
pub fn render_sound_ref(template: &str, file_name: &str) -> String {
    template.replace("{file}", file_name)
}

fn unknown_placeholder(template: &str, name: &str) -> Error {
    Error::Config(format!(
        "unknown placeholder {{{}}} in template {:?}",
        name, template
    ))
}

fn render_template<F>(template: &str, mut lookup: F) -> Result<String>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            Error::Config(format!("unterminated placeholder in template {:?}", template))
        })?;
        rendered.push_str(&lookup(&after[..end])?);
        rest = &after[end + 1..];
    }
    rendered.push_str(rest);

    Ok(rendered)
}
