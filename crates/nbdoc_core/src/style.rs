use std::fmt;
use std::str::FromStr;

/// Output language requested from the generation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    German,
    Chinese,
    Hindi,
    Japanese,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::English,
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Chinese,
        Language::Hindi,
        Language::Japanese,
    ];

    /// Label sent on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Chinese => "Chinese",
            Language::Hindi => "Hindi",
            Language::Japanese => "Japanese",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocStyle {
    Concise,
    #[default]
    Explanatory,
}

impl DocStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            DocStyle::Concise => "concise",
            DocStyle::Explanatory => "explanatory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Professional,
    Creative,
    Casual,
}

impl Tone {
    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Professional => "professional",
            Tone::Creative => "creative",
            Tone::Casual => "casual",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}' (expected one of: {expected})")]
pub struct ParseStyleError {
    kind: &'static str,
    value: String,
    expected: String,
}

impl ParseStyleError {
    fn new(kind: &'static str, value: &str, expected: &[&str]) -> Self {
        Self {
            kind,
            value: value.to_string(),
            expected: expected.join(", "),
        }
    }
}

impl FromStr for Language {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Language::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Language::ALL.iter().map(|l| l.as_str()).collect();
                ParseStyleError::new("language", s, &names)
            })
    }
}

impl FromStr for DocStyle {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "concise" => Ok(DocStyle::Concise),
            "explanatory" => Ok(DocStyle::Explanatory),
            _ => Err(ParseStyleError::new(
                "documentation style",
                s,
                &["concise", "explanatory"],
            )),
        }
    }
}

impl FromStr for Tone {
    type Err = ParseStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "professional" => Ok(Tone::Professional),
            "creative" => Ok(Tone::Creative),
            "casual" => Ok(Tone::Casual),
            _ => Err(ParseStyleError::new(
                "tone",
                s,
                &["professional", "creative", "casual"],
            )),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing style selections. Always valid; the default is what the
/// controls show before the user touches them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StyleOptions {
    pub language: Language,
    pub doc_style: DocStyle,
    pub tone: Tone,
}

/// Numeric knobs for the generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParameters {
    pub temperature: f64,
    pub max_output_tokens: u32,
}

pub const FALLBACK_TEMPERATURE: f64 = 0.5;
pub const FALLBACK_MAX_OUTPUT_TOKENS: u32 = 2048;

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: FALLBACK_TEMPERATURE,
            max_output_tokens: FALLBACK_MAX_OUTPUT_TOKENS,
        }
    }
}

fn temperature_for(tone: Tone) -> f64 {
    match tone {
        Tone::Professional => 0.3,
        Tone::Creative => 0.8,
        Tone::Casual => 0.6,
    }
}

fn max_tokens_for(doc_style: DocStyle) -> u32 {
    match doc_style {
        DocStyle::Concise => 1500,
        DocStyle::Explanatory => 3000,
    }
}

/// Pure mapping from style selections to generation parameters.
pub fn map_style(options: &StyleOptions) -> GenerationParameters {
    GenerationParameters {
        temperature: temperature_for(options.tone),
        max_output_tokens: max_tokens_for(options.doc_style),
    }
}

/// Maps free-form labels (e.g. from a config file). Each knob falls back
/// independently to the defaults when its label is not recognised.
pub fn map_style_labels(tone: &str, doc_style: &str) -> GenerationParameters {
    let fallback = GenerationParameters::default();
    GenerationParameters {
        temperature: tone
            .parse::<Tone>()
            .map(temperature_for)
            .unwrap_or(fallback.temperature),
        max_output_tokens: doc_style
            .parse::<DocStyle>()
            .map(max_tokens_for)
            .unwrap_or(fallback.max_output_tokens),
    }
}

/// Tone / doc style labels that did not name a known value, e.g. from a
/// config file. While present they take precedence over the matching
/// selection, so that knob uses the fallback parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleLabels {
    pub tone: Option<String>,
    pub doc_style: Option<String>,
}

impl StyleLabels {
    /// Keeps only the labels that do not parse.
    pub fn unrecognized(tone: &str, doc_style: &str) -> Self {
        Self {
            tone: tone.parse::<Tone>().is_err().then(|| tone.to_string()),
            doc_style: doc_style
                .parse::<DocStyle>()
                .is_err()
                .then(|| doc_style.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tone.is_none() && self.doc_style.is_none()
    }

    /// Parameters for `style`, with any held label standing in for its knob.
    pub fn parameters(&self, style: &StyleOptions) -> GenerationParameters {
        map_style_labels(
            self.tone.as_deref().unwrap_or(style.tone.as_str()),
            self.doc_style
                .as_deref()
                .unwrap_or(style.doc_style.as_str()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("spanish".parse::<Language>(), Ok(Language::Spanish));
        assert_eq!(" Casual ".parse::<Tone>(), Ok(Tone::Casual));
        assert_eq!("CONCISE".parse::<DocStyle>(), Ok(DocStyle::Concise));
    }

    #[test]
    fn unknown_label_lists_expected_values() {
        let err = "klingon".parse::<Language>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("klingon"));
        assert!(message.contains("Japanese"));
    }

    #[test]
    fn recognized_labels_are_not_held() {
        assert!(StyleLabels::unrecognized("Casual", "concise").is_empty());
        let held = StyleLabels::unrecognized("whimsical", "concise");
        assert_eq!(held.tone.as_deref(), Some("whimsical"));
        assert_eq!(held.doc_style, None);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for lang in Language::ALL {
            assert_eq!(lang.to_string().parse::<Language>(), Ok(lang));
        }
    }
}
