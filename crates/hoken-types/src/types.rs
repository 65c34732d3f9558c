use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How annotated Kanji are rendered for display
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RubyStyle {
    /// 漢字《かんじ》
    #[default]
    Bracket,
    /// <ruby>漢字<rt>かんじ</rt></ruby>
    Html,
    /// 漢字 (reading dropped)
    Plain,
}

impl std::fmt::Display for RubyStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RubyStyle::Bracket => write!(f, "bracket"),
            RubyStyle::Html => write!(f, "html"),
            RubyStyle::Plain => write!(f, "plain"),
        }
    }
}

/// Display language.
///
/// Every user-facing string travels as "中文 / English / 日本語" and the
/// order of the variants follows that layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[value(name = "zh")]
    Chinese,
    #[value(name = "en")]
    English,
    #[value(name = "ja")]
    Japanese,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Chinese, Language::English, Language::Japanese];

    /// Position of this language inside a trilingual string
    pub fn index(&self) -> usize {
        match self {
            Language::Chinese => 0,
            Language::English => 1,
            Language::Japanese => 2,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Chinese => "zh",
            Language::English => "en",
            Language::Japanese => "ja",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Separator between the language parts of a trilingual string
pub const TRILINGUAL_SEPARATOR: &str = " / ";

/// A string split into its Chinese / English / Japanese parts.
///
/// Text that does not follow the three-part layout keeps everything in
/// `chinese` and leaves the other parts empty, so `pick` falls back to
/// the whole string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trilingual<'a> {
    pub chinese: &'a str,
    pub english: &'a str,
    pub japanese: &'a str,
}

impl<'a> Trilingual<'a> {
    /// Split "CN / EN / JP". Extra separators stay inside the Japanese part.
    pub fn split(text: &'a str) -> Self {
        let mut parts = text.splitn(3, TRILINGUAL_SEPARATOR);
        let chinese = parts.next().unwrap_or_default();
        match (parts.next(), parts.next()) {
            (Some(english), Some(japanese)) => Self {
                chinese: chinese.trim(),
                english: english.trim(),
                japanese: japanese.trim(),
            },
            _ => Self {
                chinese: text,
                english: "",
                japanese: "",
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.english.is_empty() && !self.japanese.is_empty()
    }

    /// Part for one language, or the full text when not trilingual
    pub fn get(&self, lang: Language) -> &'a str {
        if !self.is_complete() {
            return self.chinese;
        }
        match lang {
            Language::Chinese => self.chinese,
            Language::English => self.english,
            Language::Japanese => self.japanese,
        }
    }
}

/// Select the part of `text` for `lang`; `None` keeps all three.
pub fn pick(text: &str, lang: Option<Language>) -> &str {
    match lang {
        Some(lang) => Trilingual::split(text).get(lang),
        None => text,
    }
}

/// Join three parts into the canonical trilingual layout
pub fn trilingual(chinese: &str, english: &str, japanese: &str) -> String {
    [chinese, english, japanese].join(TRILINGUAL_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_three_parts() {
        let t = Trilingual::split("保费 / Premium / 保険料(ほけんりょう)");
        assert_eq!(t.chinese, "保费");
        assert_eq!(t.english, "Premium");
        assert_eq!(t.japanese, "保険料(ほけんりょう)");
        assert!(t.is_complete());
    }

    #[test]
    fn test_split_plain_text() {
        let t = Trilingual::split("Standard");
        assert!(!t.is_complete());
        assert_eq!(t.get(Language::English), "Standard");
    }

    #[test]
    fn test_split_keeps_extra_separators_in_japanese() {
        let t = Trilingual::split("a / b / c / d");
        assert_eq!(t.japanese, "c / d");
    }

    #[test]
    fn test_pick() {
        let text = "终身保险 / Whole Life / 終身保険(しゅうしんほけん)";
        assert_eq!(pick(text, Some(Language::English)), "Whole Life");
        assert_eq!(pick(text, None), text);
    }

    #[test]
    fn test_trilingual_join() {
        assert_eq!(trilingual("a", "b", "c"), "a / b / c");
    }
}
