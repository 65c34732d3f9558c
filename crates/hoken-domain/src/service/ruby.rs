//! Ruby-text (furigana) annotation
//!
//! Text coming from the catalog and from the model carries readings inline:
//! `保険料(ほけんりょう)` or `保険料（ほけんりょう）`. Line breaks arrive as
//! `<br>` tags or newlines. [`annotate`] turns such a string into a flat
//! list of [`TextSegment`]s that a display surface can render without
//! knowing anything about the markup.
//!
//! The scan is a single left-to-right pass of two non-backtracking regexes;
//! anything that does not match (unbalanced brackets, a reading with no
//! Kanji in front) stays in the plain text stream.

use std::sync::LazyLock;

use hoken_types::RubyStyle;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Canonical form of a line break in [`RubyText::source_text`]
pub const CANONICAL_BREAK: &str = "\n";

/// Kanji run (CJK unified ideographs + 々), optional whitespace, then a kana
/// reading inside a matching ASCII or full-width bracket pair.
static RUBY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"([\x{4E00}-\x{9FAF}\x{3005}]+)\s*",
        r"(?:\(([ \x{3040}-\x{309F}\x{30A0}-\x{30FF}]+)\)",
        r"|（([ \x{3040}-\x{309F}\x{30A0}-\x{30FF}]+)）)",
    ))
    .expect("ruby pattern is a valid regex")
});

/// `<br>`, `<br/>`, `<br />` or a newline (optionally preceded by CR)
static BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|\r?\n").expect("break pattern is a valid regex")
});

/// One piece of annotated text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSegment {
    /// Literal text rendered as-is
    Plain { text: String },
    /// Kanji run with its phonetic reading.
    ///
    /// `source` is the exact matched markup (brackets and spacing included)
    /// so the original string can be rebuilt.
    Ruby {
        base: String,
        reading: String,
        source: String,
    },
    /// Line break
    Break,
}

impl TextSegment {
    fn plain(text: &str) -> Self {
        TextSegment::Plain {
            text: text.to_string(),
        }
    }

    /// Text shown to the reader, readings dropped
    pub fn base_text(&self) -> &str {
        match self {
            TextSegment::Plain { text } => text,
            TextSegment::Ruby { base, .. } => base,
            TextSegment::Break => CANONICAL_BREAK,
        }
    }

    /// Markup this segment was parsed from (breaks canonicalised)
    pub fn source_text(&self) -> &str {
        match self {
            TextSegment::Plain { text } => text,
            TextSegment::Ruby { source, .. } => source,
            TextSegment::Break => CANONICAL_BREAK,
        }
    }

    pub fn reading(&self) -> Option<&str> {
        match self {
            TextSegment::Ruby { reading, .. } => Some(reading),
            _ => None,
        }
    }
}

/// Parse `input` into segments.
///
/// Empty input yields no segments. Plain segments are never empty.
pub fn annotate(input: &str) -> Vec<TextSegment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for br in BREAK_PATTERN.find_iter(input) {
        annotate_line(&input[last..br.start()], &mut segments);
        segments.push(TextSegment::Break);
        last = br.end();
    }
    annotate_line(&input[last..], &mut segments);

    segments
}

fn annotate_line(line: &str, out: &mut Vec<TextSegment>) {
    let mut last = 0;

    for caps in RUBY_PATTERN.captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        let reading = caps.get(2).or_else(|| caps.get(3));
        let (Some(base), Some(reading)) = (caps.get(1), reading) else {
            continue;
        };

        if whole.start() > last {
            out.push(TextSegment::plain(&line[last..whole.start()]));
        }
        out.push(TextSegment::Ruby {
            base: base.as_str().to_string(),
            reading: reading.as_str().to_string(),
            source: whole.as_str().to_string(),
        });
        last = whole.end();
    }

    if last < line.len() {
        out.push(TextSegment::plain(&line[last..]));
    }
}

/// Owned, parsed ruby text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RubyText {
    segments: Vec<TextSegment>,
}

impl RubyText {
    pub fn parse(input: &str) -> Self {
        Self {
            segments: annotate(input),
        }
    }

    pub fn segments(&self) -> &[TextSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of annotated Kanji runs
    pub fn ruby_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.reading().is_some())
            .count()
    }

    /// Rebuild the input with line breaks normalised to `\n`
    pub fn source_text(&self) -> String {
        self.segments.iter().map(TextSegment::source_text).collect()
    }

    /// Display text without readings
    pub fn base_text(&self) -> String {
        self.segments.iter().map(TextSegment::base_text).collect()
    }

    pub fn render(&self, style: RubyStyle) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match (segment, style) {
                (TextSegment::Plain { text }, RubyStyle::Html) => out.push_str(&escape_html(text)),
                (TextSegment::Plain { text }, _) => out.push_str(text),
                (TextSegment::Ruby { base, reading, .. }, RubyStyle::Html) => {
                    out.push_str("<ruby>");
                    out.push_str(&escape_html(base));
                    out.push_str("<rt>");
                    out.push_str(&escape_html(reading));
                    out.push_str("</rt></ruby>");
                }
                (TextSegment::Ruby { base, reading, .. }, RubyStyle::Bracket) => {
                    out.push_str(base);
                    out.push('《');
                    out.push_str(reading);
                    out.push('》');
                }
                (TextSegment::Ruby { base, .. }, RubyStyle::Plain) => out.push_str(base),
                (TextSegment::Break, RubyStyle::Html) => out.push_str("<br>"),
                (TextSegment::Break, _) => out.push_str(CANONICAL_BREAK),
            }
        }
        out
    }
}

impl<'a> IntoIterator for &'a RubyText {
    type Item = &'a TextSegment;
    type IntoIter = std::slice::Iter<'a, TextSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

/// Parse and render in one step
pub fn render(input: &str, style: RubyStyle) -> String {
    RubyText::parse(input).render(style)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Replace every break marker with the canonical `\n`
pub fn normalize_breaks(input: &str) -> String {
    BREAK_PATTERN.replace_all(input, CANONICAL_BREAK).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn plain(text: &str) -> TextSegment {
        TextSegment::Plain {
            text: text.to_string(),
        }
    }

    fn ruby(base: &str, reading: &str, source: &str) -> TextSegment {
        TextSegment::Ruby {
            base: base.to_string(),
            reading: reading.to_string(),
            source: source.to_string(),
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(annotate("").is_empty());
    }

    #[test]
    fn test_no_annotation_is_single_plain_segment() {
        assert_eq!(annotate("Whole Life Insurance"), vec![plain("Whole Life Insurance")]);
        assert_eq!(annotate("终身保险"), vec![plain("终身保险")]);
    }

    #[test]
    fn test_plain_ruby_plain() {
        assert_eq!(
            annotate("A漢字(かんじ)B"),
            vec![plain("A"), ruby("漢字", "かんじ", "漢字(かんじ)"), plain("B")]
        );
    }

    #[test]
    fn test_full_width_brackets() {
        assert_eq!(
            annotate("保険料（ほけんりょう）"),
            vec![ruby("保険料", "ほけんりょう", "保険料（ほけんりょう）")]
        );
    }

    #[test]
    fn test_whitespace_between_kanji_and_bracket() {
        let segments = annotate("解約 (かいやく)");
        assert_eq!(segments, vec![ruby("解約", "かいやく", "解約 (かいやく)")]);
    }

    #[test]
    fn test_iteration_mark_and_katakana_reading() {
        let segments = annotate("人々(ヒトビト)");
        assert_eq!(segments, vec![ruby("人々", "ヒトビト", "人々(ヒトビト)")]);
    }

    #[test]
    fn test_multiple_annotations_in_one_line() {
        let segments = annotate("入院(にゅういん)と手術(しゅじゅつ)をカバー");
        assert_eq!(
            segments,
            vec![
                ruby("入院", "にゅういん", "入院(にゅういん)"),
                plain("と"),
                ruby("手術", "しゅじゅつ", "手術(しゅじゅつ)"),
                plain("をカバー"),
            ]
        );
    }

    #[test]
    fn test_only_kanji_run_directly_before_bracket_is_annotated() {
        // "がん" is kana, so only 保険 takes the reading
        let segments = annotate("がん保険(ほけん)");
        assert_eq!(segments, vec![plain("がん"), ruby("保険", "ほけん", "保険(ほけん)")]);
    }

    #[test]
    fn test_unmatched_bracket_is_literal() {
        assert_eq!(annotate("漢字(かんじ"), vec![plain("漢字(かんじ")]);
        assert_eq!(annotate("漢字かんじ)"), vec![plain("漢字かんじ)")]);
    }

    #[test]
    fn test_mixed_brackets_are_literal() {
        assert_eq!(annotate("漢字(かんじ）"), vec![plain("漢字(かんじ）")]);
    }

    #[test]
    fn test_reading_without_kanji_is_literal() {
        assert_eq!(annotate("(かんじ)"), vec![plain("(かんじ)")]);
        assert_eq!(annotate("Premium (ほけん)"), vec![plain("Premium (ほけん)")]);
    }

    #[test]
    fn test_non_kana_reading_is_literal() {
        assert_eq!(annotate("円(JPY)"), vec![plain("円(JPY)")]);
    }

    #[test]
    fn test_line_breaks() {
        let segments = annotate("需要有效的保单。<br/>Need active policy.<br>有効(ゆうこう)");
        assert_eq!(
            segments,
            vec![
                plain("需要有效的保单。"),
                TextSegment::Break,
                plain("Need active policy."),
                TextSegment::Break,
                ruby("有効", "ゆうこう", "有効(ゆうこう)"),
            ]
        );
    }

    #[test]
    fn test_break_variants() {
        let segments = annotate("a\r\nb<BR />c\n");
        assert_eq!(
            segments,
            vec![
                plain("a"),
                TextSegment::Break,
                plain("b"),
                TextSegment::Break,
                plain("c"),
                TextSegment::Break,
            ]
        );
    }

    #[test]
    fn test_annotation_does_not_span_breaks() {
        let segments = annotate("漢字\n(かんじ)");
        assert_eq!(segments, vec![plain("漢字"), TextSegment::Break, plain("(かんじ)")]);
    }

    #[test]
    fn test_render_styles() {
        let text = RubyText::parse("保険料(ほけんりょう) & <tax>");
        assert_eq!(text.render(RubyStyle::Bracket), "保険料《ほけんりょう》 & <tax>");
        assert_eq!(text.render(RubyStyle::Plain), "保険料 & <tax>");
        assert_eq!(
            text.render(RubyStyle::Html),
            "<ruby>保険料<rt>ほけんりょう</rt></ruby> &amp; &lt;tax&gt;"
        );
    }

    #[test]
    fn test_render_html_break() {
        assert_eq!(render("a<br>b", RubyStyle::Html), "a<br>b");
        assert_eq!(render("a<br>b", RubyStyle::Bracket), "a\nb");
    }

    #[test]
    fn test_base_text_and_count() {
        let text = RubyText::parse("終身保険(しゅうしんほけん) / Whole Life");
        assert_eq!(text.base_text(), "終身保険 / Whole Life");
        assert_eq!(text.ruby_count(), 1);
    }

    #[test]
    fn test_readings_in_order() {
        let text = RubyText::parse("入院(にゅういん)と手術（しゅじゅつ）");
        let readings: Vec<_> = (&text).into_iter().filter_map(TextSegment::reading).collect();
        assert_eq!(readings, vec!["にゅういん", "しゅじゅつ"]);
    }

    #[test]
    fn test_reparse_is_stable() {
        let input = "死亡保険金(しぼうほけんきん): 1000万-1億円<br>解約返戻金(かいやくへんれいきん)あり";
        let first = RubyText::parse(input);
        let second = RubyText::parse(&first.source_text());
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_source_text_round_trips(input in "\\PC*") {
            let text = RubyText::parse(&input);
            prop_assert_eq!(text.source_text(), normalize_breaks(&input));
        }

        #[test]
        fn prop_round_trips_markup_heavy_input(
            input in "[漢字保険料あかんじ()（）<br/> \nA-z]{0,40}"
        ) {
            let text = RubyText::parse(&input);
            prop_assert_eq!(text.source_text(), normalize_breaks(&input));
        }

        #[test]
        fn prop_plain_segments_are_never_empty(input in "\\PC*") {
            for segment in annotate(&input) {
                if let TextSegment::Plain { text } = segment {
                    prop_assert!(!text.is_empty());
                }
            }
        }

        #[test]
        fn prop_text_without_markup_is_one_segment(input in "[a-zA-Z0-9 ,.!?]{1,40}") {
            prop_assert_eq!(annotate(&input), vec![plain(&input)]);
        }
    }
}
