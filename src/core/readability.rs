/// Readability scoring for extracted text
///
/// This module counts words, sentences and syllables in a block of text and
/// turns those counts into the standard readability formulas (Flesch reading
/// ease, Flesch-Kincaid, Gunning fog, SMOG, Coleman-Liau, ARI) together with a
/// consensus grade level and a rough CEFR band.

use std::fmt;

use hyphenation::{Hyphenator, Language, Load, Standard};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Serialize;

/// Errors raised while scoring text
#[derive(Debug, thiserror::Error)]
pub enum ReadabilityError {
    /// The embedded hyphenation patterns could not be loaded
    #[error("Failed to load hyphenation dictionary: {0}")]
    Dictionary(String),

    /// Nothing to score
    #[error("Text is empty")]
    EmptyText,
}

lazy_static! {
    /// Everything except word characters, whitespace and apostrophes
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s']").unwrap();

    /// One sentence: starts on a word boundary and runs to its terminators
    static ref SENTENCE: Regex = Regex::new(r"\b[^.!?]+[.!?]*").unwrap();
}

/// Number of leading words Linsear Write looks at
const LINSEAR_SAMPLE_WORDS: usize = 100;

/// Syllables at which a word counts as complex
const COMPLEX_WORD_SYLLABLES: usize = 3;

/// Raw counts every formula is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TextStatistics {
    pub words: usize,
    pub sentences: usize,
    pub syllables: usize,
    /// Words with three or more syllables
    pub polysyllables: usize,
    /// Alphanumeric characters
    pub letters: usize,
    /// Non-whitespace characters, punctuation included
    pub characters: usize,
}

impl TextStatistics {
    /// Average number of words per sentence
    pub fn avg_sentence_length(&self) -> f64 {
        ratio(self.words, self.sentences)
    }

    /// Average number of syllables per word
    pub fn avg_syllables_per_word(&self) -> f64 {
        ratio(self.syllables, self.words)
    }
}

/// Common European Framework of Reference band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
}

impl CefrLevel {
    /// Classify text by sentence length and the share of complex words
    pub fn classify(stats: &TextStatistics) -> Self {
        let avg_words = stats.avg_sentence_length();
        let complex_ratio = ratio(stats.polysyllables, stats.words);

        if avg_words < 10.0 && complex_ratio < 0.10 {
            CefrLevel::A1
        } else if avg_words < 15.0 && complex_ratio < 0.15 {
            CefrLevel::A2
        } else if avg_words < 20.0 && complex_ratio < 0.25 {
            CefrLevel::B1
        } else if avg_words < 25.0 && complex_ratio < 0.35 {
            CefrLevel::B2
        } else {
            CefrLevel::C1
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "Beginner - Can understand and use familiar everyday expressions",
            CefrLevel::A2 => "Elementary - Can understand sentences and frequently used expressions",
            CefrLevel::B1 => "Intermediate - Can understand the main points of clear standard input",
            CefrLevel::B2 => "Upper Intermediate - Can understand the main ideas of complex text",
            CefrLevel::C1 => "Advanced - Can understand a wide range of demanding texts",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Readability scores for one piece of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadabilityScores {
    pub flesch_reading_ease: f64,
    pub flesch_kincaid_grade: f64,
    pub gunning_fog_index: f64,
    pub smog_index: f64,
    pub coleman_liau_index: f64,
    pub automated_readability_index: f64,
    pub estimated_grade_level: f64,
    pub cefr_level: CefrLevel,
    pub statistics: TextStatistics,
}

impl ReadabilityScores {
    /// Numeric scores in display order, keyed by field name
    pub fn fields(&self) -> [(&'static str, f64); 7] {
        [
            ("flesch_reading_ease", self.flesch_reading_ease),
            ("flesch_kincaid_grade", self.flesch_kincaid_grade),
            ("gunning_fog_index", self.gunning_fog_index),
            ("smog_index", self.smog_index),
            ("coleman_liau_index", self.coleman_liau_index),
            ("automated_readability_index", self.automated_readability_index),
            ("estimated_grade_level", self.estimated_grade_level),
        ]
    }

    /// Grade level as a label, e.g. "7th and 8th grade"
    pub fn grade_label(&self) -> String {
        grade_label(self.estimated_grade_level)
    }
}

/// Scores text using the embedded en-US hyphenation patterns for syllables
pub struct ReadabilityAnalyzer {
    dictionary: Standard,
}

impl ReadabilityAnalyzer {
    /// Create a new analyzer
    ///
    /// # Returns
    ///
    /// The analyzer, or an error if the hyphenation dictionary is unusable
    pub fn new() -> Result<Self, ReadabilityError> {
        let dictionary = Standard::from_embedded(Language::EnglishUS)
            .map_err(|e| ReadabilityError::Dictionary(format!("{:?}", e)))?;

        Ok(Self { dictionary })
    }

    /// Count the syllables of a single word
    ///
    /// A word has one more syllable than it has hyphenation points. Tokens
    /// without any word characters have none.
    pub fn syllable_count(&self, word: &str) -> usize {
        let cleaned = remove_punctuation(word).to_lowercase();
        let cleaned = cleaned.trim();

        if !cleaned.chars().any(char::is_alphanumeric) {
            return 0;
        }

        self.dictionary.hyphenate(cleaned).breaks.len() + 1
    }

    /// Gather the raw counts for `text`
    pub fn statistics(&self, text: &str) -> TextStatistics {
        let cleaned = remove_punctuation(text);

        let mut stats = TextStatistics {
            sentences: sentence_count(text),
            letters: letter_count(text),
            characters: char_count(text),
            ..TextStatistics::default()
        };

        for word in cleaned.split_whitespace() {
            if !word.chars().any(char::is_alphanumeric) {
                continue;
            }
            let syllables = self.syllable_count(word);
            stats.words += 1;
            stats.syllables += syllables;
            if syllables >= COMPLEX_WORD_SYLLABLES {
                stats.polysyllables += 1;
            }
        }

        stats
    }

    /// Compute every readability score for `text`
    ///
    /// # Arguments
    ///
    /// * `text` - Text to score
    ///
    /// # Returns
    ///
    /// The scores, or `ReadabilityError::EmptyText` when the text holds no words
    pub fn analyze(&self, text: &str) -> Result<ReadabilityScores, ReadabilityError> {
        if text.trim().is_empty() {
            return Err(ReadabilityError::EmptyText);
        }

        let stats = self.statistics(text);
        if stats.words == 0 {
            return Err(ReadabilityError::EmptyText);
        }
        debug!("Text statistics: {:?}", stats);

        let mut scores = ReadabilityScores {
            flesch_reading_ease: flesch_reading_ease(&stats),
            flesch_kincaid_grade: flesch_kincaid_grade(&stats),
            gunning_fog_index: gunning_fog(&stats),
            smog_index: smog_index(&stats),
            coleman_liau_index: coleman_liau_index(&stats),
            automated_readability_index: automated_readability_index(&stats),
            estimated_grade_level: 0.0,
            cefr_level: CefrLevel::classify(&stats),
            statistics: stats,
        };

        let linsear = self.linsear_write(text);
        scores.estimated_grade_level = consensus_grade(&scores, linsear);

        Ok(scores)
    }

    /// Linsear Write formula over the first hundred words
    pub fn linsear_write(&self, text: &str) -> f64 {
        let sample: Vec<&str> = text.split_whitespace().take(LINSEAR_SAMPLE_WORDS).collect();
        if sample.is_empty() {
            return 0.0;
        }

        let (easy, difficult) = sample.iter().fold((0usize, 0usize), |(easy, difficult), word| {
            if self.syllable_count(word) < COMPLEX_WORD_SYLLABLES {
                (easy + 1, difficult)
            } else {
                (easy, difficult + 1)
            }
        });

        let sentences = sentence_count(&sample.join(" "));
        let mut number = (easy + difficult * 3) as f64 / sentences as f64;
        if number <= 20.0 {
            number -= 2.0;
        }

        number / 2.0
    }
}

/// Strip punctuation, keeping apostrophes
pub fn remove_punctuation(text: &str) -> String {
    PUNCTUATION.replace_all(text, "").into_owned()
}

/// Number of words once punctuation is removed
pub fn lexicon_count(text: &str) -> usize {
    remove_punctuation(text).split_whitespace().count()
}

/// Number of sentences in `text`
///
/// Fragments of two words or fewer (headings, list bullets, page numbers) are
/// not counted. Always at least one.
pub fn sentence_count(text: &str) -> usize {
    let mut total = 0usize;
    let mut ignored = 0usize;

    for sentence in SENTENCE.find_iter(text) {
        total += 1;
        if lexicon_count(sentence.as_str()) <= 2 {
            ignored += 1;
        }
    }

    total.saturating_sub(ignored).max(1)
}

pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

pub fn char_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

pub fn flesch_reading_ease(stats: &TextStatistics) -> f64 {
    let score = 206.835
        - 1.015 * stats.avg_sentence_length()
        - 84.6 * stats.avg_syllables_per_word();
    round_to(score, 2)
}

pub fn flesch_kincaid_grade(stats: &TextStatistics) -> f64 {
    let score = 0.39 * stats.avg_sentence_length() + 11.8 * stats.avg_syllables_per_word() - 15.59;
    round_to(score, 1)
}

/// Gunning fog index, with complex words taken as those of three or more syllables
pub fn gunning_fog(stats: &TextStatistics) -> f64 {
    let complex_percent = ratio(stats.polysyllables, stats.words) * 100.0;
    round_to(0.4 * (stats.avg_sentence_length() + complex_percent), 2)
}

/// SMOG index; needs at least three sentences to mean anything
pub fn smog_index(stats: &TextStatistics) -> f64 {
    if stats.sentences < 3 {
        return 0.0;
    }

    let score = 1.043 * (stats.polysyllables as f64 * 30.0 / stats.sentences as f64).sqrt() + 3.1291;
    round_to(score, 1)
}

pub fn coleman_liau_index(stats: &TextStatistics) -> f64 {
    let letters_per_100 = ratio(stats.letters, stats.words) * 100.0;
    let sentences_per_100 = ratio(stats.sentences, stats.words) * 100.0;
    round_to(0.058 * letters_per_100 - 0.296 * sentences_per_100 - 15.8, 2)
}

pub fn automated_readability_index(stats: &TextStatistics) -> f64 {
    let score = 4.71 * ratio(stats.characters, stats.words)
        + 0.5 * ratio(stats.words, stats.sentences)
        - 21.43;
    round_to(score, 1)
}

/// Most frequent grade across all the individual formulas
///
/// Grade-valued formulas contribute their rounded value and its ceiling; the
/// reading ease score is mapped to a grade band first. Ties go to the grade
/// recorded first.
pub fn consensus_grade(scores: &ReadabilityScores, linsear_write: f64) -> f64 {
    let mut grades: Vec<i64> = Vec::new();

    push_bounds(&mut grades, scores.flesch_kincaid_grade);
    grades.extend_from_slice(reading_ease_grades(scores.flesch_reading_ease));
    grades.push(scores.smog_index.round() as i64);
    push_bounds(&mut grades, scores.coleman_liau_index);
    push_bounds(&mut grades, scores.automated_readability_index);
    push_bounds(&mut grades, linsear_write);
    push_bounds(&mut grades, scores.gunning_fog_index);

    most_common(&grades).unwrap_or(0) as f64
}

fn push_bounds(grades: &mut Vec<i64>, score: f64) {
    grades.push(score.round() as i64);
    grades.push(score.ceil() as i64);
}

/// Grade band for a Flesch reading ease score
fn reading_ease_grades(score: f64) -> &'static [i64] {
    match score {
        s if s >= 90.0 => &[5],
        s if s >= 80.0 => &[6],
        s if s >= 70.0 => &[7],
        s if s >= 60.0 => &[8, 9],
        s if s >= 50.0 => &[10],
        s if s >= 40.0 => &[11],
        s if s >= 30.0 => &[12],
        s if s >= 20.0 => &[13],
        s if s >= 10.0 => &[14],
        _ => &[15],
    }
}

fn most_common(grades: &[i64]) -> Option<i64> {
    let mut best: Option<(i64, usize)> = None;

    for &grade in grades {
        let count = grades.iter().filter(|&&g| g == grade).count();
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((grade, count)),
        }
    }

    best.map(|(grade, _)| grade)
}

/// Render a grade as "Nth and (N+1)th grade"
pub fn grade_label(grade: f64) -> String {
    let lower = grade.round() as i64;
    let upper = lower + 1;
    format!(
        "{}{} and {}{} grade",
        lower,
        ordinal_suffix(lower),
        upper,
        ordinal_suffix(upper)
    )
}

fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every word has at most four letters, so each is exactly one syllable.
    const SIMPLE_TEXT: &str = "The cat sat on the mat. The dog ran to the log. A big red hen ate corn.";

    fn analyzer() -> ReadabilityAnalyzer {
        ReadabilityAnalyzer::new().expect("embedded dictionary loads")
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 0.051,
            "expected {} to be close to {}",
            actual,
            expected
        );
    }

    #[test]
    fn test_sentence_count_ignores_short_fragments() {
        assert_eq!(sentence_count(SIMPLE_TEXT), 3);
        assert_eq!(sentence_count("Chapter 1. The story begins here today."), 1);
        assert_eq!(sentence_count(""), 1);
    }

    #[test]
    fn test_lexicon_count_drops_punctuation() {
        assert_eq!(lexicon_count("Hello, world! It's -- fine."), 4);
        assert_eq!(lexicon_count("   "), 0);
    }

    #[test]
    fn test_letter_and_char_counts() {
        assert_eq!(letter_count("Hi, you."), 5);
        assert_eq!(char_count("Hi, you."), 7);
    }

    #[test]
    fn test_syllable_count() {
        let analyzer = analyzer();
        assert_eq!(analyzer.syllable_count("cat"), 1);
        assert_eq!(analyzer.syllable_count("The"), 1);
        assert_eq!(analyzer.syllable_count("--"), 0);
        assert_eq!(analyzer.syllable_count("''"), 0);
        assert!(analyzer.syllable_count("readability") >= 3);
    }

    #[test]
    fn test_statistics_for_simple_text() {
        let stats = analyzer().statistics(SIMPLE_TEXT);
        assert_eq!(stats.words, 18);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.syllables, 18);
        assert_eq!(stats.polysyllables, 0);
        assert_eq!(stats.letters, 51);
        assert_eq!(stats.characters, 54);
    }

    #[test]
    fn test_scores_for_simple_text() {
        let scores = analyzer().analyze(SIMPLE_TEXT).expect("text has words");

        assert_close(scores.flesch_reading_ease, 116.15);
        assert_close(scores.flesch_kincaid_grade, -1.45);
        assert_close(scores.gunning_fog_index, 2.4);
        assert_close(scores.smog_index, 3.1);
        assert_close(scores.coleman_liau_index, -4.3);
        assert_close(scores.automated_readability_index, -4.3);
        assert_eq!(scores.cefr_level, CefrLevel::A1);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let analyzer = analyzer();
        assert!(matches!(analyzer.analyze(""), Err(ReadabilityError::EmptyText)));
        assert!(matches!(analyzer.analyze(" \n\t "), Err(ReadabilityError::EmptyText)));
        assert!(matches!(analyzer.analyze("... !!"), Err(ReadabilityError::EmptyText)));
    }

    #[test]
    fn test_apostrophes_alone_are_not_words() {
        let analyzer = analyzer();
        assert_eq!(analyzer.statistics("'' ' ''").words, 0);
        assert!(matches!(analyzer.analyze("'' ' ''"), Err(ReadabilityError::EmptyText)));

        let stats = analyzer.statistics("The cat ' sat on the mat.");
        assert_eq!(stats.words, 6);
        assert_eq!(stats.syllables, 6);
    }

    #[test]
    fn test_smog_needs_three_sentences() {
        let stats = TextStatistics {
            words: 10,
            sentences: 2,
            syllables: 20,
            polysyllables: 4,
            letters: 50,
            characters: 52,
        };
        assert_eq!(smog_index(&stats), 0.0);
    }

    #[test]
    fn test_most_common_prefers_first_on_tie() {
        assert_eq!(most_common(&[3, 4, 4, 3]), Some(3));
        assert_eq!(most_common(&[1, 2, 2]), Some(2));
        assert_eq!(most_common(&[]), None);
    }

    #[test]
    fn test_reading_ease_bands() {
        assert_eq!(reading_ease_grades(95.0), &[5]);
        assert_eq!(reading_ease_grades(65.0), &[8, 9]);
        assert_eq!(reading_ease_grades(-3.0), &[15]);
    }

    #[test]
    fn test_grade_label() {
        assert_eq!(grade_label(7.0), "7th and 8th grade");
        assert_eq!(grade_label(1.0), "1st and 2nd grade");
        assert_eq!(grade_label(12.0), "12th and 13th grade");
        assert_eq!(grade_label(21.0), "21st and 22nd grade");
    }

    #[test]
    fn test_cefr_classification() {
        let dense = TextStatistics {
            words: 300,
            sentences: 10,
            syllables: 600,
            polysyllables: 120,
            letters: 1500,
            characters: 1600,
        };
        assert_eq!(CefrLevel::classify(&dense), CefrLevel::C1);
        assert_eq!(CefrLevel::B1.to_string(), "B1");
    }
}
