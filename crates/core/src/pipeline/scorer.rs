use crate::domain::{Candidate, TextItem};

const DEFAULT_POSITIVE: &[&str] = &[
    "surge", "rise", "gain", "up", "positive", "growth", "profit", "success", "beat", "record",
    "strong",
];

const DEFAULT_NEGATIVE: &[&str] = &[
    "fall", "drop", "decline", "down", "negative", "loss", "crash", "risk", "miss", "weak",
    "lawsuit",
];

const SAMPLE_SIZE: usize = 3;

/// Polarity word lists. Matching is a case-insensitive substring test, so "up" also hits
/// "update" and "upgrade".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new(DEFAULT_POSITIVE.iter().copied(), DEFAULT_NEGATIVE.iter().copied())
    }
}

impl Lexicon {
    pub fn new<P, N>(positive: P, negative: N) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        fn normalize<I>(words: I) -> Vec<String>
        where
            I: IntoIterator,
            I::Item: AsRef<str>,
        {
            words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect()
        }

        Self {
            positive: normalize(positive),
            negative: normalize(negative),
        }
    }

    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    pub fn negative(&self) -> &[String] {
        &self.negative
    }

    fn hits(words: &[String], lowered: &str) -> bool {
        words.iter().any(|w| lowered.contains(w.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentResult {
    pub candidate: Candidate,
    pub positive_count: usize,
    pub negative_count: usize,
    pub total_count: usize,
    /// `(positive - negative) / total`, or 0 with no items. Always within [-1, 1].
    pub score: f64,
    pub sample_headlines: Vec<TextItem>,
}

impl SentimentResult {
    pub fn has_evidence(&self) -> bool {
        self.total_count > 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentimentScorer {
    lexicon: Lexicon,
}

impl SentimentScorer {
    pub fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Each item counts at most once per polarity, and may count for both: "profit falls"
    /// is one positive and one negative hit.
    pub fn score(&self, candidate: &Candidate, items: &[TextItem]) -> SentimentResult {
        let mut positive_count = 0usize;
        let mut negative_count = 0usize;

        for item in items {
            let lowered = item.text.to_lowercase();
            if Lexicon::hits(&self.lexicon.positive, &lowered) {
                positive_count += 1;
            }
            if Lexicon::hits(&self.lexicon.negative, &lowered) {
                negative_count += 1;
            }
        }

        let total_count = items.len();
        let score = if total_count > 0 {
            (positive_count as f64 - negative_count as f64) / total_count as f64
        } else {
            0.0
        };

        SentimentResult {
            candidate: candidate.clone(),
            positive_count,
            negative_count,
            total_count,
            score,
            sample_headlines: items.iter().take(SAMPLE_SIZE).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(texts: &[&str]) -> Vec<TextItem> {
        texts.iter().map(|t| TextItem::new(*t)).collect()
    }

    fn score(texts: &[&str]) -> SentimentResult {
        SentimentScorer::default().score(&Candidate::new("AAA"), &items(texts))
    }

    #[test]
    fn empty_list_scores_zero() {
        let res = score(&[]);
        assert_eq!(res.total_count, 0);
        assert_eq!(res.positive_count, 0);
        assert_eq!(res.negative_count, 0);
        assert_eq!(res.score, 0.0);
        assert!(!res.has_evidence());
    }

    #[test]
    fn single_positive_headline() {
        let res = score(&["Stock surges on strong earnings"]);
        assert_eq!(res.positive_count, 1);
        assert_eq!(res.negative_count, 0);
        assert_eq!(res.score, 1.0);
    }

    #[test]
    fn mixed_headline_counts_for_both() {
        let res = score(&["Profit falls sharply"]);
        assert_eq!(res.positive_count, 1);
        assert_eq!(res.negative_count, 1);
        assert_eq!(res.total_count, 1);
        assert_eq!(res.score, 0.0);
    }

    #[test]
    fn neutral_headlines_keep_total() {
        let res = score(&["Company holds annual meeting", "CEO speaks at conference"]);
        assert_eq!(res.total_count, 2);
        assert_eq!(res.score, 0.0);
        assert!(res.has_evidence());
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        // "UPDATE" contains "up".
        let res = score(&["SHARES RALLY", "Quarterly UPDATE", "LAWSUIT filed"]);
        assert_eq!(res.positive_count, 1);
        assert_eq!(res.negative_count, 1);
        assert_eq!(res.total_count, 3);
    }

    #[test]
    fn multiple_words_in_one_item_count_once() {
        let res = score(&["Record growth, strong profit, shares surge"]);
        assert_eq!(res.positive_count, 1);
        assert_eq!(res.score, 1.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let cases: &[&[&str]] = &[
            &["crash", "loss", "weak"],
            &["gain", "gain", "drop"],
            &["profit falls", "beat but weak guidance", "neutral"],
            &["", "", ""],
        ];
        for texts in cases {
            let res = score(texts);
            assert!((-1.0..=1.0).contains(&res.score), "{texts:?} -> {}", res.score);
            assert!(res.total_count >= res.positive_count.max(res.negative_count));
        }
        assert_eq!(score(&["crash", "loss", "weak"]).score, -1.0);
    }

    #[test]
    fn samples_are_first_three_in_order() {
        let res = score(&["a", "b", "c", "d"]);
        assert_eq!(res.sample_headlines, items(&["a", "b", "c"]));

        let res = score(&["only"]);
        assert_eq!(res.sample_headlines, items(&["only"]));
    }

    #[test]
    fn custom_lexicon_is_normalized() {
        let lexicon = Lexicon::new([" Moon ", ""], ["Dump"]);
        assert_eq!(lexicon.positive(), ["moon".to_string()]);
        let scorer = SentimentScorer::new(lexicon);
        let res = scorer.score(&Candidate::new("X"), &items(&["to the MOON", "dumped"]));
        assert_eq!(res.positive_count, 1);
        assert_eq!(res.negative_count, 1);
        assert_eq!(res.score, 0.0);
    }
}
