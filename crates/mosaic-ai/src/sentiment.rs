//! Lexicon-based sentiment scoring (VADER rules).
//!
//! Each token's base valence comes from the [`Lexicon`]; local context then
//! adjusts it:
//!
//! - degree adverbs within three tokens scale it (`very good`, `slightly bad`)
//! - a negation within three tokens flips and dampens it (`not good`)
//! - an ALL-CAPS token in otherwise mixed-case text is emphasised
//! - `but` halves everything before it and boosts everything after it
//! - `!` and `?` runs add a fixed amount of emphasis to the total
//!
//! The summed valence is squashed into [-1, 1] with `x / sqrt(x² + 15)`, which
//! keeps the compound score stable regardless of text length.

use std::sync::Arc;

use mosaic_core::{SentimentLabel, SentimentScores};

use crate::lexicon::Lexicon;

const B_INCR: f32 = 0.293;
const B_DECR: f32 = -0.293;
const C_INCR: f32 = 0.733;
const N_SCALAR: f32 = -0.74;

const EXCLAIM_INCR: f32 = 0.292;
const MAX_EXCLAIMS: usize = 4;
const QUESTION_INCR: f32 = 0.18;
const QUESTION_MAX: f32 = 0.96;

const NORMALIZE_ALPHA: f32 = 15.0;

const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "ain't",
    "aren't", "can't", "couldn't", "daren't", "didn't", "doesn't", "dont", "hadnt", "hasnt",
    "havent", "isnt", "mightnt", "mustnt", "neither", "don't", "hadn't", "hasn't", "haven't",
    "isn't", "mightn't", "mustn't", "neednt", "needn't", "never", "none", "nope", "nor", "not",
    "nothing", "nowhere", "oughtnt", "shant", "shouldnt", "uhuh", "wasnt", "werent", "oughtn't",
    "shan't", "shouldn't", "uh-uh", "wasn't", "weren't", "without", "wont", "wouldnt", "won't",
    "wouldn't", "rarely", "seldom", "despite",
];

/// Multi-word expressions whose valence replaces that of their last word.
const IDIOMS: &[(&str, f32)] = &[
    ("the shit", 3.0),
    ("the bomb", 3.0),
    ("bad ass", 1.5),
    ("bus stop", 0.0),
    ("yeah right", -2.0),
    ("kiss of death", -1.5),
    ("to die for", 3.0),
    ("beating heart", 3.1),
    ("broken heart", -2.9),
];

/// Degree modifiers: positive entries intensify, negative ones dampen.
fn booster(word: &str) -> Option<f32> {
    let scalar = match word {
        "absolutely" | "amazingly" | "awfully" | "completely" | "considerable"
        | "considerably" | "decidedly" | "deeply" | "effing" | "enormous" | "enormously"
        | "entirely" | "especially" | "exceptional" | "exceptionally" | "extreme"
        | "extremely" | "fabulously" | "flipping" | "flippin" | "frackin" | "fracking"
        | "fricking" | "frickin" | "frigging" | "friggin" | "fully" | "fuckin" | "fucking"
        | "fuggin" | "fugging" | "greatly" | "hella" | "highly" | "hugely" | "incredible"
        | "incredibly" | "intensely" | "major" | "majorly" | "more" | "most"
        | "particularly" | "purely" | "quite" | "really" | "remarkably" | "so"
        | "substantially" | "thoroughly" | "total" | "totally" | "tremendous"
        | "tremendously" | "uber" | "unbelievably" | "unusually" | "utter" | "utterly"
        | "very" => B_INCR,
        "almost" | "barely" | "hardly" | "just enough" | "kind of" | "kinda" | "kindof"
        | "kind-of" | "less" | "little" | "marginal" | "marginally" | "occasional"
        | "occasionally" | "partly" | "scarce" | "scarcely" | "slight" | "slightly"
        | "somewhat" | "sort of" | "sorta" | "sortof" | "sort-of" => B_DECR,
        _ => return None,
    };
    Some(scalar)
}

fn idiom(phrase: &str) -> Option<f32> {
    IDIOMS
        .iter()
        .find(|(name, _)| *name == phrase)
        .map(|&(_, valence)| valence)
}

fn negated(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.contains("n't")
}

/// Python-style `isupper`: at least one cased character and no lowercase ones.
fn is_all_caps(token: &str) -> bool {
    token.chars().any(char::is_uppercase) && !token.chars().any(char::is_lowercase)
}

/// Squash an unbounded valence sum into [-1, 1].
fn normalize(score: f32) -> f32 {
    (score / (score * score + NORMALIZE_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}

/// Emphasis contributed by `!` (each, up to four) and `?` (runs of two or more).
fn punctuation_emphasis(text: &str) -> f32 {
    let exclaims = text.matches('!').count().min(MAX_EXCLAIMS);
    let questions = text.matches('?').count();
    let question_amp = match questions {
        0 | 1 => 0.0,
        2..=3 => questions as f32 * QUESTION_INCR,
        _ => QUESTION_MAX,
    };
    exclaims as f32 * EXCLAIM_INCR + question_amp
}

/// Whitespace-split tokens with surrounding punctuation stripped.
///
/// Tokens that would be two characters or fewer after stripping keep their
/// punctuation so emoticons like `:)` survive.
fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| {
            let stripped = token.trim_matches(|c: char| c.is_ascii_punctuation());
            if stripped.chars().count() <= 2 {
                token
            } else {
                stripped
            }
        })
        .collect()
}

struct Tokens<'a> {
    original: Vec<&'a str>,
    lower: Vec<String>,
    /// Some, but not all, tokens are ALL-CAPS.
    cap_differential: bool,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let original = tokenize(text);
        let lower = original.iter().map(|t| t.to_lowercase()).collect();
        let all_caps = original.iter().filter(|t| is_all_caps(t)).count();
        let cap_differential = all_caps > 0 && all_caps < original.len();
        Self {
            original,
            lower,
            cap_differential,
        }
    }

    fn len(&self) -> usize {
        self.original.len()
    }

    fn lower(&self, i: usize) -> &str {
        &self.lower[i]
    }

    /// Space-joined lowercase tokens in `range`.
    fn phrase(&self, range: std::ops::Range<usize>) -> String {
        self.lower[range].join(" ")
    }
}

/// Deterministic lexicon sentiment scorer.
///
/// Cheap to clone; the lexicon is shared read-only.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    lexicon: Arc<Lexicon>,
}

impl Default for SentimentScorer {
    fn default() -> Self {
        Self::new(Arc::new(Lexicon::builtin()))
    }
}

impl SentimentScorer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Compound polarity in [-1, 1]. Empty text and text with no lexicon
    /// matches score 0.0.
    pub fn score(&self, text: &str) -> f32 {
        self.polarity_scores(text).compound
    }

    pub fn classify(&self, text: &str) -> SentimentLabel {
        SentimentLabel::from_compound(self.score(text))
    }

    /// Compound score plus the negative/neutral/positive proportions.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens = Tokens::new(text);
        let mut sentiments = Vec::with_capacity(tokens.len());

        for i in 0..tokens.len() {
            let word = tokens.lower(i);
            // Modifiers carry no valence of their own.
            if booster(word).is_some()
                || (word == "kind" && i + 1 < tokens.len() && tokens.lower(i + 1) == "of")
            {
                sentiments.push(0.0);
                continue;
            }
            sentiments.push(self.valence(&tokens, i));
        }

        but_check(&tokens, &mut sentiments);
        score_valence(&sentiments, text)
    }

    fn in_lexicon(&self, word: &str) -> bool {
        self.lexicon.contains(word)
    }

    /// Context-adjusted valence of token `i`.
    fn valence(&self, tokens: &Tokens<'_>, i: usize) -> f32 {
        let word = tokens.lower(i);
        let Some(base) = self.lexicon.get(word) else {
            return 0.0;
        };
        let mut valence = base;

        // "no" used as a determiner ("no problem") lends its weight to the next word.
        if word == "no" && i + 1 < tokens.len() && self.in_lexicon(tokens.lower(i + 1)) {
            valence = 0.0;
        }
        if (i > 0 && tokens.lower(i - 1) == "no")
            || (i > 1 && tokens.lower(i - 2) == "no")
            || (i > 2
                && tokens.lower(i - 3) == "no"
                && matches!(tokens.lower(i - 1), "or" | "nor"))
        {
            valence = base * N_SCALAR;
        }

        if tokens.cap_differential && is_all_caps(tokens.original[i]) {
            if valence > 0.0 {
                valence += C_INCR;
            } else {
                valence -= C_INCR;
            }
        }

        for start in 0..3 {
            if i <= start {
                break;
            }
            let prev = i - (start + 1);
            if self.in_lexicon(tokens.lower(prev)) {
                continue;
            }
            let mut scalar = scalar_inc_dec(tokens, prev, valence);
            if scalar != 0.0 {
                match start {
                    1 => scalar *= 0.95,
                    2 => scalar *= 0.9,
                    _ => {}
                }
            }
            valence += scalar;
            valence = negation_check(tokens, valence, start, i);
            if start == 2 {
                valence = idioms_check(tokens, valence, i);
            }
        }

        self.least_check(tokens, valence, i)
    }

    /// "least" before a word negates it, except in "at least" / "very least".
    fn least_check(&self, tokens: &Tokens<'_>, valence: f32, i: usize) -> f32 {
        if i == 0 || tokens.lower(i - 1) != "least" || self.in_lexicon("least") {
            return valence;
        }
        if i > 1 && matches!(tokens.lower(i - 2), "at" | "very") {
            return valence;
        }
        valence * N_SCALAR
    }
}

/// Booster contribution of the token at `prev`, signed to follow `valence`.
fn scalar_inc_dec(tokens: &Tokens<'_>, prev: usize, valence: f32) -> f32 {
    let Some(mut scalar) = booster(tokens.lower(prev)) else {
        return 0.0;
    };
    if valence < 0.0 {
        scalar = -scalar;
    }
    if tokens.cap_differential && is_all_caps(tokens.original[prev]) {
        if valence > 0.0 {
            scalar += C_INCR;
        } else {
            scalar -= C_INCR;
        }
    }
    scalar
}

fn negation_check(tokens: &Tokens<'_>, valence: f32, start: usize, i: usize) -> f32 {
    let w = move |offset: usize| tokens.lower(i - offset);
    let so_or_this = |word: &str| matches!(word, "so" | "this");
    match start {
        0 => {
            if negated(w(1)) {
                return valence * N_SCALAR;
            }
        }
        1 => {
            if w(2) == "never" && so_or_this(w(1)) {
                return valence * 1.25;
            }
            if w(2) == "without" && w(1) == "doubt" {
                return valence;
            }
            if negated(w(2)) {
                return valence * N_SCALAR;
            }
        }
        2 => {
            if w(3) == "never" && (so_or_this(w(2)) || so_or_this(w(1))) {
                return valence * 1.25;
            }
            if w(3) == "without" && (w(2) == "doubt" || w(1) == "doubt") {
                return valence;
            }
            if negated(w(3)) {
                return valence * N_SCALAR;
            }
        }
        _ => {}
    }
    valence
}

/// Idioms ending at, or starting from, token `i` override its valence;
/// multi-word dampeners ("sort of") before it adjust it. Requires `i >= 3`.
fn idioms_check(tokens: &Tokens<'_>, mut valence: f32, i: usize) -> f32 {
    let preceding = [
        tokens.phrase(i - 1..i + 1),
        tokens.phrase(i - 2..i + 1),
        tokens.phrase(i - 2..i),
        tokens.phrase(i - 3..i),
        tokens.phrase(i - 3..i - 1),
    ];
    if let Some(v) = preceding.iter().find_map(|p| idiom(p)) {
        valence = v;
    }
    if i + 1 < tokens.len()
        && let Some(v) = idiom(&tokens.phrase(i..i + 2))
    {
        valence = v;
    }
    if i + 2 < tokens.len()
        && let Some(v) = idiom(&tokens.phrase(i..i + 3))
    {
        valence = v;
    }

    for ngram in [
        tokens.phrase(i - 3..i),
        tokens.phrase(i - 3..i - 1),
        tokens.phrase(i - 2..i),
    ] {
        if let Some(scalar) = booster(&ngram) {
            valence += scalar;
        }
    }
    valence
}

/// Contrastive "but": what follows outweighs what came before.
fn but_check(tokens: &Tokens<'_>, sentiments: &mut [f32]) {
    let Some(but) = tokens.lower.iter().position(|w| w == "but") else {
        return;
    };
    for (idx, s) in sentiments.iter_mut().enumerate() {
        if idx < but {
            *s *= 0.5;
        } else if idx > but {
            *s *= 1.5;
        }
    }
}

fn score_valence(sentiments: &[f32], text: &str) -> SentimentScores {
    if sentiments.is_empty() {
        return SentimentScores::default();
    }

    let punct = punctuation_emphasis(text);
    let mut sum: f32 = sentiments.iter().sum();
    if sum > 0.0 {
        sum += punct;
    } else if sum < 0.0 {
        sum -= punct;
    }
    let compound = normalize(sum);

    let (mut pos_sum, mut neg_sum, mut neu_count) = (0.0f32, 0.0f32, 0usize);
    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neu_count += 1;
        }
    }
    if pos_sum > neg_sum.abs() {
        pos_sum += punct;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= punct;
    }

    let total = pos_sum + neg_sum.abs() + neu_count as f32;
    SentimentScores {
        neg: round_to((neg_sum / total).abs(), 3),
        neu: round_to(neu_count as f32 / total, 3),
        pos: round_to((pos_sum / total).abs(), 3),
        compound: round_to(compound, 4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> SentimentScorer {
        SentimentScorer::default()
    }

    #[test]
    fn reference_examples() {
        let s = scorer();
        assert_eq!(s.classify("I love this!"), SentimentLabel::Positive);
        assert_eq!(
            s.classify("This is terrible and I hate it."),
            SentimentLabel::Negative
        );
        assert_eq!(s.classify("The sky is blue."), SentimentLabel::Neutral);
    }

    #[test]
    fn love_this_compound() {
        // 3.2 (love) + 0.292 (one '!') normalized.
        let compound = scorer().score("I love this!");
        assert!((compound - 0.6696).abs() < 1e-3, "got {compound}");
    }

    #[test]
    fn empty_text_is_neutral_zero() {
        let s = scorer();
        assert_eq!(s.score(""), 0.0);
        assert_eq!(s.classify(""), SentimentLabel::Neutral);
        assert_eq!(s.polarity_scores("   \n\t"), SentimentScores::default());
    }

    #[test]
    fn unmatched_text_is_neutral() {
        let s = scorer();
        assert_eq!(s.score("Quarterly figures arrive on Tuesday"), 0.0);
        assert_eq!(s.classify("→ ∑ ☃ 日本語"), SentimentLabel::Neutral);
    }

    #[test]
    fn everyday_vocabulary_carries_valence() {
        let s = scorer();
        for text in ["My grandmother died last night", "you idiot", "I want to kill him", "they cheated me"] {
            assert_eq!(s.classify(text), SentimentLabel::Negative, "{text:?}");
        }
        for text in ["lol", "haha"] {
            assert_eq!(s.classify(text), SentimentLabel::Positive, "{text:?}");
        }
        // lol = 1.8 alone: 1.8 / sqrt(1.8^2 + 15)
        assert!((s.score("lol") - 0.4215).abs() < 1e-3, "got {}", s.score("lol"));
    }

    #[test]
    fn deterministic() {
        let s = scorer();
        let text = "Honestly the food was GOOD but the service was slow and rude!!";
        let first = s.polarity_scores(text);
        for _ in 0..10 {
            assert_eq!(s.polarity_scores(text), first);
        }
    }

    #[test]
    fn compound_stays_bounded() {
        let s = scorer();
        let long_positive = "amazing wonderful excellent ".repeat(200);
        let long_negative = "terrible awful horrible!!!! ".repeat(200);
        assert!(s.score(&long_positive) <= 1.0);
        assert!(s.score(&long_positive) > 0.99);
        assert!(s.score(&long_negative) >= -1.0);
        assert!(s.score(&long_negative) < -0.99);
    }

    #[test]
    fn appending_positive_word_does_not_decrease() {
        let s = scorer();
        for base in ["The sky is blue.", "We met at noon", "It rained on Monday"] {
            let before = s.score(base);
            let after = s.score(&format!("{base} amazing"));
            assert!(after >= before, "{base:?}: {after} < {before}");
            assert!(after > 0.0);
        }
    }

    #[test]
    fn negation_flips_polarity() {
        let s = scorer();
        assert!(s.score("I love this") > 0.0);
        assert!(s.score("I do not love this") < 0.0);
        assert!(s.score("I don't love this") < 0.0);
        assert!(s.score("this isn't bad at all") > 0.0);
    }

    #[test]
    fn negation_reaches_three_tokens_back() {
        let s = scorer();
        assert!(s.score("not really very good") < 0.0);
    }

    #[test]
    fn boosters_scale_valence() {
        let s = scorer();
        assert!(s.score("the food is very good") > s.score("the food is good"));
        assert!(s.score("the food is slightly good") < s.score("the food is good"));
        assert!(s.score("the food is very bad") < s.score("the food is bad"));
        // The booster itself carries no valence.
        assert_eq!(s.score("very"), 0.0);
    }

    #[test]
    fn caps_emphasis_in_mixed_case_text() {
        let s = scorer();
        assert!(s.score("the movie was GOOD") > s.score("the movie was good"));
        // All-caps text has no differential, so no emphasis.
        assert_eq!(s.score("THE MOVIE WAS GOOD"), s.score("the movie was good"));
    }

    #[test]
    fn exclamation_emphasis_caps_at_four() {
        let s = scorer();
        assert!(s.score("good!") > s.score("good"));
        assert!(s.score("good!!!") > s.score("good!"));
        assert_eq!(s.score("good!!!!"), s.score("good!!!!!!!!"));
    }

    #[test]
    fn question_marks_emphasise_in_runs() {
        let s = scorer();
        assert_eq!(s.score("good?"), s.score("good"));
        assert!(s.score("good??") > s.score("good"));
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let s = scorer();
        assert_eq!(
            s.classify("The food was good but the service was terrible"),
            SentimentLabel::Negative
        );
        assert_eq!(
            s.classify("The service was bad but the food was great"),
            SentimentLabel::Positive
        );
    }

    #[test]
    fn least_negates_unless_at_least() {
        let s = scorer();
        assert!(s.score("the least helpful answer") < 0.0);
        assert!(s.score("it was at least helpful") > 0.0);
    }

    #[test]
    fn no_as_determiner() {
        let s = scorer();
        assert!(s.score("no problem") > 0.0);
        assert!(s.score("no") < 0.0);
    }

    #[test]
    fn never_so_intensifies() {
        let s = scorer();
        assert!(s.score("I have never been so happy") > s.score("I have been happy"));
    }

    #[test]
    fn idiom_overrides_valence() {
        // "death" alone is -2.9; the idiom replaces it with -1.5.
        let compound = scorer().score("This is the kiss of death");
        assert!((compound + 0.3612).abs() < 1e-3, "got {compound}");
    }

    #[test]
    fn emoticons_keep_punctuation() {
        let s = scorer();
        assert!(s.score("see you tomorrow :)") > 0.0);
        assert!(s.score("see you tomorrow :(") < 0.0);
    }

    #[test]
    fn proportions_sum_to_one() {
        let scores = scorer().polarity_scores("I am so nervous and scared about the exam.");
        let total = scores.neg + scores.neu + scores.pos;
        assert!((total - 1.0).abs() < 0.01, "got {total}");
        assert!(scores.neg > scores.pos);
        assert_eq!(scores.label(), SentimentLabel::Negative);
    }

    #[test]
    fn custom_lexicon() {
        let lexicon: Lexicon = [("splendid".to_string(), 2.5)].into_iter().collect();
        let s = SentimentScorer::new(Arc::new(lexicon));
        assert_eq!(s.classify("a splendid day"), SentimentLabel::Positive);
        assert_eq!(s.classify("I love this!"), SentimentLabel::Neutral);
    }

    #[test]
    fn tokenize_strips_surrounding_punctuation() {
        assert_eq!(tokenize("Hello, world!"), vec!["Hello", "world"]);
        assert_eq!(tokenize("(great)"), vec!["great"]);
        assert_eq!(tokenize("ok :) <3"), vec!["ok", ":)", "<3"]);
    }
}
