//! Valence lexicon in the VADER text format.
//!
//! One entry per line: `token<TAB>mean-valence`, optionally followed by further
//! tab-separated columns (standard deviation, raw ratings) which are ignored.
//! The full upstream VADER table can be dropped in via [`Lexicon::from_file`];
//! the crate embeds a smaller general-English table for [`Lexicon::builtin`].

use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::error::{AnalysisError, LexiconError};

const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.txt");

/// Read-only token → valence table. Keys are lowercase.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, f32>,
}

impl Lexicon {
    /// The general-English table shipped with the crate.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_LEXICON).expect("embedded lexicon is valid")
    }

    /// Load a replacement table from disk.
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| AnalysisError::lexicon_load(path, e))?;
        let lexicon = Self::parse(&text).map_err(|e| AnalysisError::lexicon_load(path, e))?;
        info!(entries = lexicon.len(), path = %path.display(), "loaded lexicon");
        Ok(lexicon)
    }

    /// Parse lexicon text.
    pub fn parse(text: &str) -> Result<Self, LexiconError> {
        let mut entries = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let line_no = idx + 1;
            let mut cols = line.split('\t');
            let token = cols.next().unwrap_or_default().trim();
            let valence = cols
                .next()
                .ok_or(LexiconError::MissingValence { line: line_no })?;
            let valence: f32 = valence.trim().parse().map_err(|source| LexiconError::BadValence {
                line: line_no,
                value: valence.to_string(),
                source,
            })?;
            if token.is_empty() {
                return Err(LexiconError::EmptyToken { line: line_no });
            }
            entries.insert(token.to_lowercase(), valence);
        }
        Ok(Self { entries })
    }

    /// Case-insensitive lookup.
    pub fn get(&self, token: &str) -> Option<f32> {
        self.entries
            .get(token)
            .or_else(|| self.entries.get(&token.to_lowercase()))
            .copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.get(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f32)> for Lexicon {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(token, valence)| (token.to_lowercase(), valence))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_table_parses() {
        assert!(Lexicon::parse(BUILTIN_LEXICON).is_ok());
        let lexicon = Lexicon::builtin();
        assert!(lexicon.len() > 1000);
        assert_eq!(lexicon.get("love"), Some(3.2));
        assert!(lexicon.get("hate").unwrap() < 0.0);
        assert_eq!(lexicon.get("died"), Some(-2.6));
        assert_eq!(lexicon.get("lol"), Some(1.8));
        assert_eq!(lexicon.get("kill"), Some(-3.7));
    }

    #[test]
    fn builtin_has_no_neutral_filler() {
        let lexicon = Lexicon::builtin();
        for word in ["the", "sky", "is", "blue", "this", "i"] {
            assert!(!lexicon.contains(word), "{word} should not carry valence");
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let lexicon = Lexicon::builtin();
        assert_eq!(lexicon.get("LOVE"), lexicon.get("love"));
        assert_eq!(lexicon.get("Terrible"), lexicon.get("terrible"));
    }

    #[test]
    fn parses_vader_columns() {
        let text = "$:\t-1.5\t0.80623\t[-1, -1, -1, -1, -3, -1, -3, -1, -2, -1]\n\
                    %)\t-0.4\t1.0198\t[-1, 0, -1, 0, 0, -2, -1, 2, -1, 0]\n\n";
        let lexicon = Lexicon::parse(text).unwrap();
        assert_eq!(lexicon.len(), 2);
        assert_eq!(lexicon.get("$:"), Some(-1.5));
        assert_eq!(lexicon.get("%)"), Some(-0.4));
    }

    #[test]
    fn reports_bad_line_number() {
        let err = Lexicon::parse("good\t1.9\nbad\tnot-a-number\n").unwrap_err();
        assert!(matches!(err, LexiconError::BadValence { line: 2, .. }), "{err}");
        assert!(err.to_string().starts_with("line 2"), "{err}");

        let err = Lexicon::parse("good\t1.9\n\nlonely\n").unwrap_err();
        assert!(matches!(err, LexiconError::MissingValence { line: 3 }));

        let err = Lexicon::parse("\t1.0\n").unwrap_err();
        assert!(matches!(err, LexiconError::EmptyToken { line: 1 }));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Splendid\t2.5").unwrap();
        writeln!(file, "dreary\t-1.4").unwrap();
        let lexicon = Lexicon::from_file(file.path()).unwrap();
        assert_eq!(lexicon.get("splendid"), Some(2.5));
        assert_eq!(lexicon.get("dreary"), Some(-1.4));
    }

    #[test]
    fn malformed_file_names_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "splendid\t2.5").unwrap();
        writeln!(file, "dreary").unwrap();
        let err = Lexicon::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconLoad { .. }));
        assert!(err.to_string().contains("line 2"), "{err}");
    }

    #[test]
    fn missing_file_is_lexicon_error() {
        let err = Lexicon::from_file(Path::new("/nonexistent/lexicon.txt")).unwrap_err();
        assert!(matches!(err, AnalysisError::LexiconLoad { .. }));
        assert!(err.is_startup());
    }
}
