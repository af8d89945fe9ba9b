use crate::core::similarity::ScoredChunk;
use crate::models::DocumentChunk;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Weight of a direct substring match
const DIRECT_WEIGHT: f32 = 2.0;
/// Weight of a synonym-table match
const SYNONYM_WEIGHT: f32 = 1.5;
/// Minimum weighted-recall score for a chunk to be kept
const SCORE_THRESHOLD: f32 = 0.05;
/// Keyword matches report at least this similarity; it marks the "keyword
/// match found" confidence tier, not true semantic similarity
const SIMILARITY_FLOOR: f32 = 0.6;
/// At most this many keywords are taken from a question, in input order
const MAX_KEYWORDS: usize = 10;
/// At most this many chunks are handed to the answer composer
const MAX_RESULTS: usize = 5;

/// Stop-word and synonym data for the matcher
///
/// Kept as data rather than code so new languages and terms extend the
/// tables without touching the scoring algorithm. All entries are stored
/// in folded form (lowercase, diacritics reduced to base Latin).
pub struct KeywordTables {
    pub stop_words: HashSet<String>,
    pub synonyms: HashMap<String, Vec<String>>,
}

impl Default for KeywordTables {
    fn default() -> Self {
        let stop_words = [
            // English articles, conjunctions, interrogatives
            "the", "and", "for", "are", "was", "but", "not", "you", "your", "our",
            "can", "could", "will", "would", "should", "have", "has", "had", "does",
            "did", "this", "that", "these", "those", "with", "from", "into", "about",
            "what", "when", "where", "which", "why", "how", "who", "whom",
            "please", "need", "want", "get", "there", "here",
            // Azerbaijani (folded): conjunctions, particles, interrogatives
            "amma", "ancaq", "ucun", "ile", "hem", "yoxsa", "lakin", "artiq",
            "nece", "niye", "neden", "harada", "haradan", "hansi", "kim", "kime",
            "mene", "menim", "sizin", "bizim", "olan", "olaraq", "etmek", "edin",
            "zehmet", "olmasa", "salam",
        ]
        .into_iter()
        .map(str::to_string)
        .collect();

        let synonyms: HashMap<String, Vec<String>> = [
            ("monitor", vec!["screen", "ekran", "displey"]),
            ("screen", vec!["monitor", "ekran"]),
            ("ekran", vec!["monitor", "screen"]),
            ("request", vec!["teleb", "sorgu", "muraciet"]),
            ("teleb", vec!["request", "sorgu"]),
            ("sorgu", vec!["request", "teleb"]),
            ("password", vec!["parol", "sifre", "login"]),
            ("parol", vec!["password", "sifre"]),
            ("computer", vec!["komputer", "laptop", "noutbuk"]),
            ("komputer", vec!["computer", "laptop"]),
            ("laptop", vec!["noutbuk", "komputer", "computer"]),
            ("vacation", vec!["leave", "holiday", "mezuniyyet"]),
            ("leave", vec!["vacation", "mezuniyyet"]),
            ("mezuniyyet", vec!["vacation", "leave"]),
            ("salary", vec!["maas", "emekhaqqi"]),
            ("maas", vec!["salary"]),
            ("network", vec!["sebeke", "internet", "wifi", "vpn"]),
            ("sebeke", vec!["network", "internet"]),
            ("vpn", vec!["network", "sebeke"]),
            ("email", vec!["mail", "poct", "outlook"]),
            ("printer", vec!["print", "cap"]),
            ("error", vec!["xeta", "problem", "nasazliq"]),
            ("xeta", vec!["error", "problem"]),
            ("problem", vec!["xeta", "issue", "nasazliq"]),
            ("help", vec!["komek", "yardim", "support"]),
            ("komek", vec!["help", "yardim"]),
            ("document", vec!["sened", "file"]),
            ("sened", vec!["document"]),
        ]
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_string(),
                v.into_iter().map(str::to_string).collect::<Vec<_>>(),
            )
        })
        .collect();

        Self {
            stop_words,
            synonyms,
        }
    }
}

/// Multilingual keyword overlap matcher
///
/// Recovers recall when semantic search is empty or the embedding provider
/// is down. Questions and chunk text are folded to base Latin so English,
/// Azerbaijani and transliterated input all land in the same token space.
pub struct KeywordMatcher {
    tables: KeywordTables,
}

impl KeywordMatcher {
    /// Create a matcher with the built-in tables
    pub fn new() -> Self {
        Self {
            tables: KeywordTables::default(),
        }
    }

    /// Create a matcher with custom tables
    pub fn with_tables(tables: KeywordTables) -> Self {
        Self { tables }
    }

    /// Extract up to [`MAX_KEYWORDS`] keywords from a question, in input order
    pub fn extract_keywords(&self, question: &str) -> Vec<String> {
        let folded = fold_text(question);
        let mut seen = HashSet::new();
        folded
            .split_whitespace()
            .filter(|token| token.chars().count() > 2)
            .filter(|token| !self.tables.stop_words.contains(*token))
            .filter(|token| seen.insert(token.to_string()))
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect()
    }

    /// Weighted recall of the keywords against one chunk text, in [0, 1]
    ///
    /// Direct substring hits weigh 2.0, synonym hits 1.5; the denominator is
    /// the maximum attainable weight. Deterministic for identical inputs.
    pub fn score(&self, keywords: &[String], chunk_text: &str) -> f32 {
        if keywords.is_empty() {
            return 0.0;
        }

        let folded = fold_text(chunk_text);
        let mut matched = 0.0f32;

        for keyword in keywords {
            if folded.contains(keyword.as_str()) {
                matched += DIRECT_WEIGHT;
            } else if let Some(alternates) = self.tables.synonyms.get(keyword) {
                if alternates.iter().any(|alt| folded.contains(alt.as_str())) {
                    matched += SYNONYM_WEIGHT;
                }
            }
        }

        matched / (DIRECT_WEIGHT * keywords.len() as f32)
    }

    /// Rank chunks by keyword overlap with the question
    ///
    /// Chunks scoring above [`SCORE_THRESHOLD`] are kept, sorted descending,
    /// capped at [`MAX_RESULTS`], and their reported similarity is floored at
    /// [`SIMILARITY_FLOOR`]. An empty result hands control to the canned
    /// fallback; the matcher itself never fails.
    pub fn search(&self, question: &str, chunks: &[DocumentChunk]) -> Vec<ScoredChunk> {
        let keywords = self.extract_keywords(question);
        if keywords.is_empty() {
            return Vec::new();
        }
        debug!(?keywords, "Keyword fallback search");

        let mut scored: Vec<(f32, &DocumentChunk)> = chunks
            .iter()
            .map(|chunk| (self.score(&keywords, &chunk.content), chunk))
            .filter(|(score, _)| *score > SCORE_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        scored.truncate(MAX_RESULTS);

        scored
            .into_iter()
            .map(|(score, chunk)| ScoredChunk {
                chunk: chunk.clone(),
                similarity: score.max(SIMILARITY_FLOOR),
            })
            .collect()
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase, fold Azerbaijani diacritics to base Latin, and replace
/// punctuation with spaces
fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| match c {
            'ə' => 'e',
            'ö' => 'o',
            'ü' => 'u',
            'ı' => 'i',
            'ç' => 'c',
            'ş' => 's',
            'ğ' => 'g',
            c if c.is_alphanumeric() => c,
            _ => ' ',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk::new(Uuid::new_v4(), 0, content.to_string())
    }

    #[test]
    fn folding_maps_azerbaijani_diacritics() {
        assert_eq!(fold_text("məzuniyyət üçün şəbəkə"), "mezuniyyet ucun sebeke");
        assert_eq!(fold_text("Çağrı!"), "cagri ");
    }

    #[test]
    fn extraction_drops_stop_words_and_short_tokens() {
        let matcher = KeywordMatcher::new();
        let keywords = matcher.extract_keywords("How can I reset my VPN password?");
        assert_eq!(keywords, vec!["reset", "vpn", "password"]);
    }

    #[test]
    fn extraction_caps_at_ten_keywords() {
        let matcher = KeywordMatcher::new();
        let question = "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";
        assert_eq!(matcher.extract_keywords(question).len(), 10);
    }

    #[test]
    fn direct_match_outweighs_synonym_match() {
        let matcher = KeywordMatcher::new();
        let keywords = vec!["monitor".to_string()];

        let direct = matcher.score(&keywords, "Broken monitor on desk 4");
        let synonym = matcher.score(&keywords, "The ekran flickers at startup");
        let none = matcher.score(&keywords, "Quarterly budget review notes");

        assert!((direct - 1.0).abs() < 1e-6);
        assert!((synonym - 0.75).abs() < 1e-6);
        assert_eq!(none, 0.0);
    }

    #[test]
    fn scoring_is_deterministic() {
        let matcher = KeywordMatcher::new();
        let keywords = matcher.extract_keywords("printer xəta kömək");
        let text = "Printer error help steps";
        assert_eq!(matcher.score(&keywords, text), matcher.score(&keywords, text));
    }

    #[test]
    fn search_floors_similarity_and_caps_results() {
        let matcher = KeywordMatcher::new();
        let chunks: Vec<DocumentChunk> = (0..8)
            .map(|i| chunk(&format!("vpn troubleshooting step {i}")))
            .collect();

        let results = matcher.search("Why does my VPN keep disconnecting?", &chunks);
        assert!(results.len() <= 5);
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.similarity >= 0.6));
    }

    #[test]
    fn cross_language_question_finds_english_chunk() {
        let matcher = KeywordMatcher::new();
        let chunks = vec![
            chunk("Monitor replacement requests are approved by the IT lead."),
            chunk("Cafeteria menu for the week."),
        ];

        let results = matcher.search("Yeni ekran təlebi necə göndərilir?", &chunks);
        assert!(!results.is_empty());
        assert!(results[0].chunk.content.contains("Monitor"));
    }

    #[test]
    fn no_overlap_yields_empty_not_error() {
        let matcher = KeywordMatcher::new();
        let chunks = vec![chunk("Completely unrelated text about gardening.")];
        assert!(matcher.search("quantum flux capacitor", &chunks).is_empty());
    }
}
