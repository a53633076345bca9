//! Sparse TF-IDF vectors over a fixed vocabulary, compared by cosine distance.

use regex::Regex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w\w+\b").unwrap());

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost", "alone",
    "along", "already", "also", "although", "always", "am", "among", "amongst", "an", "and", "another",
    "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be",
    "became", "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
    "below", "beside", "besides", "between", "beyond", "both", "but", "by", "can", "cannot", "could", "did",
    "do", "does", "done", "down", "due", "during", "each", "eg", "either", "else", "elsewhere", "enough",
    "etc", "even", "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "he", "hence", "her", "here", "hereafter", "hereby",
    "herein", "hers", "herself", "him", "himself", "his", "how", "however", "ie", "if", "in", "indeed",
    "into", "is", "it", "its", "itself", "last", "latter", "latterly", "least", "less", "ltd", "many", "may",
    "me", "meanwhile", "might", "more", "moreover", "most", "mostly", "much", "must", "my", "myself",
    "namely", "neither", "never", "nevertheless", "next", "no", "nobody", "none", "noone", "nor", "not",
    "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "please",
    "rather", "re", "same", "seem", "seemed", "seeming", "seems", "several", "she", "should", "since", "so",
    "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still", "such", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "this", "those", "though", "through", "throughout",
    "thru", "thus", "to", "together", "too", "toward", "towards", "under", "until", "up", "upon", "us",
    "very", "via", "was", "we", "well", "were", "what", "whatever", "when", "whence", "whenever", "where",
    "whereafter", "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
    "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

/// Lowercased word tokens of two or more characters, stop words removed.
pub fn tokenize(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .map(str::to_string)
        .collect()
}

/// L2-normalized sparse vector keyed by vocabulary index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector(BTreeMap<usize, f64>);

impl SparseVector {
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (small, large) = if self.0.len() <= other.0.len() {
            (&self.0, &other.0)
        } else {
            (&other.0, &self.0)
        };
        small
            .iter()
            .filter_map(|(i, w)| large.get(i).map(|v| w * v))
            .sum()
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.0.get(&index).copied()
    }

    /// `1 - cosine similarity`; a zero vector is at distance 1 from everything.
    pub fn cosine_distance(&self, other: &SparseVector) -> f64 {
        if self.is_zero() || other.is_zero() {
            return 1.0;
        }
        (1.0 - self.dot(other)).clamp(0.0, 2.0)
    }
}

/// Term-frequency / inverse-document-frequency model with smoothed idf.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and `idf = ln((1 + n) / (1 + df)) + 1` from `documents`.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();
        let mut terms: Vec<&str> = Vec::new();
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            terms.extend(unique);
        }
        // Sorted vocabulary keeps indices stable across runs.
        terms.sort_unstable();
        terms.dedup();
        for (i, term) in terms.iter().enumerate() {
            vocabulary.insert((*term).to_string(), i);
        }
        df.resize(vocabulary.len(), 0);
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                df[vocabulary[term]] += 1;
            }
        }
        let n = documents.len() as f64;
        let idf = df.iter().map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0).collect();
        TfidfVectorizer { vocabulary, idf }
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Raw counts times idf, L2-normalized. Terms outside the vocabulary are dropped.
    pub fn transform(&self, document: &str) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(document) {
            if let Some(&i) = self.vocabulary.get(&token) {
                *weights.entry(i).or_insert(0.0) += 1.0;
            }
        }
        for (i, w) in weights.iter_mut() {
            *w *= self.idf[*i];
        }
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        SparseVector(weights)
    }
}
