//! Term-frequency features over a fixed training vocabulary.

use std::collections::{BTreeMap, BTreeSet};

use ndarray::{Array1, Array2};

use crate::invoice::rules::WORD_TOKEN;

/// Lowercased tokens of two or more word characters.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    WORD_TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// TF-IDF vectorizer fit on the training phrases.
///
/// Term frequencies are weighted by smoothed inverse document frequency,
/// `ln((1 + n) / (1 + df)) + 1`, and each row is L2 normalized. Terms outside
/// the vocabulary are ignored, so unseen text maps to the zero vector.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
}

impl TfidfVectorizer {
    /// Build the vocabulary and idf weights from a set of documents.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|d| tokenize(d.as_ref())).collect();

        let terms: BTreeSet<&str> = tokenized
            .iter()
            .flat_map(|tokens| tokens.iter().map(String::as_str))
            .collect();
        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term.to_string(), i))
            .collect();

        let n_docs = documents.len() as f64;
        let mut idf = Array1::zeros(vocabulary.len());
        for (term, &column) in &vocabulary {
            let df = tokenized
                .iter()
                .filter(|tokens| tokens.iter().any(|t| t == term))
                .count() as f64;
            idf[column] = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
        }

        Self { vocabulary, idf }
    }

    /// Number of features (vocabulary size).
    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Whether a term is part of the vocabulary.
    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    /// Feature vector for one document.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut row = Array1::zeros(self.vocabulary.len());
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                row[column] += 1.0;
            }
        }

        row *= &self.idf;

        let norm = row.dot(&row).sqrt();
        if norm > 0.0 {
            row /= norm;
        }
        row
    }

    /// Feature matrix with one row per document.
    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));
        for (i, doc) in documents.iter().enumerate() {
            matrix.row_mut(i).assign(&self.transform(doc.as_ref()));
        }
        matrix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize() {
        assert_eq!(
            tokenize("Room Service - Breakfast"),
            vec!["room", "service", "breakfast"]
        );
        assert_eq!(tokenize("Food & Beverage"), vec!["food", "beverage"]);
        assert_eq!(tokenize("a b 1"), Vec::<String>::new());
    }

    #[test]
    fn test_vocabulary_is_sorted_and_deduplicated() {
        let v = TfidfVectorizer::fit(&["Laundry Service", "Room Service"]);
        assert_eq!(v.len(), 3);
        assert!(v.contains("service"));
        assert!(!v.contains("Service"));
    }

    #[test]
    fn test_rows_are_unit_length() {
        let v = TfidfVectorizer::fit(&["Laundry Service", "Room Service - Breakfast"]);
        let row = v.transform("room service");
        assert!((row.dot(&row) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shared_terms_weigh_less() {
        let v = TfidfVectorizer::fit(&["Laundry Service", "Room Service"]);
        let row = v.transform("room service");
        let room = v.vocabulary["room"];
        let service = v.vocabulary["service"];
        assert!(row[room] > row[service]);
    }

    #[test]
    fn test_unknown_text_is_zero() {
        let v = TfidfVectorizer::fit(&["Mini Bar - Soda"]);
        let row = v.transform("Parking");
        assert!(row.iter().all(|x| *x == 0.0));
    }
}
