//! Line item categorization.
//!
//! [`LineClassifier`] is trained from the labeled phrases in a
//! [`ClassifierConfig`]. With one phrase per category it behaves as a
//! keyword-overlap heuristic: a description is assigned to the category whose
//! phrase shares the most (idf weighted) words with it. Text with no known
//! words still receives one of the trained categories: classes are ordered by
//! label name and a tie goes to the first, so with the default training set
//! such text is `food`.

mod model;
mod vectorizer;

pub use model::SoftmaxRegression;
pub use vectorizer::{tokenize, TfidfVectorizer};

use tracing::debug;

use crate::error::ClassifierError;
use crate::models::config::ClassifierConfig;
use crate::models::invoice::Category;

/// Trained description classifier.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    vectorizer: TfidfVectorizer,
    model: SoftmaxRegression,
    /// Trained categories sorted by label name; model class `i` is `classes[i]`.
    classes: Vec<Category>,
}

impl LineClassifier {
    /// Train on the configured examples.
    pub fn train(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        if config.examples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if !(config.learning_rate.is_finite() && config.learning_rate > 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "learning_rate",
                reason: format!("must be positive, got {}", config.learning_rate),
            });
        }
        if !(config.regularization.is_finite() && config.regularization >= 0.0) {
            return Err(ClassifierError::InvalidParameter {
                name: "regularization",
                reason: format!("must not be negative, got {}", config.regularization),
            });
        }

        let texts: Vec<&str> = config.examples.iter().map(|e| e.text.as_str()).collect();
        let vectorizer = TfidfVectorizer::fit(&texts);
        if vectorizer.is_empty() {
            return Err(ClassifierError::EmptyVocabulary);
        }

        let mut classes: Vec<Category> = config.examples.iter().map(|e| e.category).collect();
        classes.sort_by_key(|c| c.as_str());
        classes.dedup();

        let targets: Vec<usize> = config
            .examples
            .iter()
            .filter_map(|e| classes.iter().position(|c| *c == e.category))
            .collect();

        let features = vectorizer.transform_all(&texts);
        let model = SoftmaxRegression::fit(
            &features,
            &targets,
            classes.len(),
            config.epochs,
            config.learning_rate,
            config.regularization,
        );

        debug!(
            "Trained line classifier on {} examples, {} terms, {} categories",
            config.examples.len(),
            vectorizer.len(),
            classes.len()
        );

        Ok(Self {
            vectorizer,
            model,
            classes,
        })
    }

    /// Train on the default hotel training set.
    pub fn with_defaults() -> Result<Self, ClassifierError> {
        Self::train(&ClassifierConfig::default())
    }

    /// Predict the category of a line item description.
    pub fn classify(&self, description: &str) -> Category {
        let features = self.vectorizer.transform(description);
        let class = self.model.predict(&features);
        // `predict` only returns indices below `classes.len()`
        self.classes[class]
    }

    /// Categories this classifier can return.
    pub fn categories(&self) -> &[Category] {
        &self.classes
    }
}
