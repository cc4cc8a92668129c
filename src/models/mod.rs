//! ML model inference components

pub mod inference;
pub mod loader;
pub mod probabilities;
pub mod vectorizer;

pub use inference::{InferenceError, ModelClassifier, ModelInference, Prediction};
pub use loader::{LoadedModel, ModelLoader};
pub use probabilities::ClassProbabilities;
pub use vectorizer::TfidfVectorizer;
