//! Vocabulary growth tracking for Heaps' law analysis.
//!
//! While the corpus is processed, every analyzed token of a document is fed
//! to a [`VocabularyTracker`], which records a [`GrowthPoint`] per token:
//! how many tokens of the document have been consumed and how many distinct
//! terms they contained. The points of each document are written to their
//! own CSV file by [`VocabularyTracker::persist`].
//!
//! ```
//! use termstat::vocabulary::VocabularyTracker;
//!
//! let mut tracker = VocabularyTracker::new();
//! let doc = tracker.new_document();
//! for term in ["cat", "dog", "cat"] {
//!     tracker.record_token(doc, term).unwrap();
//! }
//!
//! let sizes: Vec<u64> = tracker.points(doc).unwrap().iter().map(|p| p.vocabulary).collect();
//! assert_eq!(sizes, vec![1, 2, 2]);
//! ```

pub mod persist;
pub mod tracker;

pub use persist::{growth_file_name, read_growth_csv};
pub use tracker::{GrowthPoint, VocabularyTracker};
