pub mod lines;
pub mod terms;

pub use lines::{lines, partition_normalization, transitions, LineListError, LineListInput};
pub use terms::{rotational_term, splitting_terms, SplittingTerms, TermError};
