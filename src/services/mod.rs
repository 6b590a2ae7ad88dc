pub mod gradebook;

pub use gradebook::GradebookService;
