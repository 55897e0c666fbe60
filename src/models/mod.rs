pub mod loaders;
pub mod question;
pub mod question_type;

pub use loaders::{load_all_documents, load_document};
pub use question::{type_stats, GenerationReport, QualityScores, QuestionRecord, SourceDocument};
pub use question_type::{QuestionType, CLASSIFIED_TYPES};
