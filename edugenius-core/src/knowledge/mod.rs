pub mod domain_classifier;
pub mod wikipedia;

pub use domain_classifier::{classify_domain, fallback_parse, SubjectDomain};
pub use wikipedia::{KnowledgeSource, WikiPage, WikipediaClient};
