pub mod naming;
pub mod publisher;

pub use publisher::{PublisherSettings, TranslationPublisher};
