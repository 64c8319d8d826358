pub mod article;
pub mod chunking;
pub mod config;
pub mod evidence;
pub mod record;

pub use article::{truncate_chars, Article, Verdict, VerdictLabel, METADATA_TEXT_LIMIT};
pub use chunking::{ChunkingConfig, ContentKind};
pub use config::{
    BackendKind, ChromaConfig, Config, EmbeddingConfig, EmbeddingStrategy, HuggingFaceConfig,
    LogFormat, LoggingConfig, OpenAiConfig, PineconeConfig, RetrievalConfig, RotationPolicy,
    VectorStoreConfig,
};
pub use evidence::SourceRef;
pub use record::{
    Metadata, NamespaceStats, RecordType, ScoredRecord, StoreStats, VectorRecord,
    DEFAULT_DIMENSION, TYPE_KEY,
};
