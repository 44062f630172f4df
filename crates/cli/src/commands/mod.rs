pub mod chat;
pub mod ingest;
pub mod lexicon;
pub mod onboard;
