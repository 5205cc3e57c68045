pub mod engine;
pub mod handlers;
pub mod keywords;
pub mod lexicon;
pub mod models;
pub mod normalizer;
pub mod recommendations;
pub mod scoring;
pub mod skills;
pub mod structure;
