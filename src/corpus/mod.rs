// src/corpus/mod.rs
// =============================================================================
// This module owns the corpus: the durable set of accepted WebID profiles.
//
// The corpus is a plain directory with one Turtle file per WebID. The file
// name is the percent-encoded WebID plus ".ttl", so listing the directory is
// enough to know which WebIDs a previous run already accepted.
//
// Entries are only ever added or overwritten, never deleted.
// =============================================================================

mod store;

pub use store::{CorpusStore, DirCorpus};
