//! CLI test helpers
//!
//! Arc<Services> wrappers matching CLI execute() signatures and
//! indexed fixtures for search and status tests.

use crate::common::{build, create_test_services, LetterTree, TestServices};
use letter_search::cli::commands::IndexArgs;
use letter_search::core::indexer::BuildMode;

/// Index the sample tree and return it with its services
pub fn indexed_sample() -> (LetterTree, TestServices) {
    let tree = LetterTree::sample();
    let t = create_test_services();
    build(&t.services, tree.root(), BuildMode::Incremental);
    (tree, t)
}

/// Quiet index arguments for a root
pub fn index_args(tree: &LetterTree) -> IndexArgs {
    IndexArgs {
        root: Some(tree.root().to_path_buf()),
        quiet: true,
    }
}
