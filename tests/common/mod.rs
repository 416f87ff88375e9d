// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{LetterTree, FOLDER_PREFIX};
#[allow(unused_imports)]
pub use helpers::{
    build, completed, create_test_services, services_sharing, text_extractors, TestServices,
};
