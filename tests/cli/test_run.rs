//! End-to-end tests through `cli::run`
//!
//! These set process environment variables, so they run serially.

use crate::common::{LetterTree, FOLDER_PREFIX};
use clap::Parser;
use letter_search::cli::{run, Cli};
use letter_search::core::config::Config;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

const VARS: &[&str] = &[
    "LETTER_SEARCH_CONFIG",
    "LETTER_SEARCH_CONFIG_DIR",
    "LETTER_SEARCH_DATA_DIR",
    "LETTER_SEARCH_ROOT",
    "LETTER_SEARCH_MAX_RESULTS",
    "LETTER_SEARCH_WRITER_HEAP_MB",
];

/// Points config and data dirs at a temp dir for the test's lifetime
struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        for var in VARS {
            env::remove_var(var);
        }
        let dir = TempDir::new().unwrap();
        env::set_var("LETTER_SEARCH_CONFIG_DIR", dir.path().join("config"));
        env::set_var("LETTER_SEARCH_DATA_DIR", dir.path().join("data"));
        Self { dir }
    }

    fn config_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("config")
    }
}

impl Drop for TestEnv {
    fn drop(&mut self) {
        for var in VARS {
            env::remove_var(var);
        }
    }
}

fn docx_tree() -> LetterTree {
    let tree = LetterTree::new();
    tree.add_docx(
        &format!("{FOLDER_PREFIX}0012"),
        "claim.docx",
        &["Extension of time claim", "for the retaining wall."],
    );
    tree.add_docx(
        &format!("{FOLDER_PREFIX}0004"),
        "reply.docx",
        &["Response to the extension of time claim."],
    );
    tree
}

async fn run_args(args: &[&str]) -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = vec!["letter-search"];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv).unwrap()).await
}

#[tokio::test]
#[serial]
async fn test_run_index_search_status_clear() {
    let test_env = TestEnv::new();
    let tree = docx_tree();
    let root = tree.root().display().to_string();

    run_args(&["index", &root, "--quiet"]).await.unwrap();
    let data_dir = test_env.dir.path().join("data");
    assert!(data_dir.join("index").join("meta.json").exists());
    assert!(data_dir.join("metadata.json").exists());

    run_args(&["search", "retaining", "--format", "json"])
        .await
        .unwrap();
    run_args(&["status"]).await.unwrap();
    run_args(&["clear", "--yes"]).await.unwrap();
    assert!(!data_dir.join("index").join("meta.json").exists());

    let err = run_args(&["search", "claim"]).await.unwrap_err();
    assert!(err.to_string().contains("No index found"));
}

#[tokio::test]
#[serial]
async fn test_run_uses_default_root_from_env() {
    let _env = TestEnv::new();
    let tree = docx_tree();
    env::set_var("LETTER_SEARCH_ROOT", tree.root());

    run_args(&["rebuild", "--quiet", "--format", "json"])
        .await
        .unwrap();
    run_args(&["search", "extension"]).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_run_reads_config_file() {
    let test_env = TestEnv::new();
    fs::create_dir_all(test_env.config_dir()).unwrap();
    fs::write(
        test_env.config_dir().join("config.toml"),
        r#"
[scan]
folder_prefixes = ["LTR-"]
letter_number_length = 3
"#,
    )
    .unwrap();

    let xdg = letter_search::core::xdg::XdgDirs::new();
    let config = Config::load_with_xdg(&xdg).unwrap();
    assert_eq!(config.scan.folder_prefixes, vec!["LTR-".to_string()]);
    assert_eq!(config.scan.letter_number_length, 3);
    assert_eq!(
        config.storage.index_dir,
        test_env.dir.path().join("data").join("index")
    );

    let tree = LetterTree::new();
    tree.add_docx("LTR-015", "memo.docx", &["Formwork inspection memo"]);
    run_args(&["index", &tree.root().display().to_string(), "--quiet"])
        .await
        .unwrap();
    run_args(&["search", "letter_no:015"]).await.unwrap();
}

#[tokio::test]
#[serial]
async fn test_run_invalid_config_fails() {
    let test_env = TestEnv::new();
    fs::create_dir_all(test_env.config_dir()).unwrap();
    fs::write(
        test_env.config_dir().join("config.toml"),
        "[scan]\nfolder_prefixes = []\n",
    )
    .unwrap();

    let err = run_args(&["status"]).await.unwrap_err();
    assert!(err.to_string().contains("folder prefix"));
}

#[tokio::test]
#[serial]
async fn test_run_completions_needs_no_setup() {
    let _env = TestEnv::new();
    run_args(&["completions", "zsh"]).await.unwrap();
}
