//! End-to-end documentation runs against mock collaborators

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tsdocbot_core::{Config, Error, Result, SyntaxTree};
use tsdocbot_engine::{DocEngine, LocalFileLister, RunState};
use tsdocbot_github::{FileChange, FileStatus, MockRepositoryHost};
use tsdocbot_languages::{SourceParser, TypeScriptParser};
use tsdocbot_llm::MockSynthesizer;

const FUNCTIONS: &str = r#"/** Documented. */
function f() {}

function g() {
  return 1;
}
"#;

const CLASS: &str = r#"class C {
  constructor() {}

  m(a: number): number {
    return a;
  }
  /** Second. */
  m2() {
  }
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create dirs");
    }
    fs::write(path, content).expect("Failed to write file");
}

fn engine(
    root: &Path,
    config: Config,
    synthesizer: &MockSynthesizer,
    host: &MockRepositoryHost,
) -> DocEngine {
    let lister =
        LocalFileLister::new(root, &config.files).expect("Failed to create file lister");
    DocEngine::new(
        config,
        root,
        Arc::new(lister),
        Arc::new(synthesizer.clone()),
        Arc::new(host.clone()),
    )
    .expect("Failed to create engine")
}

#[tokio::test]
async fn test_documents_undocumented_function() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/sample.ts", FUNCTIONS);

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");

    assert_eq!(report.state, RunState::Done);
    assert_eq!(engine.state(), RunState::Done);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.existing_docs, 1);
    assert_eq!(report.comments_generated, 1);
    assert!(engine.existing_docs().contains(None, "f"));

    let commits = host.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].path, "src/sample.ts");
    assert_eq!(commits[0].message, "docs: add JSDoc comments to sample.ts");
    assert_eq!(
        commits[0].content,
        r#"/** Documented. */
function f() {}

/**
 * Documentation for g.
 */
function g() {
  return 1;
}
"#
    );

    let branches = host.branches();
    assert_eq!(branches.len(), 1);
    assert!(branches[0].0.starts_with("docs-update-full-"));
    assert_eq!(branches[0].1, "main");
    assert_eq!(report.branch.as_deref(), Some(branches[0].0.as_str()));

    // Source files on disk are left alone
    assert_eq!(
        fs::read_to_string(dir.path().join("src/sample.ts")).expect("Failed to read"),
        FUNCTIONS
    );
}

#[tokio::test]
async fn test_method_comment_follows_class_comment_offset() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/c.ts", CLASS);

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");
    assert_eq!(report.comments_generated, 2);
    assert_eq!(report.existing_docs, 1);
    assert!(engine.existing_docs().contains(Some("C"), "m2"));

    let commits = host.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(
        commits[0].content,
        r#"/**
 * Documentation for C.
 */
class C {
  constructor() {}

  /**
   * Documentation for C.m.
   */
  m(a: number): number {
    return a;
  }
  /** Second. */
  m2() {
  }
}
"#
    );

    // Class prompts name methods but never embed their bodies
    let prompts = synthesizer.prompts();
    let class_prompt = prompts
        .iter()
        .find(|p| p.contains("Class name: C"))
        .expect("Expected class prompt");
    assert!(class_prompt.contains("Public methods: m, m2"));
    assert!(!class_prompt.contains("return a;"));
}

#[tokio::test]
async fn test_multiple_insertions_in_one_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(
        dir.path(),
        "src/math.ts",
        "export function add(a: number, b: number): number {\n  return a + b;\n}\n\nexport function sub(a: number, b: number): number {\n  return a - b;\n}\n",
    );

    let synthesizer = MockSynthesizer::new()
        .with_response("Name: add", "Adds two numbers.\n\n@param a - first\n@param b - second")
        .with_response("Name: sub", "```\n/**\n * Subtracts.\n */\n```");
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    engine.generate(None).await.expect("Run failed");

    let commits = host.commits();
    assert_eq!(
        commits[0].content,
        "/**\n * Adds two numbers.\n *\n * @param a - first\n * @param b - second\n */\nexport function add(a: number, b: number): number {\n  return a + b;\n}\n\n/**\n * Subtracts.\n */\nexport function sub(a: number, b: number): number {\n  return a - b;\n}\n"
    );
}

#[tokio::test]
async fn test_fully_documented_repository_publishes_nothing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/done.ts", "/** Done. */\nexport function done() {}\n");

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");

    assert_eq!(report.state, RunState::Done);
    assert_eq!(report.comments_generated, 0);
    assert!(report.branch.is_none());
    assert!(report.pull_request.is_none());
    assert!(host.branches().is_empty());
    assert!(host.commits().is_empty());
    assert!(host.pull_requests().is_empty());
    assert!(synthesizer.prompts().is_empty());
}

#[tokio::test]
async fn test_unparseable_files_are_skipped() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/broken.ts", "function (((\n");
    write(dir.path(), "src/ok.ts", "function ok() {}\n");

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");

    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.modified_files, vec!["src/ok.ts".to_string()]);
}

#[tokio::test]
async fn test_pull_request_fallback_lists_modified_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/a.ts", "function a() {}\n");
    write(dir.path(), "src/b.ts", "function b() {}\nfunction c() {}\n");

    let mut config = Config::default();
    config.generator.pull_request_reviewers = vec!["octocat".to_string()];

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), config, &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");

    let pull_requests = host.pull_requests();
    assert_eq!(pull_requests.len(), 1);
    let pull_request = &pull_requests[0];
    assert_eq!(pull_request.base, "main");
    assert_eq!(Some(pull_request.head.as_str()), report.branch.as_deref());
    assert_eq!(
        pull_request.labels,
        vec!["documentation".to_string(), "automated-pr".to_string()]
    );
    assert_eq!(pull_request.reviewers, vec!["octocat".to_string()]);
    assert_eq!(pull_request.title, "docs: add missing JSDoc comments");
    assert_eq!(pull_request.body.matches("`src/a.ts`").count(), 1);
    assert_eq!(pull_request.body.matches("`src/b.ts`").count(), 1);

    let reference = report.pull_request.expect("Expected pull request");
    assert_eq!(reference.number, 1);
}

#[tokio::test]
async fn test_synthesized_pull_request_text() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/a.ts", "function a() {}\n");

    let synthesizer = MockSynthesizer::new().with_response(
        "pull request title",
        r#"{"title": "Document a", "body": "Adds a comment to `src/a.ts`."}"#,
    );
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    engine.generate(None).await.expect("Run failed");

    let pull_requests = host.pull_requests();
    assert_eq!(pull_requests[0].title, "Document a");
    assert_eq!(pull_requests[0].body, "Adds a comment to `src/a.ts`.");
}

#[tokio::test]
async fn test_synthesis_failure_aborts_without_commits() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/a.ts", "function a() {}\n");
    write(dir.path(), "src/b.ts", "function b() {}\n");

    let synthesizer = MockSynthesizer::new().failing_on("Name: b");
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let result = engine.generate(None).await;

    assert!(result.is_err());
    assert!(host.branches().is_empty());
    assert!(host.commits().is_empty());
    assert!(host.pull_requests().is_empty());
}

#[tokio::test]
async fn test_host_failure_is_fatal() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/a.ts", "function a() {}\n");

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new().failing_on("create_branch");
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    assert!(engine.generate(None).await.is_err());
    assert_eq!(synthesizer.prompts().len(), 1);
    assert!(host.commits().is_empty());
    assert!(host.pull_requests().is_empty());
}

#[tokio::test]
async fn test_pull_request_mode_filters_changed_files() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/changed.ts", "function changed() {}\n");
    write(dir.path(), "src/untouched.ts", "function untouched() {}\n");

    let change = |path: &str, status: FileStatus, is_new: bool| FileChange {
        path: path.to_string(),
        status,
        is_new,
        contents_ref: is_new.then(|| format!("ref/{path}")),
    };
    let host = MockRepositoryHost::new()
        .with_changed_files(
            12,
            vec![
                change("src/changed.ts", FileStatus::Modified, false),
                change("src/added.ts", FileStatus::Added, true),
                change("src/removed.ts", FileStatus::Deleted, false),
                change("README.md", FileStatus::Modified, false),
                change("dist/bundle.ts", FileStatus::Modified, false),
                change("scripts/tool.ts", FileStatus::Modified, false),
            ],
        )
        .with_remote_file("ref/src/added.ts", "export class Added {}\n");

    let mut config = Config::default();
    config.files.root_directory = "src".to_string();
    config.files.excluded_directories.push("scripts".to_string());

    let synthesizer = MockSynthesizer::new();
    let mut engine = engine(dir.path(), config, &synthesizer, &host);

    let report = engine.generate(Some(12)).await.expect("Run failed");

    assert_eq!(report.files_scanned, 2);
    assert_eq!(
        report.modified_files,
        vec!["src/changed.ts".to_string(), "src/added.ts".to_string()]
    );
    assert!(host.branches()[0].0.starts_with("docs-update-pr-12-"));

    let commits = host.commits();
    assert_eq!(
        commits[1].content,
        "/**\n * Documentation for Added.\n */\nexport class Added {}\n"
    );
}

#[tokio::test]
async fn test_missing_remote_file_is_fatal() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let host = MockRepositoryHost::new().with_changed_files(
        3,
        vec![FileChange {
            path: "src/new.ts".to_string(),
            status: FileStatus::Added,
            is_new: true,
            contents_ref: None,
        }],
    );

    let synthesizer = MockSynthesizer::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    assert!(engine.generate(Some(3)).await.is_err());
    assert!(host.branches().is_empty());
}

#[tokio::test]
async fn test_runs_do_not_share_state() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/sample.ts", FUNCTIONS);

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    engine.generate(None).await.expect("First run failed");
    // Branch names are unique per second
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let second = engine.generate(None).await.expect("Second run failed");

    let commits = host.commits();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].content, commits[1].content);
    assert_eq!(second.existing_docs, 1);
    assert_eq!(engine.existing_docs().len(), 1);
}

fn reparses(path: &str, content: &str) -> bool {
    TypeScriptParser::new()
        .parse(content, Path::new(path))
        .is_ok()
}

#[tokio::test]
async fn test_comment_terminator_in_synthesized_text_keeps_file_valid() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/scan.ts", "function scan() {}\n");

    let synthesizer = MockSynthesizer::new()
        .with_response("Name: scan", "Scans files matching src/**/*.ts and returns them.");
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    engine.generate(None).await.expect("Run failed");

    let commits = host.commits();
    assert_eq!(
        commits[0].content,
        "/**\n * Scans files matching src/**\\/*.ts and returns them.\n */\nfunction scan() {}\n"
    );
    assert!(reparses("src/scan.ts", &commits[0].content));
}

#[tokio::test]
async fn test_overloads_are_documented_once_above_first_signature() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(
        dir.path(),
        "src/overloads.ts",
        r#"/** Overloaded. */
function f(a: string): void;
function f(a: any) {}

function h(a: string): void;
function h(a: any) {}

class Store {
  get(key: string): string;
  get(key: any) {
    return "";
  }
}
"#,
    );

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let report = engine.generate(None).await.expect("Run failed");
    assert_eq!(report.existing_docs, 1);
    assert_eq!(report.comments_generated, 3);

    let commits = host.commits();
    assert_eq!(
        commits[0].content,
        r#"/** Overloaded. */
function f(a: string): void;
function f(a: any) {}

/**
 * Documentation for h.
 */
function h(a: string): void;
function h(a: any) {}

/**
 * Documentation for Store.
 */
class Store {
  /**
   * Documentation for Store.get.
   */
  get(key: string): string;
  get(key: any) {
    return "";
  }
}
"#
    );
    assert!(reparses("src/overloads.ts", &commits[0].content));
}

/// Refuses files under `generated/`, parses everything else as TypeScript
struct SkipGenerated;

impl SourceParser for SkipGenerated {
    fn parse(&self, source: &str, file_path: &Path) -> Result<SyntaxTree> {
        if file_path.starts_with("src/generated") {
            return Err(Error::parse(
                file_path.display().to_string(),
                "generated code is not parsed",
            ));
        }
        TypeScriptParser::new().parse(source, file_path)
    }
}

#[tokio::test]
async fn test_custom_parser_failures_skip_the_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/generated/api.ts", "function api() {}\n");
    write(dir.path(), "src/app.ts", "function app() {}\n");

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host)
        .with_parser(Arc::new(SkipGenerated));

    let report = engine.generate(None).await.expect("Run failed");

    assert_eq!(report.files_skipped, 1);
    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.modified_files, vec!["src/app.ts".to_string()]);
}

#[tokio::test]
async fn test_pull_request_zero_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write(dir.path(), "src/a.ts", "function a() {}\n");

    let synthesizer = MockSynthesizer::new();
    let host = MockRepositoryHost::new();
    let mut engine = engine(dir.path(), Config::default(), &synthesizer, &host);

    let err = engine.generate(Some(0)).await.expect_err("Expected rejection");
    assert!(matches!(err, Error::InvalidInput(_)));
    assert_eq!(engine.state(), RunState::Idle);
    assert!(host.branches().is_empty());
}
