//! Local git checkout inspection

use git2::Repository;
use std::path::{Path, PathBuf};
use tracing::debug;
use tsdocbot_core::error::{Error, Result};

/// Find the working directory of the repository containing `start`
pub fn discover_repository_root(start: &Path) -> Result<PathBuf> {
    let repo = Repository::discover(start)
        .map_err(|e| Error::config(format!("Failed to open Git repository: {e}")))?;

    let root = repo
        .workdir()
        .ok_or_else(|| Error::config("Repository has no working directory"))?
        .to_path_buf();
    debug!("Repository root: {}", root.display());
    Ok(root)
}

/// Full SHA of HEAD, `None` outside a repository or on an unborn branch
pub fn head_commit(repo_root: &Path) -> Option<String> {
    let repo = Repository::open(repo_root).ok()?;
    let head = repo.head().ok()?;
    head.target().map(|oid| oid.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn commit_all(repo: &Repository) -> git2::Oid {
        let mut index = repo.index().expect("Failed to get index");
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = repo.find_tree(tree_id).expect("Failed to find tree");
        let signature =
            git2::Signature::now("Test", "test@example.com").expect("Failed to create signature");
        repo.commit(Some("HEAD"), &signature, &signature, "initial", &tree, &[])
            .expect("Failed to commit")
    }

    #[test]
    fn test_discovers_root_from_subdirectory() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Repository::init(dir.path()).expect("Failed to init repo");
        let nested = dir.path().join("src/lib");
        fs::create_dir_all(&nested).expect("Failed to create dirs");

        let root = discover_repository_root(&nested).expect("Failed to discover root");
        assert_eq!(
            root.canonicalize().expect("Failed to canonicalize"),
            dir.path().canonicalize().expect("Failed to canonicalize")
        );
    }

    #[test]
    fn test_head_commit() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("Failed to init repo");
        assert_eq!(head_commit(dir.path()), None);

        fs::write(dir.path().join("index.ts"), "export {};\n").expect("Failed to write");
        let oid = commit_all(&repo);
        assert_eq!(head_commit(dir.path()), Some(oid.to_string()));
    }

    #[test]
    fn test_outside_repository() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        assert_eq!(head_commit(dir.path()), None);
    }
}
