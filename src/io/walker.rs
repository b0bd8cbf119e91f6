//! Source file discovery for the CLI front end.
//!
//! The pipeline itself receives an already-resolved file set; this walker
//! is the host-side collaborator producing it. Results are sorted so runs
//! are deterministic.

use anyhow::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

pub struct FileWalker {
    root: PathBuf,
    /// Accepted file extensions; empty accepts everything.
    extensions: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: vec![],
            exclude_patterns: vec![],
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        if !self.extensions.is_empty() {
            let matches_extension = path
                .extension()
                .map(|ext| {
                    let ext = ext.to_string_lossy();
                    self.extensions.iter().any(|e| e.as_str() == ext)
                })
                .unwrap_or(false);
            if !matches_extension {
                return false;
            }
        }

        let path_str = path.to_string_lossy();
        for pattern in &self.exclude_patterns {
            if glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
            {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, "x\n").unwrap();
    }

    #[test]
    fn filters_by_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "A.java");
        touch(&dir, "b.rs");
        touch(&dir, "notes.txt");

        let files = FileWalker::new(dir.path().to_path_buf())
            .with_extensions(vec!["java".to_string()])
            .walk()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("A.java"));
    }

    #[test]
    fn empty_extension_list_accepts_everything() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "A.java");
        touch(&dir, "notes.txt");

        let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn exclude_patterns_drop_matching_paths() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "src/Main.java");
        touch(&dir, "generated/Gen.java");

        let files = FileWalker::new(dir.path().to_path_buf())
            .with_extensions(vec!["java".to_string()])
            .with_exclude_patterns(vec!["**/generated/**".to_string()])
            .walk()
            .unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("Main.java"));
    }

    #[test]
    fn results_are_sorted() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "z.java");
        touch(&dir, "a.java");
        touch(&dir, "m.java");

        let files = FileWalker::new(dir.path().to_path_buf()).walk().unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.java", "m.java", "z.java"]);
    }
}
