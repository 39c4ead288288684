// Project fixtures

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary JavaScript project directory
pub struct ProjectFixture {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl ProjectFixture {
    /// Create a project whose `package.json` has the given contents
    pub fn new(package_json: &str) -> anyhow::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let root = temp_dir.path().to_path_buf();
        fs::write(root.join("package.json"), package_json)?;
        Ok(ProjectFixture {
            _temp_dir: temp_dir,
            root,
        })
    }

    /// Create a project with `scripts` declared in this order
    pub fn with_scripts(scripts: &[(&str, &str)]) -> anyhow::Result<Self> {
        let entries: Vec<String> = scripts
            .iter()
            .map(|(name, command)| format!("    {:?}: {:?}", name, command))
            .collect();
        let json = format!(
            "{{\n  \"name\": \"fixture\",\n  \"scripts\": {{\n{}\n  }}\n}}\n",
            entries.join(",\n")
        );
        Self::new(&json)
    }

    /// Write an (empty unless given) file relative to the project root
    pub fn file(&self, relative: &str, content: &str) -> anyhow::Result<&Self> {
        let path = self.root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(self)
    }

    /// Create a nested directory inside the project and return its path
    pub fn subdir(&self, relative: &str) -> anyhow::Result<PathBuf> {
        let path = self.root.join(relative);
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}
