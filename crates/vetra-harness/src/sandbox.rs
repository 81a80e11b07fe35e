//! Sandbox lifecycle — an ephemeral, version-controlled directory
//! owning one (target, version) test case.
//!
//! The sandbox gets its own git history so the external tool's
//! diff/ignore semantics behave as in a real project, and its own
//! temp subdirectory so concurrent cases never collide on shared OS
//! temp paths while the tool performs non-atomic temp-file work.

use std::path::{Path, PathBuf};

use tracing::debug;

use vetra_harness_core::HarnessOptions;

use crate::discovery::SNAPSHOTS_DIR;
use crate::errors::ProvisionError;

pub const TEMP_PREFIX: &str = "plugins_";
pub const TOOL_DIR: &str = ".vetra";
pub const TEMP_SUBDIR: &str = ".vetra/tmp";
pub const CONFIG_FILE: &str = "vetra.toml";

const GITIGNORE: &str = ".vetra/logs/\n.vetra/out/\n.vetra/tmp/\n";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ProvisionError + '_ {
    move |source| ProvisionError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// An isolated working directory for one test case. Exclusive to the
/// case that created it; torn down when the case ends.
#[derive(Debug)]
pub struct Sandbox {
    path: PathBuf,
    retained: bool,
    torn_down: bool,
}

impl Sandbox {
    /// Create the sandbox root under the OS temp directory.
    ///
    /// The path is canonicalized immediately: some platforms hand
    /// back short-form temp paths, and path scrubbing must see the
    /// same spelling the subprocess reports in its messages.
    pub fn create(options: &HarnessOptions) -> Result<Self, ProvisionError> {
        let temp_root = std::env::temp_dir();
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(&temp_root)
            .map_err(io_err(&temp_root))?;
        let raw = dir.keep();
        let path = raw.canonicalize().map_err(io_err(&raw))?;

        debug!(sandbox = %path.display(), "created sandbox");

        Ok(Self {
            path,
            retained: options.sandbox_debug,
            torn_down: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seed the sandbox from a fixture input and commit the tree.
    ///
    /// Directory inputs are copied in whole. File inputs are copied
    /// together with their sibling supporting files, excluding
    /// snapshots and any competing input files, so multi-file
    /// fixtures retain context without cross-contaminating targets.
    pub async fn seed(&self, fixtures_dir: &Path, input: &str) -> Result<(), ProvisionError> {
        let tmp_subdir = self.path.join(TEMP_SUBDIR);
        tokio::fs::create_dir_all(&tmp_subdir)
            .await
            .map_err(io_err(&tmp_subdir))?;

        let input_path = fixtures_dir.join(input);
        if !input_path.exists() {
            return Err(ProvisionError::FixtureMissing { path: input_path });
        }

        if input_path.is_dir() {
            copy_tree(&input_path, &self.path, &|_| true).await?;
        } else {
            let filter = seed_filter(input.to_string());
            copy_tree(fixtures_dir, &self.path, &filter).await?;
        }

        let gitignore = self.path.join(".gitignore");
        tokio::fs::write(&gitignore, GITIGNORE)
            .await
            .map_err(io_err(&gitignore))?;

        init_repository(&self.path)?;

        debug!(
            sandbox = %self.path.display(),
            fixtures = %fixtures_dir.display(),
            "seeded sandbox"
        );
        Ok(())
    }

    /// Write the project configuration enabling exactly one plugin
    /// at one version.
    ///
    /// A fixture may ship its own config file; in that case only the
    /// default source is appended and the fixture's own plugin table
    /// is left in charge, mirroring the original harness.
    pub async fn configure(&self, plugin_name: &str, version: &str) -> Result<(), ProvisionError> {
        let tool_dir = self.path.join(TOOL_DIR);
        tokio::fs::create_dir_all(&tool_dir)
            .await
            .map_err(io_err(&tool_dir))?;

        let config_path = tool_dir.join(CONFIG_FILE);
        let fresh = !config_path.exists();

        let mut contents = if fresh {
            String::from("config_version = \"0\"\n")
        } else {
            tokio::fs::read_to_string(&config_path)
                .await
                .map_err(io_err(&config_path))?
        };

        contents.push_str("\n[[source]]\nname = \"default\"\ndefault = true\n");

        if fresh {
            contents.push_str(&format!(
                "\n[[plugin]]\nname = \"{plugin_name}\"\nversion = \"{version}\"\n"
            ));
        }

        tokio::fs::write(&config_path, contents)
            .await
            .map_err(io_err(&config_path))?;
        Ok(())
    }

    /// Delete the sandbox. Safe to call twice, safe to call on a
    /// partially provisioned sandbox, and a no-op when retention is
    /// requested.
    pub fn tear_down(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;

        if self.retained {
            debug!(sandbox = %self.path.display(), "leaving sandbox in place");
            return;
        }

        debug!(sandbox = %self.path.display(), "cleaning up sandbox");
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    sandbox = %self.path.display(),
                    error = %e,
                    "failed to remove sandbox"
                );
            }
        }
    }
}

impl Drop for Sandbox {
    fn drop(&mut self) {
        // A case abandoned at any await point still cleans up.
        self.tear_down();
    }
}

/// Filter for file-input seeding: skip recorded snapshots and any
/// input entry other than the one under test.
fn seed_filter(input: String) -> impl Fn(&Path) -> bool {
    move |path: &Path| {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if name == SNAPSHOTS_DIR || name.ends_with(".shot") {
            return false;
        }
        if name.contains(".in") && name != input {
            return false;
        }
        true
    }
}

/// Recursively copy `src` into `dst`, filtering entries. Iterative
/// so the async body needs no boxed recursion.
async fn copy_tree<F>(src: &Path, dst: &Path, filter: &F) -> Result<(), ProvisionError>
where
    F: Fn(&Path) -> bool,
{
    let mut stack = vec![(src.to_path_buf(), dst.to_path_buf())];

    while let Some((from, to)) = stack.pop() {
        tokio::fs::create_dir_all(&to).await.map_err(io_err(&to))?;

        let mut entries = tokio::fs::read_dir(&from).await.map_err(io_err(&from))?;
        while let Some(entry) = entries.next_entry().await.map_err(io_err(&from))? {
            let path = entry.path();
            if !filter(&path) {
                continue;
            }

            let target = to.join(entry.file_name());
            let file_type = entry.file_type().await.map_err(io_err(&path))?;
            if file_type.is_dir() {
                stack.push((path, target));
            } else {
                tokio::fs::copy(&path, &target)
                    .await
                    .map_err(io_err(&path))?;
            }
        }
    }

    Ok(())
}

/// Initialize a git repository with a single commit so the sandbox
/// looks like a real project tree. Many analyzers skip unversioned
/// or dirty-tree paths.
fn init_repository(path: &Path) -> Result<(), git2::Error> {
    let mut init_opts = git2::RepositoryInitOptions::new();
    init_opts.initial_head("main");
    let repo = git2::Repository::init_opts(path, &init_opts)?;

    let mut config = repo.config()?;
    config.set_str("user.name", "User")?;
    config.set_str("user.email", "user@example.com")?;
    config.set_bool("commit.gpgsign", false)?;
    config.set_str("core.autocrlf", "input")?;

    let mut index = repo.index()?;
    index.add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)?;
    index.write()?;
    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let signature = git2::Signature::now("User", "user@example.com")?;
    repo.commit(
        Some("HEAD"),
        &signature,
        &signature,
        "first commit",
        &tree,
        &[],
    )?;

    Ok(())
}
