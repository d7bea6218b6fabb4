//! External tool adapters
//!
//! - `tsc` - type checker (`TscTypeChecker`)
//! - `esbuild` - transpiler (`EsbuildTranspiler`)
//! - `alias` - native `paths` alias rewriter (`PathAliasRewriter`)

mod alias;
mod esbuild;
mod tsc;

use std::path::{Path, PathBuf};

pub use alias::PathAliasRewriter;
pub use esbuild::EsbuildTranspiler;
pub use tsc::{parse_tsc_output, TscTypeChecker, CHECK_CONFIG_PREFIX};

/// Locate an executable for a project.
///
/// Order: explicit override (a path or a name on `PATH`), the project's
/// `node_modules/.bin`, then `PATH`.
pub fn find_tool(name: &str, project_root: &Path, configured: Option<&str>) -> Option<PathBuf> {
    if let Some(configured) = configured {
        let path = project_root.join(configured);
        if path.is_file() {
            return Some(path);
        }
        return which::which(configured).ok();
    }

    let local = project_root.join("node_modules").join(".bin").join(name);
    if local.is_file() {
        return Some(local);
    }

    which::which(name).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn find_tool_prefers_node_modules_bin() {
        let dir = tempdir().unwrap();
        let bin = dir.path().join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("tsrig-fake-tool"), "#!/bin/sh\n").unwrap();

        assert_eq!(
            find_tool("tsrig-fake-tool", dir.path(), None),
            Some(bin.join("tsrig-fake-tool"))
        );
    }

    #[test]
    fn find_tool_missing_is_none() {
        let dir = tempdir().unwrap();
        assert_eq!(find_tool("tsrig-definitely-missing-tool", dir.path(), None), None);
    }

    #[test]
    fn find_tool_configured_relative_path() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("my-tsc"), "").unwrap();

        assert_eq!(
            find_tool("tsc", dir.path(), Some("my-tsc")),
            Some(dir.path().join("my-tsc"))
        );
    }
}
