//! Path helpers shared by discovery and the router facade.
//!
//! # Responsibilities
//! - Resolve configured roots against the working directory
//! - Pair a route-definition file with its controller module path
//! - Render paths for provenance (`/`-prefixed, forward slashes)
//!
//! # Design Decisions
//! - Purely lexical: nothing here touches the filesystem
//! - A leading `/` in a configured root means "from the working directory",
//!   so `/routers` and `routers` resolve to the same place

use std::path::{Component, Path, PathBuf};

/// Convert path separators to forward slashes.
pub fn unixify(path: &str) -> String {
    path.replace('\\', "/")
}

/// Lexically normalize a path, folding `.` and `..` components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last_is_normal = matches!(out.components().next_back(), Some(Component::Normal(_)));
                if last_is_normal {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve `src` against `cwd`, treating a leading separator as relative.
pub fn realpath(cwd: &Path, src: &str) -> PathBuf {
    let trimmed = src.trim_start_matches(['/', '\\']);
    normalize(&cwd.join(trimmed))
}

/// Compute the relative path leading from `from` to `to`.
///
/// Both paths are normalized first; components that differ are replaced by `..`.
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);

    let common = from
        .components()
        .zip(to.components())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out = PathBuf::new();
    for _ in from.components().skip(common) {
        out.push("..");
    }
    for component in to.components().skip(common) {
        out.push(component.as_os_str());
    }
    out
}

/// Render `path` relative to `cwd` as a root-anchored display path.
pub fn path_to_cwd(cwd: &Path, path: &Path) -> String {
    let relative = relative(cwd, path);
    format!("/{}", unixify(&relative.to_string_lossy()))
}

/// Controller module location paired with a route-definition file.
pub fn pair_controller_path(route_file: &Path, router_root: &Path, controller_root: &Path) -> PathBuf {
    controller_root.join(relative(router_root, route_file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unixify() {
        assert_eq!(unixify(r"routers\api\users.toml"), "routers/api/users.toml");
        assert_eq!(unixify("already/unix"), "already/unix");
    }

    #[test]
    fn test_normalize_folds_dots() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/c/../../d")), PathBuf::from("/a/d"));
        assert_eq!(normalize(Path::new("/..")), PathBuf::from("/"));
    }

    #[test]
    fn test_realpath_strips_leading_slash() {
        let cwd = Path::new("/srv/app");
        assert_eq!(realpath(cwd, "/routers"), PathBuf::from("/srv/app/routers"));
        assert_eq!(realpath(cwd, "routers"), PathBuf::from("/srv/app/routers"));
        assert_eq!(realpath(cwd, "./api/../controllers"), PathBuf::from("/srv/app/controllers"));
    }

    #[test]
    fn test_relative() {
        assert_eq!(
            relative(Path::new("/srv/app/routers"), Path::new("/srv/app/routers/a/b/c.toml")),
            PathBuf::from("a/b/c.toml")
        );
        assert_eq!(
            relative(Path::new("/srv/app"), Path::new("/srv/other/x.toml")),
            PathBuf::from("../other/x.toml")
        );
        assert_eq!(relative(Path::new("/srv"), Path::new("/srv")), PathBuf::new());
    }

    #[test]
    fn test_path_to_cwd() {
        let cwd = Path::new("/srv/app");
        assert_eq!(path_to_cwd(cwd, Path::new("/srv/app/routers/users.toml")), "/routers/users.toml");
        assert_eq!(path_to_cwd(cwd, Path::new("/srv/app")), "/");
        assert_eq!(path_to_cwd(cwd, Path::new("/srv/elsewhere/x.toml")), "/../elsewhere/x.toml");
    }

    #[test]
    fn test_pair_controller_path_is_structural() {
        let paired = pair_controller_path(
            Path::new("/srv/app/routers/a/b/c.toml"),
            Path::new("/srv/app/routers"),
            Path::new("/srv/app/controllers"),
        );
        assert_eq!(paired, PathBuf::from("/srv/app/controllers/a/b/c.toml"));
    }
}
