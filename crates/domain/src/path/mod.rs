//! Platform-agnostic path algebra.
//!
//! Collection pathnames may come from any host: POSIX paths, Windows drive
//! paths and Windows UNC shares all flow through the same tree. The free
//! functions here classify their (first) argument with [`PathKind::classify`]
//! and dispatch to that family's algebra. Later arguments of `join` and
//! `resolve` are treated as text under the first argument's rules; mixing
//! kinds is not an error.
//!
//! Nothing in this module touches the file system or the host OS.

mod kind;
mod root;

pub use kind::PathKind;

/// Components of a path as returned by [`parse`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPath {
    /// Root prefix (`/`, `C:\`, `\\server\share\`), empty for relative paths.
    pub root: String,
    /// Directory portion.
    pub dir: String,
    /// Last segment including its extension.
    pub base: String,
    /// Extension of `base` including the dot.
    pub ext: String,
    /// `base` without `ext`.
    pub name: String,
}

/// Normalizes a path under its own kind.
///
/// The empty string is returned unchanged rather than becoming `.`, so
/// optional pathnames can be passed through without special casing.
#[must_use]
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    PathKind::classify(path).normalize(path)
}

/// [`normalize`] for optional pathnames; `None` passes through.
#[must_use]
pub fn normalize_optional(path: Option<&str>) -> Option<String> {
    path.map(normalize)
}

/// Joins segments using the kind of the first segment.
#[must_use]
pub fn join<S: AsRef<str>>(segments: &[S]) -> String {
    kind_of_first(segments).join(segments)
}

/// Resolves segments to an absolute path using the kind of the first segment.
#[must_use]
pub fn resolve<S: AsRef<str>>(segments: &[S]) -> String {
    kind_of_first(segments).resolve(segments)
}

/// Relative path from `from` to `to`, using the kind of `from`.
#[must_use]
pub fn relative(from: &str, to: &str) -> String {
    PathKind::classify(from).relative(from, to)
}

/// Directory portion of `path`.
#[must_use]
pub fn dirname(path: &str) -> String {
    PathKind::classify(path).dirname(path)
}

/// Last segment of `path`.
#[must_use]
pub fn basename(path: &str) -> String {
    PathKind::classify(path).basename(path)
}

/// Extension of the last segment of `path`, including the dot.
#[must_use]
pub fn extname(path: &str) -> String {
    PathKind::classify(path).extname(path)
}

/// Splits `path` into its components.
#[must_use]
pub fn parse(path: &str) -> ParsedPath {
    PathKind::classify(path).parse(path)
}

/// Replaces every `\` with `/`.
#[must_use]
pub fn to_posix_style(path: &str) -> String {
    path.replace('\\', "/")
}

/// Replaces every `/` with `\`.
#[must_use]
pub fn to_win32_style(path: &str) -> String {
    path.replace('/', "\\")
}

/// Directory names leading from `root` down to `path`.
///
/// Returns an empty list when `path` is `root` itself.
#[must_use]
pub fn subdirectories_from_root(root: &str, path: &str) -> Vec<String> {
    let relative = relative(root, path);
    if relative.is_empty() {
        return Vec::new();
    }
    relative
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn kind_of_first<S: AsRef<str>>(segments: &[S]) -> PathKind {
    segments
        .first()
        .map_or(PathKind::Posix, |first| PathKind::classify(first.as_ref()))
}
