//! Path families and the algebra each one follows.

use serde::{Deserialize, Serialize};

use super::ParsedPath;
use super::root::{is_posix_separator, is_windows_separator, split_root};

/// The syntactic family a path string belongs to.
///
/// Classification is purely textual; the host operating system is never
/// consulted, so a POSIX host can manipulate Windows paths and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    /// `/usr/local/bin`
    #[default]
    Posix,
    /// `C:\Users\name`
    WindowsDrive,
    /// `\\server\share\folder` or `//server/share/folder`
    WindowsUnc,
}

impl PathKind {
    /// Classifies a path string.
    ///
    /// A leading `\\` or `//` is UNC, `<letter>:\` is a drive path, anything
    /// else is POSIX.
    #[must_use]
    pub fn classify(path: &str) -> Self {
        if path.starts_with("\\\\") || path.starts_with("//") {
            return Self::WindowsUnc;
        }
        match path.as_bytes() {
            [letter, b':', b'\\', ..] if letter.is_ascii_alphabetic() => Self::WindowsDrive,
            _ => Self::Posix,
        }
    }

    /// Returns true for both Windows families.
    #[must_use]
    pub const fn is_windows(self) -> bool {
        matches!(self, Self::WindowsDrive | Self::WindowsUnc)
    }

    /// The separator used when producing paths of this kind.
    #[must_use]
    pub const fn separator(self) -> char {
        if self.is_windows() { '\\' } else { '/' }
    }

    /// Returns true if `c` separates segments under this kind.
    ///
    /// Windows accepts both slashes on input.
    #[must_use]
    pub const fn is_separator(self, c: char) -> bool {
        if self.is_windows() {
            is_windows_separator(c)
        } else {
            is_posix_separator(c)
        }
    }

    /// Returns true if `path` is anchored at a root under this kind.
    #[must_use]
    pub fn is_absolute(self, path: &str) -> bool {
        split_root(self, path).absolute
    }

    /// Collapses `.`/`..` segments and duplicate separators.
    ///
    /// An empty input yields `.`. Absolute paths never climb above their root.
    #[must_use]
    pub fn normalize(self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }

        let root = split_root(self, path);
        let segments = self.normalize_segments(root.rest, !root.absolute);
        let mut out = root.canonical.clone();

        if segments.is_empty() {
            if !root.absolute {
                out.push('.');
            }
            return out;
        }

        out.push_str(&segments.join(&self.separator().to_string()));
        if root.rest.ends_with(|c| self.is_separator(c)) {
            out.push(self.separator());
        }
        out
    }

    /// Joins segments with this kind's separator and normalizes the result.
    ///
    /// Empty segments are skipped; joining nothing yields `.`.
    #[must_use]
    pub fn join<S: AsRef<str>>(self, segments: &[S]) -> String {
        let parts: Vec<&str> = segments
            .iter()
            .map(AsRef::as_ref)
            .filter(|s| !s.is_empty())
            .collect();

        if parts.is_empty() {
            return ".".to_string();
        }

        self.normalize(&parts.join(&self.separator().to_string()))
    }

    /// Resolves segments right-to-left into an absolute path.
    ///
    /// No working directory is consulted: a result that is still relative
    /// after every segment is anchored at this kind's bare root.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(self, segments: &[S]) -> String {
        let base = self.separator().to_string();
        self.resolve_from(&base, segments)
    }

    /// Like [`PathKind::resolve`], but anchors relative results at `base`.
    #[must_use]
    pub fn resolve_from<S: AsRef<str>>(self, base: &str, segments: &[S]) -> String {
        let mut pieces: Vec<&str> = Vec::new();
        let mut anchor: Option<String> = None;
        let mut awaiting_device = false;

        let candidates = segments
            .iter()
            .rev()
            .map(AsRef::as_ref)
            .chain(std::iter::once(base));

        for segment in candidates {
            if segment.is_empty() {
                continue;
            }
            let root = split_root(self, segment);

            if awaiting_device {
                // A device-less `\foo` borrows the drive of the nearest segment to its left.
                if let Some(device) = root.device {
                    anchor = Some(format!("{device}\\"));
                    break;
                }
                continue;
            }

            pieces.push(root.rest);
            if root.absolute {
                if self.is_windows() && root.device.is_none() {
                    awaiting_device = true;
                    continue;
                }
                anchor = Some(root.canonical);
                break;
            }
        }

        let anchor = anchor.unwrap_or_else(|| self.separator().to_string());
        pieces.reverse();
        let joined = pieces.join(&self.separator().to_string());
        let segments = self.normalize_segments(&joined, false);

        let mut out = anchor;
        out.push_str(&segments.join(&self.separator().to_string()));
        out
    }

    /// Computes the path leading from `from` to `to`.
    ///
    /// Both sides are resolved first. Windows segments compare
    /// case-insensitively; paths on different roots yield the resolved `to`.
    #[must_use]
    pub fn relative(self, from: &str, to: &str) -> String {
        let from = self.resolve(&[from]);
        let to = self.resolve(&[to]);

        if self.same_text(&from, &to) {
            return String::new();
        }

        let from_root = split_root(self, &from);
        let to_root = split_root(self, &to);
        if !self.same_text(&from_root.canonical, &to_root.canonical) {
            return to;
        }

        let from_segments = self.normalize_segments(from_root.rest, false);
        let to_segments = self.normalize_segments(to_root.rest, false);

        let common = from_segments
            .iter()
            .zip(&to_segments)
            .take_while(|(a, b)| self.same_text(a, b))
            .count();

        let mut parts: Vec<&str> = vec![".."; from_segments.len() - common];
        parts.extend_from_slice(&to_segments[common..]);
        parts.join(&self.separator().to_string())
    }

    /// Everything before the last segment.
    ///
    /// Returns `.` when there is neither a root nor a separator.
    #[must_use]
    pub fn dirname(self, path: &str) -> String {
        if path.is_empty() {
            return ".".to_string();
        }

        let root = split_root(self, path);
        let trimmed = root.rest.trim_end_matches(|c| self.is_separator(c));

        match trimmed.rfind(|c| self.is_separator(c)) {
            Some(index) => {
                let head = trimmed[..index].trim_end_matches(|c| self.is_separator(c));
                format!("{}{head}", root.raw)
            }
            None if root.raw.is_empty() => ".".to_string(),
            None => root.raw.to_string(),
        }
    }

    /// The last segment, ignoring trailing separators.
    #[must_use]
    pub fn basename(self, path: &str) -> String {
        let root = split_root(self, path);
        let trimmed = root.rest.trim_end_matches(|c| self.is_separator(c));
        trimmed
            .rfind(|c| self.is_separator(c))
            .map_or(trimmed, |index| &trimmed[index + 1..])
            .to_string()
    }

    /// The extension of the last segment including its dot, or empty.
    ///
    /// Dotfiles such as `.env` have no extension.
    #[must_use]
    pub fn extname(self, path: &str) -> String {
        let base = self.basename(path);
        extension_of(&base).to_string()
    }

    /// Splits a path into root, directory, base name and extension.
    #[must_use]
    pub fn parse(self, path: &str) -> ParsedPath {
        let root = split_root(self, path);
        let base = self.basename(path);
        let ext = extension_of(&base).to_string();
        let name = base[..base.len() - ext.len()].to_string();

        let trimmed = root.rest.trim_end_matches(|c| self.is_separator(c));
        let dir = if trimmed.contains(|c| self.is_separator(c)) {
            self.dirname(path)
        } else {
            root.raw.to_string()
        };

        ParsedPath {
            root: root.raw.to_string(),
            dir,
            base,
            ext,
            name,
        }
    }

    /// Splits the remainder of a path into normalized segments.
    ///
    /// `..` pops the previous segment; at the start it is kept only when the
    /// path may climb above its root.
    fn normalize_segments<'a>(self, rest: &'a str, allow_above_root: bool) -> Vec<&'a str> {
        let mut stack: Vec<&str> = Vec::new();
        for segment in rest.split(|c| self.is_separator(c)) {
            match segment {
                "" | "." => {}
                ".." => {
                    if stack.last().is_some_and(|last| *last != "..") {
                        stack.pop();
                    } else if allow_above_root {
                        stack.push("..");
                    }
                }
                other => stack.push(other),
            }
        }
        stack
    }

    fn same_text(self, a: &str, b: &str) -> bool {
        if self.is_windows() {
            a.eq_ignore_ascii_case(b)
        } else {
            a == b
        }
    }
}

fn extension_of(base: &str) -> &str {
    if base.chars().all(|c| c == '.') {
        return "";
    }
    match base.rfind('.') {
        Some(0) | None => "",
        Some(index) => &base[index..],
    }
}
