//! Root prefix detection for the supported path families.

use super::PathKind;

/// The root portion of a path and the remainder that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Root<'a> {
    /// Root text exactly as it appears in the input.
    pub raw: &'a str,
    /// Root rendered with the kind's separator (`/`, `C:\`, `\\server\share\`).
    pub canonical: String,
    /// Drive letter or UNC share, without the trailing separator.
    pub device: Option<String>,
    /// Whether the path is anchored at a root.
    pub absolute: bool,
    /// Everything after the root.
    pub rest: &'a str,
}

pub(crate) const fn is_windows_separator(c: char) -> bool {
    c == '\\' || c == '/'
}

pub(crate) const fn is_posix_separator(c: char) -> bool {
    c == '/'
}

/// Splits `path` into its root and remainder under `kind`'s rules.
pub(crate) fn split_root(kind: PathKind, path: &str) -> Root<'_> {
    if kind.is_windows() {
        split_windows_root(path)
    } else {
        split_posix_root(path)
    }
}

fn split_posix_root(path: &str) -> Root<'_> {
    if path.starts_with('/') {
        Root {
            raw: &path[..1],
            canonical: "/".to_string(),
            device: None,
            absolute: true,
            rest: &path[1..],
        }
    } else {
        Root {
            raw: "",
            canonical: String::new(),
            device: None,
            absolute: false,
            rest: path,
        }
    }
}

fn split_windows_root(path: &str) -> Root<'_> {
    let mut chars = path.chars();
    let first = chars.next();
    let second = chars.next();

    match (first, second) {
        (Some(a), Some(b)) if is_windows_separator(a) && is_windows_separator(b) => {
            split_unc_root(path)
        }
        (Some(letter), Some(':')) if letter.is_ascii_alphabetic() => {
            let device = format!("{letter}:");
            if path[2..].starts_with(is_windows_separator) {
                Root {
                    raw: &path[..3],
                    canonical: format!("{device}\\"),
                    device: Some(device),
                    absolute: true,
                    rest: &path[3..],
                }
            } else {
                // Drive-relative, e.g. `C:foo`.
                Root {
                    raw: &path[..2],
                    canonical: device.clone(),
                    device: Some(device),
                    absolute: false,
                    rest: &path[2..],
                }
            }
        }
        (Some(a), _) if is_windows_separator(a) => Root {
            raw: &path[..1],
            canonical: "\\".to_string(),
            device: None,
            absolute: true,
            rest: &path[1..],
        },
        _ => Root {
            raw: "",
            canonical: String::new(),
            device: None,
            absolute: false,
            rest: path,
        },
    }
}

/// `\\server\share\rest`; a server without a share degrades to a rooted path.
fn split_unc_root(path: &str) -> Root<'_> {
    let after_slashes = &path[2..];
    let server_len = after_slashes
        .find(is_windows_separator)
        .unwrap_or(after_slashes.len());

    if server_len > 0 && server_len < after_slashes.len() {
        let server = &after_slashes[..server_len];
        let after_server = &after_slashes[server_len..];
        let share_start = after_server.len()
            - after_server
                .trim_start_matches(is_windows_separator)
                .len();
        let share_area = &after_server[share_start..];
        let share_len = share_area
            .find(is_windows_separator)
            .unwrap_or(share_area.len());

        if share_len > 0 {
            let share = &share_area[..share_len];
            let consumed = 2 + server_len + share_start + share_len;
            let remainder = &path[consumed..];
            let raw_end = if remainder.starts_with(is_windows_separator) {
                consumed + 1
            } else {
                consumed
            };
            let device = format!("\\\\{server}\\{share}");
            return Root {
                raw: &path[..raw_end],
                canonical: format!("{device}\\"),
                device: Some(device),
                absolute: true,
                rest: &path[raw_end..],
            };
        }
    }

    Root {
        raw: &path[..1],
        canonical: "\\".to_string(),
        device: None,
        absolute: true,
        rest: path[1..].trim_start_matches(is_windows_separator),
    }
}
