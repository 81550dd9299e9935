//! Turning pasted text into file paths.
//!
//! Dropping files onto a terminal pastes their paths. Depending on the
//! terminal that is a space-separated list with backslash-escaped spaces,
//! single- or double-quoted paths, or `file://` URIs, one per line.

use std::path::{Path, PathBuf};

/// Split a paste into paths. Empty input gives an empty list.
pub fn split_pasted_paths(input: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    in_token = true;
                }
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        paths.push(finish_token(&current));
                        current.clear();
                        in_token = false;
                    }
                }
                c => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }
    if in_token {
        paths.push(finish_token(&current));
    }
    paths.retain(|p| !p.as_os_str().is_empty());
    paths
}

/// Paths from typed or pasted text. Text naming an existing file as a whole
/// wins, so an unquoted path with spaces still works.
pub fn paths_from_input(input: &str) -> Vec<PathBuf> {
    let whole = Path::new(input.trim());
    if !whole.as_os_str().is_empty() && whole.is_file() {
        return vec![whole.to_path_buf()];
    }
    split_pasted_paths(input)
}

fn finish_token(token: &str) -> PathBuf {
    match token.strip_prefix("file://") {
        // file://host/path is not supported; treat the rest as a local path
        Some(rest) => PathBuf::from(percent_decode(rest.strip_prefix("localhost").unwrap_or(rest))),
        None => PathBuf::from(token),
    }
}

/// URL-decode percent-encoded bytes (e.g., %20 -> ' ')
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                decoded.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(input: &str) -> Vec<String> {
        split_pasted_paths(input)
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn plain_and_escaped_paths() {
        assert_eq!(
            split("/tmp/claim.pdf /tmp/My\\ Record.json"),
            ["/tmp/claim.pdf", "/tmp/My Record.json"]
        );
    }

    #[test]
    fn quoted_paths() {
        assert_eq!(
            split("'/tmp/a b.pdf' \"/tmp/c d.json\""),
            ["/tmp/a b.pdf", "/tmp/c d.json"]
        );
    }

    #[test]
    fn file_uris_one_per_line() {
        assert_eq!(
            split("file:///home/me/Claim%20Docs/scan.pdf\nfile://localhost/home/me/r%C3%A9sum%C3%A9.json\n"),
            ["/home/me/Claim Docs/scan.pdf", "/home/me/résumé.json"]
        );
    }

    #[test]
    fn blank_input() {
        assert!(split("  \n ").is_empty());
        assert!(split("''").is_empty());
    }

    #[test]
    fn existing_file_with_spaces_is_one_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("My Record.json");
        std::fs::write(&file, "{}").unwrap();
        let text = format!("  {}\n", file.display());
        assert_eq!(paths_from_input(&text), vec![file]);
        assert_eq!(split(&text).len(), 2);
    }

    #[test]
    fn malformed_percent_sequences_are_kept() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("a%zzb"), "a%zzb");
        assert_eq!(percent_decode("%41%42"), "AB");
    }
}
