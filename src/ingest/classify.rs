use std::path::Path;

/// What an incoming file is taken to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Record,
    Unrecognized,
}

/// Classify by declared mime type if there is one, otherwise by extension
pub fn classify(path: &Path, mime: Option<&str>) -> FileKind {
    match mime.map(classify_mime) {
        Some(FileKind::Unrecognized) | None => classify_path(path),
        Some(kind) => kind,
    }
}

/// `.pdf` / `.json`, case-insensitive
pub fn classify_path(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return FileKind::Unrecognized;
    };
    if ext.eq_ignore_ascii_case("pdf") {
        FileKind::Document
    } else if ext.eq_ignore_ascii_case("json") {
        FileKind::Record
    } else {
        FileKind::Unrecognized
    }
}

pub fn classify_mime(mime: &str) -> FileKind {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case("application/pdf") {
        FileKind::Document
    } else if essence.eq_ignore_ascii_case("application/json") {
        FileKind::Record
    } else {
        FileKind::Unrecognized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn by_extension() {
        assert_eq!(classify_path(Path::new("scan.pdf")), FileKind::Document);
        assert_eq!(classify_path(Path::new("SCAN.PDF")), FileKind::Document);
        assert_eq!(classify_path(Path::new("/a/b/claim.Json")), FileKind::Record);
        assert_eq!(classify_path(Path::new("notes.txt")), FileKind::Unrecognized);
        assert_eq!(classify_path(Path::new("pdf")), FileKind::Unrecognized);
        assert_eq!(classify_path(Path::new("archive.pdf.zip")), FileKind::Unrecognized);
    }

    #[test]
    fn mime_wins_over_extension() {
        assert_eq!(
            classify(Path::new("upload.bin"), Some("application/pdf")),
            FileKind::Document
        );
        assert_eq!(
            classify(Path::new("data"), Some("application/json; charset=utf-8")),
            FileKind::Record
        );
        assert_eq!(
            classify(Path::new("claim.json"), Some("text/plain")),
            FileKind::Record
        );
    }
}
