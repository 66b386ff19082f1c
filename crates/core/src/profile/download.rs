//! CV download URL construction.
//!
//! The media host serves raw assets inline by default. To force a download
//! with a friendly filename, delivery URLs get an `fl_attachment:<name>`
//! segment spliced in right after `/upload/`. The filename is derived from
//! the owner's full name.

use deunicode::deunicode;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Longest full name considered when deriving the filename.
const MAX_NAME_LEN: usize = 60;

/// Slug used when the full name yields nothing usable.
const DEFAULT_SLUG: &str = "profile";

// Matches JavaScript's encodeURIComponent: everything except
// alphanumerics and - _ . ! ~ * ' ( ) is escaped.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Lowercases and transliterates a name into a hyphenated slug.
///
/// `.`, `_`, and `-` survive as-is; each run of any other character
/// collapses into a single hyphen, with no hyphen at either edge.
#[must_use]
pub fn slugify(input: &str) -> String {
    let ascii = deunicode(input).to_lowercase();
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_hyphen = false;
    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_') {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_hyphen = false;
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Builds the download filename `CV-<slug>.pdf` from the owner's name.
///
/// The name is trimmed and capped at 60 characters before slugging; a
/// missing or unusable name falls back to `CV-profile.pdf`.
#[must_use]
pub fn build_download_name(full_name: Option<&str>) -> String {
    let base: String = full_name
        .unwrap_or_default()
        .trim()
        .chars()
        .take(MAX_NAME_LEN)
        .collect();
    let slug = slugify(&base);
    if slug.is_empty() {
        format!("CV-{DEFAULT_SLUG}.pdf")
    } else {
        format!("CV-{slug}.pdf")
    }
}

/// Sanitizes and percent-encodes a filename for the `fl_attachment` segment.
fn encode_attachment_name(name: &str) -> String {
    let mut safe = String::with_capacity(name.len());
    let mut pending_underscore = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-') {
            if pending_underscore {
                safe.push('_');
            }
            safe.push(ch);
            pending_underscore = false;
        } else if !safe.is_empty() {
            pending_underscore = true;
        }
    }
    utf8_percent_encode(&safe, URI_COMPONENT).to_string()
}

/// Splices `fl_attachment:<name>/` into a delivery URL after `/upload/`.
///
/// URLs without an `/upload/` segment are returned unchanged.
#[must_use]
pub fn add_attachment_name_to_url(url: &str, name: &str) -> String {
    let Some(idx) = url.find("/upload/") else {
        return url.to_string();
    };
    let insert_at = idx + "/upload/".len();
    format!(
        "{}fl_attachment:{}/{}",
        &url[..insert_at],
        encode_attachment_name(name),
        &url[insert_at..]
    )
}

/// Composes a forced-download URL directly from a raw asset's storage id.
///
/// A `.pdf` extension is appended when the storage id lacks one, so the
/// delivery path always resolves to the stored blob.
#[must_use]
pub fn document_url_from_storage_id(cloud_name: &str, storage_id: &str, name: &str) -> String {
    let ext = if storage_id.ends_with(".pdf") { "" } else { ".pdf" };
    format!(
        "https://res.cloudinary.com/{cloud_name}/raw/upload/fl_attachment:{}/{storage_id}{ext}",
        encode_attachment_name(name)
    )
}

/// Builds the CV download URL for a profile.
///
/// Prefers composing from the storage id; falls back to rewriting the
/// stored delivery URL. Returns `None` when no document exists.
#[must_use]
pub fn make_download_url(
    cloud_name: &str,
    storage_id: Option<&str>,
    url: Option<&str>,
    full_name: Option<&str>,
) -> Option<String> {
    let name = build_download_name(full_name);
    if let Some(id) = storage_id {
        return Some(document_url_from_storage_id(cloud_name, id, &name));
    }
    url.map(|u| add_attachment_name_to_url(u, &name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_transliterates_and_hyphenates() {
        assert_eq!(slugify("Ana María Ruiz"), "ana-maria-ruiz");
        assert_eq!(slugify("  John   Smith  "), "john-smith");
        assert_eq!(slugify("Łukasz Żółty"), "lukasz-zolty");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_slugify_keeps_dot_underscore_and_hyphen() {
        assert_eq!(slugify("J.R. Smith"), "j.r.-smith");
        assert_eq!(slugify("john_doe"), "john_doe");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("mary-jane"), "mary-jane");
    }

    #[test]
    fn test_build_download_name() {
        assert_eq!(
            build_download_name(Some("Ana María Ruiz")),
            "CV-ana-maria-ruiz.pdf"
        );
        assert_eq!(build_download_name(None), "CV-profile.pdf");
        assert_eq!(build_download_name(Some("   ")), "CV-profile.pdf");
        assert_eq!(build_download_name(Some("!!!")), "CV-profile.pdf");
    }

    #[test]
    fn test_build_download_name_caps_length() {
        let long = "a".repeat(200);
        let name = build_download_name(Some(&long));
        assert_eq!(name, format!("CV-{}.pdf", "a".repeat(60)));
    }

    #[test]
    fn test_add_attachment_name_splices_after_upload() {
        let url = "https://res.cloudinary.com/demo/raw/upload/v123/profile/cv.pdf";
        assert_eq!(
            add_attachment_name_to_url(url, "CV-jane-doe.pdf"),
            "https://res.cloudinary.com/demo/raw/upload/fl_attachment:CV-jane-doe.pdf/v123/profile/cv.pdf"
        );
    }

    #[test]
    fn test_add_attachment_name_without_upload_segment() {
        let url = "https://example.com/files/cv.pdf";
        assert_eq!(add_attachment_name_to_url(url, "CV-x.pdf"), url);
    }

    #[test]
    fn test_document_url_from_storage_id_appends_pdf() {
        assert_eq!(
            document_url_from_storage_id("demo", "profile/cv-abc", "CV-jane.pdf"),
            "https://res.cloudinary.com/demo/raw/upload/fl_attachment:CV-jane.pdf/profile/cv-abc.pdf"
        );
        assert_eq!(
            document_url_from_storage_id("demo", "profile/cv-abc.pdf", "CV-jane.pdf"),
            "https://res.cloudinary.com/demo/raw/upload/fl_attachment:CV-jane.pdf/profile/cv-abc.pdf"
        );
    }

    #[test]
    fn test_make_download_url_prefers_storage_id() {
        let url = make_download_url(
            "demo",
            Some("profile/cv-abc"),
            Some("https://res.cloudinary.com/demo/raw/upload/v1/old.pdf"),
            Some("Jane Doe"),
        );
        assert_eq!(
            url.as_deref(),
            Some(
                "https://res.cloudinary.com/demo/raw/upload/fl_attachment:CV-jane-doe.pdf/profile/cv-abc.pdf"
            )
        );
    }

    #[test]
    fn test_make_download_url_falls_back_to_url() {
        let url = make_download_url(
            "demo",
            None,
            Some("https://res.cloudinary.com/demo/raw/upload/v1/cv.pdf"),
            Some("Jane Doe"),
        );
        assert_eq!(
            url.as_deref(),
            Some("https://res.cloudinary.com/demo/raw/upload/fl_attachment:CV-jane-doe.pdf/v1/cv.pdf")
        );
    }

    #[test]
    fn test_make_download_url_none_without_document() {
        assert_eq!(make_download_url("demo", None, None, Some("Jane")), None);
    }

    #[test]
    fn test_encode_attachment_name_escapes_specials() {
        assert_eq!(encode_attachment_name("CV a/b.pdf"), "CV_a_b.pdf");
        assert_eq!(encode_attachment_name("a%b.pdf"), "a_b.pdf");
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn download_name_is_always_well_formed(name in ".{0,200}") {
            let result = build_download_name(Some(&name));
            prop_assert!(result.starts_with("CV-"));
            prop_assert!(result.ends_with(".pdf"));
            let slug = &result[3..result.len() - 4];
            prop_assert!(!slug.is_empty());
            let chars_ok = slug.chars().all(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '.' | '_' | '-')
            });
            prop_assert!(chars_ok);
            prop_assert!(!slug.contains("--"));
            prop_assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        }

        #[test]
        fn splice_preserves_original_path(path in "[a-z0-9/._-]{1,40}") {
            let url = format!("https://res.cloudinary.com/demo/raw/upload/{path}");
            let rewritten = add_attachment_name_to_url(&url, "CV-x.pdf");
            prop_assert!(rewritten.starts_with("https://res.cloudinary.com/demo/raw/upload/fl_attachment:"));
            prop_assert!(rewritten.ends_with(&path));
        }
    }
}
