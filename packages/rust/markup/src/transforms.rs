//! Text transforms applied around the markdown-to-HTML conversion.
//!
//! Each transform is an independent `&str -> String` pass so any of them
//! can be disabled without touching the others. The image handling is a
//! two-phase rewrite: [`standardize_image_paths`] normalizes references in
//! the markdown source, and [`placeholder_images`] suppresses the resulting
//! `<img>` tags in the converted HTML.

use std::sync::LazyLock;

use regex::{Captures, Regex};

// ---------------------------------------------------------------------------
// Image path standardization (markdown phase)
// ---------------------------------------------------------------------------

static IMAGE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").expect("image ref regex"));

/// Rewrite every markdown image reference to point at an `images/`
/// subdirectory keyed by basename.
///
/// Already-standardized references are left unchanged, so applying the pass
/// twice is a no-op.
pub fn standardize_image_paths(markdown: &str) -> String {
    IMAGE_REF_RE
        .replace_all(markdown, |caps: &Captures| {
            let alt = &caps[1];
            let basename = image_basename(&caps[2]);
            format!("![{alt}](images/{basename})")
        })
        .to_string()
}

/// The final path component of an image reference (both separator styles).
fn image_basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

// ---------------------------------------------------------------------------
// Image placeholder substitution (HTML phase)
// ---------------------------------------------------------------------------

static IMG_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img src="images/(.*?)" alt="(.*?)"[^>]*>"#).expect("img tag regex")
});

/// Replace every standardized `<img>` tag with a labeled placeholder block
/// (filename plus alt text), never the actual image tag.
pub fn placeholder_images(html: &str) -> String {
    IMG_TAG_RE
        .replace_all(html, |caps: &Captures| {
            let filename = &caps[1];
            let alt = &caps[2];
            format!(
                "<div class=\"image-placeholder\">\
                 <p>Image Placeholder: {alt}</p>\
                 <p><em>Filename: {filename}</em></p>\
                 </div>"
            )
        })
        .to_string()
}

// ---------------------------------------------------------------------------
// Audio narration blocks
// ---------------------------------------------------------------------------

static HEADING_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</h([1-3])>").expect("heading close regex"));

/// Insert an audio-player block after every heading of level 1–3.
///
/// Section numbering is the 1-based order of headings encountered; each
/// block references a per-section placeholder file `audio/section_{n}.mp3`.
pub fn insert_audio_players(html: &str) -> String {
    let mut section = 0usize;
    HEADING_CLOSE_RE
        .replace_all(html, |caps: &Captures| {
            section += 1;
            format!("{}\n{}", &caps[0], audio_block(section))
        })
        .to_string()
}

fn audio_block(section: usize) -> String {
    format!(
        "<div class=\"audio-player\">\n\
         <p><em>Audio narration for this section</em></p>\n\
         <audio controls>\n\
         <source src=\"audio/section_{section}.mp3\" type=\"audio/mpeg\">\n\
         Your browser does not support the audio element.\n\
         </audio>\n\
         </div>"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_paths_rewritten_to_basename() {
        let md = "![Sunset](photos/2024/sunset.png) and ![Logo](C:\\assets\\logo.jpg)";
        let out = standardize_image_paths(md);
        assert_eq!(out, "![Sunset](images/sunset.png) and ![Logo](images/logo.jpg)");
    }

    #[test]
    fn standardization_is_idempotent() {
        let md = "![Sunset](photos/sunset.png)";
        let once = standardize_image_paths(md);
        let twice = standardize_image_paths(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn placeholder_replaces_img_tag() {
        let html = r#"<p><img src="images/sunset.png" alt="A sunset" /></p>"#;
        let out = placeholder_images(html);
        assert!(!out.contains("<img"));
        assert!(out.contains("Image Placeholder: A sunset"));
        assert!(out.contains("<em>Filename: sunset.png</em>"));
    }

    #[test]
    fn placeholder_ignores_non_standardized_images() {
        let html = r#"<img src="cdn/pic.png" alt="x">"#;
        assert_eq!(placeholder_images(html), html);
    }

    #[test]
    fn audio_inserted_after_each_heading() {
        let html = "<h1>A</h1>\n<p>one</p>\n<h2>B</h2>\n<p>two</p>";
        let out = insert_audio_players(html);
        assert!(out.contains("audio/section_1.mp3"));
        assert!(out.contains("audio/section_2.mp3"));

        let h1_close = out.find("</h1>").unwrap();
        let first_audio = out.find("audio/section_1").unwrap();
        let first_para = out.find("<p>one</p>").unwrap();
        assert!(h1_close < first_audio && first_audio < first_para);
    }

    #[test]
    fn audio_skips_deep_headings() {
        let html = "<h4>Deep</h4><h5>Deeper</h5>";
        assert_eq!(insert_audio_players(html), html);
    }
}
