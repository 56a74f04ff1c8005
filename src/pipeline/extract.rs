//! Wiki-link extraction from a single line of markdown.
//!
//! Two patterns are recognised:
//!
//! - image embeds, `[[photo.png]]` / `![[photo.png|caption]]`, where the
//!   target must end in an image extension;
//! - any wiki-link, `[[Note]]` / `[[Note#Heading|label]]`, used by the
//!   missing-note check.
//!
//! Both match non-greedily so several links on one line are returned
//! separately, in left-to-right order. The `|alias` suffix is never part of
//! the returned target.

use once_cell::sync::Lazy;
use regex::Regex;

/// Extensions recognised as images, matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];

/// Extensions a wiki-link may point at without being a note link.
pub const ATTACHMENT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "mp3", "wav", "pdf"];

static RE_IMAGE_EMBED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[\[(.*?\.(?:jpg|jpeg|png|gif|bmp))(?:\|.*?)?\]\]").unwrap()
});

static RE_WIKI_LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[(.*?)(?:\|.*?)?\]\]").unwrap());

/// All image targets on `line`, without brackets or alias.
pub fn extract_image_references(line: &str) -> Vec<&str> {
    RE_IMAGE_EMBED
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// All note targets on `line`: wiki-link targets with any `#heading` or
/// `|alias` removed, trimmed, skipping attachments and same-note heading
/// links.
pub fn extract_note_links(line: &str) -> Vec<&str> {
    RE_WIKI_LINK
        .captures_iter(line)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let target = m.as_str();
            target.split('#').next().unwrap_or(target).trim()
        })
        .filter(|target| !target.is_empty() && !is_attachment(target))
        .collect()
}

/// File name part of a link target (text after the last `/` or `\`).
pub fn link_file_name(target: &str) -> &str {
    target
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(target)
}

/// True when `name` ends in one of [`IMAGE_EXTENSIONS`], ignoring case.
pub fn has_image_extension(name: &str) -> bool {
    has_extension_in(name, IMAGE_EXTENSIONS)
}

fn is_attachment(target: &str) -> bool {
    has_extension_in(target, ATTACHMENT_EXTENSIONS)
}

fn has_extension_in(name: &str, exts: &[&str]) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => exts.iter().any(|e| e.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_embedded_images() {
        assert_eq!(extract_image_references("See [[cat.png]]"), vec!["cat.png"]);
        assert_eq!(
            extract_image_references("![[figs/diagram.gif]]"),
            vec!["figs/diagram.gif"]
        );
    }

    #[test]
    fn alias_is_not_part_of_the_name() {
        assert_eq!(
            extract_image_references("[[img.png|Some Label]]"),
            vec!["img.png"]
        );
    }

    #[test]
    fn extension_case_is_ignored() {
        assert_eq!(
            extract_image_references("[[a.PNG]] and [[b.JpEg]]"),
            vec!["a.PNG", "b.JpEg"]
        );
    }

    #[test]
    fn several_links_left_to_right() {
        assert_eq!(
            extract_image_references("[[one.png]] text [[two.bmp|x]] [[three.jpg]]"),
            vec!["one.png", "two.bmp", "three.jpg"]
        );
    }

    #[test]
    fn non_images_are_ignored() {
        assert!(extract_image_references("[[Some note]] [[doc.pdf]] [cat.png]").is_empty());
    }

    #[test]
    fn names_with_spaces_and_dots() {
        assert_eq!(
            extract_image_references("![[Pasted image 20240101.v2.png]]"),
            vec!["Pasted image 20240101.v2.png"]
        );
    }

    #[test]
    fn note_links_strip_heading_and_alias() {
        assert_eq!(
            extract_note_links("[[Project Plan#Goals|the goals]] and [[Inbox]]"),
            vec!["Project Plan", "Inbox"]
        );
    }

    #[test]
    fn note_links_skip_attachments_and_self_headings() {
        assert!(extract_note_links("[[#Local heading]] [[a.png]] [[talk.MP3]] [[x.pdf]]").is_empty());
    }

    #[test]
    fn file_name_of_target() {
        assert_eq!(link_file_name("sub/dir/img.png"), "img.png");
        assert_eq!(link_file_name("img.png"), "img.png");
        assert_eq!(link_file_name("win\\img.png"), "img.png");
    }

    #[test]
    fn image_extension_check() {
        assert!(has_image_extension("a.Gif"));
        assert!(!has_image_extension("a.svg"));
        assert!(!has_image_extension("png"));
    }
}
