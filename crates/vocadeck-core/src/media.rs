//! Media naming: content-hash file names and Anki field references.

use sha2::{Digest, Sha256};

const STRIP: &[char] = &[
    ' ', '.', ',', ';', ':', '!', '?', '\'', '"', '(', ')', '[', ']', '{', '}', '<', '>',
];

/// First 16 hex characters of the SHA-256 of the normalized text.
///
/// Normalization lowercases and trims punctuation and spaces from both ends,
/// so `"Chat!"` and `"chat"` share a hash.
pub fn hash_text(text: &str) -> String {
    let normalized = text.to_lowercase();
    let normalized = normalized.trim_matches(STRIP);
    let digest = Sha256::digest(normalized.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(16);
    hex
}

/// Kinds of packaged media.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Sound,
    Image,
}

impl MediaKind {
    /// Deterministic file name for media generated from `text`.
    pub fn file_name(self, text: &str) -> String {
        match self {
            Self::Sound => format!("sound_{}.mp3", hash_text(text)),
            Self::Image => format!("img_{}.png", hash_text(text)),
        }
    }

    /// Field reference for a packaged file.
    pub fn reference(self, file_name: &str) -> String {
        match self {
            Self::Sound => format!("[sound:{file_name}]"),
            Self::Image => format!("<img src=\"{file_name}\">"),
        }
    }

    /// Turn a user-supplied value into a reference, wrapping bare file names.
    pub fn normalize_literal(self, value: &str) -> String {
        let value = value.trim();
        if self.referenced_file(value).is_some() {
            value.to_string()
        } else {
            self.reference(value)
        }
    }

    /// File name inside a reference, if `reference` is one.
    pub fn referenced_file(self, reference: &str) -> Option<&str> {
        let reference = reference.trim();
        let file = match self {
            Self::Sound => reference
                .strip_prefix("[sound:")
                .and_then(|r| r.strip_suffix(']')),
            Self::Image => {
                let start = reference.find("src=")? + 4;
                let rest = &reference[start..];
                match rest.chars().next() {
                    Some(quote @ ('"' | '\'')) => {
                        let rest = &rest[1..];
                        rest.find(quote).map(|end| &rest[..end])
                    }
                    // unquoted attribute value
                    Some(_) => {
                        let end = rest
                            .find(|c: char| c.is_whitespace() || c == '>')
                            .unwrap_or(rest.len());
                        let value = &rest[..end];
                        Some(value.strip_suffix('/').unwrap_or(value))
                    }
                    None => None,
                }
            }
        };
        file.map(str::trim).filter(|name| !name.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_ignores_case_and_punctuation() {
        assert_eq!(hash_text("Chat!"), hash_text("chat"));
        assert_eq!(hash_text("  (chat) "), hash_text("chat"));
        assert_ne!(hash_text("chat"), hash_text("chien"));
        assert_eq!(hash_text("chat").len(), 16);
    }

    #[test]
    fn file_names() {
        let name = MediaKind::Sound.file_name("chat");
        assert!(name.starts_with("sound_") && name.ends_with(".mp3"));
        let name = MediaKind::Image.file_name("chat");
        assert!(name.starts_with("img_") && name.ends_with(".png"));
    }

    #[test]
    fn normalize_wraps_bare_names() {
        assert_eq!(
            MediaKind::Sound.normalize_literal("chat.mp3"),
            "[sound:chat.mp3]"
        );
        assert_eq!(
            MediaKind::Sound.normalize_literal("[sound:chat.mp3]"),
            "[sound:chat.mp3]"
        );
        assert_eq!(
            MediaKind::Image.normalize_literal("cat.jpg"),
            "<img src=\"cat.jpg\">"
        );
        assert_eq!(
            MediaKind::Image.normalize_literal("<img src='cat.jpg' />"),
            "<img src='cat.jpg' />"
        );
    }

    #[test]
    fn referenced_file() {
        assert_eq!(
            MediaKind::Sound.referenced_file("[sound:a.mp3]"),
            Some("a.mp3")
        );
        assert_eq!(
            MediaKind::Image.referenced_file("<img src=\"b.png\">"),
            Some("b.png")
        );
        assert_eq!(
            MediaKind::Image.referenced_file("<img src=cat.jpg>"),
            Some("cat.jpg")
        );
        assert_eq!(
            MediaKind::Image.referenced_file("<img src=cat.jpg width=80/>"),
            Some("cat.jpg")
        );
        assert_eq!(MediaKind::Image.referenced_file("<img src=>"), None);
        assert_eq!(MediaKind::Image.referenced_file("b.png"), None);
    }

    #[test]
    fn unquoted_image_literal_is_kept() {
        assert_eq!(
            MediaKind::Image.normalize_literal("<img src=cat.jpg>"),
            "<img src=cat.jpg>"
        );
    }
}
