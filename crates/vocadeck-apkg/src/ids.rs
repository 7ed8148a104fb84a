//! Stable identifiers: deck and model ids, note GUIDs, field checksums.

use sha1::Sha1;
use sha2::{Digest, Sha256};

const BASE91: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!#$%&()*+,-./:;<=>?@[]^_`{|}~";

fn digest(text: &str) -> [u8; 32] {
    Sha256::digest(text.as_bytes()).into()
}

/// Deck or model id derived from a name, below 10^10.
///
/// The same name always yields the same id, so a rebuilt deck updates the
/// one already imported.
pub fn id_for_name(name: &str) -> i64 {
    let hash = digest(name);
    let mut value: u128 = 0;
    for byte in &hash[..16] {
        value = (value << 8) | u128::from(*byte);
    }
    // < 10^10, fits in i64
    (value % 10_000_000_000) as i64
}

/// Note GUID for the note's first field.
///
/// The field is lowercased and stripped of surrounding spaces, quotes and
/// dots before hashing; the first eight digest bytes are base91 encoded.
pub fn guid_for(first_field: &str) -> String {
    let key = first_field
        .trim_matches(|c| c == ' ' || c == '"' || c == '.')
        .to_lowercase();
    let hash = digest(&key);
    let mut value = u64::from_be_bytes([
        hash[0], hash[1], hash[2], hash[3], hash[4], hash[5], hash[6], hash[7],
    ]);

    let mut encoded = Vec::new();
    if value == 0 {
        encoded.push(BASE91[0]);
    }
    while value > 0 {
        encoded.push(BASE91[(value % 91) as usize]);
        value /= 91;
    }
    encoded.reverse();
    String::from_utf8_lossy(&encoded).into_owned()
}

/// Checksum of the sort field, used by Anki for duplicate detection.
///
/// First 32 bits of the SHA-1 of the HTML-stripped sort field, as Anki
/// computes it.
pub fn field_checksum(sort_field: &str) -> i64 {
    let hash = Sha1::digest(sort_field.as_bytes());
    i64::from(u32::from_be_bytes([hash[0], hash[1], hash[2], hash[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_is_stable_and_bounded() {
        let id = id_for_name("French");
        assert_eq!(id, id_for_name("French"));
        assert_ne!(id, id_for_name("German"));
        assert!((0..10_000_000_000).contains(&id));
    }

    #[test]
    fn guid_normalizes_first_field() {
        assert_eq!(guid_for("Le chat."), guid_for("\"le chat\""));
        assert_ne!(guid_for("le chat"), guid_for("le chien"));
    }

    #[test]
    fn guid_uses_base91_alphabet() {
        let guid = guid_for("le chat");
        assert!(!guid.is_empty() && guid.len() <= 10);
        assert!(guid.bytes().all(|b| BASE91.contains(&b)));
    }

    #[test]
    fn checksum_fits_u32() {
        let csum = field_checksum("le chat");
        assert!((0..=i64::from(u32::MAX)).contains(&csum));
    }

    #[test]
    fn checksum_matches_anki() {
        assert_eq!(field_checksum("le chat"), 672_886_141);
        assert_eq!(field_checksum(""), 3_661_210_606);
    }
}
