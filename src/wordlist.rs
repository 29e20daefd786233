use std::fs;
use std::path::Path;

use anyhow::Context;

/// Load a wordlist: one candidate per line, trimmed, empty lines
/// dropped, order preserved. A missing file is fatal before any probe
/// starts.
pub fn load_wordlist(path: &Path) -> anyhow::Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("wordlist file '{}' not found or not readable", path.display()))?;
    Ok(parse_wordlist(&bytes))
}

pub fn parse_wordlist(bytes: &[u8]) -> Vec<String> {
    decode(bytes.to_vec())
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// UTF-8 first; on invalid UTF-8 fall back to Latin-1, where every byte
/// maps to the code point of the same value.
fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => err.into_bytes().iter().map(|&b| b as char).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_lines() {
        let words = parse_wordlist(b"admin\n\n  backup  \n\napi\n");
        assert_eq!(words, vec!["admin", "backup", "api"]);
    }

    #[test]
    fn order_and_duplicates_are_preserved() {
        let words = parse_wordlist(b"admin\nbackup\nadmin\n");
        assert_eq!(words, vec!["admin", "backup", "admin"]);
    }

    #[test]
    fn utf8_input_decodes_as_is() {
        let words = parse_wordlist("caf\u{e9}\ntest\n".as_bytes());
        assert_eq!(words, vec!["caf\u{e9}", "test"]);
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // 0xE9 is 'e-acute' in Latin-1 but invalid on its own in UTF-8.
        let words = parse_wordlist(&[b'c', b'a', b'f', 0xE9, b'\n', b'o', b'k', b'\n']);
        assert_eq!(words, vec!["caf\u{e9}", "ok"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_wordlist(Path::new("/definitely/not/here.txt"));
        assert!(err.is_err());
    }
}
