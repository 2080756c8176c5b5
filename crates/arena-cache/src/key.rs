/// Cache key for a document: the blake3 hash of its full text, hex encoded.
pub fn content_key(text: &str) -> String {
    blake3::hash(text.as_bytes()).to_hex().to_string()
}
