/// Extensions whose payloads are treated as opaque bytes.
pub const BINARY_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tga", "fsb", "bin"];

/// Decide from the path's extension whether an entry is binary.
///
/// This is an allow-list, not a content sniff: a text file named `x.bin` is
/// binary and a PNG named `x.txt` is text. Matching is case-insensitive and
/// only considers the text after the last `.` of the whole path.
pub fn is_binary(path: &str) -> bool {
    let Some((_, extension)) = path.rsplit_once('.') else {
        return false;
    };
    BINARY_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(extension))
}
