//! Content-type detection from leading bytes.
//!
//! Used when a download comes back without a `Content-Type` header. Covers
//! the formats GroupMe actually serves (images, video, audio, documents)
//! and falls back to text or `application/octet-stream`.

/// How many leading bytes are inspected.
const SNIFF_LEN: usize = 512;

pub const OCTET_STREAM: &str = "application/octet-stream";

const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xff\xd8\xff", "image/jpeg"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"\x00\x00\x01\x00", "image/x-icon"),
    (b"%PDF-", "application/pdf"),
    (b"%!PS-Adobe-", "application/postscript"),
    (b"PK\x03\x04", "application/zip"),
    (b"\x1f\x8b\x08", "application/x-gzip"),
    (b"Rar!\x1a\x07", "application/x-rar-compressed"),
    (b"OggS\x00", "application/ogg"),
    (b"ID3", "audio/mpeg"),
    (b"\x1a\x45\xdf\xa3", "video/webm"),
    (b"\x00asm", "application/wasm"),
];

/// Best-effort MIME type of `data`. Never fails.
pub fn detect_content_type(data: &[u8]) -> &'static str {
    let data = &data[..data.len().min(SNIFF_LEN)];

    if let Some(mime) = riff(data) {
        return mime;
    }
    if is_mp4(data) {
        return "video/mp4";
    }
    for &(magic, mime) in SIGNATURES {
        if data.starts_with(magic) {
            return mime;
        }
    }
    if data.len() >= 2 && data[0] == 0xff && data[1] & 0xe0 == 0xe0 {
        return "audio/mpeg";
    }
    if looks_like_text(data) {
        return "text/plain; charset=utf-8";
    }
    OCTET_STREAM
}

/// `RIFF....WEBP`, `RIFF....WAVE`, `RIFF....AVI `.
fn riff(data: &[u8]) -> Option<&'static str> {
    if data.len() < 12 || !data.starts_with(b"RIFF") {
        return None;
    }
    match &data[8..12] {
        b"WEBP" => Some("image/webp"),
        b"WAVE" => Some("audio/wave"),
        b"AVI " => Some("video/avi"),
        _ => None,
    }
}

/// ISO base media: a leading `ftyp` box whose major or compatible brand
/// starts with `mp4`. Quicktime brands count too since phones upload those.
fn is_mp4(data: &[u8]) -> bool {
    if data.len() < 12 || &data[4..8] != b"ftyp" {
        return false;
    }
    let box_size = u32::from_be_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if box_size < 12 || box_size % 4 != 0 || data.len() < box_size {
        return false;
    }
    data[8..box_size]
        .chunks_exact(4)
        .enumerate()
        // index 1 is the minor version, not a brand
        .filter(|(i, _)| *i != 1)
        .any(|(_, brand)| &brand[..3] == b"mp4" || brand == b"qt  " || brand == b"isom")
}

fn looks_like_text(data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }
    let valid = match std::str::from_utf8(data) {
        Ok(_) => true,
        // a multi-byte char cut off by the sniff window is still text
        Err(e) => e.error_len().is_none(),
    };
    valid
        && !data
            .iter()
            .any(|&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
}
