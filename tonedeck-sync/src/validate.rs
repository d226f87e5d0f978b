//! Downloaded audio sniffing
//!
//! Some sources answer a missing syllable with a 200 and an HTML page. The
//! check looks at magic bytes only; it does not decode audio.

/// Whether `bytes` starts like an audio container we know
pub fn looks_like_audio(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false; // Too small to be audio
    }

    let sniffed = match &bytes[..bytes.len().min(12)] {
        // MP3
        [0xFF, 0xFB, ..] | [0xFF, 0xF3, ..] | [0xFF, 0xF2, ..] => true,
        [b'I', b'D', b'3', ..] => true, // MP3 with ID3 tag

        // FLAC
        [b'f', b'L', b'a', b'C', ..] => true,

        // OGG (Vorbis/Opus)
        [b'O', b'g', b'g', b'S', ..] => true,

        // M4A/AAC (MP4 container)
        [_, _, _, _, b'f', b't', b'y', b'p', ..] => true,

        // WAV
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E'] => true,

        _ => false,
    };

    sniffed || infer::is_audio(bytes)
}

/// MIME type guess for log messages
pub fn detected_type(bytes: &[u8]) -> &'static str {
    infer::get(bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("unknown")
}
