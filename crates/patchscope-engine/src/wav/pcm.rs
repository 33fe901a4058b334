//! PCM payload extraction and hashing.

/// Returns the `data` chunk payload of a RIFF/WAVE buffer.
///
/// Walks the chunk list, so files with extra chunks written by other tools
/// are accepted. Returns `None` for anything that is not RIFF/WAVE or whose
/// `data` chunk is truncated.
pub fn extract_pcm_data(wav_data: &[u8]) -> Option<&[u8]> {
    if wav_data.len() < 12 || &wav_data[0..4] != b"RIFF" || &wav_data[8..12] != b"WAVE" {
        return None;
    }

    let mut pos = 12;
    while pos + 8 <= wav_data.len() {
        let chunk_id = &wav_data[pos..pos + 4];
        let size_bytes: [u8; 4] = wav_data[pos + 4..pos + 8].try_into().ok()?;
        let chunk_size = u32::from_le_bytes(size_bytes) as usize;
        let start = pos + 8;
        let end = start.checked_add(chunk_size)?;

        if chunk_id == b"data" {
            return wav_data.get(start..end);
        }

        // Chunks are word aligned.
        pos = end + (chunk_size & 1);
    }

    None
}

/// BLAKE3 hex digest of a WAV file's PCM payload.
pub fn compute_pcm_hash(wav_data: &[u8]) -> Option<String> {
    extract_pcm_data(wav_data).map(|pcm| blake3::hash(pcm).to_hex().to_string())
}
