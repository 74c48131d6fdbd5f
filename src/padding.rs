//! Tab padding for the block cipher.
//!
//! Plaintext is extended with `0x09` bytes up to the next block boundary
//! before encryption; already-aligned plaintext still gains one full block so
//! the trim on the way out always has padding to remove. The trim strips all
//! trailing `0x09` bytes, which means a payload that itself ends in a tab
//! loses those trailing tabs on round trip. Callers needing strict binary
//! fidelity must frame their payloads.

/// The padding byte, a horizontal tab.
pub(crate) const PAD_BYTE: u8 = b'\t';

/// Pads `data` with tabs to a multiple of `block_size`.
pub(crate) fn pad(mut data: Vec<u8>, block_size: usize) -> Vec<u8> {
    let fill = block_size - data.len() % block_size;
    data.resize(data.len() + fill, PAD_BYTE);
    data
}

/// Strips all trailing tab bytes from decrypted plaintext.
pub(crate) fn unpad(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| b != PAD_BYTE)
        .map_or(0, |i| i + 1);
    &data[..end]
}
