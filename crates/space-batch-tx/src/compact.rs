/// Encoded width of a compact-u16 length prefix.
///
/// Seven bits per byte: values below 0x80 take one byte, below 0x4000 two, anything larger three.
pub fn compact_u16_len(value: usize) -> usize {
    if value < 0x80 {
        1
    } else if value < 0x4000 {
        2
    } else {
        3
    }
}
