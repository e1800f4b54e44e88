//! Big-endian cursor helpers over fixed-size buffers.

/// Writes sequentially into a borrowed buffer.
///
/// Callers size the buffer for the layout they write; running past the end
/// is a programming error and panics like any slice overrun.
pub struct ByteWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl<'a> ByteWriter<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        ByteWriter { buf, pos: 0 }
    }

    pub fn write_u8(&mut self, b: u8) {
        self.buf[self.pos] = b;
        self.pos += 1;
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.write_bytes(&v.to_be_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Reads sequentially from a borrowed buffer. Every read is bounds checked and
/// returns `None` once the buffer is exhausted.
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        ByteReader { buf, pos: 0 }
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        let b = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(b)
    }

    pub fn read_u32_be(&mut self) -> Option<u32> {
        self.read_array::<4>().map(u32::from_be_bytes)
    }

    pub fn read_array<const N: usize>(&mut self) -> Option<[u8; N]> {
        let slice = self.read_slice(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(slice);
        Some(out)
    }

    pub fn read_slice(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        let slice = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(slice)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_big_endian() {
        let mut buf = [0u8; 9];
        let mut w = ByteWriter::new(&mut buf);
        w.write_u32_be(0x0488_ade4);
        w.write_u8(7);
        w.write_u32_be(0x8000_0001);
        assert_eq!(w.position(), 9);
        assert_eq!(buf, [0x04, 0x88, 0xad, 0xe4, 7, 0x80, 0, 0, 1]);
    }

    #[test]
    fn reads_back_fields_in_order() {
        let buf = [0x04, 0x88, 0xb2, 0x1e, 3, 0xaa, 0xbb];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_u32_be(), Some(0x0488_b21e));
        assert_eq!(r.read_u8(), Some(3));
        assert_eq!(r.position(), 5);
        assert_eq!(r.read_array::<2>(), Some([0xaa, 0xbb]));
        assert_eq!(r.remaining(), 0);
        assert_eq!(r.read_u8(), None);
    }

    #[test]
    fn short_reads_do_not_advance() {
        let buf = [1, 2, 3];
        let mut r = ByteReader::new(&buf);
        assert_eq!(r.read_u32_be(), None);
        assert_eq!(r.position(), 0);
        assert_eq!(r.read_slice(3), Some(&buf[..]));
    }
}
