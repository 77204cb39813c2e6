//! Bounds-checked big-endian reads over a payload

use bytes::Buf;

use crate::error::{BdError, Result};

/// Cursor over a byte slice that reports truncation as `InvalidFile`
/// instead of panicking
pub(crate) struct PayloadReader<'a> {
    file: &'a str,
    buf: &'a [u8],
}

impl<'a> PayloadReader<'a> {
    pub fn new(file: &'a str, data: &'a [u8]) -> Self {
        Self { file, buf: data }
    }

    /// Reader positioned at an absolute offset of `data`
    pub fn at(file: &'a str, data: &'a [u8], offset: usize) -> Result<Self> {
        match data.get(offset..) {
            Some(buf) => Ok(Self { file, buf }),
            None => Err(BdError::invalid(
                file,
                format!("offset {} beyond end of file ({} bytes)", offset, data.len()),
            )),
        }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, len: usize, what: &str) -> Result<()> {
        if self.buf.remaining() < len {
            return Err(BdError::invalid(
                self.file,
                format!("truncated {} (need {} bytes, have {})", what, len, self.buf.remaining()),
            ));
        }
        Ok(())
    }

    pub fn u8(&mut self, what: &str) -> Result<u8> {
        self.need(1, what)?;
        Ok(self.buf.get_u8())
    }

    pub fn u16(&mut self, what: &str) -> Result<u16> {
        self.need(2, what)?;
        Ok(self.buf.get_u16())
    }

    pub fn u32(&mut self, what: &str) -> Result<u32> {
        self.need(4, what)?;
        Ok(self.buf.get_u32())
    }

    pub fn skip(&mut self, len: usize, what: &str) -> Result<()> {
        self.need(len, what)?;
        self.buf.advance(len);
        Ok(())
    }

    /// Fixed-length ASCII field
    pub fn ascii(&mut self, len: usize, what: &str) -> Result<String> {
        self.need(len, what)?;
        let text = String::from_utf8_lossy(&self.buf[..len]).into_owned();
        self.buf.advance(len);
        Ok(text)
    }

    /// Split off the next `len` bytes as their own reader
    pub fn sub(&mut self, len: usize, what: &str) -> Result<PayloadReader<'a>> {
        self.need(len, what)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(PayloadReader {
            file: self.file,
            buf: head,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let data = [0x12, 0x34, 0x00, 0x00, 0x01, 0x00, b'A', b'B', 0xFF];
        let mut r = PayloadReader::new("T", &data);
        assert_eq!(r.u16("a").unwrap(), 0x1234);
        assert_eq!(r.u32("b").unwrap(), 0x0000_0100);
        assert_eq!(r.ascii(2, "c").unwrap(), "AB");
        assert_eq!(r.remaining(), 1);
        assert_eq!(r.u8("d").unwrap(), 0xFF);
        assert!(r.u8("e").is_err());
    }

    #[test]
    fn test_sub_reader_is_bounded() {
        let data = [1, 2, 3, 4, 5];
        let mut r = PayloadReader::new("T", &data);
        let mut sub = r.sub(2, "sub").unwrap();
        assert_eq!(sub.u16("x").unwrap(), 0x0102);
        assert!(sub.u8("y").is_err());
        assert_eq!(r.u8("z").unwrap(), 3);
        assert!(r.sub(3, "big").is_err());
    }

    #[test]
    fn test_at_offset() {
        let data = [0u8; 4];
        assert!(PayloadReader::at("T", &data, 4).is_ok());
        let err = PayloadReader::at("T", &data, 5).err().unwrap();
        assert!(matches!(err, BdError::InvalidFile { .. }));
    }
}
