use std::io;
use std::io::{Read, Write};

/// Big-endian primitives and length-prefixed blobs, as laid out in a
/// structured value envelope.
pub trait ReadExt {
    fn read_u8(&mut self) -> io::Result<u8>;
    fn read_u32(&mut self) -> io::Result<u32>;
    fn read_string(&mut self) -> io::Result<String>;
    fn read_bytes(&mut self) -> io::Result<Vec<u8>>;
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> io::Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf)?;
    Ok(buf)
}

impl<R: Read> ReadExt for R {
    fn read_u8(&mut self) -> io::Result<u8> {
        let [byte] = read_array(self)?;
        Ok(byte)
    }

    fn read_u32(&mut self) -> io::Result<u32> {
        read_array(self).map(u32::from_be_bytes)
    }

    // The length prefix comes from untrusted input, so the buffer grows with
    // what is actually there instead of being allocated up front.
    fn read_bytes(&mut self) -> io::Result<Vec<u8>> {
        let len = u64::from_be_bytes(read_array(self)?);
        let mut buf = Vec::new();
        self.by_ref().take(len).read_to_end(&mut buf)?;

        if buf.len() as u64 != len {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "length prefix runs past the end of input",
            ));
        }

        Ok(buf)
    }

    fn read_string(&mut self) -> io::Result<String> {
        let buf = self.read_bytes()?;
        String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

pub trait WriteExt {
    fn write_u8(&mut self, value: u8) -> io::Result<()>;
    fn write_u32(&mut self, value: u32) -> io::Result<()>;
    fn write_string(&mut self, value: &str) -> io::Result<()>;
    fn write_bytes(&mut self, value: &[u8]) -> io::Result<()>;
}

impl<W: Write> WriteExt for W {
    fn write_u8(&mut self, value: u8) -> io::Result<()> {
        self.write_all(&[value])
    }

    fn write_u32(&mut self, value: u32) -> io::Result<()> {
        self.write_all(&value.to_be_bytes())
    }

    fn write_string(&mut self, value: &str) -> io::Result<()> {
        self.write_bytes(value.as_bytes())
    }

    fn write_bytes(&mut self, value: &[u8]) -> io::Result<()> {
        let len = value.len() as u64;
        self.write_all(&len.to_be_bytes())?;
        self.write_all(value)
    }
}
