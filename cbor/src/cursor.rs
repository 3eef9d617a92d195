/*!
Byte sources the decoder reads from.
*/

use super::*;

const READ_CHUNK: usize = 512;

/// A forward-only source of bytes.
///
/// Implementations fail with [`Error::TruncatedInput`] when fewer bytes
/// remain than were asked for.
pub trait Cursor {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    fn read_byte(&mut self) -> Result<u8, Error> {
        let mut b = [0u8];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    /// Reads `len` bytes into a new buffer.
    ///
    /// The buffer grows as data actually arrives, so a hostile length in a
    /// header cannot force a huge allocation up front.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        let mut v = Vec::with_capacity(len.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];
        let mut remaining = len;
        while remaining > 0 {
            let n = remaining.min(READ_CHUNK);
            self.read_exact(&mut chunk[..n])?;
            v.extend_from_slice(&chunk[..n]);
            remaining -= n;
        }
        Ok(v)
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        (**self).read_exact(buf)
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        (**self).read_byte()
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        (**self).read_vec(len)
    }
}

/// Reads from an in-memory buffer, tracking how much has been consumed.
#[derive(Debug, Clone)]
pub struct SliceCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> SliceCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// The number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }

    pub fn is_empty(&self) -> bool {
        self.offset == self.data.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or(Error::TruncatedInput)?;
        let s = &self.data[self.offset..end];
        self.offset = end;
        Ok(s)
    }
}

impl Cursor for SliceCursor<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        buf.copy_from_slice(self.take(buf.len())?);
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, Error> {
        self.take(len).map(<[u8]>::to_vec)
    }
}

/// Adapts any [`std::io::Read`] into a [`Cursor`].
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct ReaderCursor<R> {
    reader: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> ReaderCursor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Cursor for ReaderCursor<R> {
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.reader.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::TruncatedInput,
            _ => Error::Io(e),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slice() {
        let mut c = SliceCursor::new(&[1, 2, 3, 4]);
        assert_eq!(c.read_byte().unwrap(), 1);
        assert_eq!(c.read_vec(2).unwrap(), [2, 3]);
        assert_eq!(c.position(), 3);
        assert_eq!(c.remaining(), [4]);
        assert!(matches!(c.read_vec(2), Err(Error::TruncatedInput)));
        assert!(matches!(c.read_vec(usize::MAX), Err(Error::TruncatedInput)));
        assert_eq!(c.read_byte().unwrap(), 4);
        assert!(c.is_empty());
        assert!(matches!(c.read_byte(), Err(Error::TruncatedInput)));
    }

    #[cfg(feature = "std")]
    #[test]
    fn reader() {
        let data = alloc::vec![7u8; 1500];
        let mut c = ReaderCursor::new(std::io::Cursor::new(data));
        assert_eq!(c.read_vec(1200).unwrap().len(), 1200);
        assert!(matches!(c.read_vec(301), Err(Error::TruncatedInput)));
    }
}
