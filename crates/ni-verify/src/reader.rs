use std::io::{self, Read};

use crate::{Hasher, Result, VerifyError};

/// Largest buffer [`HashReader::drain`] allocates, whatever it is asked for.
pub const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// Streaming reader that hashes data as it passes through.
/// Wraps any `Read` source so content is digested in a single pass.
pub struct HashReader<R, H> {
    reader:     R,
    hasher:     H,
    bytes_read: u64,
}

impl<R, H> HashReader<R, H> {
    /// Create a new hashing reader.
    pub fn new(reader: R, hasher: H) -> Self {
        Self {
            reader,
            hasher,
            bytes_read: 0,
        }
    }

    /// Number of bytes hashed so far.
    pub fn bytes_read(&self) -> u64 { self.bytes_read }
}

impl<R: Read, H: Hasher> Read for HashReader<R, H> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.bytes_read += n as u64;
        }
        Ok(n)
    }
}

impl<R: Read, H: Hasher> HashReader<R, H> {
    /// Read the remaining input in pieces of at most `chunk_size` bytes,
    /// discarding them. The size is clamped to `1..=MAX_CHUNK_SIZE`.
    pub fn drain(&mut self, chunk_size: usize) -> Result<u64> {
        let mut buf = vec![0u8; chunk_size.clamp(1, MAX_CHUNK_SIZE)];
        loop {
            match self.read(&mut buf) {
                Ok(0) => return Ok(self.bytes_read),
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(source) => {
                    return Err(VerifyError::Read {
                        bytes_read: self.bytes_read,
                        source,
                    });
                }
            }
        }
    }

    /// Consume the reader, returning the full digest of everything read.
    pub fn into_digest(self) -> Vec<u8> { self.hasher.finalize() }
}
