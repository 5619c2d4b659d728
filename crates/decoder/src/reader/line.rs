use std::io::{BufRead, Read};

use bytes::Bytes;

use super::{Message, ReadError, Reader};

/// Newline-framed reader over any `BufRead`.
///
/// Strips the trailing `\n` or `\r\n`. Lines longer than `max_bytes` are
/// skipped and reported as [`ReadError::LineTooLarge`]; reading resumes at
/// the following line. Memory use per line is bounded by `max_bytes`.
pub struct LineReader<R> {
    inner: R,
    max_bytes: usize,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, max_bytes: usize) -> Self {
        Self {
            inner,
            max_bytes,
            buf: Vec::new(),
        }
    }

    /// Skip the remainder of an oversized line, returning how many bytes were dropped
    fn discard_line(&mut self) -> Result<usize, ReadError> {
        let mut skipped = 0;
        loop {
            let (done, used) = {
                let available = self.inner.fill_buf()?;
                if available.is_empty() {
                    return Ok(skipped);
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => (true, i + 1),
                    None => (false, available.len()),
                }
            };
            self.inner.consume(used);
            skipped += used;
            if done {
                return Ok(skipped);
            }
        }
    }
}

impl<R: BufRead + Send> Reader for LineReader<R> {
    fn next(&mut self) -> Result<Message, ReadError> {
        self.buf.clear();

        // Room for the line plus "\r\n"
        let limit = self.max_bytes as u64 + 2;
        let read = (&mut self.inner).take(limit).read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Err(ReadError::Eof);
        }

        if !self.buf.ends_with(b"\n") && read as u64 == limit {
            let skipped = self.discard_line()?;
            tracing::warn!(bytes = read + skipped, max = self.max_bytes, "dropping oversized line");
            return Err(ReadError::LineTooLarge(read + skipped, self.max_bytes));
        }

        let line = trim_newline(&self.buf);
        if line.len() > self.max_bytes {
            tracing::warn!(bytes = line.len(), max = self.max_bytes, "dropping oversized line");
            return Err(ReadError::LineTooLarge(line.len(), self.max_bytes));
        }

        let mut message = Message::new(Bytes::copy_from_slice(line));
        message.bytes = read;
        Ok(message)
    }
}

fn trim_newline(bytes: &[u8]) -> &[u8] {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    bytes.strip_suffix(b"\r").unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(input: &str, max_bytes: usize) -> LineReader<Cursor<Vec<u8>>> {
        LineReader::new(Cursor::new(input.as_bytes().to_vec()), max_bytes)
    }

    #[test]
    fn test_reads_lines_until_eof() {
        let mut r = reader("first\nsecond\r\nthird", 64);

        let m = r.next().unwrap();
        assert_eq!(m.content.as_ref(), b"first");
        assert_eq!(m.bytes, 6);
        assert_eq!(r.next().unwrap().content.as_ref(), b"second");
        assert_eq!(r.next().unwrap().content.as_ref(), b"third");
        assert!(matches!(r.next(), Err(ReadError::Eof)));
    }

    #[test]
    fn test_empty_line() {
        let mut r = reader("\nx\n", 64);
        let m = r.next().unwrap();
        assert!(m.content.is_empty());
        assert_eq!(m.bytes, 1);
        assert_eq!(r.next().unwrap().content.as_ref(), b"x");
    }

    #[test]
    fn test_oversized_line_skipped() {
        let long = "y".repeat(100);
        let mut r = reader(&format!("ok\n{}\nafter\n", long), 10);

        assert_eq!(r.next().unwrap().content.as_ref(), b"ok");
        match r.next() {
            Err(ReadError::LineTooLarge(size, max)) => {
                assert_eq!(size, 101);
                assert_eq!(max, 10);
            }
            other => panic!("expected LineTooLarge, got {:?}", other),
        }
        assert_eq!(r.next().unwrap().content.as_ref(), b"after");
    }

    #[test]
    fn test_line_just_over_limit() {
        let mut r = reader("12345678901\nend\n", 10);
        assert!(matches!(r.next(), Err(ReadError::LineTooLarge(11, 10))));
        assert_eq!(r.next().unwrap().content.as_ref(), b"end");
    }

    #[test]
    fn test_line_at_limit_with_crlf() {
        let mut r = reader("1234567890\r\n", 10);
        assert_eq!(r.next().unwrap().content.as_ref(), b"1234567890");
    }
}
