use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::config::LineDelimiter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// One line with the delimiter stripped
    Line(Vec<u8>),
    /// `max_line_length` bytes arrived without a delimiter
    TooLong,
    /// Stream ended; any unterminated tail is discarded
    Eof,
}

/// Splits a byte stream on a fixed delimiter sequence.
pub struct LineReader<R> {
    reader: R,
    delimiter: &'static [u8],
    last: u8,
    max_line_length: usize,
    buf: Vec<u8>,
}

impl<R: AsyncBufRead + Unpin> LineReader<R> {
    pub fn new(reader: R, delimiter: LineDelimiter, max_line_length: usize) -> Self {
        let bytes = delimiter.as_bytes();
        Self {
            reader,
            delimiter: bytes,
            last: bytes[bytes.len() - 1],
            max_line_length,
            buf: Vec::new(),
        }
    }

    pub fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    pub async fn next_frame(&mut self) -> std::io::Result<Frame> {
        let limit = self.max_line_length + self.delimiter.len();
        loop {
            let remaining = limit.saturating_sub(self.buf.len());
            if remaining == 0 {
                self.buf.clear();
                return Ok(Frame::TooLong);
            }
            let n = (&mut self.reader)
                .take(remaining as u64)
                .read_until(self.last, &mut self.buf)
                .await?;
            if n == 0 {
                self.buf.clear();
                return Ok(Frame::Eof);
            }
            if self.buf.ends_with(self.delimiter) {
                let mut line = std::mem::take(&mut self.buf);
                line.truncate(line.len() - self.delimiter.len());
                return Ok(Frame::Line(line));
            }
        }
    }
}
