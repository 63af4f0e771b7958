use std::io;

use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Newline framing for the text protocol.
///
/// A line ends at `\n`; a `\r` right before it is dropped. Bytes are kept
/// across reads until a terminator shows up, so one read may yield zero, one
/// or several lines. Outbound strings are written as-is.
#[derive(Debug, Clone)]
pub struct LineCodec {
    max_line_len: usize,
    next_index: usize,
    discarding: bool,
}

impl LineCodec {
    pub fn new() -> Self {
        LineCodec::with_max_line_len(DEFAULT_MAX_LINE_LEN)
    }

    pub fn with_max_line_len(max_line_len: usize) -> Self {
        LineCodec {
            max_line_len,
            next_index: 0,
            discarding: false,
        }
    }
}

impl Default for LineCodec {
    fn default() -> Self {
        LineCodec::new()
    }
}

// length of a (partial) line, not counting a trailing `\r`
fn content_len(bytes: &[u8]) -> usize {
    bytes.strip_suffix(b"\r").unwrap_or(bytes).len()
}

fn to_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = io::Error;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        loop {
            let newline = buf[self.next_index..]
                .iter()
                .position(|b| *b == b'\n')
                .map(|offset| self.next_index + offset);

            match (self.discarding, newline) {
                (true, Some(end)) => {
                    // resync after an over-long line
                    buf.advance(end + 1);
                    self.next_index = 0;
                    self.discarding = false;
                }
                (true, None) => {
                    buf.advance(buf.len());
                    self.next_index = 0;
                    return Ok(None);
                }
                (false, Some(end)) if content_len(&buf[..end]) > self.max_line_len => {
                    // same verdict as when the line arrives without its terminator
                    warn!(len = end, "Discarding line longer than the maximum");
                    buf.advance(end + 1);
                    self.next_index = 0;
                }
                (false, Some(end)) => {
                    self.next_index = 0;
                    let line = buf.split_to(end + 1);
                    return Ok(Some(to_line(&line[..end])));
                }
                (false, None) if content_len(&buf[..]) > self.max_line_len => {
                    warn!(len = buf.len(), "Discarding line longer than the maximum");
                    self.discarding = true;
                }
                (false, None) => {
                    self.next_index = buf.len();
                    return Ok(None);
                }
            }
        }
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, io::Error> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }

        self.next_index = 0;
        if buf.is_empty() || self.discarding {
            buf.clear();
            return Ok(None);
        }

        let rest = buf.split_to(buf.len());
        Ok(Some(to_line(&rest)))
    }
}

impl Encoder<String> for LineCodec {
    type Error = io::Error;

    fn encode(&mut self, line: String, buf: &mut BytesMut) -> Result<(), io::Error> {
        buf.reserve(line.len());
        buf.put_slice(line.as_bytes());
        Ok(())
    }
}
