//! Block framing for the combined output.
//!
//! A block is `===== <label> =====\n`, the file content verbatim, then `\n\n`.

use std::io::{self, Write};

const HEADER_MARK: &str = "=====";
const BLOCK_TRAILER: &str = "\n\n";

/// Header line for `label`, including its trailing newline.
pub fn header_line(label: &str) -> String {
    format!("{HEADER_MARK} {label} {HEADER_MARK}\n")
}

pub struct BlockWriter<W: Write> {
    inner: W,
    blocks: usize,
    bytes: u64,
}

impl<W: Write> BlockWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            blocks: 0,
            bytes: 0,
        }
    }

    /// Write one header + content pair. Callers read the content completely
    /// before calling, so a failed read never leaves an orphan header.
    pub fn write_block(&mut self, label: &str, content: &str) -> io::Result<()> {
        let header = header_line(label);
        self.inner.write_all(header.as_bytes())?;
        self.inner.write_all(content.as_bytes())?;
        self.inner.write_all(BLOCK_TRAILER.as_bytes())?;
        self.blocks += 1;
        self.bytes += (header.len() + content.len() + BLOCK_TRAILER.len()) as u64;
        Ok(())
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Flush and hand back `(blocks, bytes)`.
    pub fn finish(mut self) -> io::Result<(usize, u64)> {
        self.inner.flush()?;
        Ok((self.blocks, self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_format_is_exact() {
        assert_eq!(header_line("server.js"), "===== server.js =====\n");
        assert_eq!(header_line("public/js/a b.js"), "===== public/js/a b.js =====\n");
    }

    #[test]
    fn block_is_header_content_blank_line() {
        let mut w = BlockWriter::new(Vec::new());
        w.write_block("server.js", "hello").unwrap();
        assert_eq!(w.blocks(), 1);
        let BlockWriter { inner, .. } = w;
        assert_eq!(String::from_utf8(inner).unwrap(), "===== server.js =====\nhello\n\n");
    }

    #[test]
    fn content_is_not_normalised() {
        let expected = "===== a.js =====\nx\r\ny\n\n\n===== b.js =====\n\n\n";
        let mut buf = Vec::new();
        let mut w = BlockWriter::new(&mut buf);
        w.write_block("a.js", "x\r\ny\n").unwrap();
        w.write_block("b.js", "").unwrap();
        let (blocks, bytes) = w.finish().unwrap();

        assert_eq!(blocks, 2);
        assert_eq!(bytes, expected.len() as u64);
        assert_eq!(String::from_utf8(buf).unwrap(), expected);
    }
}
