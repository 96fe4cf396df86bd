/// Non-owning forward reader over an already-materialized byte buffer.
///
/// Every read is clamped to what is left: asking for more bytes than
/// remain returns the shorter tail instead of an error, and never pads.
/// Callers compare the returned length with what they asked for when
/// the difference matters.
///
/// ```text
///   buf:  [ consumed ... | remaining ........ ]
///                        ^ pos
/// ```
#[derive(Clone, Debug)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Read up to `n` bytes, advancing past whatever was returned.
    pub fn read(&mut self, n: usize) -> &'a [u8] {
        let take = n.min(self.buf.len() - self.pos);
        let out = &self.buf[self.pos..self.pos + take];
        self.pos += take;
        out
    }

    /// Read a single byte, or `None` at the end of the buffer.
    pub fn read_u8(&mut self) -> Option<u8> {
        let byte = *self.buf.get(self.pos)?;
        self.pos += 1;
        Some(byte)
    }

    /// All unread bytes. Does not advance.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }
}
