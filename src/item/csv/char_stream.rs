use std::{
    collections::VecDeque,
    io::{self, ErrorKind, Read},
};

use encoding_rs::{Decoder, Encoding};

const CHUNK_SIZE: usize = 8 * 1024;

/// Character source for the tokenizer.
///
/// Decodes the underlying byte stream with the format charset and keeps the
/// decoded characters in a small queue, which gives the tokenizer one
/// character of lookahead without asking anything of the byte stream.
/// Malformed byte sequences decode to U+FFFD.
pub(crate) struct CharStream<R> {
    inner: R,
    decoder: Decoder,
    chunk: Box<[u8]>,
    pending: VecDeque<char>,
    eos: bool,
}

impl<R: Read> CharStream<R> {
    pub(crate) fn new(inner: R, charset: &'static Encoding) -> Self {
        Self {
            inner,
            decoder: charset.new_decoder_with_bom_removal(),
            chunk: vec![0; CHUNK_SIZE].into_boxed_slice(),
            pending: VecDeque::new(),
            eos: false,
        }
    }

    /// Consumes and returns the next character, `None` at end of stream.
    pub(crate) fn next_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.pending.pop_front())
    }

    /// Returns the next character without consuming it.
    pub(crate) fn peek_char(&mut self) -> io::Result<Option<char>> {
        self.fill()?;
        Ok(self.pending.front().copied())
    }

    pub(crate) fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        while self.pending.is_empty() && !self.eos {
            let read = match self.inner.read(&mut self.chunk) {
                Ok(read) => read,
                Err(error) if error.kind() == ErrorKind::Interrupted => continue,
                Err(error) => return Err(error),
            };
            let last = read == 0;

            let capacity = self
                .decoder
                .max_utf8_buffer_length(read)
                .ok_or_else(|| io::Error::new(ErrorKind::OutOfMemory, "decode buffer overflow"))?;
            let mut decoded = String::with_capacity(capacity);
            let (_, _, _) = self
                .decoder
                .decode_to_string(&self.chunk[..read], &mut decoded, last);

            self.pending.extend(decoded.chars());
            self.eos = last;
        }
        Ok(())
    }
}
