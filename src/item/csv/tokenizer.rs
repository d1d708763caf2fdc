use std::{
    io::{self, Read},
    mem,
};

use crate::item::csv::{char_stream::CharStream, csv_format::CsvFormat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    RecordStart,
    ValueStart,
    ValueReading,
    ComplexValueReading,
    Comment,
}

/// Splits a character stream into rows of string values.
///
/// Recognized line terminators are LF, CR and CRLF. A value enclosed in the
/// format quotes (a complex value) may hold delimiters and line terminators.
/// A close quote ends a complex value only when followed by the delimiter,
/// white space or end of stream; any other close quote is content. Inside a
/// complex value the escape character is an escape marker only when it comes
/// right before a close quote or another escape character.
pub(crate) struct Tokenizer<R> {
    stream: CharStream<R>,
    delimiter: char,
    comment: Option<char>,
    open_quote: Option<char>,
    close_quote: Option<char>,
    escape: Option<char>,
    trim: bool,
}

impl<R: Read> Tokenizer<R> {
    pub(crate) fn new(inner: R, format: &CsvFormat) -> Self {
        Self {
            stream: CharStream::new(inner, format.charset()),
            delimiter: format.delimiter(),
            comment: format.comment(),
            open_quote: format.open_quote(),
            close_quote: format.close_quote(),
            escape: format.escape(),
            trim: format.trim(),
        }
    }

    pub(crate) fn into_inner(self) -> R {
        self.stream.into_inner()
    }

    /// Reads the next row.
    ///
    /// Returns `Ok(None)` at end of stream, `Ok(Some(vec![]))` for a blank line.
    /// Comment lines are skipped.
    pub(crate) fn next_row(&mut self) -> io::Result<Option<Vec<String>>> {
        let mut values = Vec::new();
        let mut value = String::new();
        let mut state = State::RecordStart;
        let mut escape_detected = false;
        let mut close_quote_detected = false;

        loop {
            let Some(c) = self.stream.next_char()? else {
                // end of stream on a blank line ends the stream; otherwise it ends the row
                if values.is_empty() && value.is_empty() {
                    return Ok(None);
                }
                self.push_value(&mut values, &mut value);
                return Ok(Some(values));
            };

            loop {
                match state {
                    State::RecordStart => {
                        if self.comment == Some(c) {
                            state = State::Comment;
                            break;
                        }
                        if self.is_eol(c)? {
                            return Ok(Some(values));
                        }
                        state = State::ValueStart;
                    }

                    State::ValueStart => {
                        if self.is_eol(c)? {
                            self.push_value(&mut values, &mut value);
                            return Ok(Some(values));
                        }
                        if c.is_whitespace() && c != self.delimiter {
                            // kept until we know whether a complex value follows
                            value.push(c);
                            break;
                        }
                        if self.open_quote == Some(c) {
                            escape_detected = false;
                            close_quote_detected = false;
                            state = State::ComplexValueReading;
                            break;
                        }
                        state = State::ValueReading;
                    }

                    State::ValueReading => {
                        if self.is_eol(c)? {
                            self.push_value(&mut values, &mut value);
                            return Ok(Some(values));
                        }
                        if c == self.delimiter {
                            self.push_value(&mut values, &mut value);
                            state = State::ValueStart;
                        } else {
                            value.push(c);
                        }
                        break;
                    }

                    State::ComplexValueReading => {
                        if escape_detected {
                            escape_detected = false;
                            value.push(c);
                            break;
                        }
                        if self.is_close_quote(c)? {
                            close_quote_detected = true;
                            break;
                        }
                        if self.is_escape(c)? {
                            escape_detected = true;
                            break;
                        }
                        if close_quote_detected {
                            if self.is_eol(c)? {
                                self.push_value(&mut values, &mut value);
                                return Ok(Some(values));
                            }
                            if c == self.delimiter {
                                self.push_value(&mut values, &mut value);
                                state = State::ValueStart;
                                break;
                            }
                        }
                        value.push(c);
                        break;
                    }

                    State::Comment => {
                        if self.is_eol(c)? {
                            state = State::RecordStart;
                        }
                        break;
                    }
                }
            }
        }
    }

    fn push_value(&self, values: &mut Vec<String>, value: &mut String) {
        let value = mem::take(value);
        if self.trim {
            values.push(value.trim().to_string());
        } else {
            values.push(value);
        }
    }

    /// CR, LF and CRLF all end a line; the LF of a CRLF pair is consumed here.
    fn is_eol(&mut self, c: char) -> io::Result<bool> {
        match c {
            '\n' => Ok(true),
            '\r' => {
                if self.stream.peek_char()? == Some('\n') {
                    self.stream.next_char()?;
                }
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn is_close_quote(&mut self, c: char) -> io::Result<bool> {
        if self.close_quote != Some(c) {
            return Ok(false);
        }
        Ok(match self.stream.peek_char()? {
            None => true,
            Some(next) => next == self.delimiter || next.is_whitespace(),
        })
    }

    fn is_escape(&mut self, c: char) -> io::Result<bool> {
        if self.escape != Some(c) {
            return Ok(false);
        }
        Ok(self
            .stream
            .peek_char()?
            .is_some_and(|next| Some(next) == self.close_quote || Some(next) == self.escape))
    }
}
