use encoding_rs::{Encoding, UTF_8};

use crate::error::CsvError;

/// Common value delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
    Space,
}

impl From<Delimiter> for char {
    fn from(delimiter: Delimiter) -> Self {
        match delimiter {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
            Delimiter::Space => ' ',
        }
    }
}

/// Common quote pairs used to enclose complex values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    DoubleQuote,
    SingleQuote,
    SquareBrackets,
    CurlyBrackets,
}

impl Quote {
    pub fn open(self) -> char {
        match self {
            Quote::DoubleQuote => '"',
            Quote::SingleQuote => '\'',
            Quote::SquareBrackets => '[',
            Quote::CurlyBrackets => '{',
        }
    }

    pub fn close(self) -> char {
        match self {
            Quote::DoubleQuote => '"',
            Quote::SingleQuote => '\'',
            Quote::SquareBrackets => ']',
            Quote::CurlyBrackets => '}',
        }
    }
}

/// Common escape characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escape {
    DoubleQuote,
    Backslash,
}

impl From<Escape> for char {
    fn from(escape: Escape) -> Self {
        match escape {
            Escape::DoubleQuote => '"',
            Escape::Backslash => '\\',
        }
    }
}

/// Common comment markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comment {
    Hash,
    Slash,
    Semicolon,
}

impl From<Comment> for char {
    fn from(comment: Comment) -> Self {
        match comment {
            Comment::Hash => '#',
            Comment::Slash => '/',
            Comment::Semicolon => ';',
        }
    }
}

/// Resolves a charset label to an encoding.
///
/// Accepts WHATWG labels (`utf-8`, `ISO-8859-2`, `windows-1250`, ...) plus the
/// `CpNNNN` spelling, which maps to `windows-NNNN`.
pub fn resolve_charset(label: &str) -> Result<&'static Encoding, CsvError> {
    let label = label.trim();
    if let Some(encoding) = Encoding::for_label(label.as_bytes()) {
        return Ok(encoding);
    }

    let code_page = label
        .get(..2)
        .filter(|prefix| prefix.eq_ignore_ascii_case("cp"))
        .map(|_| &label[2..])
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()));
    if let Some(digits) = code_page {
        if let Some(encoding) = Encoding::for_label(format!("windows-{digits}").as_bytes()) {
            return Ok(encoding);
        }
    }

    Err(CsvError::Configuration(format!(
        "unsupported charset |{label}|"
    )))
}

/// Parameters shared by the CSV reader and writer.
///
/// A format is set up once, usually with [`CsvFormat::builder`], and then
/// read through its accessors. Disabled characters (comment, quotes, escape)
/// are `None`.
///
/// Escaping is active only when open quote, close quote and escape are all
/// set; see [`CsvFormat::is_escaping`].
///
/// # Examples
///
/// ```
/// use csv_binder::item::csv::csv_format::{CsvFormat, Delimiter, Escape, Quote};
///
/// let format = CsvFormat::builder()
///     .delimiter(Delimiter::Tab)
///     .quote_style(Quote::SquareBrackets)
///     .escape(Escape::Backslash)
///     .comment('\0')
///     .header(true)
///     .charset("ISO-8859-2")
///     .build()
///     .unwrap();
///
/// assert_eq!(format.delimiter(), '\t');
/// assert_eq!(format.open_quote(), Some('['));
/// assert_eq!(format.close_quote(), Some(']'));
/// assert_eq!(format.comment(), None);
/// assert_eq!(format.charset().name(), "ISO-8859-2");
/// ```
#[derive(Debug, Clone)]
pub struct CsvFormat {
    delimiter: char,
    comment: Option<char>,
    open_quote: Option<char>,
    close_quote: Option<char>,
    escape: Option<char>,
    header: bool,
    empty_lines: bool,
    trim: bool,
    charset: &'static Encoding,
    null_value: String,
    strict: bool,
}

impl Default for CsvFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            comment: Some('#'),
            open_quote: Some('"'),
            close_quote: Some('"'),
            escape: Some('"'),
            header: false,
            empty_lines: false,
            trim: true,
            charset: UTF_8,
            null_value: "NULL".to_string(),
            strict: false,
        }
    }
}

impl CsvFormat {
    pub fn builder() -> CsvFormatBuilder {
        CsvFormatBuilder::new()
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn comment(&self) -> Option<char> {
        self.comment
    }

    pub fn open_quote(&self) -> Option<char> {
        self.open_quote
    }

    pub fn close_quote(&self) -> Option<char> {
        self.close_quote
    }

    pub fn escape(&self) -> Option<char> {
        self.escape
    }

    /// First row holds column names.
    pub fn header(&self) -> bool {
        self.header
    }

    /// Blank rows are returned as empty records instead of being skipped.
    pub fn empty_lines(&self) -> bool {
        self.empty_lines
    }

    /// Leading and trailing white space is stripped from tokenized values.
    pub fn trim(&self) -> bool {
        self.trim
    }

    pub fn charset(&self) -> &'static Encoding {
        self.charset
    }

    /// Token marking an absent value, matched case-insensitively on read.
    pub fn null_value(&self) -> &str {
        &self.null_value
    }

    /// Binding violations fail the read instead of being logged and skipped.
    pub fn strict(&self) -> bool {
        self.strict
    }

    pub fn is_escaping(&self) -> bool {
        self.open_quote.is_some() && self.close_quote.is_some() && self.escape.is_some()
    }

    pub fn set_strict(&mut self, strict: bool) {
        self.strict = strict;
    }

    pub fn set_header(&mut self, header: bool) {
        self.header = header;
    }

    pub fn set_charset(&mut self, label: &str) -> Result<(), CsvError> {
        self.charset = resolve_charset(label)?;
        Ok(())
    }
}

fn enabled(c: char) -> Option<char> {
    (c != '\0').then_some(c)
}

/// A builder for [`CsvFormat`].
///
/// Starts from the defaults: delimiter `,`, comment `#`, quotes `"`/`"`,
/// escape `"`, no header, blank lines skipped, values trimmed, UTF-8,
/// null token `NULL`, relaxed mode.
///
/// Passing `'\0'` as comment, quote or escape character disables it.
#[derive(Debug, Clone)]
pub struct CsvFormatBuilder {
    format: CsvFormat,
    charset: Option<String>,
}

impl Default for CsvFormatBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvFormatBuilder {
    pub fn new() -> Self {
        Self {
            format: CsvFormat::default(),
            charset: None,
        }
    }

    pub fn delimiter(mut self, delimiter: impl Into<char>) -> Self {
        self.format.delimiter = delimiter.into();
        self
    }

    pub fn comment(mut self, comment: impl Into<char>) -> Self {
        self.format.comment = enabled(comment.into());
        self
    }

    /// Uses the same character to open and close complex values.
    pub fn quote(self, quote: char) -> Self {
        self.quote_pair(quote, quote)
    }

    pub fn quote_pair(mut self, open: char, close: char) -> Self {
        self.format.open_quote = enabled(open);
        self.format.close_quote = enabled(close);
        self
    }

    pub fn quote_style(self, quote: Quote) -> Self {
        self.quote_pair(quote.open(), quote.close())
    }

    pub fn escape(mut self, escape: impl Into<char>) -> Self {
        self.format.escape = enabled(escape.into());
        self
    }

    pub fn header(mut self, yes: bool) -> Self {
        self.format.header = yes;
        self
    }

    pub fn empty_lines(mut self, yes: bool) -> Self {
        self.format.empty_lines = yes;
        self
    }

    pub fn trim(mut self, yes: bool) -> Self {
        self.format.trim = yes;
        self
    }

    /// Charset label, resolved by [`build`](Self::build).
    pub fn charset(mut self, label: impl Into<String>) -> Self {
        self.charset = Some(label.into());
        self
    }

    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.format.null_value = null_value.into();
        self
    }

    pub fn strict(mut self, yes: bool) -> Self {
        self.format.strict = yes;
        self
    }

    /// Builds the format.
    ///
    /// # Errors
    ///
    /// Returns [`CsvError::Configuration`] when the charset label is unknown.
    pub fn build(self) -> Result<CsvFormat, CsvError> {
        let mut format = self.format;
        if let Some(label) = self.charset {
            format.set_charset(&label)?;
        }
        Ok(format)
    }
}
