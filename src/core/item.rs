use crate::error::CsvError;

/// Result of [`ItemReader::read`]: `Ok(None)` once the source is drained.
pub type ItemReaderResult<T> = Result<Option<T>, CsvError>;

pub type ItemWriterResult = Result<(), CsvError>;

/// A source of items, read one at a time.
pub trait ItemReader<T> {
    fn read(&mut self) -> ItemReaderResult<T>;
}

/// A destination of items.
pub trait ItemWriter<T> {
    fn write(&mut self, item: &T) -> ItemWriterResult;

    fn flush(&mut self) -> ItemWriterResult;

    fn write_items(&mut self, items: &[T]) -> ItemWriterResult {
        items.iter().try_for_each(|item| self.write(item))
    }

    /// Flushes pending output and releases the destination.
    fn close(&mut self) -> ItemWriterResult {
        self.flush()
    }
}
