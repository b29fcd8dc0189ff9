use std::io::{BufReader, Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::config::global_config;

use super::Endianness;

/// A seekable source of bytes.
pub trait DataInput {
    /// Return a file identifier, for diagnostics.
    fn filename(&self) -> &str;

    /// Return the byte order of the stored elements.
    fn byte_order(&self) -> Endianness;

    /// Move to the absolute byte `position`.
    ///
    /// Seeking beyond the end is allowed, the next read fails.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if the underlying source fails to seek.
    fn seek(&mut self, position: u64) -> std::io::Result<()>;

    /// Fill `buffer` with the bytes at the current position and advance the position by the buffer length.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if the underlying source fails or ends before `buffer` is filled.
    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()>;
}

impl<T: DataInput + ?Sized> DataInput for &mut T {
    fn filename(&self) -> &str {
        (**self).filename()
    }

    fn byte_order(&self) -> Endianness {
        (**self).byte_order()
    }

    fn seek(&mut self, position: u64) -> std::io::Result<()> {
        (**self).seek(position)
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        (**self).read_fully(buffer)
    }
}

impl<T: DataInput + ?Sized> DataInput for Box<T> {
    fn filename(&self) -> &str {
        (**self).filename()
    }

    fn byte_order(&self) -> Endianness {
        (**self).byte_order()
    }

    fn seek(&mut self, position: u64) -> std::io::Result<()> {
        (**self).seek(position)
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        (**self).read_fully(buffer)
    }
}

/// A buffered [`DataInput`] over a [`Read`] + [`Seek`] source.
///
/// Seeks within the transfer buffer do not touch the underlying source.
#[derive(Debug)]
pub struct ChannelDataInput<R> {
    filename: String,
    reader: BufReader<R>,
    position: Option<u64>,
    byte_order: Endianness,
}

impl<R: Read + Seek> ChannelDataInput<R> {
    /// Create a new buffered input over `reader` positioned at its start.
    ///
    /// The transfer buffer capacity is the [transfer buffer size](crate::config::Config#transfer-buffer-size) configuration.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if `reader` fails to rewind.
    pub fn new(
        filename: impl Into<String>,
        reader: R,
        byte_order: Endianness,
    ) -> std::io::Result<Self> {
        let capacity = global_config().transfer_buffer_size();
        Self::with_capacity(filename, capacity, reader, byte_order)
    }

    /// Create a new buffered input over `reader` with a transfer buffer of `capacity` bytes.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if `reader` fails to rewind.
    pub fn with_capacity(
        filename: impl Into<String>,
        capacity: usize,
        mut reader: R,
        byte_order: Endianness,
    ) -> std::io::Result<Self> {
        reader.rewind()?;
        Ok(Self {
            filename: filename.into(),
            reader: BufReader::with_capacity(capacity, reader),
            position: Some(0),
            byte_order,
        })
    }

    /// Return the capacity of the transfer buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.reader.capacity()
    }

    /// Unwrap this input, returning the underlying source.
    pub fn into_inner(self) -> R {
        self.reader.into_inner()
    }
}

impl ChannelDataInput<std::fs::File> {
    /// Open the file at `path` for reading.
    ///
    /// # Errors
    /// Returns a [`std::io::Error`] if the file cannot be opened.
    pub fn open(path: impl AsRef<std::path::Path>, byte_order: Endianness) -> std::io::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::new(path.display().to_string(), file, byte_order)
    }
}

impl<R: Read + Seek> DataInput for ChannelDataInput<R> {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    fn seek(&mut self, position: u64) -> std::io::Result<()> {
        let offset = self
            .position
            .and_then(|current| i64::try_from(current).ok())
            .zip(i64::try_from(position).ok())
            .and_then(|(from, to)| to.checked_sub(from));
        // The position is unknown after a failure, the next seek is absolute.
        self.position = None;
        match offset {
            Some(0) => {}
            Some(offset) => self.reader.seek_relative(offset)?,
            None => {
                self.reader.seek(SeekFrom::Start(position))?;
            }
        }
        self.position = Some(position);
        Ok(())
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        let current = self.position.take();
        self.reader.read_exact(buffer)?;
        self.position = current.map(|position| position + buffer.len() as u64);
        Ok(())
    }
}

/// A [`DataInput`] over bytes held in memory.
#[derive(Clone, Debug)]
pub struct MemoryDataInput {
    filename: String,
    bytes: Bytes,
    position: u64,
    byte_order: Endianness,
}

impl MemoryDataInput {
    /// Create a new input over `bytes`.
    #[must_use]
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>, byte_order: Endianness) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
            position: 0,
            byte_order,
        }
    }

    /// Return the bytes.
    #[must_use]
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }
}

impl DataInput for MemoryDataInput {
    fn filename(&self) -> &str {
        &self.filename
    }

    fn byte_order(&self) -> Endianness {
        self.byte_order
    }

    fn seek(&mut self, position: u64) -> std::io::Result<()> {
        self.position = position;
        Ok(())
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        let start = usize::try_from(self.position).ok();
        let source = start
            .and_then(|start| Some(start..start.checked_add(buffer.len())?))
            .and_then(|range| self.bytes.get(range))
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!(
                        "{}: cannot read {} bytes at offset {} of {}",
                        self.filename,
                        buffer.len(),
                        self.position,
                        self.bytes.len()
                    ),
                )
            })?;
        buffer.copy_from_slice(source);
        self.position += buffer.len() as u64;
        Ok(())
    }
}

/// A [`DataInput`] which records performance metrics: seeks, reads and bytes read.
///
/// It is intended to aid in testing by allowing the application to validate that the metrics match expected values for specific read operations.
#[derive(Debug)]
pub struct PerformanceMetricsDataInput<T> {
    input: T,
    seeks: usize,
    reads: usize,
    bytes_read: usize,
}

impl<T: DataInput> PerformanceMetricsDataInput<T> {
    /// Create a new performance metrics input wrapping `input`.
    #[must_use]
    pub fn new(input: T) -> Self {
        Self {
            input,
            seeks: 0,
            reads: 0,
            bytes_read: 0,
        }
    }

    /// Returns the number of seeks.
    #[must_use]
    pub fn seeks(&self) -> usize {
        self.seeks
    }

    /// Returns the number of read requests.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Returns the number of bytes read.
    #[must_use]
    pub fn bytes_read(&self) -> usize {
        self.bytes_read
    }

    /// Reset all metrics to zero.
    pub fn reset(&mut self) {
        self.seeks = 0;
        self.reads = 0;
        self.bytes_read = 0;
    }

    /// Unwrap this input, returning the wrapped input.
    pub fn into_inner(self) -> T {
        self.input
    }
}

impl<T: DataInput> DataInput for PerformanceMetricsDataInput<T> {
    fn filename(&self) -> &str {
        self.input.filename()
    }

    fn byte_order(&self) -> Endianness {
        self.input.byte_order()
    }

    fn seek(&mut self, position: u64) -> std::io::Result<()> {
        self.input.seek(position)?;
        self.seeks += 1;
        Ok(())
    }

    fn read_fully(&mut self, buffer: &mut [u8]) -> std::io::Result<()> {
        self.input.read_fully(buffer)?;
        self.reads += 1;
        self.bytes_read += buffer.len();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn memory_data_input() {
        let mut input = MemoryDataInput::new("memory", vec![0u8, 1, 2, 3, 4, 5], Endianness::Big);
        let mut buffer = [0u8; 3];
        input.seek(2).unwrap();
        input.read_fully(&mut buffer).unwrap();
        assert_eq!(buffer, [2, 3, 4]);
        input.read_fully(&mut buffer[..1]).unwrap();
        assert_eq!(buffer[0], 5);
        let error = input.read_fully(&mut buffer).unwrap_err();
        assert_eq!(error.kind(), std::io::ErrorKind::UnexpectedEof);
        input.seek(100).unwrap();
        assert!(input.read_fully(&mut buffer).is_err());
    }

    #[test]
    fn channel_data_input_seeks() {
        let data: Vec<u8> = (0..64).collect();
        let mut input =
            ChannelDataInput::with_capacity("cursor", 8, Cursor::new(data), Endianness::Little)
                .unwrap();
        assert_eq!(input.capacity(), 8);
        let mut buffer = [0u8; 4];
        input.seek(40).unwrap();
        input.read_fully(&mut buffer).unwrap();
        assert_eq!(buffer, [40, 41, 42, 43]);
        input.seek(2).unwrap();
        input.read_fully(&mut buffer).unwrap();
        assert_eq!(buffer, [2, 3, 4, 5]);
        input.seek(5).unwrap();
        input.read_fully(&mut buffer).unwrap();
        assert_eq!(buffer, [5, 6, 7, 8]);
        input.seek(62).unwrap();
        assert!(input.read_fully(&mut buffer).is_err());
    }

    #[test]
    fn performance_metrics_data_input() {
        let inner = MemoryDataInput::new("memory", vec![0u8; 16], Endianness::Big);
        let mut input = PerformanceMetricsDataInput::new(inner);
        let mut buffer = [0u8; 4];
        input.seek(0).unwrap();
        input.read_fully(&mut buffer).unwrap();
        input.read_fully(&mut buffer).unwrap();
        assert_eq!(input.seeks(), 1);
        assert_eq!(input.reads(), 2);
        assert_eq!(input.bytes_read(), 8);
        input.reset();
        assert_eq!(input.reads(), 0);
    }
}
