//! Structured file I/O for binary data serialization.
//!
//! Little-endian fixed-width integers, LEB128 varints and length-prefixed
//! UTF-8 strings. The writer keeps a running CRC32 over every byte it emits and
//! appends it as a 4-byte trailer on [`StructWriter::close`]; the reader keeps
//! the same running checksum so [`StructReader::verify_checksum`] can detect
//! truncated or corrupted files.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc32fast::Hasher;

use crate::error::{Result, SimwordError};
use crate::storage::{StorageInput, StorageOutput};
use crate::util::varint::{MAX_VARINT_LEN, decode_u64, encode_u64};

/// A structured file writer for binary data.
pub struct StructWriter<W: StorageOutput> {
    writer: W,
    hasher: Hasher,
    position: u64,
}

impl<W: StorageOutput> StructWriter<W> {
    /// Create a new structured file writer.
    pub fn new(writer: W) -> Self {
        StructWriter {
            writer,
            hasher: Hasher::new(),
            position: 0,
        }
    }

    /// Write a u32 value (little-endian).
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        self.write_raw(&value.to_le_bytes())
    }

    /// Write a variable-length integer.
    pub fn write_varint(&mut self, value: u64) -> Result<()> {
        let encoded = encode_u64(value);
        self.write_raw(&encoded)
    }

    /// Write a string with length prefix.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        self.write_varint(bytes.len() as u64)?;
        self.write_raw(bytes)
    }

    /// Write raw bytes without length prefix.
    pub fn write_raw(&mut self, value: &[u8]) -> Result<()> {
        self.writer.write_all(value)?;
        self.hasher.update(value);
        self.position += value.len() as u64;
        Ok(())
    }

    /// Write a sorted integer array using delta encoding.
    pub fn write_delta_compressed_u32s(&mut self, values: &[u32]) -> Result<()> {
        self.write_varint(values.len() as u64)?;

        let mut previous = 0u32;
        for &value in values {
            let delta = value.wrapping_sub(previous);
            self.write_varint(delta as u64)?;
            previous = value;
        }

        Ok(())
    }

    /// Get current file position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Checksum of everything written so far.
    pub fn checksum(&self) -> u32 {
        self.hasher.clone().finalize()
    }

    /// Append the checksum trailer, then flush and close the writer.
    pub fn close(mut self) -> Result<()> {
        let checksum = self.checksum();
        self.writer.write_u32::<LittleEndian>(checksum)?;
        self.writer.flush_and_sync()?;
        self.writer.close()?;
        Ok(())
    }
}

/// A structured file reader for binary data.
pub struct StructReader<R: StorageInput> {
    reader: R,
    hasher: Hasher,
    position: u64,
    file_size: u64,
}

impl<R: StorageInput> StructReader<R> {
    /// Create a new structured file reader.
    pub fn new(reader: R) -> Result<Self> {
        let file_size = reader.size()?;
        Ok(StructReader {
            reader,
            hasher: Hasher::new(),
            position: 0,
            file_size,
        })
    }

    /// Read a u8 value.
    pub fn read_u8(&mut self) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.read_into(&mut byte)?;
        Ok(byte[0])
    }

    /// Read a u32 value (little-endian).
    pub fn read_u32(&mut self) -> Result<u32> {
        let mut bytes = [0u8; 4];
        self.read_into(&mut bytes)?;
        Ok(u32::from_le_bytes(bytes))
    }

    /// Read a variable-length integer.
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut bytes = Vec::with_capacity(MAX_VARINT_LEN);
        loop {
            let byte = self.read_u8()?;
            bytes.push(byte);
            if byte & 0x80 == 0 || bytes.len() >= MAX_VARINT_LEN {
                break;
            }
        }

        let (value, _) = decode_u64(&bytes)?;
        Ok(value)
    }

    /// Read a varint that must fit the remaining payload as a length or count.
    pub fn read_len(&mut self) -> Result<usize> {
        let value = self.read_varint()?;
        if value > self.remaining() {
            return Err(SimwordError::index_read(format!(
                "Length {value} exceeds remaining {} bytes at offset {}",
                self.remaining(),
                self.position
            )));
        }
        Ok(value as usize)
    }

    /// Read a string with length prefix.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_len()?;
        let mut bytes = vec![0u8; length];
        self.read_into(&mut bytes)?;

        String::from_utf8(bytes).map_err(|e| SimwordError::index_read(format!("Invalid UTF-8: {e}")))
    }

    /// Read a delta-compressed integer array.
    pub fn read_delta_compressed_u32s(&mut self) -> Result<Vec<u32>> {
        let length = self.read_len()?;
        let mut values = Vec::with_capacity(length);
        let mut previous = 0u32;

        for _ in 0..length {
            let delta = self.read_varint()? as u32;
            let value = previous.wrapping_add(delta);
            values.push(value);
            previous = value;
        }

        Ok(values)
    }

    /// Get current file position.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Payload bytes left before the checksum trailer.
    pub fn remaining(&self) -> u64 {
        self.file_size.saturating_sub(4).saturating_sub(self.position)
    }

    /// Read the trailer and compare it to the checksum of everything read.
    ///
    /// Must be called after the whole payload has been consumed.
    pub fn verify_checksum(&mut self) -> Result<bool> {
        if self.position + 4 != self.file_size {
            return Err(SimwordError::index_read(format!(
                "Trailing data: payload ends at {} but file is {} bytes",
                self.position, self.file_size
            )));
        }

        let stored_checksum = self.reader.read_u32::<LittleEndian>()?;
        Ok(stored_checksum == self.hasher.clone().finalize())
    }

    /// Close the reader.
    pub fn close(mut self) -> Result<()> {
        self.reader.close()
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        if (buf.len() as u64) > self.remaining() {
            return Err(SimwordError::index_read(format!(
                "Unexpected end of data at offset {}",
                self.position
            )));
        }
        self.reader.read_exact(buf)?;
        self.hasher.update(buf);
        self.position += buf.len() as u64;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStorage, Storage};

    fn write_sample(storage: &MemoryStorage) {
        let output = storage.create_output("sample.bin").unwrap();
        let mut writer = StructWriter::new(output);
        writer.write_u32(0xCAFE).unwrap();
        writer.write_string("Straße").unwrap();
        writer.write_delta_compressed_u32s(&[3, 7, 7, 100]).unwrap();
        writer.write_varint(300).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_read_back_with_valid_checksum() {
        let storage = MemoryStorage::new();
        write_sample(&storage);

        let input = storage.open_input("sample.bin").unwrap();
        let mut reader = StructReader::new(input).unwrap();
        assert_eq!(reader.read_u32().unwrap(), 0xCAFE);
        assert_eq!(reader.read_string().unwrap(), "Straße");
        assert_eq!(
            reader.read_delta_compressed_u32s().unwrap(),
            vec![3, 7, 7, 100]
        );
        assert_eq!(reader.read_varint().unwrap(), 300);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.verify_checksum().unwrap());
    }

    #[test]
    fn test_corruption_is_detected() {
        let storage = MemoryStorage::new();
        write_sample(&storage);

        let mut bytes = storage.get_bytes("sample.bin").unwrap();
        bytes[5] ^= 0x01; // inside the string payload
        storage.put_bytes("sample.bin", &bytes).unwrap();

        let input = storage.open_input("sample.bin").unwrap();
        let mut reader = StructReader::new(input).unwrap();
        reader.read_u32().unwrap();
        let _ = reader.read_string();
        reader.read_delta_compressed_u32s().unwrap();
        reader.read_varint().unwrap();
        assert!(!reader.verify_checksum().unwrap());
    }

    #[test]
    fn test_truncation_is_an_index_read_error() {
        let storage = MemoryStorage::new();
        write_sample(&storage);

        let bytes = storage.get_bytes("sample.bin").unwrap();
        storage.put_bytes("sample.bin", &bytes[..8]).unwrap();

        let input = storage.open_input("sample.bin").unwrap();
        let mut reader = StructReader::new(input).unwrap();
        reader.read_u32().unwrap();
        let err = reader.read_string().unwrap_err();
        assert!(matches!(err, SimwordError::IndexRead(_)));
    }
}
