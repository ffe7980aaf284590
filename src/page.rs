use byteorder::{ByteOrder, LittleEndian};

use crate::error::Error;
use crate::page_layout::{INT_SIZE, PAGE_SIZE};

/// A single fixed-size page of raw bytes, as read from or about to be
/// written to the index file. `Page` only knows about bytes; the
/// leaf/internal node layout is interpreted by the codec in `node.rs`.
pub struct Page {
    data: Box<[u8; PAGE_SIZE]>,
}

impl Page {
    pub fn new(data: [u8; PAGE_SIZE]) -> Page {
        Page {
            data: Box::new(data),
        }
    }

    pub fn zeroed() -> Page {
        Page::new([0x00; PAGE_SIZE])
    }

    /// Writes `value` as a little-endian i32 at `offset`, overwriting
    /// whatever was there.
    pub fn write_i32_at_offset(&mut self, offset: usize, value: i32) -> Result<(), Error> {
        if offset + INT_SIZE > PAGE_SIZE {
            return Err(Error::UnexpectedError);
        }
        LittleEndian::write_i32(&mut self.data[offset..offset + INT_SIZE], value);
        Ok(())
    }

    /// Reads a little-endian i32 at `offset`.
    pub fn read_i32_at_offset(&self, offset: usize) -> Result<i32, Error> {
        if offset + INT_SIZE > PAGE_SIZE {
            return Err(Error::UnexpectedError);
        }
        Ok(LittleEndian::read_i32(&self.data[offset..offset + INT_SIZE]))
    }

    pub fn write_u8_at_offset(&mut self, offset: usize, value: u8) -> Result<(), Error> {
        if offset >= PAGE_SIZE {
            return Err(Error::UnexpectedError);
        }
        self.data[offset] = value;
        Ok(())
    }

    pub fn read_u8_at_offset(&self, offset: usize) -> Result<u8, Error> {
        if offset >= PAGE_SIZE {
            return Err(Error::UnexpectedError);
        }
        Ok(self.data[offset])
    }

    /// Returns the underlying, already zero-padded array.
    pub fn get_data(&self) -> [u8; PAGE_SIZE] {
        *self.data
    }
}
