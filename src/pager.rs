use std::convert::TryFrom;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Error;
use crate::node::Node;
use crate::page::Page;
use crate::page_layout::{
    FIRST_NODE_OFFSET, HEADER_B_OFFSET, HEADER_ROOT_OFFSET_OFFSET, HEADER_SIZE, PAGE_SIZE,
};

/// Pager is the primitive page I/O layer: read a page at an offset,
/// overwrite a page at an offset, append a new page, and read/update
/// the header's `B` and `root_offset` fields. It holds no in-memory
/// page cache; every call is a direct seek + read/write against the
/// open file handle.
pub struct Pager {
    file: File,
}

impl Pager {
    /// Creates a brand-new tree file, overwriting any existing file at
    /// `path`: writes the header (`b`, root offset pointing at the
    /// first node page) and an empty leaf as the initial root.
    pub fn create_new(path: &Path, b: i32) -> Result<Pager, Error> {
        let fd = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut pager = Pager { file: fd };
        pager.write_header(b, FIRST_NODE_OFFSET)?;
        pager.write_page_at_offset(&Node::new_leaf(), FIRST_NODE_OFFSET)?;
        Ok(pager)
    }

    /// Opens an existing tree file without truncating it.
    pub fn open(path: &Path) -> Result<Pager, Error> {
        let fd = OpenOptions::new().read(true).write(true).open(path)?;
        Ok(Pager { file: fd })
    }

    fn write_header(&mut self, b: i32, root_offset: i32) -> Result<(), Error> {
        let mut header = Page::zeroed();
        header.write_i32_at_offset(HEADER_B_OFFSET, b)?;
        header.write_i32_at_offset(HEADER_ROOT_OFFSET_OFFSET, root_offset)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(&header.get_data())?;
        Ok(())
    }

    /// Reads the header's `B` and current root offset.
    pub fn read_header(&mut self) -> Result<(i32, i32), Error> {
        let mut buf = [0u8; HEADER_SIZE];
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_exact(&mut buf)?;
        let mut page_buf = [0u8; PAGE_SIZE];
        page_buf[..HEADER_SIZE].copy_from_slice(&buf);
        let header = Page::new(page_buf);
        let b = header.read_i32_at_offset(HEADER_B_OFFSET)?;
        let root_offset = header.read_i32_at_offset(HEADER_ROOT_OFFSET_OFFSET)?;
        Ok((b, root_offset))
    }

    /// Rewrites the header's root-offset field in place.
    pub fn set_root_offset(&mut self, root_offset: i32) -> Result<(), Error> {
        let (b, _) = self.read_header()?;
        self.write_header(b, root_offset)
    }

    /// Reads and decodes the node page at `offset`.
    pub fn read_page(&mut self, offset: i32) -> Result<Node, Error> {
        let mut buf: [u8; PAGE_SIZE] = [0x00; PAGE_SIZE];
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.read_exact(&mut buf)?;
        Node::try_from(Page::new(buf))
    }

    /// Encodes `node` and overwrites the page at `offset` in place.
    pub fn write_page_at_offset(&mut self, node: &Node, offset: i32) -> Result<(), Error> {
        let page = Page::try_from(node)?;
        self.file.seek(SeekFrom::Start(offset as u64))?;
        self.file.write_all(&page.get_data())?;
        Ok(())
    }

    /// Appends `node`, encoded and zero-padded, at end-of-file. Returns
    /// the offset the page was written at (the file length before the
    /// append). The pager keeps no cursor of its own: the file is
    /// reopened fresh for every operation (see the concurrency model),
    /// so the true end-of-file position is re-queried every time.
    pub fn allocate_page(&mut self, node: &Node) -> Result<i32, Error> {
        let page = Page::try_from(node)?;
        let offset = self.file.seek(SeekFrom::End(0))?;
        self.file.write_all(&page.get_data())?;
        Ok(offset as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_new_writes_header_and_empty_root() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.dat");

        let mut pager = Pager::create_new(&path, 4)?;
        let (b, root_offset) = pager.read_header()?;
        assert_eq!(b, 4);
        assert_eq!(root_offset, FIRST_NODE_OFFSET);

        let root = pager.read_page(root_offset)?;
        assert!(root.is_leaf());
        assert!(root.keys().is_empty());
        Ok(())
    }

    #[test]
    fn open_does_not_truncate_existing_file() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.dat");

        let mut pager = Pager::create_new(&path, 4)?;
        let node = Node::new_leaf();
        let offset = pager.allocate_page(&node)?;
        drop(pager);

        let mut reopened = Pager::open(&path)?;
        let decoded = reopened.read_page(offset)?;
        assert_eq!(decoded, node);
        Ok(())
    }

    #[test]
    fn allocate_page_appends_sequentially() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.dat");
        let mut pager = Pager::create_new(&path, 4)?;

        let first = pager.allocate_page(&Node::new_leaf())?;
        let second = pager.allocate_page(&Node::new_leaf())?;
        assert_eq!(second, first + PAGE_SIZE as i32);
        Ok(())
    }

    #[test]
    fn set_root_offset_persists() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("index.dat");
        let mut pager = Pager::create_new(&path, 4)?;

        let new_root = pager.allocate_page(&Node::new_leaf())?;
        pager.set_root_offset(new_root)?;
        let (b, root_offset) = pager.read_header()?;
        assert_eq!(b, 4);
        assert_eq!(root_offset, new_root);
        Ok(())
    }
}
