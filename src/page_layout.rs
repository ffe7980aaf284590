//! Byte-offset and size constants for the on-disk page format.
//!
//! Every integer on disk (tag excepted) is a 4-byte little-endian
//! signed integer. `-1` is the sentinel for "no offset" / "no sibling".

use std::mem::size_of;

/// Fixed size of every page in the file, header page included.
pub const PAGE_SIZE: usize = 4096;

/// Size in bytes of a single on-disk integer (key, value or offset).
pub const INT_SIZE: usize = size_of::<i32>();

/// Sentinel value meaning "no offset" / "no right sibling".
pub const NONE_OFFSET: i32 = -1;

// --- Header page layout ---------------------------------------------------
//
// [ B (4) | root_offset (4) | padding ... ]

pub const HEADER_B_OFFSET: usize = 0;
pub const HEADER_ROOT_OFFSET_OFFSET: usize = HEADER_B_OFFSET + INT_SIZE;
pub const HEADER_SIZE: usize = HEADER_ROOT_OFFSET_OFFSET + INT_SIZE;

/// Byte offset of the first node page (the header occupies page 0).
pub const FIRST_NODE_OFFSET: i32 = PAGE_SIZE as i32;

// --- Node page layout -------------------------------------------------------
//
// [ tag (1) | m (4) | keys (4*m) | <leaf: values (4*m) | right (4)>
//                                 <internal: children (4*(m+1)) | right (4)> ]

pub const TAG_OFFSET: usize = 0;
pub const TAG_LEAF: u8 = 1;
pub const TAG_INTERNAL: u8 = 0;

pub const NUM_KEYS_OFFSET: usize = TAG_OFFSET + 1;
pub const KEYS_OFFSET: usize = NUM_KEYS_OFFSET + INT_SIZE;

pub const KEY_SIZE: usize = INT_SIZE;
pub const VALUE_SIZE: usize = INT_SIZE;
pub const PTR_SIZE: usize = INT_SIZE;
