use crate::page_layout::{NONE_OFFSET, TAG_INTERNAL, TAG_LEAF};

/// Offset is a byte position into the index file. `None` is encoded on
/// disk as `-1` (see `page_layout::NONE_OFFSET`).
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Offset(pub i32);

impl Offset {
    /// Converts a raw on-disk i32 to an `Option<Offset>`, treating -1
    /// as "none".
    pub fn from_raw(raw: i32) -> Option<Offset> {
        if raw == NONE_OFFSET {
            None
        } else {
            Some(Offset(raw))
        }
    }

    /// Converts an `Option<Offset>` back to its on-disk raw i32.
    pub fn to_raw(offset: Option<Offset>) -> i32 {
        match offset {
            Some(Offset(raw)) => raw,
            None => NONE_OFFSET,
        }
    }
}

/// NodeType represents the two kinds of node pages in the tree.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum NodeType {
    /// Internal nodes hold `m` ordered keys and `m+1` ordered child
    /// offsets, plus a right-sibling offset that is written for
    /// byte-compatibility but never consulted by any tree algorithm.
    Internal {
        keys: Vec<i32>,
        children: Vec<Offset>,
        right: Option<Offset>,
    },

    /// Leaf nodes hold `m` ordered keys, `m` parallel values, and the
    /// offset of the next leaf in key order.
    Leaf {
        keys: Vec<i32>,
        values: Vec<i32>,
        right: Option<Offset>,
    },
}

impl NodeType {
    pub fn keys(&self) -> &[i32] {
        match self {
            NodeType::Internal { keys, .. } => keys,
            NodeType::Leaf { keys, .. } => keys,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeType::Leaf { .. })
    }
}

// Converts the on-disk tag byte to an (empty) NodeType shell; callers
// fill in keys/values/children while decoding the rest of the page.
impl NodeType {
    pub fn empty_from_tag(tag: u8) -> NodeType {
        if tag == TAG_LEAF {
            NodeType::Leaf {
                keys: Vec::new(),
                values: Vec::new(),
                right: None,
            }
        } else {
            debug_assert_eq!(tag, TAG_INTERNAL);
            NodeType::Internal {
                keys: Vec::new(),
                children: Vec::new(),
                right: None,
            }
        }
    }
}

// Converts a NodeType to its on-disk tag byte.
impl From<&NodeType> for u8 {
    fn from(orig: &NodeType) -> u8 {
        match orig {
            NodeType::Internal { .. } => TAG_INTERNAL,
            NodeType::Leaf { .. } => TAG_LEAF,
        }
    }
}
