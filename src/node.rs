use std::convert::TryFrom;

use crate::error::Error;
use crate::node_type::{NodeType, Offset};
use crate::page::Page;
use crate::page_layout::{KEYS_OFFSET, KEY_SIZE, NUM_KEYS_OFFSET, PTR_SIZE, TAG_OFFSET, VALUE_SIZE};

/// Node represents a single node page in the tree, decoded into the
/// two arrays (or three, for internal nodes) the algorithms in
/// `btree.rs` operate on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub node_type: NodeType,
}

impl Node {
    pub fn new(node_type: NodeType) -> Node {
        Node { node_type }
    }

    pub fn new_leaf() -> Node {
        Node::new(NodeType::Leaf {
            keys: Vec::new(),
            values: Vec::new(),
            right: None,
        })
    }

    pub fn is_leaf(&self) -> bool {
        self.node_type.is_leaf()
    }

    pub fn keys(&self) -> &[i32] {
        self.node_type.keys()
    }
}

/// Deserializes a raw `Page` into a `Node`. The codec never validates
/// the minimum/maximum key count invariant: during a split or merge the
/// in-memory node transiently violates it.
impl TryFrom<Page> for Node {
    type Error = Error;

    fn try_from(page: Page) -> Result<Node, Error> {
        let tag = page.read_u8_at_offset(TAG_OFFSET)?;
        let num_keys = page.read_i32_at_offset(NUM_KEYS_OFFSET)?;
        if num_keys < 0 {
            return Err(Error::UnexpectedError);
        }
        let m = num_keys as usize;

        let mut keys = Vec::with_capacity(m);
        let mut offset = KEYS_OFFSET;
        for _ in 0..m {
            keys.push(page.read_i32_at_offset(offset)?);
            offset += KEY_SIZE;
        }

        match NodeType::empty_from_tag(tag) {
            NodeType::Leaf { .. } => {
                let mut values = Vec::with_capacity(m);
                for _ in 0..m {
                    values.push(page.read_i32_at_offset(offset)?);
                    offset += VALUE_SIZE;
                }
                let right = Offset::from_raw(page.read_i32_at_offset(offset)?);
                Ok(Node::new(NodeType::Leaf { keys, values, right }))
            }
            NodeType::Internal { .. } => {
                let mut children = Vec::with_capacity(m + 1);
                for _ in 0..=m {
                    let raw = page.read_i32_at_offset(offset)?;
                    children.push(Offset(raw));
                    offset += PTR_SIZE;
                }
                let right = Offset::from_raw(page.read_i32_at_offset(offset)?);
                Ok(Node::new(NodeType::Internal {
                    keys,
                    children,
                    right,
                }))
            }
        }
    }
}

/// Serializes a `Node` back into a zero-padded `Page`.
impl TryFrom<&Node> for Page {
    type Error = Error;

    fn try_from(node: &Node) -> Result<Page, Error> {
        let mut page = Page::zeroed();
        page.write_u8_at_offset(TAG_OFFSET, u8::from(&node.node_type))?;

        let keys = node.node_type.keys();
        page.write_i32_at_offset(NUM_KEYS_OFFSET, keys.len() as i32)?;

        let mut offset = KEYS_OFFSET;
        for key in keys {
            page.write_i32_at_offset(offset, *key)?;
            offset += KEY_SIZE;
        }

        match &node.node_type {
            NodeType::Leaf { values, right, .. } => {
                for value in values {
                    page.write_i32_at_offset(offset, *value)?;
                    offset += VALUE_SIZE;
                }
                page.write_i32_at_offset(offset, Offset::to_raw(*right))?;
            }
            NodeType::Internal { children, right, .. } => {
                for Offset(child) in children {
                    page.write_i32_at_offset(offset, *child)?;
                    offset += PTR_SIZE;
                }
                page.write_i32_at_offset(offset, Offset::to_raw(*right))?;
            }
        }

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node_type::NodeType;

    #[test]
    fn leaf_round_trips_through_page() -> Result<(), Error> {
        let node = Node::new(NodeType::Leaf {
            keys: vec![1, 2, 3],
            values: vec![10, 20, 30],
            right: Some(Offset(8192)),
        });

        let page = Page::try_from(&node)?;
        let decoded = Node::try_from(page)?;

        assert_eq!(decoded, node);
        Ok(())
    }

    #[test]
    fn leaf_with_no_right_sibling_round_trips() -> Result<(), Error> {
        let node = Node::new(NodeType::Leaf {
            keys: vec![5],
            values: vec![50],
            right: None,
        });

        let page = Page::try_from(&node)?;
        let decoded = Node::try_from(page)?;

        assert_eq!(decoded, node);
        Ok(())
    }

    #[test]
    fn internal_round_trips_through_page() -> Result<(), Error> {
        let node = Node::new(NodeType::Internal {
            keys: vec![10, 20],
            children: vec![Offset(4096), Offset(8192), Offset(12288)],
            right: None,
        });

        let page = Page::try_from(&node)?;
        let decoded = Node::try_from(page)?;

        assert_eq!(decoded, node);
        Ok(())
    }

    #[test]
    fn internal_with_missing_child_round_trips() -> Result<(), Error> {
        // A child offset of -1 is written defensively; the descend path
        // treats it as corruption rather than failing to decode.
        let node = Node::new(NodeType::Internal {
            keys: vec![10],
            children: vec![Offset(4096), Offset(-1)],
            right: None,
        });

        let page = Page::try_from(&node)?;
        let decoded = Node::try_from(page)?;

        assert_eq!(decoded, node);
        Ok(())
    }

    #[test]
    fn empty_leaf_round_trips() -> Result<(), Error> {
        let node = Node::new_leaf();
        let page = Page::try_from(&node)?;
        let decoded = Node::try_from(page)?;
        assert_eq!(decoded, node);
        Ok(())
    }
}
