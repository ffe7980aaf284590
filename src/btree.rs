use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::node::Node;
use crate::node_type::{NodeType, Offset};
use crate::page_layout::NONE_OFFSET;
use crate::pager::Pager;

/// BTreeBuilder builds a brand-new tree file, mirroring the
/// construction style used throughout this engine.
pub struct BTreeBuilder {
    path: PathBuf,
    b: i32,
}

impl BTreeBuilder {
    pub fn new() -> BTreeBuilder {
        BTreeBuilder {
            path: PathBuf::new(),
            b: 0,
        }
    }

    pub fn path<P: Into<PathBuf>>(mut self, path: P) -> BTreeBuilder {
        self.path = path.into();
        self
    }

    pub fn b_parameter(mut self, b: i32) -> BTreeBuilder {
        self.b = b;
        self
    }

    /// Creates a brand-new tree file at `path`, overwriting any
    /// existing file (the `-c` command).
    pub fn build(self) -> Result<BTree, Error> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::UnexpectedError);
        }
        Pager::create_new(&self.path, self.b)?;
        Ok(BTree { path: self.path })
    }
}

impl Default for BTreeBuilder {
    fn default() -> Self {
        BTreeBuilder::new().b_parameter(200)
    }
}

/// BTree is a persistent, disk-backed B+Tree mapping unique i32 keys to
/// i32 values. At runtime it holds only the file path: the branching
/// factor and root offset live in the header and are read fresh at the
/// start of every operation, since the pager is reopened per call (see
/// the concurrency model - there is no cross-call in-memory state).
pub struct BTree {
    path: PathBuf,
}

/// ceil((b - 1) / 2): the minimum number of keys a non-root node must
/// carry.
fn min_keys(b: i32) -> i32 {
    let n = b - 1;
    (n + 1) / 2
}

/// Picks the smallest index `i` such that `key < keys[i]`; if none
/// exists, returns `keys.len()` (routing to the last child).
fn route_index(keys: &[i32], key: i32) -> usize {
    keys.iter().position(|&k| key < k).unwrap_or(keys.len())
}

fn leaf_parts(node: Node) -> Result<(Vec<i32>, Vec<i32>, Option<Offset>), Error> {
    match node.node_type {
        NodeType::Leaf { keys, values, right } => Ok((keys, values, right)),
        NodeType::Internal { .. } => Err(Error::UnexpectedError),
    }
}

fn internal_parts(node: Node) -> Result<(Vec<i32>, Vec<Offset>, Option<Offset>), Error> {
    match node.node_type {
        NodeType::Internal {
            keys,
            children,
            right,
        } => Ok((keys, children, right)),
        NodeType::Leaf { .. } => Err(Error::UnexpectedError),
    }
}

impl BTree {
    /// Creates a brand-new tree file with branching factor `b`,
    /// overwriting any existing file at `path` (the `-c` command).
    pub fn create(path: &Path, b: i32) -> Result<BTree, Error> {
        BTreeBuilder::new().path(path).b_parameter(b).build()
    }

    /// Opens an existing tree file without modifying it.
    pub fn open(path: &Path) -> BTree {
        BTree {
            path: path.to_path_buf(),
        }
    }

    fn pager(&self) -> Result<Pager, Error> {
        Pager::open(&self.path)
    }

    /// Descends from `start_offset` by key comparison, following the
    /// strict less-than routing rule, and returns the leaf that would
    /// contain `key` along with its offset. When `print_path` is set,
    /// each internal node's key list is printed as a comma-separated
    /// line on the way down (used by point lookup).
    ///
    /// A child offset of -1 degrades the descent gracefully, returning
    /// the current (internal) node as if it were the leaf; this only
    /// guards against a corrupt tree and is never exercised in normal
    /// operation.
    fn descend(
        &self,
        pager: &mut Pager,
        start_offset: i32,
        key: i32,
        print_path: bool,
    ) -> Result<(Node, i32), Error> {
        let mut offset = start_offset;
        loop {
            let node = pager.read_page(offset)?;
            if node.is_leaf() {
                return Ok((node, offset));
            }

            let child_offset = match &node.node_type {
                NodeType::Internal { keys, children, .. } => {
                    if print_path {
                        let path = keys
                            .iter()
                            .map(|k| k.to_string())
                            .collect::<Vec<_>>()
                            .join(",");
                        println!("{}", path);
                    }
                    let idx = route_index(keys, key);
                    children.get(idx).map(|c| c.0).unwrap_or(NONE_OFFSET)
                }
                NodeType::Leaf { .. } => unreachable!(),
            };

            if child_offset == NONE_OFFSET {
                return Ok((node, offset));
            }
            offset = child_offset;
        }
    }

    /// Point lookup. Prints each internal node's key list on the way
    /// down, then either the matched value or `NOT FOUND`.
    pub fn search(&self, key: i32) -> Result<(), Error> {
        let mut pager = self.pager()?;
        let (_, root_offset) = pager.read_header()?;
        let (leaf, _) = self.descend(&mut pager, root_offset, key, true)?;
        match &leaf.node_type {
            NodeType::Leaf { keys, values, .. } => match keys.binary_search(&key) {
                Ok(idx) => println!("{}", values[idx]),
                Err(_) => println!("NOT FOUND"),
            },
            NodeType::Internal { .. } => println!("NOT FOUND"),
        }
        Ok(())
    }

    /// Point lookup without any printing, for programmatic callers.
    pub fn lookup(&self, key: i32) -> Result<Option<i32>, Error> {
        let mut pager = self.pager()?;
        let (_, root_offset) = pager.read_header()?;
        let (leaf, _) = self.descend(&mut pager, root_offset, key, false)?;
        if let NodeType::Leaf { keys, values, .. } = &leaf.node_type {
            if let Ok(idx) = keys.binary_search(&key) {
                return Ok(Some(values[idx]));
            }
        }
        Ok(None)
    }

    fn range_collect(
        &self,
        pager: &mut Pager,
        root_offset: i32,
        low: i32,
        high: i32,
    ) -> Result<Vec<(i32, i32)>, Error> {
        let mut out = Vec::new();
        let (mut leaf, _) = self.descend(pager, root_offset, low, false)?;
        loop {
            let (keys, values, right) = match &leaf.node_type {
                NodeType::Leaf { keys, values, right } => (keys, values, *right),
                NodeType::Internal { .. } => break,
            };

            let mut exceeded = false;
            for (k, v) in keys.iter().zip(values.iter()) {
                if *k > high {
                    exceeded = true;
                    break;
                }
                if *k >= low {
                    out.push((*k, *v));
                }
            }
            if exceeded {
                break;
            }

            match right {
                Some(Offset(next_offset)) => {
                    leaf = pager.read_page(next_offset)?;
                }
                None => break,
            }
        }
        Ok(out)
    }

    /// Range scan over `[low, high]`, returning the matched pairs in
    /// increasing key order.
    pub fn range(&self, low: i32, high: i32) -> Result<Vec<(i32, i32)>, Error> {
        let mut pager = self.pager()?;
        let (_, root_offset) = pager.read_header()?;
        self.range_collect(&mut pager, root_offset, low, high)
    }

    /// Range scan, printing each matched pair as `k, v` on its own
    /// line.
    pub fn range_scan(&self, low: i32, high: i32) -> Result<(), Error> {
        for (k, v) in self.range(low, high)? {
            println!("{}, {}", k, v);
        }
        Ok(())
    }

    /// Inserts `(key, value)`. A duplicate key is silently ignored: no
    /// update, no error.
    pub fn insert(&self, key: i32, value: i32) -> Result<(), Error> {
        let mut pager = self.pager()?;
        let (b, root_offset) = pager.read_header()?;

        if let Some((promoted_key, right_offset)) =
            self.insert_recursive(&mut pager, root_offset, key, value, b)?
        {
            let new_root = Node::new(NodeType::Internal {
                keys: vec![promoted_key],
                children: vec![Offset(root_offset), Offset(right_offset)],
                right: None,
            });
            let new_root_offset = pager.allocate_page(&new_root)?;
            pager.set_root_offset(new_root_offset)?;
        }
        Ok(())
    }

    /// Recursively descends to the leaf that should hold `key`,
    /// inserting it there and propagating a `(promoted_key,
    /// right_offset)` pair upward whenever a split occurs.
    fn insert_recursive(
        &self,
        pager: &mut Pager,
        offset: i32,
        key: i32,
        value: i32,
        b: i32,
    ) -> Result<Option<(i32, i32)>, Error> {
        let node = pager.read_page(offset)?;
        match node.node_type {
            NodeType::Leaf {
                mut keys,
                mut values,
                right,
            } => {
                if keys.binary_search(&key).is_ok() {
                    return Ok(None);
                }
                let idx = keys.binary_search(&key).unwrap_err();
                keys.insert(idx, key);
                values.insert(idx, value);

                if keys.len() as i32 <= b - 1 {
                    pager.write_page_at_offset(&Node::new(NodeType::Leaf { keys, values, right }), offset)?;
                    return Ok(None);
                }
                self.split_leaf(pager, keys, values, right, offset)
            }
            NodeType::Internal {
                mut keys,
                mut children,
                right,
            } => {
                let idx = route_index(&keys, key);
                let child_offset = children[idx].0;
                let result = self.insert_recursive(pager, child_offset, key, value, b)?;

                let (promoted_key, right_offset) = match result {
                    None => return Ok(None),
                    Some(pair) => pair,
                };

                let insert_idx = keys.binary_search(&promoted_key).unwrap_or_else(|x| x);
                keys.insert(insert_idx, promoted_key);
                children.insert(insert_idx + 1, Offset(right_offset));

                if keys.len() as i32 <= b - 1 {
                    pager.write_page_at_offset(
                        &Node::new(NodeType::Internal { keys, children, right }),
                        offset,
                    )?;
                    return Ok(None);
                }
                self.split_internal(pager, keys, children, offset)
            }
        }
    }

    /// Splits an over-full leaf. The new right leaf takes `[mid, n)`;
    /// the original keeps `[0, mid)`. The promoted key is the first key
    /// of the new right leaf.
    fn split_leaf(
        &self,
        pager: &mut Pager,
        mut keys: Vec<i32>,
        mut values: Vec<i32>,
        right: Option<Offset>,
        offset: i32,
    ) -> Result<Option<(i32, i32)>, Error> {
        let mid = keys.len() / 2;
        let right_keys = keys.split_off(mid);
        let right_values = values.split_off(mid);
        let promoted_key = right_keys[0];

        let new_right = Node::new(NodeType::Leaf {
            keys: right_keys,
            values: right_values,
            right,
        });
        let new_right_offset = pager.allocate_page(&new_right)?;

        let updated = Node::new(NodeType::Leaf {
            keys,
            values,
            right: Some(Offset(new_right_offset)),
        });
        pager.write_page_at_offset(&updated, offset)?;

        Ok(Some((promoted_key, new_right_offset)))
    }

    /// Splits an over-full internal node. `key_up` (the middle key) is
    /// promoted and appears in neither child. The right-sibling field
    /// is unused by internal nodes and is always written as `None`.
    fn split_internal(
        &self,
        pager: &mut Pager,
        mut keys: Vec<i32>,
        mut children: Vec<Offset>,
        offset: i32,
    ) -> Result<Option<(i32, i32)>, Error> {
        let mid = keys.len() / 2;
        let right_keys = keys.split_off(mid + 1);
        let key_up = keys.pop().ok_or(Error::UnexpectedError)?;
        let right_children = children.split_off(mid + 1);

        let new_right = Node::new(NodeType::Internal {
            keys: right_keys,
            children: right_children,
            right: None,
        });
        let new_right_offset = pager.allocate_page(&new_right)?;

        let updated = Node::new(NodeType::Internal {
            keys,
            children,
            right: None,
        });
        pager.write_page_at_offset(&updated, offset)?;

        Ok(Some((key_up, new_right_offset)))
    }

    /// Deletes `key`. Returns `false` (no-op) if the key is absent.
    pub fn delete(&self, key: i32) -> Result<bool, Error> {
        let mut pager = self.pager()?;
        let (b, root_offset) = pager.read_header()?;

        let deleted = self.delete_recursive(&mut pager, root_offset, key, None, b)?;

        // Root shrink: an internal root that lost all of its keys
        // promotes its single remaining child.
        let root = pager.read_page(root_offset)?;
        if let NodeType::Internal { keys, children, .. } = &root.node_type {
            if keys.is_empty() && !children.is_empty() {
                pager.set_root_offset(children[0].0)?;
            }
        }

        Ok(deleted)
    }

    /// Recursively descends to `key`'s leaf and removes it. On the way
    /// back up, each level checks whether the child it just visited
    /// under-fills and rebalances it. Leaf under-fill is handled
    /// directly here (using the parent info passed down to this call);
    /// internal under-fill is handled by the caller one level up, since
    /// that is the level holding the parent/sibling context needed to
    /// fix it.
    fn delete_recursive(
        &self,
        pager: &mut Pager,
        offset: i32,
        key: i32,
        parent_info: Option<(i32, usize)>,
        b: i32,
    ) -> Result<bool, Error> {
        let node = pager.read_page(offset)?;
        match node.node_type {
            NodeType::Leaf {
                mut keys,
                mut values,
                right,
            } => {
                let idx = match keys.binary_search(&key) {
                    Ok(idx) => idx,
                    Err(_) => return Ok(false),
                };
                keys.remove(idx);
                values.remove(idx);
                let under_filled = (keys.len() as i32) < min_keys(b);
                pager.write_page_at_offset(&Node::new(NodeType::Leaf { keys, values, right }), offset)?;

                if let Some((parent_offset, child_index)) = parent_info {
                    if under_filled {
                        self.rebalance_leaf(pager, offset, parent_offset, child_index, b)?;
                    }
                }
                Ok(true)
            }
            NodeType::Internal { keys, children, .. } => {
                let idx = route_index(&keys, key);
                let child_offset = children[idx].0;

                let deleted = self.delete_recursive(pager, child_offset, key, Some((offset, idx)), b)?;
                if !deleted {
                    return Ok(false);
                }

                let child = pager.read_page(child_offset)?;
                if !child.is_leaf() && (child.keys().len() as i32) < min_keys(b) {
                    self.rebalance_internal(pager, child_offset, offset, idx, b)?;
                }
                Ok(true)
            }
        }
    }

    /// Rebalances an under-filled leaf at `offset`, which sits at
    /// `child_index` of `parent_offset`: borrow-left, else
    /// borrow-right, else merge (left, unless `child_index == 0`, in
    /// which case right).
    fn rebalance_leaf(
        &self,
        pager: &mut Pager,
        offset: i32,
        parent_offset: i32,
        child_index: usize,
        b: i32,
    ) -> Result<(), Error> {
        let min_keys = min_keys(b);
        let (mut p_keys, mut p_children, p_right) = internal_parts(pager.read_page(parent_offset)?)?;
        let (mut keys, mut values, right) = leaf_parts(pager.read_page(offset)?)?;

        if child_index > 0 {
            let left_offset = p_children[child_index - 1].0;
            let (mut l_keys, mut l_values, l_right) = leaf_parts(pager.read_page(left_offset)?)?;
            if l_keys.len() as i32 > min_keys {
                keys.insert(0, l_keys.pop().ok_or(Error::UnexpectedError)?);
                values.insert(0, l_values.pop().ok_or(Error::UnexpectedError)?);
                p_keys[child_index - 1] = keys[0];

                pager.write_page_at_offset(&Node::new(NodeType::Leaf { keys, values, right }), offset)?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Leaf {
                        keys: l_keys,
                        values: l_values,
                        right: l_right,
                    }),
                    left_offset,
                )?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: p_keys,
                        children: p_children,
                        right: p_right,
                    }),
                    parent_offset,
                )?;
                return Ok(());
            }
        }

        if child_index + 1 < p_children.len() {
            let right_offset = p_children[child_index + 1].0;
            let (mut r_keys, mut r_values, r_right) = leaf_parts(pager.read_page(right_offset)?)?;
            if r_keys.len() as i32 > min_keys {
                keys.push(r_keys.remove(0));
                values.push(r_values.remove(0));
                p_keys[child_index] = r_keys[0];

                pager.write_page_at_offset(&Node::new(NodeType::Leaf { keys, values, right }), offset)?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Leaf {
                        keys: r_keys,
                        values: r_values,
                        right: r_right,
                    }),
                    right_offset,
                )?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: p_keys,
                        children: p_children,
                        right: p_right,
                    }),
                    parent_offset,
                )?;
                return Ok(());
            }
        }

        // Merge: prefer the left sibling unless this is the leftmost
        // child, in which case merge with the right sibling instead.
        if child_index > 0 {
            let left_offset = p_children[child_index - 1].0;
            let (mut l_keys, mut l_values, _) = leaf_parts(pager.read_page(left_offset)?)?;
            l_keys.extend(keys);
            l_values.extend(values);

            p_keys.remove(child_index - 1);
            p_children.remove(child_index);

            pager.write_page_at_offset(
                &Node::new(NodeType::Leaf {
                    keys: l_keys,
                    values: l_values,
                    right,
                }),
                left_offset,
            )?;
            pager.write_page_at_offset(
                &Node::new(NodeType::Internal {
                    keys: p_keys,
                    children: p_children,
                    right: p_right,
                }),
                parent_offset,
            )?;
        } else if child_index + 1 < p_children.len() {
            let right_offset = p_children[child_index + 1].0;
            let (r_keys, r_values, r_right) = leaf_parts(pager.read_page(right_offset)?)?;
            keys.extend(r_keys);
            values.extend(r_values);

            p_keys.remove(child_index);
            p_children.remove(child_index + 1);

            pager.write_page_at_offset(
                &Node::new(NodeType::Leaf {
                    keys,
                    values,
                    right: r_right,
                }),
                offset,
            )?;
            pager.write_page_at_offset(
                &Node::new(NodeType::Internal {
                    keys: p_keys,
                    children: p_children,
                    right: p_right,
                }),
                parent_offset,
            )?;
        }

        Ok(())
    }

    /// Rebalances an under-filled internal node at `offset`, which sits
    /// at `child_index` of `parent_offset`, rotating a separator key on
    /// borrow and consuming it on merge.
    fn rebalance_internal(
        &self,
        pager: &mut Pager,
        offset: i32,
        parent_offset: i32,
        child_index: usize,
        b: i32,
    ) -> Result<(), Error> {
        let min_keys = min_keys(b);
        let (mut p_keys, mut p_children, p_right) = internal_parts(pager.read_page(parent_offset)?)?;
        let (mut keys, mut children, right) = internal_parts(pager.read_page(offset)?)?;

        if child_index > 0 {
            let left_offset = p_children[child_index - 1].0;
            let (mut l_keys, mut l_children, l_right) = internal_parts(pager.read_page(left_offset)?)?;
            if l_keys.len() as i32 > min_keys {
                let separator = p_keys[child_index - 1];
                keys.insert(0, separator);
                children.insert(0, l_children.pop().ok_or(Error::UnexpectedError)?);
                p_keys[child_index - 1] = l_keys.pop().ok_or(Error::UnexpectedError)?;

                pager.write_page_at_offset(&Node::new(NodeType::Internal { keys, children, right }), offset)?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: l_keys,
                        children: l_children,
                        right: l_right,
                    }),
                    left_offset,
                )?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: p_keys,
                        children: p_children,
                        right: p_right,
                    }),
                    parent_offset,
                )?;
                return Ok(());
            }
        }

        if child_index + 1 < p_children.len() {
            let right_offset = p_children[child_index + 1].0;
            let (mut r_keys, mut r_children, r_right) = internal_parts(pager.read_page(right_offset)?)?;
            if r_keys.len() as i32 > min_keys {
                let separator = p_keys[child_index];
                keys.push(separator);
                children.push(r_children.remove(0));
                p_keys[child_index] = r_keys.remove(0);

                pager.write_page_at_offset(&Node::new(NodeType::Internal { keys, children, right }), offset)?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: r_keys,
                        children: r_children,
                        right: r_right,
                    }),
                    right_offset,
                )?;
                pager.write_page_at_offset(
                    &Node::new(NodeType::Internal {
                        keys: p_keys,
                        children: p_children,
                        right: p_right,
                    }),
                    parent_offset,
                )?;
                return Ok(());
            }
        }

        // Merge: left unless this is the leftmost position, matching
        // the reference implementation's asymmetry exactly.
        if child_index > 0 {
            let left_offset = p_children[child_index - 1].0;
            let (mut l_keys, mut l_children, l_right) = internal_parts(pager.read_page(left_offset)?)?;
            let separator = p_keys[child_index - 1];
            l_keys.push(separator);
            l_keys.extend(keys);
            l_children.extend(children);

            p_keys.remove(child_index - 1);
            p_children.remove(child_index);

            pager.write_page_at_offset(
                &Node::new(NodeType::Internal {
                    keys: l_keys,
                    children: l_children,
                    right: l_right,
                }),
                left_offset,
            )?;
            pager.write_page_at_offset(
                &Node::new(NodeType::Internal {
                    keys: p_keys,
                    children: p_children,
                    right: p_right,
                }),
                parent_offset,
            )?;
        } else if child_index + 1 < p_children.len() {
            let right_offset = p_children[child_index + 1].0;
            let (r_keys, r_children, _) = internal_parts(pager.read_page(right_offset)?)?;
            let separator = p_keys[child_index];
            keys.push(separator);
            keys.extend(r_keys);
            children.extend(r_children);

            p_keys.remove(child_index);
            p_children.remove(child_index + 1);

            pager.write_page_at_offset(&Node::new(NodeType::Internal { keys, children, right }), offset)?;
            pager.write_page_at_offset(
                &Node::new(NodeType::Internal {
                    keys: p_keys,
                    children: p_children,
                    right: p_right,
                }),
                parent_offset,
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_path(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        dir.path().join(name)
    }

    #[test]
    fn create_insert_search() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t1.dat"), 4)?;

        tree.insert(10, 100)?;
        tree.insert(20, 200)?;
        tree.insert(5, 50)?;

        assert_eq!(tree.lookup(10)?, Some(100));
        assert_eq!(tree.lookup(7)?, None);
        Ok(())
    }

    #[test]
    fn leaf_split_and_root_growth() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t2.dat"), 3)?;

        tree.insert(1, 1)?;
        tree.insert(2, 2)?;
        tree.insert(3, 3)?;

        let mut pager = tree.pager()?;
        let (_, root_offset) = pager.read_header()?;
        let root = pager.read_page(root_offset)?;
        match root.node_type {
            NodeType::Internal { keys, children, .. } => {
                assert_eq!(keys, vec![2]);
                assert_eq!(children.len(), 2);
            }
            NodeType::Leaf { .. } => panic!("expected internal root after split"),
        }

        assert_eq!(tree.lookup(1)?, Some(1));
        assert_eq!(tree.lookup(2)?, Some(2));
        assert_eq!(tree.lookup(3)?, Some(3));
        Ok(())
    }

    #[test]
    fn range_scan_across_leaves() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t3.dat"), 3)?;

        tree.insert(1, 1)?;
        tree.insert(2, 2)?;
        tree.insert(3, 3)?;

        assert_eq!(tree.range(1, 3)?, vec![(1, 1), (2, 2), (3, 3)]);
        Ok(())
    }

    #[test]
    fn delete_with_borrow() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t4.dat"), 4)?;

        for k in 1..=5 {
            tree.insert(k, k * 10)?;
        }

        tree.delete(1)?;

        for k in 2..=5 {
            assert_eq!(tree.lookup(k)?, Some(k * 10));
        }
        assert_eq!(tree.lookup(1)?, None);
        Ok(())
    }

    #[test]
    fn delete_with_merge_and_root_shrink() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t5.dat"), 3)?;

        tree.insert(1, 1)?;
        tree.insert(2, 2)?;
        tree.insert(3, 3)?;
        // root [2] over leaves [1] | [2,3].

        // Trim the right leaf down to the minimum first, so when the
        // left leaf empties out neither sibling has a key to lend and
        // a merge is forced.
        tree.delete(3)?;
        tree.delete(2)?;

        let mut pager = tree.pager()?;
        let (_, root_offset) = pager.read_header()?;
        let root = pager.read_page(root_offset)?;
        assert!(root.is_leaf());
        assert_eq!(
            root.node_type,
            NodeType::Leaf {
                keys: vec![1],
                values: vec![1],
                right: None,
            }
        );
        assert_eq!(tree.lookup(1)?, Some(1));
        assert_eq!(tree.lookup(2)?, None);
        assert_eq!(tree.lookup(3)?, None);
        Ok(())
    }

    #[test]
    fn duplicate_insert_is_a_no_op() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t6.dat"), 4)?;

        tree.insert(10, 100)?;
        tree.insert(10, 100)?;
        assert_eq!(tree.lookup(10)?, Some(100));

        tree.insert(10, 999)?;
        assert_eq!(tree.lookup(10)?, Some(100));
        Ok(())
    }

    #[test]
    fn delete_of_missing_key_is_idempotent() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t7.dat"), 4)?;

        tree.insert(1, 1)?;
        assert!(!tree.delete(42)?);
        assert_eq!(tree.lookup(1)?, Some(1));
        Ok(())
    }

    #[test]
    fn insert_many_then_delete_all_empties_tree() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t8.dat"), 4)?;

        for k in 0..50 {
            tree.insert(k, k * 2)?;
        }
        for k in 0..50 {
            assert_eq!(tree.lookup(k)?, Some(k * 2));
        }
        for k in 0..50 {
            assert!(tree.delete(k)?);
        }
        for k in 0..50 {
            assert_eq!(tree.lookup(k)?, None);
        }
        Ok(())
    }

    #[test]
    fn range_scan_is_monotonic_and_bounded() -> Result<(), Error> {
        let dir = tempfile::tempdir()?;
        let tree = BTree::create(&tmp_path(&dir, "t9.dat"), 4)?;

        for k in [8, 3, 5, 1, 9, 2, 7, 4, 6] {
            tree.insert(k, k)?;
        }

        let got = tree.range(3, 7)?;
        assert_eq!(got, vec![(3, 3), (4, 4), (5, 5), (6, 6), (7, 7)]);
        Ok(())
    }
}
