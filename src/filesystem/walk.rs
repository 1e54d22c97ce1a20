// src/filesystem/walk.rs

//! Deterministic depth-first traversal of a filesystem tree
//!
//! Directories are yielded before their contents and the children of each
//! directory in ascending name order, so two walks over equal trees always
//! produce the same sequence. The walk is lazy: only one child iterator per
//! directory level is held at any time.

use std::collections::btree_map;

use super::node::{FsDirectory, FsNode};

/// Lazy depth-first iterator over `(path, node)` pairs
///
/// The directory the walk starts from is not itself yielded.
pub struct Walk<'a> {
    stack: Vec<(String, btree_map::Iter<'a, String, FsNode>)>,
}

impl<'a> Walk<'a> {
    fn new(root: &'a FsDirectory, start_path: &str) -> Self {
        Self {
            stack: vec![(start_path.to_string(), root.entries())],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = (String, &'a FsNode);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (prefix, entries) = self.stack.last_mut()?;
            match entries.next() {
                Some((name, node)) => {
                    let path = format!("{}/{}", prefix, name);
                    if let FsNode::Directory(dir) = node {
                        self.stack.push((path.clone(), dir.entries()));
                    }
                    return Some((path, node));
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

impl FsDirectory {
    /// Walk the tree with paths prefixed by `./`
    pub fn iter(&self) -> Walk<'_> {
        self.walk_from(".")
    }

    /// Walk the tree with paths prefixed by `start_path`
    pub fn walk_from(&self, start_path: &str) -> Walk<'_> {
        Walk::new(self, start_path)
    }

    /// Call `visit` for every node below this directory
    ///
    /// Stops at the first error returned by `visit` and hands it back
    /// without visiting any further nodes.
    pub fn walk<F, E>(&self, start_path: &str, mut visit: F) -> Result<(), E>
    where
        F: FnMut(&str, &FsNode) -> Result<(), E>,
    {
        for (path, node) in self.walk_from(start_path) {
            visit(&path, node)?;
        }
        Ok(())
    }
}
