//! Mutable trie over TextUnits.
//!
//! Nodes live in an arena. Removing a key prunes the nodes left without a value or
//! children, and their slots are reused by later insertions.

use hashbrown::HashMap;

use crate::errors::Result;

#[derive(Debug)]
struct TrieNode<V> {
    children: HashMap<Box<str>, u32>,
    value: Option<V>,
}

impl<V> Default for TrieNode<V> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
        }
    }
}

#[derive(Debug)]
pub struct Trie<V> {
    nodes: Vec<TrieNode<V>>,
    free: Vec<u32>,
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Trie<V> {
    pub const ROOT: u32 = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![TrieNode::default()],
            free: vec![],
        }
    }

    #[inline(always)]
    pub fn child(&self, node: u32, unit: &str) -> Option<u32> {
        self.nodes[node as usize].children.get(unit).copied()
    }

    #[inline(always)]
    pub fn value(&self, node: u32) -> Option<&V> {
        self.nodes[node as usize].value.as_ref()
    }

    /// Returns the node reached by walking the whole key.
    pub fn walk<K>(&self, key: &[K]) -> Option<u32>
    where
        K: AsRef<str>,
    {
        key.iter()
            .try_fold(Self::ROOT, |node, unit| self.child(node, unit.as_ref()))
    }

    pub fn get<K>(&self, key: &[K]) -> Option<&V>
    where
        K: AsRef<str>,
    {
        self.walk(key).and_then(|node| self.value(node))
    }

    /// Inserts a value, returning the previous one.
    pub fn insert<K>(&mut self, key: &[K], value: V) -> Result<Option<V>>
    where
        K: AsRef<str>,
    {
        let mut node = Self::ROOT;
        for unit in key {
            let unit = unit.as_ref();
            node = match self.child(node, unit) {
                Some(child) => child,
                None => {
                    let child = self.alloc()?;
                    self.nodes[node as usize]
                        .children
                        .insert(Box::from(unit), child);
                    child
                }
            };
        }
        Ok(self.nodes[node as usize].value.replace(value))
    }

    fn alloc(&mut self) -> Result<u32> {
        if let Some(node) = self.free.pop() {
            return Ok(node);
        }
        let node = u32::try_from(self.nodes.len())?;
        self.nodes.push(TrieNode::default());
        Ok(node)
    }

    /// Removes a value, returning it.
    ///
    /// Nodes on the key's path that end up with neither a value nor children are
    /// unlinked and recycled.
    pub fn remove<K>(&mut self, key: &[K]) -> Option<V>
    where
        K: AsRef<str>,
    {
        let mut path = Vec::with_capacity(key.len() + 1);
        let mut node = Self::ROOT;
        path.push(node);
        for unit in key {
            node = self.child(node, unit.as_ref())?;
            path.push(node);
        }
        let value = self.nodes[node as usize].value.take()?;

        for (unit, pair) in key.iter().zip(path.windows(2)).rev() {
            let (parent, node) = (pair[0], pair[1]);
            let slot = &self.nodes[node as usize];
            if slot.value.is_some() || !slot.children.is_empty() {
                break;
            }
            self.nodes[parent as usize].children.remove(unit.as_ref());
            self.nodes[node as usize].children.shrink_to_fit();
            self.free.push(node);
        }
        Some(value)
    }

    /// Gets the number of live nodes, including the root.
    #[inline(always)]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Creates an iterator of values whose keys are prefixes of `input`.
    #[inline(always)]
    pub fn common_prefix_iterator<'a, K>(&'a self, input: &'a [K]) -> CommonPrefixIter<'a, V, K>
    where
        K: AsRef<str>,
    {
        CommonPrefixIter {
            trie: self,
            input,
            cursor: PrefixCursor::default(),
        }
    }
}

/// Walking state of a common-prefix search.
///
/// The cursor does not borrow the trie, so it can be driven through a lock guard.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrefixCursor {
    node: u32,
    end: usize,
    done: bool,
}

impl PrefixCursor {
    /// Advances to the next prefix carrying a value.
    pub fn advance<V, K>(&mut self, trie: &Trie<V>, input: &[K]) -> Option<TrieMatch>
    where
        K: AsRef<str>,
    {
        while !self.done && self.end < input.len() {
            match trie.child(self.node, input[self.end].as_ref()) {
                Some(child) => {
                    self.node = child;
                    self.end += 1;
                    if trie.value(child).is_some() {
                        return Some(TrieMatch::new(child, self.end));
                    }
                }
                None => self.done = true,
            }
        }
        self.done = true;
        None
    }
}

pub struct CommonPrefixIter<'a, V, K> {
    trie: &'a Trie<V>,
    input: &'a [K],
    cursor: PrefixCursor,
}

impl<V, K> Iterator for CommonPrefixIter<'_, V, K>
where
    K: AsRef<str>,
{
    type Item = TrieMatch;

    #[inline(always)]
    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.advance(self.trie, self.input)
    }
}

/// A key found by a common-prefix search.
///
/// `end` is the number of units consumed from the start of the input.
#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct TrieMatch {
    pub node: u32,
    pub end: usize,
}

impl TrieMatch {
    #[inline(always)]
    pub const fn new(node: u32, end: usize) -> Self {
        Self { node, end }
    }
}
