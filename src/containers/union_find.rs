use std::hash::Hash;

use super::HashMap;

/// Incremental disjoint-set structure.
///
/// Elements are added as singleton sets and merged with [`UnionFind::union`]. Merged
/// sets are never split again; undoing a union is only possible by restoring a clone
/// of the whole structure.
#[derive(Clone, Debug)]
pub struct UnionFind<E> {
    elements: Vec<E>,
    indices: HashMap<E, usize>,
    parents: Vec<usize>,
    ranks: Vec<u32>,
}

impl<E> Default for UnionFind<E> {
    fn default() -> Self {
        UnionFind {
            elements: Vec::new(),
            indices: HashMap::default(),
            parents: Vec::new(),
            ranks: Vec::new(),
        }
    }
}

impl<E: Eq + Hash + Clone> UnionFind<E> {
    pub fn contains(&self, element: &E) -> bool {
        self.indices.contains_key(element)
    }

    /// Adds `element` as a singleton set. Elements that are already present are left
    /// untouched.
    pub fn add(&mut self, element: E) {
        if self.indices.contains_key(&element) {
            return;
        }
        let index = self.elements.len();
        self.elements.push(element.clone());
        let _ = self.indices.insert(element, index);
        self.parents.push(index);
        self.ranks.push(0);
    }

    /// Merges the sets of `a` and `b`, adding either as a singleton first if absent.
    pub fn union(&mut self, a: &E, b: &E) {
        self.add(a.clone());
        self.add(b.clone());
        let root_a = self.find_root(self.indices[a]);
        let root_b = self.find_root(self.indices[b]);
        if root_a == root_b {
            return;
        }
        if self.ranks[root_a] < self.ranks[root_b] {
            self.parents[root_a] = root_b;
        } else if self.ranks[root_a] > self.ranks[root_b] {
            self.parents[root_b] = root_a;
        } else {
            self.parents[root_b] = root_a;
            self.ranks[root_a] += 1;
        }
    }

    /// Returns true when both elements are present and belong to the same set.
    pub fn same_set(&self, a: &E, b: &E) -> bool {
        match (self.indices.get(a), self.indices.get(b)) {
            (Some(&index_a), Some(&index_b)) => {
                self.find_root(index_a) == self.find_root(index_b)
            }
            _ => false,
        }
    }

    /// Enumerates the members of the set containing `element`, itself included.
    /// Absent elements yield an empty iterator.
    pub fn set_of<'a>(&'a self, element: &E) -> impl Iterator<Item = &'a E> + Clone + 'a {
        let root = self
            .indices
            .get(element)
            .map(|&index| self.find_root(index));
        self.elements
            .iter()
            .enumerate()
            .filter(move |(index, _)| Some(self.find_root(*index)) == root)
            .map(|(_, member)| member)
    }

    fn find_root(&self, mut index: usize) -> usize {
        while self.parents[index] != index {
            index = self.parents[index];
        }
        index
    }
}
