use crate::profile::{NodeIndex, Profile, ProfileTrie, ProfileTrieNode, TrieKind};

/// Cursor over one trie of a built [`Profile`].
///
/// After `reset` the cursor sits on the synthetic root; `down` follows the
/// first child, which is the first call path seen during the build.
#[derive(Debug)]
pub struct ProfileTrieWalker<'p, 'a> {
    profile: &'p Profile<'a>,
    trie: &'p ProfileTrie,
    current: NodeIndex,
}

impl<'p, 'a> ProfileTrieWalker<'p, 'a> {
    /// Starts at the root of the exclusive code trie.
    pub fn new(profile: &'p Profile<'a>) -> Self {
        Self {
            profile,
            trie: profile.trie(TrieKind::ExclusiveCode),
            current: ProfileTrie::ROOT,
        }
    }

    pub fn reset(&mut self, kind: TrieKind) {
        self.trie = self.profile.trie(kind);
        self.current = ProfileTrie::ROOT;
    }

    pub fn kind(&self) -> TrieKind {
        self.trie.kind()
    }

    fn node(&self) -> &'p ProfileTrieNode {
        let trie: &'p ProfileTrie = self.trie;
        trie.node(self.current)
    }

    /// Moves to the first child. Returns false, without moving, at the end of
    /// a call path.
    pub fn down(&mut self) -> bool {
        match self.node().child_at(0) {
            Some(child) => {
                self.current = child;
                true
            }
            None => false,
        }
    }

    /// Moves to the parent. Returns false at the root.
    pub fn up(&mut self) -> bool {
        match self.node().parent() {
            Some(parent) => {
                self.current = parent;
                true
            }
            None => false,
        }
    }

    /// Moves to the next child of the parent, in first-seen order.
    pub fn next_sibling(&mut self) -> bool {
        let node = self.node();
        let (Some(parent), Some(key)) = (node.parent(), node.key()) else {
            return false;
        };
        let parent = self.trie.node(parent);
        let next = parent
            .position_of(&key)
            .and_then(|position| parent.child_at(position + 1));
        match next {
            Some(sibling) => {
                self.current = sibling;
                true
            }
            None => false,
        }
    }

    pub fn is_at_root(&self) -> bool {
        self.current == ProfileTrie::ROOT
    }

    /// Display name of the current node; `None` on the root.
    pub fn current_name(&self) -> Option<&'p str> {
        let profile: &'p Profile<'a> = self.profile;
        self.node().key().and_then(|key| profile.name_of(key))
    }

    pub fn current_exclusive_count(&self) -> u64 {
        self.node().exclusive_count()
    }

    pub fn current_inclusive_count(&self) -> u64 {
        self.node().inclusive_count()
    }

    /// Number of children of the current node's parent, this node included.
    /// `None` on the root, which has no parent.
    pub fn sibling_count(&self) -> Option<usize> {
        self.node()
            .parent()
            .map(|parent| self.trie.node(parent).child_count())
    }
}
