use std::str::FromStr;

use indexmap::IndexMap;

use crate::code::{CodeLookup, FunctionId};
use crate::error::ParseTagPolicyError;
use crate::filter::SampleFilter;
use crate::sample::{Sample, Tag};
use crate::sample_buffer::SampleBuffer;

/// The four call-path trees a profile builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrieKind {
    /// Rooted at the sampled frame, keyed by code object.
    ExclusiveCode,
    /// Rooted at the outermost caller, keyed by code object.
    InclusiveCode,
    /// Rooted at the sampled frame, keyed by function.
    ExclusiveFunction,
    /// Rooted at the outermost caller, keyed by function.
    InclusiveFunction,
}

impl TrieKind {
    pub const ALL: [TrieKind; 4] = [
        TrieKind::ExclusiveCode,
        TrieKind::InclusiveCode,
        TrieKind::ExclusiveFunction,
        TrieKind::InclusiveFunction,
    ];

    pub fn is_exclusive(self) -> bool {
        matches!(self, TrieKind::ExclusiveCode | TrieKind::ExclusiveFunction)
    }

    pub fn is_function(self) -> bool {
        matches!(
            self,
            TrieKind::ExclusiveFunction | TrieKind::InclusiveFunction
        )
    }

    fn index(self) -> usize {
        match self {
            TrieKind::ExclusiveCode => 0,
            TrieKind::InclusiveCode => 1,
            TrieKind::ExclusiveFunction => 2,
            TrieKind::InclusiveFunction => 3,
        }
    }
}

/// Which sample tags are inserted into the tries as extra nodes.
///
/// Tags sit above the outermost frame: first in inclusive tries, last in
/// exclusive tries (in mirrored order).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TagPolicy {
    #[default]
    NoTags,
    UserOnly,
    VmOnly,
    UserVm,
    VmUser,
}

impl FromStr for TagPolicy {
    type Err = ParseTagPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "None" => Ok(Self::NoTags),
            "UserOnly" => Ok(Self::UserOnly),
            "VMOnly" => Ok(Self::VmOnly),
            "UserVM" => Ok(Self::UserVm),
            "VMUser" => Ok(Self::VmUser),
            _ => Err(ParseTagPolicyError(s.to_owned())),
        }
    }
}

pub type CodeIndex = usize;
pub type FunctionIndex = usize;
pub type TagIndex = usize;
pub type NodeIndex = usize;

/// Identity of a trie node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKey {
    Code(CodeIndex),
    Function(FunctionIndex),
    Tag(TagIndex),
}

/// A code object seen while building a profile.
#[derive(Debug)]
pub struct ProfileCode {
    /// Entry address of the code object, or the raw pc if it was not found.
    pub start: usize,
    pub name: String,
    pub function: FunctionIndex,
    pub known: bool,
}

#[derive(Debug)]
pub struct ProfileFunction {
    pub name: String,
    pub known: bool,
}

#[derive(Debug)]
pub struct ProfileTag {
    pub tag: Tag,
    pub name: String,
    pub user: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum CodeKey {
    Known(usize),
    Unknown(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum FunctionKey {
    Known(FunctionId),
    Unknown(usize),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum TagKey {
    Vm(Tag),
    User(Tag),
}

#[derive(Debug)]
pub struct ProfileTrieNode {
    key: Option<NodeKey>,
    parent: Option<NodeIndex>,
    // Insertion order is the order in which call paths were first seen.
    children: IndexMap<NodeKey, NodeIndex>,
    exclusive_count: u64,
    inclusive_count: u64,
}

impl ProfileTrieNode {
    fn new(key: Option<NodeKey>, parent: Option<NodeIndex>) -> Self {
        Self {
            key,
            parent,
            children: IndexMap::new(),
            exclusive_count: 0,
            inclusive_count: 0,
        }
    }

    /// `None` for the synthetic root.
    pub fn key(&self) -> Option<NodeKey> {
        self.key
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    pub fn children(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.children.values().copied()
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn child_at(&self, position: usize) -> Option<NodeIndex> {
        self.children.get_index(position).map(|(_, index)| *index)
    }

    pub(crate) fn position_of(&self, key: &NodeKey) -> Option<usize> {
        self.children.get_index_of(key)
    }

    /// Samples whose sampled frame is this node.
    pub fn exclusive_count(&self) -> u64 {
        self.exclusive_count
    }

    /// Samples whose path passes through this node.
    pub fn inclusive_count(&self) -> u64 {
        self.inclusive_count
    }
}

/// One call-path tree. Nodes live in an arena; index 0 is the root.
#[derive(Debug)]
pub struct ProfileTrie {
    kind: TrieKind,
    nodes: Vec<ProfileTrieNode>,
}

impl ProfileTrie {
    pub const ROOT: NodeIndex = 0;

    fn new(kind: TrieKind) -> Self {
        Self {
            kind,
            nodes: vec![ProfileTrieNode::new(None, None)],
        }
    }

    pub fn kind(&self) -> TrieKind {
        self.kind
    }

    pub fn root(&self) -> &ProfileTrieNode {
        &self.nodes[Self::ROOT]
    }

    /// Panics if `index` does not belong to this trie.
    pub fn node(&self, index: NodeIndex) -> &ProfileTrieNode {
        &self.nodes[index]
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn child(&mut self, parent: NodeIndex, key: NodeKey) -> NodeIndex {
        if let Some(index) = self.nodes[parent].children.get(&key) {
            return *index;
        }
        let index = self.nodes.len();
        self.nodes.push(ProfileTrieNode::new(Some(key), Some(parent)));
        self.nodes[parent].children.insert(key, index);
        index
    }

    /// Walks `keys` from the root, creating nodes as needed. The node at
    /// `sampled` (a position in `keys`) gets an exclusive tick.
    fn insert(&mut self, keys: &[NodeKey], sampled: Option<usize>) {
        let mut current = Self::ROOT;
        self.nodes[current].inclusive_count += 1;
        for (position, key) in keys.iter().enumerate() {
            current = self.child(current, *key);
            let node = &mut self.nodes[current];
            node.inclusive_count += 1;
            if sampled == Some(position) {
                node.exclusive_count += 1;
            }
        }
    }
}

/// Call-path tries aggregated from one scan of a sample buffer.
pub struct Profile<'a> {
    buffer: &'a SampleBuffer,
    code_lookup: &'a dyn CodeLookup,
    sample_count: u64,
    codes: IndexMap<CodeKey, ProfileCode>,
    functions: IndexMap<FunctionKey, ProfileFunction>,
    tags: IndexMap<TagKey, ProfileTag>,
    tries: [ProfileTrie; 4],
}

impl<'a> Profile<'a> {
    pub fn new(buffer: &'a SampleBuffer, code_lookup: &'a dyn CodeLookup) -> Self {
        Self {
            buffer,
            code_lookup,
            sample_count: 0,
            codes: IndexMap::new(),
            functions: IndexMap::new(),
            tags: IndexMap::new(),
            tries: TrieKind::ALL.map(ProfileTrie::new),
        }
    }

    /// Scans every slot of the buffer and inserts each accepted sample into
    /// all four tries. Rebuilding discards the previous result.
    pub fn build<F>(&mut self, filter: &F, tag_policy: TagPolicy)
    where
        F: SampleFilter + ?Sized,
    {
        self.sample_count = 0;
        self.codes.clear();
        self.functions.clear();
        self.tags.clear();
        self.tries = TrieKind::ALL.map(ProfileTrie::new);

        let buffer = self.buffer;
        let mut code_keys: Vec<NodeKey> = Vec::with_capacity(buffer.max_depth());
        let mut function_keys: Vec<NodeKey> = Vec::with_capacity(buffer.max_depth());
        let mut tag_keys: Vec<NodeKey> = Vec::with_capacity(2);
        let mut path: Vec<NodeKey> = Vec::with_capacity(buffer.max_depth() + 2);

        for index in 0..buffer.capacity() {
            let sample = buffer.at(index);
            if !filter.accepts(sample) {
                continue;
            }
            self.sample_count += 1;

            code_keys.clear();
            function_keys.clear();
            for pc in sample.frames() {
                let code = self.intern_code(pc);
                code_keys.push(NodeKey::Code(code));
                // Same-function siblings merge through the child map keying.
                function_keys.push(NodeKey::Function(self.codes[code].function));
            }
            self.tag_keys(sample, tag_policy, &mut tag_keys);

            for kind in TrieKind::ALL {
                let frame_keys = if kind.is_function() {
                    &function_keys
                } else {
                    &code_keys
                };
                path.clear();
                let sampled = if kind.is_exclusive() {
                    path.extend(frame_keys.iter().copied());
                    path.extend(tag_keys.iter().rev().copied());
                    (!frame_keys.is_empty()).then_some(0)
                } else {
                    path.extend(tag_keys.iter().copied());
                    path.extend(frame_keys.iter().rev().copied());
                    (!frame_keys.is_empty()).then(|| path.len() - 1)
                };
                self.tries[kind.index()].insert(&path, sampled);
            }
        }

        log::debug!(
            "Profile built: {} of {} slots accepted, {} code objects, {} functions",
            self.sample_count,
            buffer.capacity(),
            self.codes.len(),
            self.functions.len()
        );
    }

    fn intern_code(&mut self, pc: usize) -> CodeIndex {
        let code_lookup = self.code_lookup;
        let Some(info) = code_lookup.find_code(pc) else {
            log::trace!("No code object for pc {:#x}", pc);
            let key = CodeKey::Unknown(pc);
            if let Some(index) = self.codes.get_index_of(&key) {
                return index;
            }
            let function = self.intern_function(FunctionKey::Unknown(pc), || ProfileFunction {
                name: format!("[unknown {:#x}]", pc),
                known: false,
            });
            let (index, _) = self.codes.insert_full(
                key,
                ProfileCode {
                    start: pc,
                    name: format!("[unknown {:#x}]", pc),
                    function,
                    known: false,
                },
            );
            return index;
        };

        let key = CodeKey::Known(info.start);
        if let Some(index) = self.codes.get_index_of(&key) {
            return index;
        }
        let function = self.intern_function(FunctionKey::Known(info.function_id), || {
            ProfileFunction {
                name: info.function_name.to_owned(),
                known: true,
            }
        });
        let (index, _) = self.codes.insert_full(
            key,
            ProfileCode {
                start: info.start,
                name: info.name.to_owned(),
                function,
                known: true,
            },
        );
        index
    }

    fn intern_function(
        &mut self,
        key: FunctionKey,
        make: impl FnOnce() -> ProfileFunction,
    ) -> FunctionIndex {
        match self.functions.get_index_of(&key) {
            Some(index) => index,
            None => self.functions.insert_full(key, make()).0,
        }
    }

    fn intern_tag(&mut self, key: TagKey) -> TagIndex {
        if let Some(index) = self.tags.get_index_of(&key) {
            return index;
        }
        let code_lookup = self.code_lookup;
        let tag = match key {
            TagKey::Vm(tag) => ProfileTag {
                tag,
                name: code_lookup
                    .vm_tag_name(tag)
                    .map_or_else(|| format!("[vm tag {:#x}]", tag), str::to_owned),
                user: false,
            },
            TagKey::User(tag) => ProfileTag {
                tag,
                name: code_lookup
                    .user_tag_name(tag)
                    .map_or_else(|| format!("[user tag {:#x}]", tag), str::to_owned),
                user: true,
            },
        };
        self.tags.insert_full(key, tag).0
    }

    /// Tag nodes for `sample` in inclusive (outermost first) order.
    fn tag_keys(&mut self, sample: &Sample, tag_policy: TagPolicy, keys: &mut Vec<NodeKey>) {
        keys.clear();
        let user = TagKey::User(sample.user_tag());
        let vm = TagKey::Vm(sample.vm_tag());
        let order = match tag_policy {
            TagPolicy::NoTags => [None, None],
            TagPolicy::UserOnly => [Some(user), None],
            TagPolicy::VmOnly => [Some(vm), None],
            TagPolicy::UserVm => [Some(user), Some(vm)],
            TagPolicy::VmUser => [Some(vm), Some(user)],
        };
        for key in order.into_iter().flatten() {
            let (TagKey::Vm(tag) | TagKey::User(tag)) = key;
            if tag == 0 {
                continue;
            }
            keys.push(NodeKey::Tag(self.intern_tag(key)));
        }
    }

    /// Number of samples accepted by the last `build`.
    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn trie(&self, kind: TrieKind) -> &ProfileTrie {
        &self.tries[kind.index()]
    }

    pub fn code(&self, index: CodeIndex) -> Option<&ProfileCode> {
        self.codes.get_index(index).map(|(_, code)| code)
    }

    pub fn function(&self, index: FunctionIndex) -> Option<&ProfileFunction> {
        self.functions.get_index(index).map(|(_, function)| function)
    }

    pub fn tag(&self, index: TagIndex) -> Option<&ProfileTag> {
        self.tags.get_index(index).map(|(_, tag)| tag)
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// Display name of a node identity.
    pub fn name_of(&self, key: NodeKey) -> Option<&str> {
        match key {
            NodeKey::Code(index) => self.code(index).map(|c| c.name.as_str()),
            NodeKey::Function(index) => self.function(index).map(|f| f.name.as_str()),
            NodeKey::Tag(index) => self.tag(index).map(|t| t.name.as_str()),
        }
    }
}

impl std::fmt::Debug for Profile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Profile")
            .field("sample_count", &self.sample_count)
            .field("codes", &self.codes)
            .field("functions", &self.functions)
            .field("tags", &self.tags)
            .field("tries", &self.tries)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::CodeTable;
    use crate::filter::ContextFilter;
    use crate::sample::ContextId;

    const CONTEXT: Option<ContextId> = ContextId::new(1);

    fn record<'a>(buffer: &'a SampleBuffer, pcs: &[usize]) -> &'a Sample {
        let sample = buffer.reserve_sample();
        sample.init(CONTEXT.unwrap(), 0, 0);
        for (depth, pc) in pcs.iter().enumerate() {
            sample.set_at(depth, *pc);
        }
        sample
    }

    fn names(profile: &Profile, trie: &ProfileTrie, index: NodeIndex) -> Vec<String> {
        trie.node(index)
            .children()
            .map(|child| {
                let key = trie.node(child).key().unwrap();
                profile.name_of(key).unwrap().to_owned()
            })
            .collect()
    }

    fn table() -> CodeTable {
        let mut table = CodeTable::new();
        table.add_function_code(0x100, 0x200, "leaf").unwrap();
        table.add_function_code(0x200, 0x300, "middle").unwrap();
        table.add_function_code(0x300, 0x400, "main").unwrap();
        table
    }

    #[test]
    fn test_empty_build() {
        let buffer = SampleBuffer::new(4, 8);
        let table = table();
        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);

        assert_eq!(profile.sample_count(), 0);
        for kind in TrieKind::ALL {
            let trie = profile.trie(kind);
            assert!(trie.is_empty());
            assert_eq!(trie.root().inclusive_count(), 0);
        }
    }

    #[test]
    fn test_shared_prefixes_and_counts() {
        let buffer = SampleBuffer::new(8, 8);
        let table = table();
        record(&buffer, &[0x110, 0x210, 0x310]);
        record(&buffer, &[0x120, 0x210, 0x310]);
        record(&buffer, &[0x220, 0x310]);

        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);
        assert_eq!(profile.sample_count(), 3);

        // Both leaf pcs fall into the same code object.
        let trie = profile.trie(TrieKind::ExclusiveCode);
        assert_eq!(names(&profile, trie, ProfileTrie::ROOT), ["leaf", "middle"]);
        let leaf = trie.root().child_at(0).unwrap();
        assert_eq!(trie.node(leaf).exclusive_count(), 2);
        assert_eq!(trie.node(leaf).inclusive_count(), 2);
        let middle = trie.root().child_at(1).unwrap();
        assert_eq!(trie.node(middle).exclusive_count(), 1);
        assert_eq!(names(&profile, trie, middle), ["main"]);

        let trie = profile.trie(TrieKind::InclusiveCode);
        assert_eq!(trie.root().inclusive_count(), 3);
        assert_eq!(names(&profile, trie, ProfileTrie::ROOT), ["main"]);
        let main = trie.root().child_at(0).unwrap();
        assert_eq!(trie.node(main).inclusive_count(), 3);
        assert_eq!(trie.node(main).exclusive_count(), 0);
        let middle = trie.node(main).child_at(0).unwrap();
        assert_eq!(trie.node(middle).inclusive_count(), 3);
        assert_eq!(trie.node(middle).exclusive_count(), 1);
        assert_eq!(names(&profile, trie, middle), ["leaf"]);
        assert_eq!(trie.node(middle).parent(), Some(main));
    }

    fn walk(profile: &Profile, kind: TrieKind) -> Vec<Vec<String>> {
        // Every root-to-leaf path, in first-seen order.
        fn visit(
            profile: &Profile,
            trie: &ProfileTrie,
            index: NodeIndex,
            path: &mut Vec<String>,
            out: &mut Vec<Vec<String>>,
        ) {
            let node = trie.node(index);
            if let Some(key) = node.key() {
                path.push(profile.name_of(key).unwrap().to_owned());
            }
            if node.child_count() == 0 {
                out.push(path.clone());
            }
            for child in node.children() {
                visit(profile, trie, child, path, out);
            }
            if node.key().is_some() {
                path.pop();
            }
        }
        let mut out = vec![];
        visit(profile, profile.trie(kind), ProfileTrie::ROOT, &mut vec![], &mut out);
        out
    }

    #[test]
    fn test_function_tries_match_code_tries_for_recursion() {
        let buffer = SampleBuffer::new(4, 8);
        let mut table = CodeTable::new();
        table.add_function_code(0x100, 0x200, "fib").unwrap();
        table.add_function_code(0x300, 0x400, "main").unwrap();

        record(&buffer, &[0x110, 0x120, 0x310]);
        record(&buffer, &[0x130, 0x310]);

        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);

        assert_eq!(
            walk(&profile, TrieKind::ExclusiveCode),
            [vec!["fib", "fib", "main"], vec!["fib", "main"]]
        );
        assert_eq!(
            walk(&profile, TrieKind::ExclusiveFunction),
            walk(&profile, TrieKind::ExclusiveCode)
        );
        assert_eq!(
            walk(&profile, TrieKind::InclusiveFunction),
            walk(&profile, TrieKind::InclusiveCode)
        );
        assert_eq!(
            profile.trie(TrieKind::ExclusiveFunction).len(),
            profile.trie(TrieKind::ExclusiveCode).len()
        );
    }

    #[test]
    fn test_function_tries_merge_sibling_code_objects() {
        let buffer = SampleBuffer::new(4, 8);
        let mut table = CodeTable::new();
        let fib = table.add_function("fib");
        table.add_code(0x100, 0x200, "fib (unoptimized)", fib).unwrap();
        table.add_code(0x200, 0x300, "fib (optimized)", fib).unwrap();
        table.add_function_code(0x300, 0x400, "main").unwrap();

        record(&buffer, &[0x110, 0x310]);
        record(&buffer, &[0x210, 0x310]);

        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);
        assert_eq!(profile.code_count(), 3);
        assert_eq!(profile.function_count(), 2);

        let trie = profile.trie(TrieKind::ExclusiveCode);
        assert_eq!(
            names(&profile, trie, ProfileTrie::ROOT),
            ["fib (unoptimized)", "fib (optimized)"]
        );

        let trie = profile.trie(TrieKind::ExclusiveFunction);
        assert_eq!(names(&profile, trie, ProfileTrie::ROOT), ["fib"]);
        let fib = trie.root().child_at(0).unwrap();
        assert_eq!(trie.node(fib).exclusive_count(), 2);
        assert_eq!(names(&profile, trie, fib), ["main"]);
        assert_eq!(trie.len(), 3);

        let trie = profile.trie(TrieKind::InclusiveCode);
        let main = trie.root().child_at(0).unwrap();
        assert_eq!(trie.node(main).child_count(), 2);

        let trie = profile.trie(TrieKind::InclusiveFunction);
        let main = trie.root().child_at(0).unwrap();
        assert_eq!(names(&profile, trie, main), ["fib"]);
        let fib = trie.node(main).child_at(0).unwrap();
        assert_eq!(trie.node(fib).inclusive_count(), 2);
        assert_eq!(trie.node(fib).exclusive_count(), 2);
    }

    #[test]
    fn test_unknown_frames() {
        let buffer = SampleBuffer::new(2, 8);
        let table = table();
        record(&buffer, &[0x9000, 0x310]);

        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);

        let trie = profile.trie(TrieKind::ExclusiveCode);
        assert_eq!(names(&profile, trie, ProfileTrie::ROOT), ["[unknown 0x9000]"]);
        let trie = profile.trie(TrieKind::InclusiveFunction);
        let main = trie.root().child_at(0).unwrap();
        assert_eq!(names(&profile, trie, main), ["[unknown 0x9000]"]);
        assert!(!profile.code(0).unwrap().known);
    }

    #[test]
    fn test_tag_policy() {
        let buffer = SampleBuffer::new(2, 8);
        let mut table = table();
        table.add_vm_tag(1, "Interpreted");
        table.add_user_tag(2, "Render");
        let sample = record(&buffer, &[0x110, 0x310]);
        sample.set_vm_tag(1);
        sample.set_user_tag(2);

        let mut profile = Profile::new(&buffer, &table);
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::UserVm);

        let trie = profile.trie(TrieKind::InclusiveCode);
        let mut path = vec![];
        let mut current = ProfileTrie::ROOT;
        while let Some(child) = trie.node(current).child_at(0) {
            path.push(profile.name_of(trie.node(child).key().unwrap()).unwrap());
            current = child;
        }
        assert_eq!(path, ["Render", "Interpreted", "main", "leaf"]);
        assert_eq!(trie.node(current).exclusive_count(), 1);

        let trie = profile.trie(TrieKind::ExclusiveCode);
        let mut path = vec![];
        let mut current = ProfileTrie::ROOT;
        while let Some(child) = trie.node(current).child_at(0) {
            path.push(profile.name_of(trie.node(child).key().unwrap()).unwrap());
            current = child;
        }
        assert_eq!(path, ["leaf", "main", "Interpreted", "Render"]);

        // Rebuilding with no tags drops the tag nodes.
        profile.build(&ContextFilter::new(CONTEXT.unwrap()), TagPolicy::NoTags);
        assert_eq!(profile.trie(TrieKind::InclusiveCode).len(), 3);
    }

    #[test]
    fn test_tag_policy_from_str() {
        assert_eq!("VMUser".parse(), Ok(TagPolicy::VmUser));
        assert_eq!("None".parse(), Ok(TagPolicy::NoTags));
        assert_eq!(
            "bogus".parse::<TagPolicy>(),
            Err(ParseTagPolicyError("bogus".to_owned()))
        );
        assert_eq!(
            ParseTagPolicyError("bogus".to_owned()).to_string(),
            "unknown tag policy 'bogus' (expected None, UserOnly, VMOnly, UserVM or VMUser)"
        );
    }
}
