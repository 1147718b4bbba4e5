use crate::error::CodeTableError;
use crate::sample::Tag;

/// Identifies a logical function. Several code objects (e.g. unoptimized and
/// optimized compilations) may belong to the same function.
pub type FunctionId = usize;

/// A code object covering a pc, as reported by a [`CodeLookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeInfo<'a> {
    /// Entry address; identifies the code object.
    pub start: usize,
    pub name: &'a str,
    pub function_id: FunctionId,
    pub function_name: &'a str,
}

/// Maps raw frame addresses to code objects.
///
/// The runtime's code/function metadata lives outside of the profiler; this is
/// the only thing a profile needs from it.
pub trait CodeLookup {
    fn find_code(&self, pc: usize) -> Option<CodeInfo<'_>>;

    fn vm_tag_name(&self, _tag: Tag) -> Option<&str> {
        None
    }

    fn user_tag_name(&self, _tag: Tag) -> Option<&str> {
        None
    }
}

#[derive(Debug)]
struct CodeRegion {
    start: usize,
    end: usize,
    name: String,
    function_id: FunctionId,
}

/// A sorted table of non-overlapping `[start, end)` code ranges.
#[derive(Debug, Default)]
pub struct CodeTable {
    // Sorted by `start`.
    regions: Vec<CodeRegion>,
    functions: Vec<String>,
    vm_tags: Vec<(Tag, String)>,
    user_tags: Vec<(Tag, String)>,
}

impl CodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_function(&mut self, name: &str) -> FunctionId {
        self.functions.push(name.to_owned());
        self.functions.len() - 1
    }

    /// Registers a code object belonging to `function_id`.
    pub fn add_code(
        &mut self,
        start: usize,
        end: usize,
        name: &str,
        function_id: FunctionId,
    ) -> Result<(), CodeTableError> {
        if start >= end {
            return Err(CodeTableError::EmptyRange { start, end });
        }
        if function_id >= self.functions.len() {
            return Err(CodeTableError::UnknownFunction(function_id));
        }

        let position = self.regions.partition_point(|r| r.start < start);
        let overlaps_previous = position > 0 && self.regions[position - 1].end > start;
        let overlaps_next = self.regions.get(position).is_some_and(|r| r.start < end);
        if overlaps_previous || overlaps_next {
            return Err(CodeTableError::Overlap { start, end });
        }

        self.regions.insert(
            position,
            CodeRegion {
                start,
                end,
                name: name.to_owned(),
                function_id,
            },
        );
        Ok(())
    }

    /// Registers a function with a single code object of the same name.
    pub fn add_function_code(
        &mut self,
        start: usize,
        end: usize,
        name: &str,
    ) -> Result<FunctionId, CodeTableError> {
        let function_id = self.add_function(name);
        match self.add_code(start, end, name, function_id) {
            Ok(()) => Ok(function_id),
            Err(e) => {
                self.functions.pop();
                Err(e)
            }
        }
    }

    pub fn add_vm_tag(&mut self, tag: Tag, name: &str) {
        self.vm_tags.push((tag, name.to_owned()));
    }

    pub fn add_user_tag(&mut self, tag: Tag, name: &str) {
        self.user_tags.push((tag, name.to_owned()));
    }
}

impl CodeLookup for CodeTable {
    fn find_code(&self, pc: usize) -> Option<CodeInfo<'_>> {
        let position = self.regions.partition_point(|r| r.start <= pc);
        let region = self.regions[..position].last()?;
        if pc >= region.end {
            return None;
        }
        Some(CodeInfo {
            start: region.start,
            name: &region.name,
            function_id: region.function_id,
            function_name: &self.functions[region.function_id],
        })
    }

    fn vm_tag_name(&self, tag: Tag) -> Option<&str> {
        self.vm_tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| name.as_str())
    }

    fn user_tag_name(&self, tag: Tag) -> Option<&str> {
        self.user_tags
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, name)| name.as_str())
    }
}
