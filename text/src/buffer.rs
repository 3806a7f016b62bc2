//! A text buffer: gap store, edit history and file identity.

use crate::{
    clock::{SystemTicks, TickSource},
    error::{Result, TextError},
    gap::{align_up, GapStore},
    history::{Edit, EditHistory, HistoryOptions},
    lines::Lines,
    utf8::{is_char_start, next_tab_stop},
};
use smol_str::SmolStr;
use std::{
    borrow::Cow,
    fmt,
    io::Write,
    ops::Range,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, warn};

/// Minimum backing capacity for named buffers and the slack added to file buffers.
pub const DEFAULT_INITIAL_GAP: usize = 4096;

const C_EXTENSIONS: &[&str] = &["c", "C", "cpp", "cxx", "c++", "cc", "h", "hpp", "hxx", "h++", "H"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextBufferKind {
    TextFile,
    /// C or C++ source; gets scope-based indentation.
    CFile,
    Scratch,
    /// Input fields: a one-line buffer with no file behind it.
    SingleLine,
}

impl TextBufferKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if C_EXTENSIONS.contains(&ext) => Self::CFile,
            _ => Self::TextFile,
        }
    }
}

/// 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Display for LineCol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferOptions {
    pub history: HistoryOptions,
    pub initial_gap: usize,
}

impl Default for BufferOptions {
    fn default() -> Self {
        Self {
            history: HistoryOptions::default(),
            initial_gap: DEFAULT_INITIAL_GAP,
        }
    }
}

pub struct TextBuffer {
    kind: TextBufferKind,
    store: GapStore,
    history: EditHistory,
    clock: Arc<dyn TickSource + Send + Sync>,
    path: Option<PathBuf>,
    name: SmolStr,
}

impl TextBuffer {
    /// Create a buffer holding `contents` with no file behind it.
    pub fn from_text(
        kind: TextBufferKind,
        contents: &[u8],
        name: impl Into<SmolStr>,
        options: &BufferOptions,
    ) -> Result<Self> {
        let capacity = align_up(contents.len()).max(options.initial_gap);
        Ok(Self {
            kind,
            store: GapStore::with_capacity(contents, capacity)?,
            history: EditHistory::new(options.history),
            clock: Arc::new(SystemTicks::new()),
            path: None,
            name: name.into(),
        })
    }

    /// Read `path` into a new buffer.
    pub fn load(path: impl AsRef<Path>, options: &BufferOptions) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read(path).map_err(|err| {
            warn!(path = %path.display(), %err, "failed to read file");
            TextError::io(path, err)
        })?;
        let capacity = align_up(contents.len()) + options.initial_gap;
        debug!(path = %path.display(), size = contents.len(), capacity, "loaded buffer");

        let name = path
            .file_name()
            .map(|name| SmolStr::new(name.to_string_lossy()))
            .unwrap_or_default();
        Ok(Self {
            kind: TextBufferKind::from_path(path),
            store: GapStore::with_capacity(&contents, capacity)?,
            history: EditHistory::new(options.history),
            clock: Arc::new(SystemTicks::new()),
            path: Some(path.to_path_buf()),
            name,
        })
    }

    /// Replace the tick source used for coalescing.
    pub fn with_clock(mut self, clock: Arc<dyn TickSource + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> TextBufferKind {
        self.kind
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &GapStore {
        &self.store
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn full_range(&self) -> Range<usize> {
        0..self.len()
    }

    pub fn sample(&self, offset: usize) -> u8 {
        self.store.sample(offset)
    }

    pub fn get_strings(&self) -> (&[u8], &[u8]) {
        self.store.get_strings()
    }

    pub fn write_range_to_buffer(&self, range: Range<usize>, out: &mut [u8]) -> usize {
        self.store.write_range_to_buffer(range, out)
    }

    /// The bytes of `range`, borrowed when they do not straddle the gap.
    pub fn string_from_range(&self, range: Range<usize>) -> Cow<'_, [u8]> {
        match self.store.range_slices(range) {
            (left, []) => Cow::Borrowed(left),
            (left, right) => Cow::Owned([left, right].concat()),
        }
    }

    /// The bytes of `range` as one slice, moving the gap if it is in the way.
    pub fn contiguous_range(&mut self, range: Range<usize>) -> &[u8] {
        self.store.contiguous_range(range)
    }

    pub fn write_to_vec(&self) -> Vec<u8> {
        self.store.to_vec()
    }

    pub fn lines(&self) -> Lines<'_> {
        self.store.lines()
    }

    pub fn line_count(&self) -> usize {
        self.store.line_count()
    }

    /// 1-based display column of `offset`. Tabs advance to the next tab stop and
    /// continuation bytes take no space.
    pub fn col_from_offset(&self, offset: usize, tab_width: usize) -> usize {
        let mut col = 0;
        for it in self.store.line_start(offset)..offset {
            match self.store.sample(it) {
                b'\t' => col = next_tab_stop(col, tab_width),
                byte if is_char_start(byte) => col += 1,
                _ => {},
            }
        }
        col + 1
    }

    pub fn line_col_from_offset(&self, offset: usize, tab_width: usize) -> LineCol {
        LineCol {
            line: self.store.count_newlines_in_range(0..offset) + 1,
            col: self.col_from_offset(offset, tab_width),
        }
    }

    /// Offset of a 1-based line and column.
    ///
    /// Columns are counted the way `col_from_offset` counts them and the walk
    /// only stops at the start of a scalar value. A column inside a tab lands
    /// after the tab. A column past the end of the line stops at the line
    /// break and a line past the end stops at the end of the buffer.
    pub fn offset_from_line_col(&self, pos: LineCol, tab_width: usize) -> usize {
        let len = self.len();
        let mut it = 0;
        let mut line = 1;
        while line < pos.line && it < len {
            if self.store.sample(it) == b'\n' {
                line += 1;
            }
            it += 1;
        }
        if line == pos.line {
            let target = pos.col.saturating_sub(1);
            let mut col = 0;
            while it < len {
                let byte = self.store.sample(it);
                if is_char_start(byte) {
                    if col >= target || byte == b'\n' {
                        break;
                    }
                    col = match byte {
                        b'\t' => next_tab_stop(col, tab_width),
                        _ => col + 1,
                    };
                }
                it += 1;
            }
        }
        it
    }

    pub fn insert(&mut self, offset: usize, text: &[u8]) -> Result<()> {
        self.history
            .record_insert(&mut self.store, offset, text, &*self.clock)
    }

    pub fn delete(&mut self, offset: usize, len: usize) -> Result<()> {
        self.history
            .record_delete(&mut self.store, offset, len, &*self.clock)
    }

    /// Swap two disjoint ranges as a single undoable edit.
    pub fn transpose(&mut self, first: Range<usize>, second: Range<usize>) -> Result<()> {
        self.history
            .record_transpose(&mut self.store, first, second, &*self.clock)
    }

    /// Replace `range` with `text`. Logged as a delete followed by an insert.
    ///
    /// Everything both steps need is reserved up front, so a failed
    /// allocation leaves the buffer untouched.
    pub fn replace(&mut self, range: Range<usize>, text: &[u8]) -> Result<()> {
        self.store.reserve(text.len())?;
        self.history.reserve(2, range.len() + text.len())?;
        self.delete(range.start, range.len())?;
        self.insert(range.start, text)
    }

    pub fn undo(&mut self) -> Result<Option<Edit>> {
        self.history.undo(&mut self.store)
    }

    pub fn redo(&mut self) -> Result<Option<Edit>> {
        self.history.redo(&mut self.store)
    }

    pub fn dirty_range(&self) -> Option<Range<usize>> {
        self.store.dirty_range()
    }

    pub fn clear_dirty(&mut self) {
        self.store.clear_dirty();
    }

    /// Write the buffer to its file through a temporary file in the same
    /// directory, then atomically replace the target.
    pub fn save_to_disk(&self) -> Result<()> {
        let path = self.path.as_deref().ok_or(TextError::NoFilePath)?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|err| TextError::io(dir, err))?;
        let (left, right) = self.store.get_strings();
        file.write_all(left)
            .and_then(|()| file.write_all(right))
            .and_then(|()| file.flush())
            .map_err(|err| TextError::io(file.path(), err))?;
        file.persist(path).map_err(|err| {
            warn!(path = %path.display(), err = %err.error, "failed to replace file");
            TextError::io(path, err.error)
        })?;

        debug!(path = %path.display(), size = self.len(), "saved buffer");
        Ok(())
    }
}

impl fmt::Debug for TextBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextBuffer")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("path", &self.path)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}
