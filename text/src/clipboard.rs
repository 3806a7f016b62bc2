//! System clipboard seam.

/// Text clipboard provided by the platform layer.
pub trait Clipboard {
    /// Current clipboard text. Empty when the clipboard holds no text.
    fn get_text(&mut self) -> Vec<u8>;

    fn set_text(&mut self, text: &[u8]);
}

/// In-process clipboard for headless use and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    contents: Vec<u8>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> &[u8] {
        &self.contents
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Vec<u8> {
        self.contents.clone()
    }

    fn set_text(&mut self, text: &[u8]) {
        self.contents.clear();
        self.contents.extend_from_slice(text);
    }
}
