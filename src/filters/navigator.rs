/// Owner of the current location.
///
/// The filter store reads filters from [`query`](Navigator::query) and writes
/// them back through [`replace`](Navigator::replace) or
/// [`push`](Navigator::push). A browser binding would forward these to the
/// history API.
pub trait Navigator {
    /// Current location, path plus query (`/?search=lamp`)
    fn location(&self) -> &str;

    /// Overwrite the current history entry
    fn replace(&mut self, href: &str);

    /// Add a new history entry
    fn push(&mut self, href: &str);

    /// Query part of the current location, without the `?`
    fn query(&self) -> &str {
        self.location()
            .split_once('?')
            .map(|(_, query)| query)
            .unwrap_or("")
    }
}

/// In-process history stack with back/forward
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Step back one entry; false at the start of history
    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Step forward one entry; false at the end of history
    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for MemoryHistory {
    fn location(&self) -> &str {
        &self.entries[self.index]
    }

    fn replace(&mut self, href: &str) {
        self.entries[self.index] = href.to_string();
    }

    fn push(&mut self, href: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(href.to_string());
        self.index += 1;
    }
}
