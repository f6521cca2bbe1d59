//! Per-file content snapshot with running line offset

/// Content of one file during a run
///
/// Work items keep the line numbers observed at parse time. `offset` counts
/// the lines inserted into this file so far, so an item's current line is
/// always `original_line + offset`. Splices must be applied in ascending
/// original-line order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileState {
    original: String,
    content: String,
    offset: usize,
}

impl FileState {
    pub fn new(content: String) -> Self {
        Self {
            original: content.clone(),
            content,
            offset: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.original
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Insert `comment` on its own lines directly above `original_line`
    ///
    /// Returns the (1-based) line the comment now starts on. Lines past the
    /// end of the file append the comment at the end.
    pub fn splice(&mut self, original_line: usize, comment: &str) -> usize {
        let insert_line = original_line + self.offset;
        let crlf = self.content.contains("\r\n");

        let mut block = if crlf {
            comment.replace("\r\n", "\n").replace('\n', "\r\n")
        } else {
            comment.to_string()
        };
        let line_ending = if crlf { "\r\n" } else { "\n" };

        match self.line_start(insert_line) {
            Some(byte_index) => {
                block.push_str(line_ending);
                self.content.insert_str(byte_index, &block);
            }
            None => {
                if !self.content.is_empty() && !self.content.ends_with('\n') {
                    self.content.push_str(line_ending);
                }
                self.content.push_str(&block);
                self.content.push_str(line_ending);
            }
        }

        self.offset += comment.matches('\n').count() + 1;
        insert_line.max(1)
    }

    /// Byte index where 1-based `line` begins, `None` past the end
    fn line_start(&self, line: usize) -> Option<usize> {
        if line <= 1 {
            return Some(0);
        }
        let index = self
            .content
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)?;
        (index < self.content.len()).then_some(index)
    }
}
