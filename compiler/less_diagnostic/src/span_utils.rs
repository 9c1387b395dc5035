//! Line and column computation for source indexes.
//!
//! Nodes only carry a byte index into their file. Errors surfaced to hosts
//! also want a 1-based line and column, which are derived here when the file
//! contents are available. For many lookups against the same file, build a
//! [`LineOffsetTable`] once.

/// Byte offsets of every line start in a source file.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// `offsets[n]` is the byte where line `n + 1` starts.
    offsets: Vec<usize>,
}

impl LineOffsetTable {
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0];
        offsets.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(i, _)| i + 1),
        );
        LineOffsetTable { offsets }
    }

    /// 1-based line containing `offset`.
    pub fn line_from_offset(&self, offset: usize) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx + 1).unwrap_or(u32::MAX)
    }

    /// 1-based `(line, column)`; the column counts characters, not bytes.
    pub fn offset_to_line_col(&self, source: &str, offset: usize) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self
            .offsets
            .get(line as usize - 1)
            .copied()
            .unwrap_or(0);
        (line, column_between(source, line_start, offset))
    }

    pub fn line_count(&self) -> usize {
        self.offsets.len()
    }
}

/// 1-based `(line, column)` for a single lookup.
pub fn offset_to_line_col(source: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut line_start = 0usize;
    for (i, byte) in source.bytes().enumerate().take(offset) {
        if byte == b'\n' {
            line += 1;
            line_start = i + 1;
        }
    }
    (line, column_between(source, line_start, offset))
}

fn column_between(source: &str, line_start: usize, offset: usize) -> u32 {
    let end = offset.min(source.len());
    let chars = source
        .get(line_start..end)
        .map_or(0, |text| text.chars().count());
    u32::try_from(chars).unwrap_or(u32::MAX - 1) + 1
}

#[cfg(test)]
mod tests;
