//! Character-based text splitting with overlap.

/// Split `text` into chunks of at most `chunk_size` characters, each
/// starting `chunk_overlap` characters before the previous one ended.
///
/// A chunk prefers to end after a paragraph break, then a line break, then
/// a space, as long as that keeps it at least half full; otherwise the cut
/// is hard. Chunks are trimmed and empty chunks dropped.
pub fn chunk_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    let size = chunk_size.max(1);
    let overlap = chunk_overlap.min(size - 1);
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < len {
        while start < len && chars[start].is_whitespace() {
            start += 1;
        }
        if start >= len {
            break;
        }

        let hard_end = (start + size).min(len);
        let end = if hard_end == len {
            len
        } else {
            find_break(&chars, start + size / 2, hard_end).unwrap_or(hard_end)
        };

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end >= len {
            break;
        }
        let next = end.saturating_sub(overlap);
        start = if next > start { next } else { end };
    }

    chunks
}

/// Position just after the last preferred separator in `chars[min..end]`.
fn find_break(chars: &[char], min: usize, end: usize) -> Option<usize> {
    let last_after = |pred: &dyn Fn(usize) -> bool, width: usize| {
        (min..end.saturating_sub(width - 1))
            .rev()
            .find(|&i| pred(i))
            .map(|i| i + width)
    };

    last_after(&|i| chars[i] == '\n' && chars[i + 1] == '\n', 2)
        .or_else(|| last_after(&|i| chars[i] == '\n', 1))
        .or_else(|| last_after(&|i| chars[i].is_whitespace(), 1))
}
