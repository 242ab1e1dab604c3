//! Character-window text splitter.

/// Split `text` into chunks of at most `chunk_size` characters, with
/// consecutive chunks sharing up to `overlap` characters.
///
/// Inside each window the split point is the last paragraph break, else the
/// last line break, else the last space. A window with none of these is cut
/// at exactly `chunk_size`. Chunks are trimmed and empty chunks dropped.
///
/// ```
/// use triage::retrieval::chunk_text;
///
/// let chunks = chunk_text("first paragraph\n\nsecond paragraph", 20, 0);
/// assert_eq!(chunks, vec!["first paragraph", "second paragraph"]);
/// ```
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let overlap = overlap.min(chunk_size - 1);
    let chars: Vec<char> = text.chars().collect();

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let hard_end = (start + chunk_size).min(chars.len());
        let end = if hard_end == chars.len() {
            hard_end
        } else {
            // A split point must leave room for progress after the overlap.
            let floor = start + overlap + 1;
            split_point(&chars, start, hard_end, floor).unwrap_or(hard_end)
        };

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end == chars.len() {
            break;
        }
        start = end - overlap;
    }

    chunks
}

/// End index (exclusive) of the preferred split inside `chars[start..end]`.
fn split_point(chars: &[char], start: usize, end: usize, floor: usize) -> Option<usize> {
    let window = &chars[start..end];

    let paragraph = window
        .windows(2)
        .rposition(|pair| pair == ['\n', '\n'])
        .map(|i| start + i + 2);
    let line = window.iter().rposition(|&c| c == '\n').map(|i| start + i + 1);
    let word = window.iter().rposition(|&c| c == ' ').map(|i| start + i + 1);

    [paragraph, line, word]
        .into_iter()
        .flatten()
        .find(|&candidate| candidate >= floor)
}
