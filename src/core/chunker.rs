/// Sentence-bounded text chunker
///
/// Splits input on sentence terminators and greedily packs sentences into
/// chunks of at most `max_chunk_size` characters, seeding each new chunk
/// with the tail sentences of the previous one so context survives the
/// boundary.
pub struct TextChunker {
    max_chunk_size: usize,
    overlap_sentences: usize,
}

impl TextChunker {
    /// Create a chunker with default settings
    pub fn new() -> Self {
        Self {
            max_chunk_size: 1000,
            overlap_sentences: 2,
        }
    }

    /// Create a chunker with custom settings
    pub fn with_config(max_chunk_size: usize, overlap_sentences: usize) -> Self {
        Self {
            max_chunk_size,
            overlap_sentences,
        }
    }

    /// Split text into overlapping chunks
    ///
    /// A single sentence longer than `max_chunk_size` is emitted whole;
    /// over-long chunks are allowed, truncation is not. Never yields an
    /// empty chunk.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let sentences = split_sentences(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        // Sentences making up the chunk currently being built
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for sentence in &sentences {
            let added = sentence.len() + if current.is_empty() { 0 } else { 1 };
            if !current.is_empty() && current_len + added > self.max_chunk_size {
                chunks.push(current.join(" "));

                // Seed the next chunk with the tail of the one just closed
                let tail_start = current.len().saturating_sub(self.overlap_sentences);
                let carried: Vec<&str> = current[tail_start..].to_vec();
                current = carried;
                current_len = current.iter().map(|s| s.len()).sum::<usize>()
                    + current.len().saturating_sub(1);
            }

            current_len += sentence.len() + if current.is_empty() { 0 } else { 1 };
            current.push(sentence);
        }

        if !current.is_empty() {
            chunks.push(current.join(" "));
        }

        chunks
    }
}

impl Default for TextChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text on sentence terminators, keeping the terminator and
/// discarding blank fragments
fn split_sentences(text: &str) -> Vec<&str> {
    text.split_inclusive(|c: char| matches!(c, '.' | '!' | '?'))
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.chars().any(|c| c.is_alphanumeric()))
        .collect()
}
