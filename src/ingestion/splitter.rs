use crate::constants::{CHUNK_OVERLAP, CHUNK_SIZE};

/// One chunk of source text with its character offset in the original.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub start_index: usize,
}

/// Splits text into fixed-size overlapping windows, measured in characters.
#[derive(Clone, Copy, Debug)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_overlap: CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// `chunk_overlap` must be strictly smaller than `chunk_size` or the
    /// window would never advance.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> anyhow::Result<Self> {
        anyhow::ensure!(chunk_size > 0, "chunk_size must be positive");
        anyhow::ensure!(
            chunk_overlap < chunk_size,
            "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
        );
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size - self.chunk_overlap;
        let mut chunks = Vec::new();
        let mut start = 0;
        loop {
            let end = (start + self.chunk_size).min(chars.len());
            chunks.push(Chunk {
                text: chars[start..end].iter().collect(),
                start_index: start,
            });
            if end == chars.len() {
                break;
            }
            start += step;
        }
        chunks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_one_chunk() {
        let splitter = TextSplitter::new(10, 2).unwrap();
        let chunks = splitter.split("hello");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "hello");
        assert_eq!(chunks[0].start_index, 0);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(TextSplitter::default().split("").is_empty());
    }

    #[test]
    fn windows_overlap_by_configured_amount() {
        let splitter = TextSplitter::new(5, 2).unwrap();
        let chunks = splitter.split("abcdefghij");
        assert_eq!(chunks[0].text, "abcde");
        assert_eq!(chunks[1].text, "defgh");
        assert_eq!(chunks[1].start_index, 3);
        // every character is covered
        assert_eq!(chunks.last().unwrap().text.chars().last(), Some('j'));
    }

    #[test]
    fn splits_on_character_boundaries_not_bytes() {
        let splitter = TextSplitter::new(4, 1).unwrap();
        let chunks = splitter.split("école déjà");
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 4);
        }
        assert_eq!(chunks[0].text, "écol");
    }

    #[test]
    fn overlap_must_be_smaller_than_size() {
        assert!(TextSplitter::new(5, 5).is_err());
        assert!(TextSplitter::new(0, 0).is_err());
    }
}
