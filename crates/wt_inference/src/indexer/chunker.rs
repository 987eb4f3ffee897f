use wt_core::config::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use wt_core::ArticleRecord;

/// Chunk size and overlap, both in words. Built through [`ChunkingConfig::new`]
/// so the overlap always stays below the size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Words between window starts; never zero, so splitting always advances.
    fn stride(&self) -> usize {
        self.chunk_size.saturating_sub(self.chunk_overlap).max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub ordinal: usize,
    pub title: String,
    pub text: String,
}

/// Splits the flattened content into overlapping word windows. Each chunk is
/// titled after the section heading in effect at its first word. Pages
/// without sections are chunked from their summary.
pub fn split_document(document: &ArticleRecord, config: ChunkingConfig) -> Vec<Chunk> {
    let source = if document.content.trim().is_empty() {
        &document.summary
    } else {
        &document.content
    };

    let mut headings: Vec<String> = Vec::new();
    let mut words: Vec<(&str, Option<usize>)> = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') {
            let heading = trimmed.trim_start_matches('#').trim();
            headings.push(heading.to_string());
        }
        let heading = headings.len().checked_sub(1);
        words.extend(line.split_whitespace().map(|w| (w, heading)));
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < words.len() {
        let end = (start + config.chunk_size.max(1)).min(words.len());
        let text = words[start..end].iter().map(|(w, _)| *w).collect::<Vec<_>>().join(" ");
        let title = match words[start].1 {
            Some(i) if !headings[i].is_empty() => format!("{} - {}", document.title, headings[i]),
            _ => document.title.clone(),
        };
        chunks.push(Chunk {
            ordinal: chunks.len(),
            title,
            text,
        });
        if end == words.len() {
            break;
        }
        start += config.stride();
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(content: &str) -> ArticleRecord {
        ArticleRecord {
            title: "Doc".into(),
            summary: "lead text here".into(),
            content: content.into(),
            url: "https://example.org/Doc".into(),
            retrieval_date: String::new(),
        }
    }

    fn numbered(n: usize) -> String {
        (0..n).map(|i| format!("w{}", i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_windows_overlap() {
        let chunks = split_document(&document(&numbered(10)), ChunkingConfig::new(4, 1));
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["w0 w1 w2 w3", "w3 w4 w5 w6", "w6 w7 w8 w9"]);
        assert_eq!(chunks.iter().map(|c| c.ordinal).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_short_document_is_one_chunk() {
        let chunks = split_document(&document("just a few words"), ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "just a few words");
        assert_eq!(chunks[0].title, "Doc");
    }

    #[test]
    fn test_titles_follow_headings() {
        let content = "# History\n\na b c\n\n## Early\n\nd e f\n\n";
        let chunks = split_document(&document(content), ChunkingConfig::new(3, 0));
        let titles: Vec<&str> = chunks.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Doc - History", "Doc - History", "Doc - Early", "Doc - Early"]);
        assert_eq!(chunks[0].text, "# History a");
        assert_eq!(chunks[2].text, "Early d e");
    }

    #[test]
    fn test_empty_content_falls_back_to_summary() {
        let chunks = split_document(&document("  \n"), ChunkingConfig::default());
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "lead text here");

        let mut empty = document("");
        empty.summary.clear();
        assert!(split_document(&empty, ChunkingConfig::default()).is_empty());
    }

    #[test]
    fn test_config_clamps_overlap() {
        let config = ChunkingConfig::new(5, 9);
        assert_eq!(config.chunk_overlap(), 4);
        assert_eq!(config.stride(), 1);
        assert_eq!(ChunkingConfig::new(0, 0).chunk_size(), 1);
    }

    #[test]
    fn test_unclamped_config_still_advances() {
        for (chunk_size, chunk_overlap) in [(4, 4), (4, 9), (0, 0)] {
            let config = ChunkingConfig {
                chunk_size,
                chunk_overlap,
            };
            assert_eq!(config.stride(), 1);
            let chunks = split_document(&document(&numbered(6)), config);
            assert!(!chunks.is_empty() && chunks.len() <= 6, "{:?}", config);
            assert!(chunks.last().unwrap().text.ends_with("w5"));
        }
    }
}
