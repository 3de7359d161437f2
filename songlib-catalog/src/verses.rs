//! Verse splitting
//!
//! Lyric text is stored as one string with verses separated by a blank line
//! (two consecutive newlines). Verses are derived on every read and never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::pagination::PageRequest;

/// Verse delimiter: a blank line
pub const VERSE_DELIMITER: &str = "\n\n";

/// One numbered verse of a song
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// 1-based position in the song
    pub number: usize,
    /// Verse text, trimmed of surrounding whitespace
    pub text: String,
}

/// Split lyric text into trimmed verse strings
///
/// CRLF line endings are treated as LF. Every delimiter-separated segment is
/// a verse, including empty ones: empty text is a single empty verse, and a
/// run of four newlines leaves an empty verse between its neighbours.
pub fn split_verses(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split(VERSE_DELIMITER)
        .map(|verse| verse.trim().to_string())
        .collect()
}

/// Return one page of numbered verses
///
/// A page starting past the last verse is empty, not an error.
pub fn paginate_verses(text: &str, page: PageRequest) -> Vec<Verse> {
    let verses = split_verses(text);
    let (start, end) = page.slice_bounds(verses.len());

    verses
        .into_iter()
        .enumerate()
        .skip(start)
        .take(end - start)
        .map(|(index, text)| Verse {
            number: index + 1,
            text,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FALLBACK_TEXT: &str = "Verse 1\n\nVerse 2\n\nVerse 3";

    fn page(page: u32, limit: u32) -> PageRequest {
        PageRequest::new(page, limit).unwrap()
    }

    #[test]
    fn test_split_basic() {
        assert_eq!(split_verses(FALLBACK_TEXT), vec!["Verse 1", "Verse 2", "Verse 3"]);
    }

    #[test]
    fn test_split_trims_each_verse() {
        let text = "  line one\nline two  \n\n\n  chorus \n";
        assert_eq!(split_verses(text), vec!["line one\nline two", "chorus"]);
    }

    #[test]
    fn test_split_crlf() {
        assert_eq!(split_verses("a\r\n\r\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_split_empty_text_is_one_empty_verse() {
        assert_eq!(split_verses(""), vec![""]);
        assert_eq!(split_verses("   "), vec![""]);
        // One empty verse per delimiter segment
        assert_eq!(split_verses(" \n\n \n"), vec!["", ""]);
    }

    #[test]
    fn test_split_keeps_interior_empty_verse() {
        assert_eq!(split_verses("a\n\n\n\nb"), vec!["a", "", "b"]);
    }

    #[test]
    fn test_split_single_verse() {
        assert_eq!(split_verses("only\none verse"), vec!["only\none verse"]);
    }

    #[test]
    fn test_rejoin_reconstructs_trimmed_text() {
        let samples = [
            FALLBACK_TEXT,
            "Ooh baby, don't you know I suffer?\nOoh baby, can you hear me moan?\n\nYou caught me under false pretenses",
            "  padded  \n\n  verses  ",
            "a\n\n\n\nb",
        ];

        for text in samples {
            let verses = split_verses(text);
            let rejoined = verses.join(VERSE_DELIMITER);
            let expected: Vec<String> = text
                .split(VERSE_DELIMITER)
                .map(|v| v.trim().to_string())
                .collect();
            assert_eq!(rejoined, expected.join(VERSE_DELIMITER), "round trip of {:?}", text);
        }
    }

    #[test]
    fn test_paginate_first_and_second_page() {
        assert_eq!(
            paginate_verses(FALLBACK_TEXT, page(1, 2)),
            vec![
                Verse { number: 1, text: "Verse 1".to_string() },
                Verse { number: 2, text: "Verse 2".to_string() },
            ]
        );
        assert_eq!(
            paginate_verses(FALLBACK_TEXT, page(2, 2)),
            vec![Verse { number: 3, text: "Verse 3".to_string() }]
        );
    }

    #[test]
    fn test_paginate_past_end_is_empty() {
        assert!(paginate_verses(FALLBACK_TEXT, page(3, 2)).is_empty());
        assert!(paginate_verses(FALLBACK_TEXT, page(2, 3)).is_empty());
        assert!(paginate_verses("", page(2, 1)).is_empty());
    }

    #[test]
    fn test_paginate_empty_text() {
        assert_eq!(
            paginate_verses("", page(1, 1)),
            vec![Verse { number: 1, text: String::new() }]
        );
    }

    #[test]
    fn test_paginate_ordinals_are_consecutive_and_bounded() {
        let text = (1..=17)
            .map(|i| format!("verse {}", i))
            .collect::<Vec<_>>()
            .join("\n\n");

        for limit in 1..=6 {
            for p in 1..=20 {
                let verses = paginate_verses(&text, page(p, limit));
                assert!(verses.len() <= limit as usize);

                let start = ((p - 1) * limit) as usize;
                if start >= 17 {
                    assert!(verses.is_empty());
                    continue;
                }
                for (offset, verse) in verses.iter().enumerate() {
                    assert_eq!(verse.number, start + offset + 1);
                    assert_eq!(verse.text, format!("verse {}", verse.number));
                }
            }
        }
    }

    #[test]
    fn test_paginate_huge_page_does_not_overflow() {
        assert!(paginate_verses(FALLBACK_TEXT, page(u32::MAX, u32::MAX)).is_empty());
    }
}
