//! Document combination

use crate::types::{CombinedText, Fragment};

/// Separator between fragments, preserving paragraph boundaries
pub const FRAGMENT_SEPARATOR: &str = "\n\n";

/// Join fragments into one text blob
///
/// Accepts a plain fragment slice or a wrapper such as
/// [`LoadedContent`](crate::LoadedContent). Never fails: no fragments
/// yield an empty string, and a fragment without text contributes its
/// string form (see [`Fragment::content`]).
pub fn combine<F: AsRef<[Fragment]> + ?Sized>(fragments: &F) -> CombinedText {
    let text = fragments
        .as_ref()
        .iter()
        .map(|f| f.content())
        .collect::<Vec<_>>()
        .join(FRAGMENT_SEPARATOR);

    CombinedText { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{LoadedContent, VideoDetails};

    #[test]
    fn test_combine_empty() {
        let fragments: Vec<Fragment> = Vec::new();
        assert_eq!(combine(&fragments), CombinedText { text: String::new() });
    }

    #[test]
    fn test_combine_preserves_order() {
        let fragments = vec![Fragment::new("A"), Fragment::new("B")];
        assert_eq!(combine(&fragments).text, "A\n\nB");
    }

    #[test]
    fn test_combine_fragment_without_text() {
        let fragments = vec![Fragment::metadata_only().with_meta("other", "x")];
        let combined = combine(&fragments);
        assert!(!combined.text.is_empty());
        assert!(combined.text.contains('x'));
    }

    #[test]
    fn test_combine_mixed() {
        let fragments = vec![
            Fragment::new("Intro"),
            Fragment::metadata_only().with_meta("caption", "Figure 1"),
            Fragment::new("Outro"),
        ];
        assert_eq!(combine(&fragments).text, "Intro\n\ncaption=Figure 1\n\nOutro");
    }

    #[test]
    fn test_combine_loaded_content() {
        let content = LoadedContent::video(
            vec![Fragment::new("transcript words")],
            Some(VideoDetails {
                video_id: "dQw4w9WgXcQ".to_string(),
                ..Default::default()
            }),
        );
        assert_eq!(combine(&content).text, "transcript words");

        let empty = LoadedContent::generic(Vec::new());
        assert_eq!(combine(&empty).text, "");
    }

    #[test]
    fn test_combine_slice() {
        let fragments = [Fragment::new("one")];
        assert_eq!(combine(&fragments[..]).text, "one");
    }
}
