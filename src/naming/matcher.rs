//! Placement verdicts for extracted file and folder attributes.

use std::collections::HashMap;

use crate::naming::attributes::AttributeSet;

/// Maps a frame type abbreviation (as encoded in file names) to the
/// ordered set of folder-name type phrases that are all considered
/// correct for it. An abbreviation may map to several phrases when more
/// than one folder-naming convention is in use; a single empty phrase
/// means an unframed folder is acceptable.
pub type FrameTypeMapping = HashMap<String, Vec<String>>;

/// Outcome of comparing a file's attributes against its parent folder's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementVerdict {
    /// The folder name agrees with the file's encoded attributes.
    Correct,
    /// The folder disagrees on size, type, or both.
    Misplaced {
        wrong_size: bool,
        wrong_type: bool,
        /// Every folder name that would be correct for the file.
        expected: Vec<String>,
    },
    /// The file's abbreviation has no entry in the mapping; nothing was
    /// compared.
    UnknownFrameType { abbreviation: String },
}

/// Decides whether `file` may live in a folder described by `folder`.
///
/// The folder's type is accepted when it equals any of the candidate
/// phrases for the file's abbreviation; the size must match exactly.
/// Both attribute sets are already normalized by extraction.
pub fn check(
    file: &AttributeSet,
    folder: &AttributeSet,
    mapping: &FrameTypeMapping,
) -> PlacementVerdict {
    let Some(candidates) = mapping.get(&file.frame_type) else {
        return PlacementVerdict::UnknownFrameType {
            abbreviation: file.frame_type.clone(),
        };
    };

    let type_ok = candidates
        .iter()
        .any(|candidate| *candidate == folder.frame_type);
    let size_ok = folder.frame_size == file.frame_size;

    if type_ok && size_ok {
        return PlacementVerdict::Correct;
    }

    let expected = if type_ok {
        // The type was already right; keep the folder's own rendering of
        // it and fix the size alone.
        vec![corrective_name(&file.frame_size, &folder.frame_type)]
    } else {
        candidates
            .iter()
            .map(|candidate| corrective_name(&file.frame_size, candidate))
            .collect()
    };

    PlacementVerdict::Misplaced {
        wrong_size: !size_ok,
        wrong_type: !type_ok,
        expected,
    }
}

/// Renders a corrective folder name, collapsing the unframed (empty type)
/// case to the bare size.
fn corrective_name(frame_size: &str, frame_type: &str) -> String {
    format!("{frame_size} {frame_type}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::naming::{
        attributes::AttributeSet,
        matcher::{FrameTypeMapping, PlacementVerdict, check},
    };

    fn attrs(frame_type: &str, frame_size: &str) -> AttributeSet {
        AttributeSet {
            frame_type: frame_type.to_string(),
            frame_size: frame_size.to_string(),
        }
    }

    fn mapping(entries: &[(&str, &[&str])]) -> FrameTypeMapping {
        entries
            .iter()
            .map(|(abbreviation, candidates)| {
                (
                    abbreviation.to_string(),
                    candidates.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect::<HashMap<_, _>>()
    }

    #[test]
    fn test_clean_match() {
        let verdict = check(
            &attrs("fr_2pc", "11x14"),
            &attrs("framed 2pc", "11x14"),
            &mapping(&[("fr_2pc", &["framed 2pc"])]),
        );
        assert_eq!(verdict, PlacementVerdict::Correct);
    }

    #[test]
    fn test_any_candidate_satisfies_the_type_check() {
        let m = mapping(&[("fr", &["black framed", "framed"])]);

        for folder_type in ["black framed", "framed"] {
            let verdict = check(&attrs("fr", "11x14"), &attrs(folder_type, "11x14"), &m);
            assert_eq!(verdict, PlacementVerdict::Correct, "for {:?}", folder_type);
        }
    }

    #[test]
    fn test_size_mismatch_keeps_the_folder_type() {
        let verdict = check(
            &attrs("fr", "11x14"),
            &attrs("black framed", "12x12"),
            &mapping(&[("fr", &["black framed", "framed"])]),
        );

        assert_eq!(
            verdict,
            PlacementVerdict::Misplaced {
                wrong_size: true,
                wrong_type: false,
                expected: vec!["11x14 black framed".to_string()],
            }
        );
    }

    #[test]
    fn test_type_mismatch_suggests_every_candidate() {
        let verdict = check(
            &attrs("fr", "11x14"),
            &attrs("", "12x12"),
            &mapping(&[("fr", &["black framed", "framed"])]),
        );

        assert_eq!(
            verdict,
            PlacementVerdict::Misplaced {
                wrong_size: true,
                wrong_type: true,
                expected: vec![
                    "11x14 black framed".to_string(),
                    "11x14 framed".to_string()
                ],
            }
        );
    }

    #[test]
    fn test_type_mismatch_with_correct_size() {
        let verdict = check(
            &attrs("fr", "11x14"),
            &attrs("wood", "11x14"),
            &mapping(&[("fr", &["framed"])]),
        );

        assert_eq!(
            verdict,
            PlacementVerdict::Misplaced {
                wrong_size: false,
                wrong_type: true,
                expected: vec!["11x14 framed".to_string()],
            }
        );
    }

    #[test]
    fn test_empty_candidate_accepts_unframed_folder() {
        let m = mapping(&[("pl", &[""])]);

        let verdict = check(&attrs("pl", "11x14"), &attrs("", "11x14"), &m);
        assert_eq!(verdict, PlacementVerdict::Correct);

        // The corrective name for an unframed candidate is the bare size.
        let verdict = check(&attrs("pl", "11x14"), &attrs("framed", "11x14"), &m);
        assert_eq!(
            verdict,
            PlacementVerdict::Misplaced {
                wrong_size: false,
                wrong_type: true,
                expected: vec!["11x14".to_string()],
            }
        );
    }

    #[test]
    fn test_unknown_abbreviation() {
        let verdict = check(
            &attrs("zz", "11x14"),
            &attrs("framed", "11x14"),
            &mapping(&[("fr", &["framed"])]),
        );

        assert_eq!(
            verdict,
            PlacementVerdict::UnknownFrameType {
                abbreviation: "zz".to_string(),
            }
        );
    }
}
