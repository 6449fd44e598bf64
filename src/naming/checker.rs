//! The placement check run for every admitted change event.
//!
//! This is the callback the watch loop drives: extract attributes from
//! the file name and its parent folder name, compare them through the
//! frame type mapping, and raise at most one alert per event.

use std::{path::Path, sync::Arc};

use tracing::debug;

use crate::{
    alert::AlertSink,
    naming::{
        attributes::{self, NamePatterns},
        matcher::{self, FrameTypeMapping, PlacementVerdict},
    },
    watcher::{ChangeEvent, Op, WatchCallback},
};

/// Checks that files sit in folders whose names match their own encoded
/// attributes.
pub struct PlacementChecker {
    folder_patterns: NamePatterns,
    file_patterns: NamePatterns,
    mapping: Arc<FrameTypeMapping>,
    sink: Arc<dyn AlertSink>,
}

impl PlacementChecker {
    pub fn new(
        folder_patterns: NamePatterns,
        file_patterns: NamePatterns,
        mapping: Arc<FrameTypeMapping>,
        sink: Arc<dyn AlertSink>,
    ) -> Self {
        Self {
            folder_patterns,
            file_patterns,
            mapping,
            sink,
        }
    }

    /// Runs the full check for one admitted event.
    ///
    /// Events without a write-family operation are ignored. Extraction
    /// failures end processing for the event after one alert; the
    /// mismatch comparison is never attempted on a name that failed to
    /// parse.
    ///
    /// # Errors
    ///
    /// Returns an error when the alert sink fails to deliver; the watch
    /// loop logs it and carries on.
    pub fn check_event(&self, event: &ChangeEvent) -> anyhow::Result<()> {
        if !event.ops.intersects(Op::WRITE_FAMILY) {
            return Ok(());
        }

        let Some(file_name) = event.path.file_name().and_then(|n| n.to_str()) else {
            return Ok(());
        };
        let folder_name = event
            .path
            .parent()
            .and_then(Path::file_name)
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        let file_attrs = match attributes::file_attributes(file_name, &self.file_patterns) {
            Ok(attrs) => attrs,
            Err(e) => {
                self.sink.alert(
                    "INVALID NAME",
                    &format!("{}: \"{}\"", e, event.path.display()),
                )?;
                return Ok(());
            }
        };

        let folder_attrs = match attributes::folder_attributes(folder_name, &self.folder_patterns)
        {
            Ok(attrs) => attrs,
            Err(e) => {
                self.sink.alert(
                    "INVALID FOLDER NAME",
                    &format!("{}: \"{}\"", e, event.path.display()),
                )?;
                return Ok(());
            }
        };

        match matcher::check(&file_attrs, &folder_attrs, &self.mapping) {
            PlacementVerdict::Correct => {
                debug!("CORRECT FOLDER {:?}: {:?}", folder_name, event.path);
            }
            PlacementVerdict::UnknownFrameType { abbreviation } => {
                self.sink.alert(
                    "UNKNOWN FRAME TYPE",
                    &format!(
                        "unknown frame type abbreviation {:?}: \"{}\"",
                        abbreviation,
                        event.path.display()
                    ),
                )?;
            }
            PlacementVerdict::Misplaced { expected, .. } => {
                let suggestion = expected
                    .iter()
                    .map(|name| format!("{name:?}"))
                    .collect::<Vec<_>>()
                    .join(" OR ");
                self.sink.alert(
                    "WRONG FOLDER",
                    &format!(
                        "should be placed in {} instead of {:?}: \"{}\"",
                        suggestion,
                        folder_name,
                        event.path.display()
                    ),
                )?;
            }
        }

        Ok(())
    }

    /// Wraps the checker as a watch-loop callback.
    pub fn into_callback(self) -> WatchCallback {
        Box::new(move |event| self.check_event(event))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        alert::RecordingAlertSink,
        naming::{
            attributes::NamePatterns,
            checker::PlacementChecker,
            matcher::FrameTypeMapping,
        },
        watcher::{ChangeEvent, Op},
    };

    const FOLDER_PATTERNS: &[&str] = &[
        r"^(?P<frame_size>\d+x\d+)$",
        r"^(?P<frame_size>\d+x\d+) (?P<frame_type>(floating )?((white|gray|black|gold) )?framed)$",
        r"^(?P<frame_type>(floating )?((white|gray|black|gold) )?framed( \d+pc)?) (?P<frame_size>\d+x\d+)$",
        r"^(?P<frame_type>(wood|wood horz|wood vert|wood crx|framed)( \d+pc)?) (?P<frame_size>\d+x\d+)$",
    ];

    const FILE_PATTERNS: &[&str] = &[
        r"^.+_(?P<frame_type>[a-z]+)_(?P<frame_size>\d+x\d+)$",
        r"^.+_(?P<frame_type>[a-z]+_\d+pc)_(?P<frame_size>\d+x\d+)$",
        r"^.+_(?P<frame_type>[a-z]+_(?:crx|horz|vert))_(?P<frame_size>\d+x\d+)$",
    ];

    fn checker_with(
        entries: &[(&str, &[&str])],
    ) -> (PlacementChecker, Arc<RecordingAlertSink>) {
        let mapping: FrameTypeMapping = entries
            .iter()
            .map(|(abbreviation, candidates)| {
                (
                    abbreviation.to_string(),
                    candidates.iter().map(|c| c.to_string()).collect(),
                )
            })
            .collect();

        let sink = Arc::new(RecordingAlertSink::new());
        let checker = PlacementChecker::new(
            NamePatterns::new(FOLDER_PATTERNS).unwrap(),
            NamePatterns::new(FILE_PATTERNS).unwrap(),
            Arc::new(mapping),
            sink.clone(),
        );

        (checker, sink)
    }

    #[test]
    fn test_correctly_placed_file_raises_no_alert() {
        let (checker, sink) = checker_with(&[("fr_2pc", &["framed 2pc"])]);
        let event = ChangeEvent::new(
            "/prints/framed 2pc 11x14/order1_fr_2pc_11x14.jpg",
            Op::CREATE,
        );

        checker.check_event(&event).unwrap();
        assert!(sink.recorded().is_empty());
    }

    #[test]
    fn test_size_and_type_mismatch_suggests_every_candidate() {
        let (checker, sink) = checker_with(&[("fr", &["black framed", "framed"])]);
        let event = ChangeEvent::new("/prints/12x12/order1_fr_11x14.jpg", Op::WRITE);

        checker.check_event(&event).unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "WRONG FOLDER");
        assert_eq!(
            recorded[0].1,
            "should be placed in \"11x14 black framed\" OR \"11x14 framed\" instead of \
             \"12x12\": \"/prints/12x12/order1_fr_11x14.jpg\""
        );
    }

    #[test]
    fn test_floating_frame_in_matching_folder_is_clean() {
        let (checker, sink) = checker_with(&[("ffl", &["floating gray framed"])]);
        let event = ChangeEvent::new(
            "/prints/16x20 floating gray framed/order7_ffl_16x20.png",
            Op::CREATE,
        );

        checker.check_event(&event).unwrap();
        assert!(sink.recorded().is_empty());
    }

    #[test]
    fn test_unparsable_file_name_raises_one_alert_only() {
        let (checker, sink) = checker_with(&[("fr", &["framed"])]);
        let event = ChangeEvent::new("/prints/12x12/order_11x14.jpg", Op::CREATE);

        checker.check_event(&event).unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "INVALID NAME");
        assert!(recorded[0].1.contains("frame type"));
    }

    #[test]
    fn test_unparsable_folder_name_raises_alert() {
        let (checker, sink) = checker_with(&[("fr", &["framed"])]);
        let event = ChangeEvent::new("/prints/loose prints/order_fr_11x14.jpg", Op::CREATE);

        checker.check_event(&event).unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "INVALID FOLDER NAME");
    }

    #[test]
    fn test_unknown_abbreviation_is_reported_without_suggestions() {
        let (checker, sink) = checker_with(&[("fr", &["framed"])]);
        let event = ChangeEvent::new("/prints/11x14/order_zz_11x14.jpg", Op::CREATE);

        checker.check_event(&event).unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "UNKNOWN FRAME TYPE");
        assert!(recorded[0].1.contains("\"zz\""));
        assert!(!recorded[0].1.contains("should be placed"));
    }

    #[test]
    fn test_size_mismatch_keeps_the_correct_folder_type() {
        let (checker, sink) = checker_with(&[("fr", &["black framed", "framed"])]);
        let event = ChangeEvent::new(
            "/prints/framed 12x12/order1_fr_11x14.jpg",
            Op::WRITE,
        );

        checker.check_event(&event).unwrap();

        let recorded = sink.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(
            recorded[0].1,
            "should be placed in \"11x14 framed\" instead of \"framed 12x12\": \
             \"/prints/framed 12x12/order1_fr_11x14.jpg\""
        );
    }

    #[test]
    fn test_unframed_folder_accepts_plain_abbreviation() {
        let (checker, sink) = checker_with(&[("pl", &[""])]);
        let event = ChangeEvent::new("/prints/11x14/order_pl_11x14.jpg", Op::CREATE);

        checker.check_event(&event).unwrap();
        assert!(sink.recorded().is_empty());
    }

    #[test]
    fn test_non_write_events_are_ignored() {
        let (checker, sink) = checker_with(&[("fr", &["framed"])]);

        for ops in [Op::REMOVE, Op::RENAME, Op::CHMOD] {
            let event = ChangeEvent::new("/prints/12x12/order_fr_11x14.jpg", ops);
            checker.check_event(&event).unwrap();
        }

        assert!(sink.recorded().is_empty());
    }

    #[test]
    fn test_into_callback_preserves_the_check() {
        let (checker, sink) = checker_with(&[("fr", &["framed"])]);
        let mut callback = checker.into_callback();

        callback(&ChangeEvent::new(
            "/prints/12x12/order_fr_11x14.jpg",
            Op::CREATE,
        ))
        .unwrap();

        assert_eq!(sink.recorded().len(), 1);
    }
}
