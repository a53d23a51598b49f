//! Human-readable and serializable output for findings.

use serde::{Deserialize, Serialize};

use crate::movement::{pitch_class, Pitch};
use crate::parallel::{Finding, Interval};

const LILYPOND_NAMES: [&str; 12] = [
    "c", "cis", "d", "dis", "e", "f", "fis", "g", "gis", "a", "ais", "b",
];
const SHARP_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Spelling used for pitch classes in text output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameStyle {
    #[default]
    Lilypond,
    Sharp,
}

impl NameStyle {
    pub fn name(&self, pitch: Pitch) -> &'static str {
        let table = match self {
            Self::Lilypond => &LILYPOND_NAMES,
            Self::Sharp => &SHARP_NAMES,
        };
        table[pitch_class(pitch) as usize]
    }
}

impl std::str::FromStr for NameStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lilypond" | "ly" => Ok(Self::Lilypond),
            "sharp" | "sharps" => Ok(Self::Sharp),
            other => Err(format!("unknown name style '{other}' (expected lilypond or sharp)")),
        }
    }
}

/// One line per finding.
pub fn render_line(finding: &Finding, names: NameStyle) -> String {
    let a = &finding.movement_a;
    let b = &finding.movement_b;
    format!(
        "{} ticks: Track {}'s movement from {} to {} (note #{}) is parallel to Track {}'s movement from {} to {} (note #{})",
        finding.timestamp,
        finding.track_a,
        names.name(a.from),
        names.name(a.to),
        a.note_index,
        finding.track_b,
        names.name(b.from),
        names.name(b.to),
        b.note_index,
    )
}

/// Findings for one analyzed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub file: String,
    pub ppq: u16,
    /// Tracks that contain at least one note.
    pub tracks_analyzed: usize,
    pub findings: Vec<Finding>,
}

impl Report {
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{}: {} tracks with notes, PPQ {}",
            self.file, self.tracks_analyzed, self.ppq
        );

        if self.findings.is_empty() {
            summary.push_str(", no parallels");
        } else {
            let count = |interval: Interval| {
                self.findings.iter().filter(|f| f.interval == interval).count()
            };
            summary.push_str(&format!(
                ", {} parallels ({} octaves, {} fifths, {} fourths)",
                self.findings.len(),
                count(Interval::Unison),
                count(Interval::Fifth),
                count(Interval::Fourth),
            ));
        }

        summary
    }
}
