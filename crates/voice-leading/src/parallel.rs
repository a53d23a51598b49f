use serde::{Deserialize, Serialize};

use crate::movement::{pitch_class, Direction, Movement, Pitch, TrackMovements};

/// Intervals that may not be approached in parallel, measured mod 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    /// Unison or any number of octaves.
    Unison,
    Fourth,
    Fifth,
}

impl Interval {
    /// Checked in this order; the first match is reported.
    pub const FORBIDDEN: [Interval; 3] = [Interval::Unison, Interval::Fourth, Interval::Fifth];

    pub fn semitones(&self) -> Pitch {
        match self {
            Self::Unison => 0,
            Self::Fourth => 5,
            Self::Fifth => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unison => "octave",
            Self::Fourth => "fourth",
            Self::Fifth => "fifth",
        }
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which forbidden interval, if any, `a` and `b` move in parallel by.
///
/// Only `a` rising while `b` falls counts as contrary motion. The mirror
/// case (`a` falling, `b` rising) is still reported, so argument order
/// matters.
pub fn parallel_interval(a: &Movement, b: &Movement) -> Option<Interval> {
    let contrary = a.direction() == Direction::Up && b.direction() == Direction::Down;

    Interval::FORBIDDEN.into_iter().find(|interval| {
        let k = interval.semitones();
        pitch_class(a.from) == pitch_class(b.from + k)
            && pitch_class(a.to) == pitch_class(b.to + k)
            && !contrary
    })
}

pub fn is_parallel(a: &Movement, b: &Movement) -> bool {
    parallel_interval(a, b).is_some()
}

/// Two tracks moving in parallel at the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub timestamp: u64,
    pub track_a: usize,
    pub track_b: usize,
    pub movement_a: Movement,
    pub movement_b: Movement,
    pub interval: Interval,
}

/// Compare every pair of tracks `a < b` at every tick both of them move.
///
/// Findings come out pair by pair, ticks ascending within a pair.
pub fn find_parallels(maps: &TrackMovements) -> impl Iterator<Item = Finding> + '_ {
    let tracks: Vec<usize> = maps.keys().copied().collect();
    let pairs: Vec<(usize, usize)> = tracks
        .iter()
        .enumerate()
        .flat_map(|(n, &a)| tracks[n + 1..].iter().map(move |&b| (a, b)))
        .collect();

    pairs.into_iter().flat_map(move |(track_a, track_b)| {
        let other = &maps[&track_b];
        maps[&track_a]
            .iter()
            .filter_map(move |(&timestamp, movement_a)| {
                let movement_b = other.get(&timestamp)?;
                let interval = parallel_interval(movement_a, movement_b)?;
                Some(Finding {
                    timestamp,
                    track_a,
                    track_b,
                    movement_a: *movement_a,
                    movement_b: *movement_b,
                    interval,
                })
            })
    })
}

/// Order findings by tick, then by track pair.
pub fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by_key(|f| (f.timestamp, f.track_a, f.track_b));
}
