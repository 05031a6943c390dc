//! ADHD-oriented task heuristics
//!
//! Pure functions behind the `taskADHD` tool: chunking, Eisenhower-style
//! prioritization, time-blocking, and energy matching. Everything here is
//! deterministic given its inputs; the only time-dependent function,
//! [`time_block`], takes the reference instant and display timezone as
//! explicit parameters so callers (and tests) control both.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Chunk length used by `break_down` and `time_block`, in minutes.
const CHUNK_MINUTES: i64 = 15;

/// Upper bound on a task duration, in minutes (one week). The tool layer
/// rejects anything larger; the functions here also clamp to it so they
/// stay total for any `i64` input instead of overflowing or allocating
/// unbounded chunk lists.
pub const MAX_DURATION_MINUTES: i64 = 7 * 24 * 60;

/// Break length inserted between time blocks, in minutes.
const BREAK_MINUTES: i64 = 5;

/// One ≤15-minute sub-unit of a task
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskChunk {
    /// 1-based position within the plan
    pub index: usize,
    /// Chunk length in minutes (≤ 15)
    pub duration: i64,
    /// "{task} - Part {i}/{n}"
    pub label: String,
    /// Focus note distinguishing full chunks from a shorter final one
    pub focus: String,
}

/// Eisenhower quadrant derived from urgent/important keyword signals
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Quadrant {
    #[serde(rename = "Do First")]
    DoFirst,
    Schedule,
    Delegate,
    #[serde(rename = "Delete or Defer")]
    DeleteOrDefer,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PriorityLevel {
    Critical,
    High,
    Medium,
    Low,
}

/// Result of [`prioritize`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Prioritization {
    pub quadrant: Quadrant,
    pub priority: PriorityLevel,
    pub urgent: bool,
    pub important: bool,
    pub recommendation: String,
}

/// One scheduled 15-minute block
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBlock {
    pub index: usize,
    /// Wall-clock start in the display timezone, "HH:MM"
    pub start: String,
    /// Wall-clock end in the display timezone, "HH:MM"
    pub end: String,
}

/// Result of [`time_block`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeBlockPlan {
    pub blocks: Vec<TimeBlock>,
    /// Elapsed minutes from first block start to last block end,
    /// including the 5-minute breaks between blocks
    pub total_minutes: i64,
    pub timezone: String,
    pub note: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EnergyLevel {
    High,
    Medium,
    Low,
}

/// Result of [`energy_match`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnergyMatch {
    pub level: EnergyLevel,
    pub best_time: String,
    pub tip: String,
    pub environment: String,
}

const URGENT_WORDS: &[&str] = &["urgent", "asap", "emergency", "critical", "deadline", "today"];
const IMPORTANT_WORDS: &[&str] = &["important", "key", "vital", "essential", "strategic"];

const HIGH_ENERGY_WORDS: &[&str] = &[
    "create",
    "design",
    "write",
    "build",
    "plan",
    "solve",
    "brainstorm",
    "strategy",
];
const LOW_ENERGY_WORDS: &[&str] = &[
    "organize",
    "sort",
    "file",
    "clean",
    "tidy",
    "routine",
    "email",
    "laundry",
];

fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|w| text.contains(w))
}

/// Split a task into ≤15-minute chunks.
///
/// Chunk durations always sum to `duration` (for `duration > 0`);
/// a non-positive duration yields no chunks, and anything above
/// [`MAX_DURATION_MINUTES`] is clamped to it.
pub fn break_down(task: &str, duration: i64) -> Vec<TaskChunk> {
    if duration <= 0 {
        return Vec::new();
    }
    let duration = duration.min(MAX_DURATION_MINUTES);

    let chunk_count = (duration + CHUNK_MINUTES - 1) / CHUNK_MINUTES;
    (0..chunk_count)
        .map(|i| {
            let chunk_duration = CHUNK_MINUTES.min(duration - CHUNK_MINUTES * i);
            let focus = if chunk_duration == CHUNK_MINUTES {
                "Single focus for the full 15 minutes, then stand up".to_string()
            } else {
                format!("Short final push: just {} minutes", chunk_duration)
            };
            TaskChunk {
                index: (i + 1) as usize,
                duration: chunk_duration,
                label: format!("{} - Part {}/{}", task, i + 1, chunk_count),
                focus,
            }
        })
        .collect()
}

/// Classify a task into an Eisenhower quadrant from keyword signals.
///
/// The urgent and important checks are independent substring matches on
/// the lower-cased task text.
pub fn prioritize(task: &str) -> Prioritization {
    let text = task.to_lowercase();
    let urgent = contains_any(&text, URGENT_WORDS);
    let important = contains_any(&text, IMPORTANT_WORDS);

    let (quadrant, priority, recommendation) = match (urgent, important) {
        (true, true) => (
            Quadrant::DoFirst,
            PriorityLevel::Critical,
            "Start now, before anything else on the list",
        ),
        (false, true) => (
            Quadrant::Schedule,
            PriorityLevel::High,
            "Block a concrete slot on the calendar for this",
        ),
        (true, false) => (
            Quadrant::Delegate,
            PriorityLevel::Medium,
            "Hand off if possible; it is urgent but not yours to own",
        ),
        (false, false) => (
            Quadrant::DeleteOrDefer,
            PriorityLevel::Low,
            "Defer or drop; revisit during weekly review",
        ),
    };

    Prioritization {
        quadrant,
        priority,
        urgent,
        important,
        recommendation: recommendation.to_string(),
    }
}

/// Lay a task out as 15-minute blocks with 5-minute breaks in between.
///
/// Block `i` starts at `now + i * 20min`; there is no break after the
/// last block, so the reported total is `blocks * 20 - 5` minutes.
/// Wall-clock times render in `tz`. Durations clamp to
/// [`MAX_DURATION_MINUTES`] like `break_down`.
pub fn time_block(duration: i64, now: DateTime<Utc>, tz: Tz) -> TimeBlockPlan {
    let num_blocks = if duration > 0 {
        let duration = duration.min(MAX_DURATION_MINUTES);
        (duration + CHUNK_MINUTES - 1) / CHUNK_MINUTES
    } else {
        0
    };

    let blocks: Vec<TimeBlock> = (0..num_blocks)
        .map(|i| {
            let start = now + Duration::minutes(i * (CHUNK_MINUTES + BREAK_MINUTES));
            let end = start + Duration::minutes(CHUNK_MINUTES);
            TimeBlock {
                index: (i + 1) as usize,
                start: start.with_timezone(&tz).format("%H:%M").to_string(),
                end: end.with_timezone(&tz).format("%H:%M").to_string(),
            }
        })
        .collect();

    let total_minutes = if num_blocks > 0 {
        num_blocks * (CHUNK_MINUTES + BREAK_MINUTES) - BREAK_MINUTES
    } else {
        0
    };

    TimeBlockPlan {
        blocks,
        total_minutes,
        timezone: tz.name().to_string(),
        note: "15 minutes on, 5 minutes off; no break after the last block".to_string(),
    }
}

/// Match a task against high/low energy word sets.
///
/// A task that reads high-energy (and not low-energy) is recommended for
/// the morning; anything low-energy for the afternoon; the rest for
/// midday.
pub fn energy_match(task: &str) -> EnergyMatch {
    let text = task.to_lowercase();
    let high = contains_any(&text, HIGH_ENERGY_WORDS);
    let low = contains_any(&text, LOW_ENERGY_WORDS);

    let (level, best_time, tip, environment) = if high && !low {
        (
            EnergyLevel::High,
            "Morning",
            "Tackle this first thing, before meetings and messages",
            "Quiet room, notifications off, single screen",
        )
    } else if low {
        (
            EnergyLevel::Low,
            "Afternoon",
            "Pair this with music or a podcast; it survives interruptions",
            "Anywhere works; interruptions are fine",
        )
    } else {
        (
            EnergyLevel::Medium,
            "Midday",
            "Slot this between deep-work sessions as a change of pace",
            "Normal desk setup is fine",
        )
    };

    EnergyMatch {
        level,
        best_time: best_time.to_string(),
        tip: tip.to_string(),
        environment: environment.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_break_down_splits_into_fifteens() {
        let chunks = break_down("Write report", 40);
        assert_eq!(chunks.len(), 3);
        let durations: Vec<i64> = chunks.iter().map(|c| c.duration).collect();
        assert_eq!(durations, vec![15, 15, 10]);
        assert_eq!(durations.iter().sum::<i64>(), 40);
        assert_eq!(chunks[0].label, "Write report - Part 1/3");
        assert_eq!(chunks[2].label, "Write report - Part 3/3");
    }

    #[test]
    fn test_break_down_exact_multiple() {
        let chunks = break_down("Inbox", 30);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.duration == 15));
    }

    #[test]
    fn test_break_down_clamps_extreme_durations() {
        // Must neither overflow the chunk-count arithmetic nor allocate
        // an unbounded plan.
        let chunks = break_down("Everything", i64::MAX);
        assert_eq!(chunks.len() as i64, MAX_DURATION_MINUTES / CHUNK_MINUTES);
        assert!(chunks.iter().all(|c| c.duration == CHUNK_MINUTES));
    }

    #[test]
    fn test_time_block_clamps_extreme_durations() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let plan = time_block(i64::MAX, now, Tz::UTC);
        let max_blocks = MAX_DURATION_MINUTES / CHUNK_MINUTES;
        assert_eq!(plan.blocks.len() as i64, max_blocks);
        assert_eq!(plan.total_minutes, max_blocks * 20 - 5);
    }

    #[test]
    fn test_break_down_non_positive_duration_is_empty() {
        assert!(break_down("Nothing", 0).is_empty());
        assert!(break_down("Nothing", -10).is_empty());
    }

    #[test]
    fn test_prioritize_quadrants() {
        let p = prioritize("urgent and important deadline");
        assert_eq!(p.quadrant, Quadrant::DoFirst);
        assert_eq!(p.priority, PriorityLevel::Critical);

        let p = prioritize("important strategic planning");
        assert_eq!(p.quadrant, Quadrant::Schedule);
        assert_eq!(p.priority, PriorityLevel::High);

        let p = prioritize("reply ASAP");
        assert_eq!(p.quadrant, Quadrant::Delegate);
        assert_eq!(p.priority, PriorityLevel::Medium);

        let p = prioritize("buy milk");
        assert_eq!(p.quadrant, Quadrant::DeleteOrDefer);
        assert_eq!(p.priority, PriorityLevel::Low);
    }

    #[test]
    fn test_quadrant_serializes_with_spaces() {
        let json = serde_json::to_string(&Quadrant::DoFirst).unwrap();
        assert_eq!(json, "\"Do First\"");
        let json = serde_json::to_string(&Quadrant::DeleteOrDefer).unwrap();
        assert_eq!(json, "\"Delete or Defer\"");
    }

    #[test]
    fn test_time_block_spacing_and_total() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let plan = time_block(30, now, Tz::UTC);

        assert_eq!(plan.blocks.len(), 2);
        assert_eq!(plan.blocks[0].start, "09:00");
        assert_eq!(plan.blocks[0].end, "09:15");
        // 5-minute break after block 1
        assert_eq!(plan.blocks[1].start, "09:20");
        assert_eq!(plan.blocks[1].end, "09:35");
        assert_eq!(plan.total_minutes, 35);
    }

    #[test]
    fn test_time_block_renders_in_display_timezone() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let tz: Tz = "Etc/GMT-2".parse().unwrap(); // UTC+2
        let plan = time_block(15, now, tz);
        assert_eq!(plan.blocks[0].start, "11:00");
        assert_eq!(plan.timezone, "Etc/GMT-2");
    }

    #[test]
    fn test_time_block_zero_duration() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let plan = time_block(0, now, Tz::UTC);
        assert!(plan.blocks.is_empty());
        assert_eq!(plan.total_minutes, 0);
    }

    #[test]
    fn test_energy_match_levels() {
        let m = energy_match("Design the new budget plan");
        assert_eq!(m.level, EnergyLevel::High);
        assert_eq!(m.best_time, "Morning");

        let m = energy_match("Sort and file the mail");
        assert_eq!(m.level, EnergyLevel::Low);
        assert_eq!(m.best_time, "Afternoon");

        let m = energy_match("Call the dentist");
        assert_eq!(m.level, EnergyLevel::Medium);
        assert_eq!(m.best_time, "Midday");
    }

    #[test]
    fn test_energy_match_mixed_signals_resolve_low() {
        // Low-energy presence wins even when high-energy words appear.
        let m = energy_match("Write emails and clean the inbox");
        assert_eq!(m.level, EnergyLevel::Low);
    }
}
