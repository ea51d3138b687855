/// Synthetic duration given to the last diarization segment when no later
/// turn boundary or audio length is known.
pub const DEFAULT_TAIL_SECONDS: f64 = 3.0;

/// Longest text accepted as a speaker label before the colon.
pub const MAX_SPEAKER_LABEL_CHARS: usize = 40;

pub const APP_CONFIG_DIR: &str = "TranscriptCompare";
pub const WORD_MAP_FILENAME: &str = "word_map.json";
pub const SETTINGS_FILENAME: &str = "settings.json";

/// Panels are scored on this many worker threads unless configured otherwise.
pub const DEFAULT_WORKER_THREADS: usize = 4;
