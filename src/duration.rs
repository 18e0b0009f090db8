//! Duration text parsing, rendering, and the non-linear slider mapping.
//!
//! Slider positions live in [0, 1]. `log_to_linear` warps a position so that
//! more slider travel is spent on short durations; `linear_to_log` is its
//! exact inverse. The warp is anchored so the middle of the slider lands on
//! `MIDPOINT` of the value range (one day, for the default task ranges).

/// Value-range fraction the slider center maps to.
const MIDPOINT: f64 = 0.98;

// Exponential warp fitted through (0, 0), (0.5, MIDPOINT), (1, 1).
// See https://stackoverflow.com/a/17102320 for the derivation.
fn warp_constants() -> (f64, f64, f64) {
    let m = MIDPOINT;
    let a = -(m * m) / (1.0 - 2.0 * m);
    let b = (m * m) / (1.0 - 2.0 * m);
    let c = 2.0 * ((1.0 - m) / m).ln();
    (a, b, c)
}

pub fn log_to_linear(percent: f64) -> f64 {
    let (a, b, c) = warp_constants();
    a + b * (c * percent).exp()
}

pub fn linear_to_log(percent: f64) -> f64 {
    let (a, b, c) = warp_constants();
    ((percent - a) / b).ln() / c
}

/// Parses a human duration expression ("10m", "2h 15m", "3months") into
/// elapsed seconds. Anything unparseable is "unspecified", not an error.
pub fn parse_duration_secs(text: &str) -> Option<u64> {
    humantime::parse_duration(text.trim())
        .ok()
        .map(|d| d.as_secs())
}

// Rendering tiers, largest first. A year is 365.25 days to stay consistent
// with the parser's calendar units.
const TIERS: [(&str, u64); 5] = [
    ("y", 31_557_600),
    ("d", 86_400),
    ("h", 3_600),
    ("m", 60),
    ("s", 1),
];

/// Renders seconds as an at-most-two-unit human string, e.g. "2h 15m".
/// The trailing unit is floored, so `pretty_duration(3665)` is "1h 1m".
/// Rendering is idempotent after one parse-render round.
pub fn pretty_duration(seconds: u64) -> String {
    if seconds == 0 {
        return "0s".to_string();
    }

    for (i, (unit, size)) in TIERS.iter().enumerate() {
        if seconds < *size {
            continue;
        }
        let primary = seconds / size;
        let remainder = seconds % size;

        let Some((next_unit, next_size)) = TIERS.get(i + 1) else {
            return format!("{primary}{unit}");
        };
        let secondary = remainder / next_size;
        if secondary == 0 {
            return format!("{primary}{unit}");
        }
        return format!("{primary}{unit} {secondary}{next_unit}");
    }

    // Unreachable: the last tier is 1 second.
    format!("{seconds}s")
}

/// Affine map between a [0, 1] position and seconds over an observed
/// `[min, max]` range. Built from a dataset's parsed durations; tasks with
/// unspecified durations do not contribute.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DurationRange {
    pub min: f64,
    pub max: f64,
}

impl DurationRange {
    pub fn from_durations<I>(durations: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut min = f64::MAX;
        let mut max = f64::MIN;
        let mut seen = false;
        for d in durations {
            let d = d as f64;
            seen = true;
            if d < min {
                min = d;
            }
            if d > max {
                max = d;
            }
        }
        if !seen {
            return Self { min: 0.0, max: 1.0 };
        }
        Self { min, max }
    }

    pub fn percent_to_duration(&self, percent: f64) -> u64 {
        (percent * (self.max - self.min) + self.min).round().max(0.0) as u64
    }

    pub fn duration_to_percent(&self, duration: f64) -> f64 {
        if self.max <= self.min {
            return 0.0;
        }
        (duration - self.min) / (self.max - self.min)
    }
}

// Annotation points for the duration slider, seconds through decades.
const MARK_LABELS: [&str; 44] = [
    "1s", "2s", "3s", "5s", "8s", "13s", "20s", "30s", "1m", "2m", "3m", "5m",
    "8m", "13m", "20m", "30m", "1h", "2h", "3h", "5h", "8h", "13h", "1d",
    "2d", "3d", "5d", "8d", "13d", "20d", "1month", "2months", "3months",
    "5months", "8months", "1year", "2years", "3years", "5years", "8years",
    "13years", "20years", "30years", "50years", "80years",
];

/// The slider mark tier table, as elapsed seconds in ascending order.
pub fn slider_marks() -> Vec<u64> {
    MARK_LABELS
        .iter()
        .filter_map(|label| parse_duration_secs(label))
        .collect()
}
