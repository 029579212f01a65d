//! Report configuration.

/// Controls how a [`super::RollReport`] is built and printed.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    /// Width of each histogram bin, starting at zero
    pub bin_width: f64,

    /// Characters used by the longest histogram bar
    pub max_bar_width: usize,

    /// Whether `to_text` includes histogram sections
    pub show_histograms: bool,

    /// Output verbosity (0 = one summary line, 1 = report, 2 = report + per-trial table)
    pub verbosity: u8,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bin_width: 1.0,
            max_bar_width: 40,
            show_histograms: true,
            verbosity: 1,
        }
    }
}

impl ReportConfig {
    /// Summary figures only, no histograms.
    pub fn compact() -> Self {
        Self {
            show_histograms: false,
            ..Default::default()
        }
    }

    /// Everything, including a row per trial.
    pub fn detailed() -> Self {
        Self {
            max_bar_width: 60,
            verbosity: 2,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(ReportConfig::default().show_histograms);
        assert!(!ReportConfig::compact().show_histograms);
        assert_eq!(ReportConfig::detailed().verbosity, 2);
        assert_eq!(ReportConfig::compact().bin_width, 1.0);
    }
}
