use logview_types::{LogEntry, LogLevel};

/// Counts per log level
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub silly: usize,
    pub trace: usize,
    pub debug: usize,
    pub info: usize,
    pub warn: usize,
    pub error: usize,
    pub fatal: usize,
    pub unknown: usize,
}

impl LevelCounts {
    /// Count entries per level bucket
    pub fn tally<'a, I>(entries: I) -> Self
    where
        I: IntoIterator<Item = &'a LogEntry>,
    {
        let mut counts = Self::default();
        for entry in entries {
            counts.record(entry.level);
        }
        counts
    }

    fn record(&mut self, level: LogLevel) {
        match level {
            LogLevel::Silly => self.silly += 1,
            LogLevel::Trace => self.trace += 1,
            LogLevel::Debug => self.debug += 1,
            LogLevel::Info => self.info += 1,
            LogLevel::Warn => self.warn += 1,
            LogLevel::Error => self.error += 1,
            LogLevel::Fatal => self.fatal += 1,
            LogLevel::Unknown => self.unknown += 1,
        }
    }

    /// Count for a single bucket
    pub fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Silly => self.silly,
            LogLevel::Trace => self.trace,
            LogLevel::Debug => self.debug,
            LogLevel::Info => self.info,
            LogLevel::Warn => self.warn,
            LogLevel::Error => self.error,
            LogLevel::Fatal => self.fatal,
            LogLevel::Unknown => self.unknown,
        }
    }

    /// Non-zero buckets in display order
    pub fn non_zero(&self) -> Vec<(LogLevel, usize)> {
        LogLevel::ALL
            .iter()
            .map(|level| (*level, self.get(*level)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }

    pub fn total(&self) -> usize {
        self.silly
            + self.trace
            + self.debug
            + self.info
            + self.warn
            + self.error
            + self.fatal
            + self.unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally() {
        let entries = vec![
            LogEntry::new(1).with_level("info"),
            LogEntry::new(2).with_level("INFO"),
            LogEntry::new(3).with_level("error"),
            LogEntry::new(4),
        ];
        let counts = LevelCounts::tally(&entries);
        assert_eq!(counts.info, 2);
        assert_eq!(counts.error, 1);
        assert_eq!(counts.unknown, 1);
        assert_eq!(counts.total(), 4);
        assert_eq!(
            counts.non_zero(),
            vec![
                (LogLevel::Info, 2),
                (LogLevel::Error, 1),
                (LogLevel::Unknown, 1)
            ]
        );
    }
}
