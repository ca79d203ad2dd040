use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use giftscan_engine::ScanEvent;
use giftscan_logging::scan_error;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str =
    "Scanning gifts [{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {spinner} {msg}";

/// Counts seen by the progress drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressTotals {
    pub ticks: u64,
    pub counted: u64,
}

/// Drains scan events on a dedicated thread and advances a progress bar.
///
/// The drain ends when every sender of the channel has been dropped.
pub struct ProgressDisplay {
    bar: ProgressBar,
    drain: JoinHandle<ProgressTotals>,
}

impl ProgressDisplay {
    pub fn spawn(events: Receiver<ScanEvent>, total: u64, visible: bool) -> Self {
        let bar = if visible {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template(TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏  "),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };

        let drain_bar = bar.clone();
        let drain = thread::spawn(move || {
            let mut totals = ProgressTotals::default();
            for event in events {
                totals.ticks += 1;
                if event.is_success() {
                    totals.counted += 1;
                }
                drain_bar.set_message(format!("found {}", totals.counted));
                drain_bar.inc(1);
            }
            totals
        });

        Self { bar, drain }
    }

    /// Waits for the drain to finish and clears the bar.
    pub fn finish(self) -> ProgressTotals {
        let totals = join_drain(self.drain);
        self.bar.finish_and_clear();
        totals
    }
}

/// Joins the drain thread. A panicked drain reports zero totals.
fn join_drain(drain: JoinHandle<ProgressTotals>) -> ProgressTotals {
    drain.join().unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        scan_error!("progress drain thread panicked: {}", reason);
        ProgressTotals::default()
    })
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use giftscan_core::ExtractedRecord;
    use giftscan_engine::FailureKind;

    use super::*;

    #[test]
    fn drain_counts_every_event_until_channel_closes() {
        let (tx, rx) = mpsc::channel();
        let display = ProgressDisplay::spawn(rx, 3, false);

        tx.send(ScanEvent {
            identifier: 1,
            result: Ok(ExtractedRecord {
                category: "X".to_string(),
                rarity: "1%".to_string(),
            }),
        })
        .unwrap();
        tx.send(ScanEvent {
            identifier: 2,
            result: Err(FailureKind::Parse),
        })
        .unwrap();
        tx.send(ScanEvent {
            identifier: 3,
            result: Err(FailureKind::Timeout),
        })
        .unwrap();
        drop(tx);

        assert_eq!(
            display.finish(),
            ProgressTotals {
                ticks: 3,
                counted: 1
            }
        );
    }

    #[test]
    fn panicked_drain_reports_zero_totals() {
        giftscan_logging::initialize_for_tests();
        let drain = thread::spawn(|| -> ProgressTotals { panic!("drain failed") });
        assert_eq!(join_drain(drain), ProgressTotals::default());
    }
}
