use crate::stats::StatsAccumulator;
use std::fmt;

/// Final derived metrics of a run.
///
/// A pure function of the final accumulator state and clock value,
/// computed once when the stopping condition is reached. Degenerate
/// runs are representable rather than fatal: a run that completed
/// zero delays has no mean delay, and a run that ended at clock 0 has
/// no time averages, so those metrics are `None` and render as `n/a`.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    mean_delay: Option<f64>,
    mean_queue_length: Option<f64>,
    server_utilization: Option<f64>,
    end_time: f64,
    customers_delayed: u64,
}

impl Report {
    /// Derive the output metrics from the run's final state.
    pub fn from_run(stats: &StatsAccumulator, clock: f64) -> Self {
        let customers = stats.customers_delayed();
        let mean_delay = (customers > 0).then(|| stats.total_delay() / customers as f64);
        let mean_queue_length = (clock > 0.0).then(|| stats.area_queue_length() / clock);
        let server_utilization = (clock > 0.0).then(|| stats.area_server_busy() / clock);
        Self {
            mean_delay,
            mean_queue_length,
            server_utilization,
            end_time: clock,
            customers_delayed: customers,
        }
    }

    /// Average wait between arrival and entering service, over
    /// customers whose delay completed; `None` if none did.
    pub fn mean_delay(&self) -> Option<f64> {
        self.mean_delay
    }

    /// Time-average number of waiting customers; `None` for a
    /// zero-duration run.
    pub fn mean_queue_length(&self) -> Option<f64> {
        self.mean_queue_length
    }

    /// Fraction of elapsed simulated time the server spent busy;
    /// `None` for a zero-duration run.
    pub fn server_utilization(&self) -> Option<f64> {
        self.server_utilization
    }

    /// Simulation clock when the run stopped.
    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    /// Number of completed delays behind [`mean_delay()`].
    ///
    /// [`mean_delay()`]: Report::mean_delay
    pub fn customers_delayed(&self) -> u64 {
        self.customers_delayed
    }
}

const RULE: &str = "------------------------------------------";

fn metric(value: Option<f64>, width: usize) -> String {
    match value {
        Some(value) => format!("{value:>width$.3}"),
        None => format!("{:>width$}", "n/a"),
    }
}

impl fmt::Display for Report {
    /// Renders the classic fixed-column report block, `n/a` standing
    /// in for undefined metrics.
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        writeln!(formatter, "{RULE}")?;
        writeln!(
            formatter,
            "Average delay in queue {} minutes",
            metric(self.mean_delay, 11)
        )?;
        writeln!(
            formatter,
            "Average number in queue {}",
            metric(self.mean_queue_length, 10)
        )?;
        writeln!(
            formatter,
            "Server utilization {}",
            metric(self.server_utilization, 15)
        )?;
        writeln!(
            formatter,
            "Time simulation ended {} minutes",
            metric(Some(self.end_time), 12)
        )?;
        write!(formatter, "{RULE}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_all_four_metrics() {
        let mut stats = StatsAccumulator::new();
        stats.advance_to(2.0, 1, true); // area_q = 2, area_b = 2
        stats.advance_to(4.0, 0, true); // area_b = 4
        stats.record_delay(1.0);
        stats.record_delay(2.0);

        let report = Report::from_run(&stats, 4.0);
        assert_eq!(Some(1.5), report.mean_delay());
        assert_eq!(Some(0.5), report.mean_queue_length());
        assert_eq!(Some(1.0), report.server_utilization());
        assert_eq!(4.0, report.end_time());
        assert_eq!(2, report.customers_delayed());
    }

    #[test]
    fn zero_completions_leave_mean_delay_undefined() {
        let mut stats = StatsAccumulator::new();
        stats.advance_to(3.0, 0, true);
        let report = Report::from_run(&stats, 3.0);
        assert_eq!(None, report.mean_delay());
        assert_eq!(Some(0.0), report.mean_queue_length());
        assert_eq!(Some(1.0), report.server_utilization());
    }

    #[test]
    fn zero_duration_run_reports_no_data() {
        let report = Report::from_run(&StatsAccumulator::new(), 0.0);
        assert_eq!(None, report.mean_delay());
        assert_eq!(None, report.mean_queue_length());
        assert_eq!(None, report.server_utilization());
        assert_eq!(0.0, report.end_time());
        assert_eq!(0, report.customers_delayed());
    }

    #[test]
    fn renders_fixed_column_block() {
        let mut stats = StatsAccumulator::new();
        stats.advance_to(2.0, 1, true);
        stats.record_delay(0.5);
        let report = Report::from_run(&stats, 2.0);

        let expected = "\
------------------------------------------
Average delay in queue       0.500 minutes
Average number in queue      1.000
Server utilization           1.000
Time simulation ended        2.000 minutes
------------------------------------------";
        assert_eq!(expected, report.to_string());
    }

    #[test]
    fn renders_undefined_metrics_as_na() {
        let report = Report::from_run(&StatsAccumulator::new(), 0.0);
        let rendered = report.to_string();
        assert!(rendered.contains("Average delay in queue         n/a minutes"));
        assert!(rendered.contains("Time simulation ended        0.000 minutes"));
    }
}
