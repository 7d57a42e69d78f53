use clap::Parser;
use mm1sim::{Parameters, Simulation, WriterSink};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

const RULE: &str = "------------------------------------------";

/// Simulate a single-server queueing system and report its time-averaged
/// performance measures.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Mean interarrival time, in minutes
    #[arg(long, default_value_t = 1.0)]
    interarrival: f64,

    /// Mean service time, in minutes
    #[arg(long, default_value_t = 0.5)]
    service: f64,

    /// Number of customer delays to record before stopping
    #[arg(long, default_value_t = 1000)]
    delays: u64,

    /// Read "interarrival service delays" from the first line of this
    /// file instead of taking the flags above
    #[arg(long, value_name = "FILE", conflicts_with_all = ["interarrival", "service", "delays"])]
    params: Option<PathBuf>,

    /// Seed the random-number generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Write output to this file instead of stdout
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print one line of simulation state after every event
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();

    let parameters = match &args.params {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            Parameters::from_line(text.lines().next().unwrap_or_default())?
        }
        None => Parameters::new(args.interarrival, args.service, args.delays)?,
    };

    let source = match args.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_rng(&mut rand::rng()),
    };

    match &args.output {
        Some(path) => {
            let writer = io::BufWriter::new(File::create(path)?);
            simulate(parameters, source, writer, args.trace)
        }
        None => simulate(parameters, source, io::stdout().lock(), args.trace),
    }
}

fn simulate<W: Write>(
    parameters: Parameters,
    source: Pcg64,
    mut writer: W,
    trace: bool,
) -> Result<(), Box<dyn Error>> {
    write_header(&mut writer, &parameters)?;
    let mut sink = if trace {
        WriterSink::new(writer)
    } else {
        WriterSink::report_only(writer)
    };

    let started = Instant::now();
    let mut simulation = Simulation::new(parameters, source);
    let outcome = simulation.run(&mut sink);
    let summary = processed_summary(simulation.events_processed(), started.elapsed());

    let mut writer = sink.finish()?;
    writer.flush()?;
    // The report stream carries only the header, trace, and report; the
    // run summary goes to stderr.
    eprintln!("{summary}");
    outcome?;
    Ok(())
}

fn processed_summary(events: u64, elapsed: Duration) -> String {
    format!("Processed {events} events in {elapsed:.2?}")
}

fn write_header<W: Write>(writer: &mut W, parameters: &Parameters) -> io::Result<()> {
    writeln!(writer, "{RULE}")?;
    writeln!(writer, "// Single-Server Queueing System //")?;
    writeln!(
        writer,
        "Mean interarrival time{:11.3} minutes",
        parameters.mean_interarrival()
    )?;
    writeln!(
        writer,
        "Mean service time{:16.3} minutes",
        parameters.mean_service()
    )?;
    writeln!(
        writer,
        "Number of customers{:14}",
        parameters.delays_required()
    )?;
    writeln!(writer, "{RULE}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_summary_names_the_event_count_and_wall_time() {
        assert_eq!(
            "Processed 2612 events in 1.53ms",
            processed_summary(2612, Duration::from_micros(1530))
        );
    }
}
