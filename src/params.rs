use crate::error::{Error, Result};

/// Inputs that define a single run of the simulation.
///
/// The three values correspond to the model's external knobs: the mean
/// interarrival time of the exponential arrival stream, the mean service
/// time of the exponential server, and the number of completed customer
/// delays at which the run stops.
///
/// Construction validates that both means are positive and finite; the
/// engine treats them as preconditions and never re-checks. The target
/// delay count is unsigned and may be zero, in which case a run
/// terminates immediately at clock 0 and the report carries no averages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameters {
    mean_interarrival: f64,
    mean_service: f64,
    delays_required: u64,
}

impl Parameters {
    /// Validate and bundle the three run parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMean`] if either mean is zero, negative,
    /// NaN, or infinite.
    pub fn new(mean_interarrival: f64, mean_service: f64, delays_required: u64) -> Result<Self> {
        if !mean_interarrival.is_finite() || mean_interarrival <= 0.0 {
            return Err(Error::InvalidMean {
                name: "interarrival",
                value: mean_interarrival,
            });
        }
        if !mean_service.is_finite() || mean_service <= 0.0 {
            return Err(Error::InvalidMean {
                name: "service",
                value: mean_service,
            });
        }
        Ok(Self {
            mean_interarrival,
            mean_service,
            delays_required,
        })
    }

    /// Parse the classic one-line parameter file format: three
    /// whitespace-separated values, e.g. `1.0 0.5 1000` for a mean
    /// interarrival time of 1.0, a mean service time of 0.5, and a
    /// target of 1000 completed delays.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedParameters`] if the line does not hold
    /// exactly three parseable values, or [`Error::InvalidMean`] if a
    /// mean fails validation.
    pub fn from_line(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let mut take = |name: &str| {
            fields
                .next()
                .ok_or_else(|| Error::MalformedParameters(format!("missing {name}")))
        };

        let mean_interarrival = parse_field(take("mean interarrival time")?, "mean interarrival time")?;
        let mean_service = parse_field(take("mean service time")?, "mean service time")?;
        let delays_required: u64 = {
            let field = take("delay count")?;
            field
                .parse()
                .map_err(|_| Error::MalformedParameters(format!("unparseable delay count {field:?}")))?
        };

        if let Some(extra) = fields.next() {
            return Err(Error::MalformedParameters(format!(
                "unexpected trailing value {extra:?}"
            )));
        }

        Self::new(mean_interarrival, mean_service, delays_required)
    }

    /// Mean of the exponential interarrival-time distribution.
    pub fn mean_interarrival(&self) -> f64 {
        self.mean_interarrival
    }

    /// Mean of the exponential service-time distribution.
    pub fn mean_service(&self) -> f64 {
        self.mean_service
    }

    /// Number of completed delays at which the run stops.
    pub fn delays_required(&self) -> u64 {
        self.delays_required
    }
}

fn parse_field(field: &str, name: &str) -> Result<f64> {
    field
        .parse()
        .map_err(|_| Error::MalformedParameters(format!("unparseable {name} {field:?}")))
}
