// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! The closed catalog of named TTC distributions.
//!
//! Modeled as a constant table keyed by name rather than per-distribution
//! types, per the design rationale in `spec.md` §9: there is no reasonable
//! axis along which a consumer would add a nineteenth distribution, so a
//! `match` over a fixed enum is simpler than a trait-object catalog.

use crate::error::LangError;

/// Error raised when a mean computation is not defined for the expression
/// it was asked of (`spec.md` §4.2).
#[derive(Copy, Clone, Eq, PartialEq, Debug, Display, Error)]
#[display(doc_comments)]
pub enum TtcError {
    /// this operation is not defined for the given TTC expression
    UnsupportedOperation,
}

/// One of the eighteen distributions a `function(...)` TTC node may name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[non_exhaustive]
pub enum TtcDistribution {
    Bernoulli,
    Binomial,
    Exponential,
    Gamma,
    LogNormal,
    Pareto,
    TruncatedNormal,
    Uniform,
    EasyAndCertain,
    EasyAndUncertain,
    HardAndCertain,
    HardAndUncertain,
    VeryHardAndCertain,
    VeryHardAndUncertain,
    Infinity,
    Zero,
    Enabled,
    Disabled,
}

impl TtcDistribution {
    /// Looks a distribution up by its exact, case-sensitive name.
    pub fn by_name(name: &str) -> Option<Self> {
        use TtcDistribution::*;
        Some(match name {
            "Bernoulli" => Bernoulli,
            "Binomial" => Binomial,
            "Exponential" => Exponential,
            "Gamma" => Gamma,
            "LogNormal" => LogNormal,
            "Pareto" => Pareto,
            "TruncatedNormal" => TruncatedNormal,
            "Uniform" => Uniform,
            "EasyAndCertain" => EasyAndCertain,
            "EasyAndUncertain" => EasyAndUncertain,
            "HardAndCertain" => HardAndCertain,
            "HardAndUncertain" => HardAndUncertain,
            "VeryHardAndCertain" => VeryHardAndCertain,
            "VeryHardAndUncertain" => VeryHardAndUncertain,
            "Infinity" => Infinity,
            "Zero" => Zero,
            "Enabled" => Enabled,
            "Disabled" => Disabled,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        use TtcDistribution::*;
        match self {
            Bernoulli => "Bernoulli",
            Binomial => "Binomial",
            Exponential => "Exponential",
            Gamma => "Gamma",
            LogNormal => "LogNormal",
            Pareto => "Pareto",
            TruncatedNormal => "TruncatedNormal",
            Uniform => "Uniform",
            EasyAndCertain => "EasyAndCertain",
            EasyAndUncertain => "EasyAndUncertain",
            HardAndCertain => "HardAndCertain",
            HardAndUncertain => "HardAndUncertain",
            VeryHardAndCertain => "VeryHardAndCertain",
            VeryHardAndUncertain => "VeryHardAndUncertain",
            Infinity => "Infinity",
            Zero => "Zero",
            Enabled => "Enabled",
            Disabled => "Disabled",
        }
    }

    /// Number of arguments this distribution takes.
    pub fn arity(&self) -> usize {
        use TtcDistribution::*;
        match self {
            Bernoulli | Exponential => 1,
            Binomial | Gamma | LogNormal | Pareto | TruncatedNormal | Uniform => 2,
            EasyAndCertain
            | EasyAndUncertain
            | HardAndCertain
            | HardAndUncertain
            | VeryHardAndCertain
            | VeryHardAndUncertain
            | Infinity
            | Zero
            | Enabled
            | Disabled => 0,
        }
    }

    /// Validates argument count, finiteness and per-distribution range
    /// constraints (`spec.md` §3's distribution table).
    pub fn validate_args(&self, args: &[f64]) -> Result<(), LangError> {
        let invalid = || LangError::InvalidDistributionArguments(self.name().to_string());

        if args.len() != self.arity() {
            return Err(invalid());
        }
        if args.iter().any(|a| !a.is_finite()) {
            return Err(invalid());
        }

        use TtcDistribution::*;
        let ok = match self {
            Bernoulli => (0.0..=1.0).contains(&args[0]),
            Binomial => args[0] >= 0.0 && args[0].fract() == 0.0 && (0.0..=1.0).contains(&args[1]),
            Exponential => args[0] > 0.0,
            Gamma => args[0] > 0.0 && args[1] > 0.0,
            LogNormal => args[1] > 0.0,
            Pareto => args[0] > 0.0 && args[1] > 0.0,
            TruncatedNormal => args[1] > 0.0,
            Uniform => args[0] <= args[1],
            EasyAndCertain
            | EasyAndUncertain
            | HardAndCertain
            | HardAndUncertain
            | VeryHardAndCertain
            | VeryHardAndUncertain
            | Infinity
            | Zero
            | Enabled
            | Disabled => true,
        };
        if ok {
            Ok(())
        } else {
            Err(invalid())
        }
    }

    /// Mean time-to-compromise, assuming `args` already passed
    /// [`Self::validate_args`].
    pub fn mean_ttc(&self, args: &[f64]) -> Result<f64, TtcError> {
        use TtcDistribution::*;
        Ok(match self {
            Bernoulli => {
                if args[0] < 0.5 {
                    0.0
                } else {
                    f64::MAX
                }
            }
            Binomial => args[0] * args[1],
            Exponential => 1.0 / args[0],
            Gamma => args[0] * args[1],
            LogNormal => (args[0] + args[1] * args[1] / 2.0).exp(),
            Pareto => {
                if args[1] > 1.0 {
                    args[1] * args[0] / (args[1] - 1.0)
                } else {
                    f64::MAX
                }
            }
            TruncatedNormal => args[0],
            Uniform => (args[0] + args[1]) / 2.0,
            EasyAndCertain => Exponential.mean_ttc(&[1.0])?,
            EasyAndUncertain => Bernoulli.mean_ttc(&[0.5])? + Exponential.mean_ttc(&[1.0])?,
            HardAndCertain => Exponential.mean_ttc(&[0.1])?,
            HardAndUncertain => Bernoulli.mean_ttc(&[0.5])? + Exponential.mean_ttc(&[0.1])?,
            VeryHardAndCertain => Exponential.mean_ttc(&[0.01])?,
            VeryHardAndUncertain => Bernoulli.mean_ttc(&[0.5])? + Exponential.mean_ttc(&[0.01])?,
            Infinity => f64::MAX,
            Zero => 0.0,
            Enabled | Disabled => return Err(TtcError::UnsupportedOperation),
        })
    }

    /// Mean probability; only defined for `Bernoulli`, `Enabled`, `Disabled`.
    pub fn mean_probability(&self, args: &[f64]) -> Result<f64, TtcError> {
        use TtcDistribution::*;
        match self {
            Bernoulli => Ok(args[0]),
            Enabled => Ok(1.0),
            Disabled => Ok(0.0),
            _ => Err(TtcError::UnsupportedOperation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bernoulli_mean_ttc_threshold() {
        assert_eq!(TtcDistribution::Bernoulli.mean_ttc(&[0.49]).unwrap(), 0.0);
        assert_eq!(TtcDistribution::Bernoulli.mean_ttc(&[0.5]).unwrap(), f64::MAX);
        assert_eq!(TtcDistribution::Bernoulli.mean_ttc(&[0.9]).unwrap(), f64::MAX);
    }

    #[test]
    fn exponential_mean_is_reciprocal_rate() {
        assert_eq!(TtcDistribution::Exponential.mean_ttc(&[0.1]).unwrap(), 10.0);
    }

    #[test]
    fn pareto_mean_uses_shape_threshold() {
        assert_eq!(TtcDistribution::Pareto.mean_ttc(&[2.0, 0.5]).unwrap(), f64::MAX);
        let mean = TtcDistribution::Pareto.mean_ttc(&[2.0, 2.0]).unwrap();
        assert!((mean - 4.0).abs() < 1e-9);
    }

    #[test]
    fn canned_distributions_match_their_definitions() {
        assert_eq!(TtcDistribution::HardAndCertain.mean_ttc(&[]).unwrap(), 10.0);
        assert_eq!(TtcDistribution::Zero.mean_ttc(&[]).unwrap(), 0.0);
        assert_eq!(TtcDistribution::Infinity.mean_ttc(&[]).unwrap(), f64::MAX);
    }

    #[test]
    fn enabled_disabled_only_support_probability() {
        assert!(TtcDistribution::Enabled.mean_ttc(&[]).is_err());
        assert_eq!(TtcDistribution::Enabled.mean_probability(&[]).unwrap(), 1.0);
        assert_eq!(TtcDistribution::Disabled.mean_probability(&[]).unwrap(), 0.0);
    }

    #[test]
    fn validates_arity_and_ranges() {
        assert!(TtcDistribution::Bernoulli.validate_args(&[1.5]).is_err());
        assert!(TtcDistribution::Bernoulli.validate_args(&[0.5, 0.1]).is_err());
        assert!(TtcDistribution::Uniform.validate_args(&[3.0, 1.0]).is_err());
        assert!(TtcDistribution::Binomial.validate_args(&[2.5, 0.5]).is_err());
        assert!(TtcDistribution::Binomial.validate_args(&[2.0, 0.5]).is_ok());
    }

    #[test]
    fn by_name_roundtrips() {
        for dist in [
            TtcDistribution::Bernoulli,
            TtcDistribution::Uniform,
            TtcDistribution::Enabled,
            TtcDistribution::Zero,
        ] {
            assert_eq!(TtcDistribution::by_name(dist.name()), Some(dist));
        }
        assert_eq!(TtcDistribution::by_name("NotReal"), None);
    }
}
