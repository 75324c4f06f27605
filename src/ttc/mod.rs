// mal-langspec: object model, linker and bidirectional JSON/archive codec
// for MAL-family threat modeling language descriptors.
//
// To the extent possible under law, the author(s) have dedicated all copyright
// and related and neighboring rights to this software to the public domain
// worldwide. This software is distributed without any warranty.
//
// You should have received a copy of the MIT License along with this software.
// If not, see <https://opensource.org/licenses/MIT>.

//! Time-to-compromise (TTC) expression algebra.
//!
//! A [`TtcExpr`] tree is built compositionally: binary operators apply
//! arithmetic to their children's mean TTC, `Number` yields itself, and
//! `Function` delegates to the named [`TtcDistribution`]. The distinguished
//! [`TtcExpr::Empty`] variant is an explicit "no TTC" sentinel — it is not
//! the same thing as the absence of a TTC slot; see `spec.md` §9.

pub mod distribution;

pub use distribution::{TtcDistribution, TtcError};

use crate::error::{EntityKind, LangError};

/// A resolved, fully validated TTC expression.
#[derive(Clone, Debug, PartialEq)]
pub enum TtcExpr {
    /// The explicit "no TTC" sentinel. Mean TTC is `0.0`; mean probability
    /// is undefined.
    Empty,
    Number(f64),
    Addition(Box<TtcExpr>, Box<TtcExpr>),
    Subtraction(Box<TtcExpr>, Box<TtcExpr>),
    Multiplication(Box<TtcExpr>, Box<TtcExpr>),
    Division(Box<TtcExpr>, Box<TtcExpr>),
    Exponentiation(Box<TtcExpr>, Box<TtcExpr>),
    Function(TtcDistribution, Vec<f64>),
}

impl TtcExpr {
    pub fn is_empty(&self) -> bool { matches!(self, TtcExpr::Empty) }

    /// Mean time-to-compromise, per the compositional definition of
    /// `spec.md` §4.2.
    pub fn mean_ttc(&self) -> Result<f64, TtcError> {
        use TtcExpr::*;
        Ok(match self {
            Empty => 0.0,
            Number(v) => *v,
            Addition(l, r) => l.mean_ttc()? + r.mean_ttc()?,
            Subtraction(l, r) => l.mean_ttc()? - r.mean_ttc()?,
            Multiplication(l, r) => l.mean_ttc()? * r.mean_ttc()?,
            Division(l, r) => l.mean_ttc()? / r.mean_ttc()?,
            Exponentiation(l, r) => l.mean_ttc()?.powf(r.mean_ttc()?),
            Function(dist, args) => dist.mean_ttc(args)?,
        })
    }

    /// Mean probability; only `Function(Bernoulli | Enabled | Disabled, _)`
    /// defines this.
    pub fn mean_probability(&self) -> Result<f64, TtcError> {
        match self {
            TtcExpr::Function(dist, args) => dist.mean_probability(args),
            _ => Err(TtcError::UnsupportedOperation),
        }
    }
}

/// By-name, unresolved TTC expression tree collected by a builder.
#[derive(Clone, Debug, PartialEq)]
pub enum TtcExprBuilder {
    Empty,
    Number(f64),
    Addition(Box<TtcExprBuilder>, Box<TtcExprBuilder>),
    Subtraction(Box<TtcExprBuilder>, Box<TtcExprBuilder>),
    Multiplication(Box<TtcExprBuilder>, Box<TtcExprBuilder>),
    Division(Box<TtcExprBuilder>, Box<TtcExprBuilder>),
    Exponentiation(Box<TtcExprBuilder>, Box<TtcExprBuilder>),
    Function(String, Vec<f64>),
}

impl TtcExprBuilder {
    pub fn number(v: f64) -> Self { TtcExprBuilder::Number(v) }

    pub fn function(distribution: impl Into<String>, args: impl Into<Vec<f64>>) -> Self {
        TtcExprBuilder::Function(distribution.into(), args.into())
    }

    pub fn addition(lhs: Self, rhs: Self) -> Self {
        TtcExprBuilder::Addition(Box::new(lhs), Box::new(rhs))
    }

    pub fn subtraction(lhs: Self, rhs: Self) -> Self {
        TtcExprBuilder::Subtraction(Box::new(lhs), Box::new(rhs))
    }

    pub fn multiplication(lhs: Self, rhs: Self) -> Self {
        TtcExprBuilder::Multiplication(Box::new(lhs), Box::new(rhs))
    }

    pub fn division(lhs: Self, rhs: Self) -> Self {
        TtcExprBuilder::Division(Box::new(lhs), Box::new(rhs))
    }

    pub fn exponentiation(lhs: Self, rhs: Self) -> Self {
        TtcExprBuilder::Exponentiation(Box::new(lhs), Box::new(rhs))
    }

    /// Resolves distribution names against the closed catalog and validates
    /// their arguments. Unlike step expressions, TTC expressions carry no
    /// asset typing, so this does not need the resolver's asset context.
    pub fn build(self) -> Result<TtcExpr, LangError> {
        Ok(match self {
            TtcExprBuilder::Empty => TtcExpr::Empty,
            TtcExprBuilder::Number(v) => TtcExpr::Number(v),
            TtcExprBuilder::Addition(l, r) => {
                TtcExpr::Addition(Box::new(l.build()?), Box::new(r.build()?))
            }
            TtcExprBuilder::Subtraction(l, r) => {
                TtcExpr::Subtraction(Box::new(l.build()?), Box::new(r.build()?))
            }
            TtcExprBuilder::Multiplication(l, r) => {
                TtcExpr::Multiplication(Box::new(l.build()?), Box::new(r.build()?))
            }
            TtcExprBuilder::Division(l, r) => {
                TtcExpr::Division(Box::new(l.build()?), Box::new(r.build()?))
            }
            TtcExprBuilder::Exponentiation(l, r) => {
                TtcExpr::Exponentiation(Box::new(l.build()?), Box::new(r.build()?))
            }
            TtcExprBuilder::Function(name, args) => {
                let dist = TtcDistribution::by_name(&name)
                    .ok_or_else(|| LangError::UnknownReference(EntityKind::Distribution, name))?;
                dist.validate_args(&args)?;
                TtcExpr::Function(dist, args)
            }
        })
    }
}
