//! Line-oriented text formats.
//!
//! Every instance or reference solution occupies a single whitespace
//! separated line:
//!
//! | Record                 | Layout                                           |
//! |------------------------|--------------------------------------------------|
//! | knapsack instance      | `<id> <n> <capacity> <w0> <v0> ... <wn-1> <vn-1>` |
//! | knapsack solution      | `<id> <n> <value> <c0> ... <cn-1>`               |
//! | weighted-SAT instance  | `<n_vars> <n_clauses> <weights..> <l1 l2 l3>..`  |
//! | weighted-SAT solution  | `<id> <value> <signed literals..> 0`             |
//!
//! Instance ids are discarded.

use std::str::FromStr;

use super::{Clause, KnapsackInstance, WsatInstance};
use crate::error::{KopError, Result};
use crate::measure::ReferenceSolution;

struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            inner: line.split_whitespace(),
        }
    }

    fn raw(&mut self, what: &str) -> Result<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| KopError::InvalidInstance(format!("missing {what}")))
    }

    fn num<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.raw(what)?;
        token
            .parse()
            .map_err(|_| KopError::InvalidInstance(format!("invalid {what} '{token}'")))
    }

    fn finish(mut self) -> Result<()> {
        match self.inner.next() {
            None => Ok(()),
            Some(extra) => Err(KopError::InvalidInstance(format!(
                "unexpected trailing token '{extra}'"
            ))),
        }
    }
}

impl FromStr for KnapsackInstance {
    type Err = KopError;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = Tokens::new(line);
        tokens.raw("instance id")?;
        let n: usize = tokens.num("item count")?;
        let capacity: u64 = tokens.num("capacity")?;

        // counts come from untrusted input; tokens run out before memory does
        let mut weights = Vec::new();
        let mut values = Vec::new();
        for _ in 0..n {
            weights.push(tokens.num("weight")?);
            values.push(tokens.num("value")?);
        }
        tokens.finish()?;

        KnapsackInstance::with_size(n, capacity, weights, values)
    }
}

impl FromStr for WsatInstance {
    type Err = KopError;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = Tokens::new(line);
        let n_vars: usize = tokens.num("variable count")?;
        let n_clauses: usize = tokens.num("clause count")?;

        let weights = (0..n_vars)
            .map(|_| tokens.num("weight"))
            .collect::<Result<Vec<u64>>>()?;

        let mut clauses = Vec::new();
        for _ in 0..n_clauses {
            clauses.push(Clause([
                tokens.num("literal")?,
                tokens.num("literal")?,
                tokens.num("literal")?,
            ]));
        }
        tokens.finish()?;

        WsatInstance::with_size(n_vars, n_clauses, weights, clauses)
    }
}

/// Parses a knapsack reference solution line.
///
/// ```
/// use u_kop::instance::parse::knapsack_solution;
///
/// let sol = knapsack_solution("9000 3 10 1 0 1").unwrap();
/// assert_eq!(sol.value, 10);
/// assert_eq!(sol.config, vec![true, false, true]);
/// ```
pub fn knapsack_solution(line: &str) -> Result<ReferenceSolution> {
    let mut tokens = Tokens::new(line);
    tokens.raw("instance id")?;
    let n: usize = tokens.num("item count")?;
    let value: i64 = tokens.num("value")?;

    let mut config = Vec::new();
    for _ in 0..n {
        match tokens.num::<u8>("configuration flag")? {
            0 => config.push(false),
            1 => config.push(true),
            other => {
                return Err(KopError::InvalidInstance(format!(
                    "configuration flag must be 0 or 1, got {other}"
                )))
            }
        }
    }
    tokens.finish()?;

    Ok(ReferenceSolution { value, config })
}

/// Parses a weighted-SAT reference solution line.
///
/// The assignment is a list of signed literals closed by `0`; a positive
/// literal marks its variable true.
pub fn wsat_solution(line: &str) -> Result<ReferenceSolution> {
    let mut tokens = Tokens::new(line);
    tokens.raw("instance id")?;
    let value: i64 = tokens.num("value")?;

    let mut config = Vec::new();
    loop {
        let lit: i64 = tokens.num("literal")?;
        if lit == 0 {
            break;
        }
        config.push(lit > 0);
    }
    tokens.finish()?;

    Ok(ReferenceSolution { value, config })
}
