use anyhow::{Context, Result};
use regex::Regex;

use crate::model::Cell;

#[cfg(test)]
mod tests;

/// The first rule that reaches a verdict decides the cell.
pub const RULE_ORDER: [Rule; 6] = [
    Rule::LinkVeto,
    Rule::DateVeto,
    Rule::CitationVeto,
    Rule::Measurement,
    Rule::Decimal,
    Rule::Integer,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    LinkVeto,
    DateVeto,
    CitationVeto,
    Measurement,
    Decimal,
    Integer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Linked,
    Date,
    Citation,
    NoNumber,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Numeric(f64),
    Rejected(Rejection),
}

impl Classification {
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Numeric(value) => Some(value),
            Self::Rejected(_) => None,
        }
    }
}

pub struct ValueClassifier {
    month_name: Regex,
    numeric_dates: Vec<Regex>,
    unit_token: Regex,
    measurement_number: Regex,
    decimal_number: Regex,
    integer_number: Regex,
}

impl ValueClassifier {
    pub fn new() -> Result<Self> {
        let numeric_dates = [
            r"[0-9]{1,2}[-/.][0-9]{1,2}[-/.][0-9]{2,4}",
            r"[0-9]{4}[-/.][0-9]{1,2}[-/.][0-9]{1,2}",
            r"[0-9]{1,2}\s+[A-Za-z0-9_]+\s+[0-9]{4}",
            r"[A-Za-z0-9_]+\s+[0-9]{1,2},?\s+[0-9]{4}",
        ]
        .into_iter()
        .map(|pattern| {
            Regex::new(pattern)
                .with_context(|| format!("failed to compile numeric date regex: {pattern}"))
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            month_name: Regex::new(
                r"(?i)(?-u:\b)(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sep|sept|oct|nov|dec)(?-u:\b)",
            )
            .context("failed to compile month name regex")?,
            numeric_dates,
            unit_token: Regex::new(
                r"(?i)(?-u:\b)(?:m|meters?|metres?|cm|km|ft|foot|feet|in|inch(?:es)?|miles?|yards?|yd|kg|lbs?|pounds?|secs?|mins?|hours?)(?-u:\b)",
            )
            .context("failed to compile unit token regex")?,
            measurement_number: Regex::new(r"([0-9]+\.?[0-9]*)\s*[A-Za-z]")
                .context("failed to compile measurement number regex")?,
            decimal_number: Regex::new(r"(?-u:\b)[0-9]+\.[0-9]+(?-u:\b)")
                .context("failed to compile decimal number regex")?,
            integer_number: Regex::new(r"(?-u:\b)[0-9]+(?-u:\b)")
                .context("failed to compile integer number regex")?,
        })
    }

    pub fn classify(&self, cell: &Cell) -> Classification {
        RULE_ORDER
            .iter()
            .find_map(|rule| self.apply(*rule, cell))
            .unwrap_or(Classification::Rejected(Rejection::NoNumber))
    }

    pub fn value(&self, cell: &Cell) -> Option<f64> {
        self.classify(cell).value()
    }

    fn apply(&self, rule: Rule, cell: &Cell) -> Option<Classification> {
        let text = cell.text.as_str();

        match rule {
            Rule::LinkVeto => cell
                .linked
                .then_some(Classification::Rejected(Rejection::Linked)),
            Rule::DateVeto => self
                .looks_like_date(text)
                .then_some(Classification::Rejected(Rejection::Date)),
            Rule::CitationVeto => {
                has_citation(text).then_some(Classification::Rejected(Rejection::Citation))
            }
            Rule::Measurement => {
                if !self.looks_like_measurement(text) {
                    return None;
                }
                self.measurement_number
                    .captures(text)
                    .and_then(|captures| captures.get(1))
                    .and_then(|number| parse_finite(number.as_str()))
                    .map(Classification::Numeric)
            }
            Rule::Decimal => self
                .decimal_number
                .find(text)
                .and_then(|number| parse_finite(number.as_str()))
                .map(Classification::Numeric),
            Rule::Integer => self
                .integer_number
                .find(text)
                .and_then(|number| parse_finite(number.as_str()))
                .map(Classification::Numeric),
        }
    }

    pub fn looks_like_date(&self, text: &str) -> bool {
        self.month_name.is_match(text)
            || self
                .numeric_dates
                .iter()
                .any(|pattern| pattern.is_match(text))
    }

    pub fn looks_like_measurement(&self, text: &str) -> bool {
        self.unit_token.is_match(text)
    }
}

pub fn has_citation(text: &str) -> bool {
    text.contains('[') && text.contains(']')
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
