use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the six local packet-switching rules (spec §4.4).
///
/// `A`/`D` pick deterministically among the productive dimensions; `B`/`E`
/// pick uniformly at random; `C`/`F` pick weighted by residual-distance
/// magnitude. `D`/`E`/`F` additionally restrict the candidate set to ports
/// that are currently free before choosing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Rule {
    /// Parse the single-letter rule identifier used by `--r=` / config files.
    pub fn parse(c: char) -> Result<Self, ConfigError> {
        match c.to_ascii_lowercase() {
            'a' => Ok(Rule::A),
            'b' => Ok(Rule::B),
            'c' => Ok(Rule::C),
            'd' => Ok(Rule::D),
            'e' => Ok(Rule::E),
            'f' => Ok(Rule::F),
            other => Err(ConfigError::UnknownRule(other)),
        }
    }

    pub fn letter(self) -> char {
        match self {
            Rule::A => 'a',
            Rule::B => 'b',
            Rule::C => 'c',
            Rule::D => 'd',
            Rule::E => 'e',
            Rule::F => 'f',
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl std::str::FromStr for Rule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rule::parse(c),
            _ => Err(ConfigError::UnknownRule(s.chars().next().unwrap_or('?'))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_six_letters() {
        for (c, r) in [
            ('a', Rule::A),
            ('b', Rule::B),
            ('c', Rule::C),
            ('d', Rule::D),
            ('e', Rule::E),
            ('f', Rule::F),
        ] {
            assert_eq!(Rule::parse(c).unwrap(), r);
            assert_eq!(r.letter(), c);
        }
    }

    #[test]
    fn rejects_unknown_letter() {
        assert!(matches!(Rule::parse('z'), Err(ConfigError::UnknownRule('z'))));
    }
}
