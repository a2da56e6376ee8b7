use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Upper bound on records requested across a whole test case.
pub const MAX_TOTAL_RECORDS: u64 = 10_000;

/// Value of the unclaimed-property flag column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    Yes,
    No,
}

impl Flag {
    pub fn as_char(self) -> char {
        match self {
            Flag::Yes => 'Y',
            Flag::No => 'N',
        }
    }
}

/// Nullity of a date column within a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateState {
    Null,
    Set,
}

/// One of the eight (flag, cleared date, void date) test combinations.
///
/// Ordering follows the declaration order, which is the order scenarios are
/// listed, queried and generated in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum ScenarioKey {
    #[serde(rename = "Y_null_null")]
    YesNullNull,
    #[serde(rename = "Y_sysdate_null")]
    YesSetNull,
    #[serde(rename = "Y_sysdate_sysdate")]
    YesSetSet,
    #[serde(rename = "Y_null_sysdate")]
    YesNullSet,
    #[serde(rename = "N_null_null")]
    NoNullNull,
    #[serde(rename = "N_sysdate_null")]
    NoSetNull,
    #[serde(rename = "N_null_sysdate")]
    NoNullSet,
    #[serde(rename = "N_sysdate_sysdate")]
    NoSetSet,
}

impl ScenarioKey {
    pub const ALL: [ScenarioKey; 8] = [
        ScenarioKey::YesNullNull,
        ScenarioKey::YesSetNull,
        ScenarioKey::YesSetSet,
        ScenarioKey::YesNullSet,
        ScenarioKey::NoNullNull,
        ScenarioKey::NoSetNull,
        ScenarioKey::NoNullSet,
        ScenarioKey::NoSetSet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKey::YesNullNull => "Y_null_null",
            ScenarioKey::YesSetNull => "Y_sysdate_null",
            ScenarioKey::YesSetSet => "Y_sysdate_sysdate",
            ScenarioKey::YesNullSet => "Y_null_sysdate",
            ScenarioKey::NoNullNull => "N_null_null",
            ScenarioKey::NoSetNull => "N_sysdate_null",
            ScenarioKey::NoNullSet => "N_null_sysdate",
            ScenarioKey::NoSetSet => "N_sysdate_sysdate",
        }
    }

    pub fn flag(self) -> Flag {
        match self {
            ScenarioKey::YesNullNull
            | ScenarioKey::YesSetNull
            | ScenarioKey::YesSetSet
            | ScenarioKey::YesNullSet => Flag::Yes,
            _ => Flag::No,
        }
    }

    pub fn cleared_date(self) -> DateState {
        match self {
            ScenarioKey::YesSetNull
            | ScenarioKey::YesSetSet
            | ScenarioKey::NoSetNull
            | ScenarioKey::NoSetSet => DateState::Set,
            _ => DateState::Null,
        }
    }

    pub fn void_date(self) -> DateState {
        match self {
            ScenarioKey::YesSetSet
            | ScenarioKey::YesNullSet
            | ScenarioKey::NoNullSet
            | ScenarioKey::NoSetSet => DateState::Set,
            _ => DateState::Null,
        }
    }

    pub fn from_parts(flag: Flag, cleared: DateState, void: DateState) -> Self {
        Self::ALL
            .into_iter()
            .find(|key| key.flag() == flag && key.cleared_date() == cleared && key.void_date() == void)
            .unwrap_or(ScenarioKey::YesNullNull)
    }

    /// Human label, e.g. `Flag Y, cleared date set, void date null`.
    pub fn label(self) -> String {
        let state = |value: DateState| match value {
            DateState::Null => "null",
            DateState::Set => "set",
        };
        format!(
            "Flag {}, cleared date {}, void date {}",
            self.flag().as_char(),
            state(self.cleared_date()),
            state(self.void_date())
        )
    }
}

impl fmt::Display for ScenarioKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKey {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::UnknownScenario(value.to_string()))
    }
}

/// Requested record count per scenario.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ScenarioCounts(BTreeMap<ScenarioKey, u32>);

impl ScenarioCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: ScenarioKey, count: u32) {
        self.0.insert(key, count);
    }

    pub fn get(&self, key: ScenarioKey) -> u32 {
        self.0.get(&key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.0.values().map(|count| u64::from(*count)).sum()
    }

    /// Scenarios with a non-zero count, in table order.
    pub fn active(&self) -> impl Iterator<Item = (ScenarioKey, u32)> + '_ {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(key, count)| (*key, *count))
    }
}

impl FromIterator<(ScenarioKey, u32)> for ScenarioCounts {
    fn from_iter<I: IntoIterator<Item = (ScenarioKey, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
