//! World meters moved by world events.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

/// One of the seven world meters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeterName {
    Trust,
    Distrust,
    Surveillance,
    CarteBlanche,
    Influence,
    Record,
    Collapse,
}

impl MeterName {
    /// Every meter, in display order.
    pub const ALL: [MeterName; 7] = [
        MeterName::Trust,
        MeterName::Distrust,
        MeterName::Surveillance,
        MeterName::CarteBlanche,
        MeterName::Influence,
        MeterName::Record,
        MeterName::Collapse,
    ];

    /// Stored name (`carteBlanche`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MeterName::Trust => "trust",
            MeterName::Distrust => "distrust",
            MeterName::Surveillance => "surveillance",
            MeterName::CarteBlanche => "carteBlanche",
            MeterName::Influence => "influence",
            MeterName::Record => "record",
            MeterName::Collapse => "collapse",
        }
    }
}

impl fmt::Display for MeterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Meter values. All start at zero and may go negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Meters {
    pub trust: i32,
    pub distrust: i32,
    pub surveillance: i32,
    pub carte_blanche: i32,
    pub influence: i32,
    pub record: i32,
    pub collapse: i32,
}

impl Meters {
    /// All meters at zero.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Add `change` to `meter`.
    pub fn apply(&mut self, meter: MeterName, change: i32) {
        self[meter] = self[meter].saturating_add(change);
    }

    /// `(meter, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (MeterName, i32)> + '_ {
        MeterName::ALL.into_iter().map(move |m| (m, self[m]))
    }
}

impl Index<MeterName> for Meters {
    type Output = i32;

    fn index(&self, meter: MeterName) -> &i32 {
        match meter {
            MeterName::Trust => &self.trust,
            MeterName::Distrust => &self.distrust,
            MeterName::Surveillance => &self.surveillance,
            MeterName::CarteBlanche => &self.carte_blanche,
            MeterName::Influence => &self.influence,
            MeterName::Record => &self.record,
            MeterName::Collapse => &self.collapse,
        }
    }
}

impl IndexMut<MeterName> for Meters {
    fn index_mut(&mut self, meter: MeterName) -> &mut i32 {
        match meter {
            MeterName::Trust => &mut self.trust,
            MeterName::Distrust => &mut self.distrust,
            MeterName::Surveillance => &mut self.surveillance,
            MeterName::CarteBlanche => &mut self.carte_blanche,
            MeterName::Influence => &mut self.influence,
            MeterName::Record => &mut self.record,
            MeterName::Collapse => &mut self.collapse,
        }
    }
}
