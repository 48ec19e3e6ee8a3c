//! Static per-profession (min, max) ranges for the five scalar attributes,
//! pinned to migration `8a2c1e5d9abc_create_agents_profession_table.py`
//! ("tech v1.5 table 2.4").

use capsim_core::Profession;

use crate::error::{ReferenceError, ReferenceResult};

/// One row of the agents_profession reference table.
#[derive(Copy, Clone, Debug)]
pub struct AttributeRangeRow {
    pub profession: Profession,
    pub financial_capability: (f64, f64),
    pub trend_receptivity: (f64, f64),
    pub social_status: (f64, f64),
    pub energy_level: (f64, f64),
    pub time_budget: (f64, f64),
}

macro_rules! row {
    ($prof:ident, $fc_min:expr, $fc_max:expr, $tr_min:expr, $tr_max:expr, $ss_min:expr, $ss_max:expr, $el_min:expr, $el_max:expr, $tb_min:expr, $tb_max:expr) => {
        AttributeRangeRow {
            profession: Profession::$prof,
            financial_capability: ($fc_min, $fc_max),
            trend_receptivity: ($tr_min, $tr_max),
            social_status: ($ss_min, $ss_max),
            energy_level: ($el_min, $el_max),
            time_budget: ($tb_min, $tb_max),
        }
    };
}

const TABLE: &[AttributeRangeRow] = &[
    row!(ShopClerk, 2.0, 4.0, 1.0, 3.0, 1.0, 3.0, 2.0, 5.0, 3.0, 5.0),
    row!(Worker, 2.0, 4.0, 1.0, 3.0, 1.0, 2.0, 2.0, 5.0, 3.0, 5.0),
    row!(Developer, 3.0, 5.0, 3.0, 5.0, 2.0, 4.0, 2.0, 5.0, 2.0, 4.0),
    row!(Politician, 3.0, 5.0, 3.0, 5.0, 4.0, 5.0, 2.0, 5.0, 2.0, 4.0),
    row!(Blogger, 2.0, 4.0, 4.0, 5.0, 3.0, 5.0, 2.0, 5.0, 3.0, 5.0),
    row!(Businessman, 4.0, 5.0, 2.0, 4.0, 4.0, 5.0, 2.0, 5.0, 2.0, 4.0),
    row!(SpiritualMentor, 1.0, 3.0, 2.0, 5.0, 2.0, 4.0, 3.0, 5.0, 2.0, 4.0),
    row!(Philosopher, 1.0, 3.0, 1.0, 3.0, 1.0, 3.0, 2.0, 5.0, 2.0, 4.0),
    row!(Unemployed, 1.0, 2.0, 3.0, 5.0, 1.0, 2.0, 3.0, 5.0, 3.0, 5.0),
    row!(Teacher, 1.0, 3.0, 1.0, 3.0, 2.0, 4.0, 2.0, 5.0, 2.0, 4.0),
    row!(Artist, 1.0, 3.0, 2.0, 4.0, 2.0, 4.0, 4.0, 5.0, 3.0, 5.0),
    row!(Doctor, 2.0, 4.0, 1.0, 3.0, 3.0, 5.0, 2.0, 5.0, 1.0, 2.0),
];

/// The full attribute-range table backing `load_attribute_ranges`.
pub fn attribute_range_table() -> &'static [AttributeRangeRow] {
    TABLE
}

/// The five scalar-attribute ranges for one profession.
pub fn attribute_ranges(profession: Profession) -> ReferenceResult<AttributeRangeRow> {
    TABLE
        .iter()
        .find(|r| r.profession == profession)
        .copied()
        .ok_or(ReferenceError::MissingAttributeRange(profession))
}
