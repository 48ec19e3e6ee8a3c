//! `capsim-reference` — static, read-mostly lookup tables (C5).
//!
//! Every table here is pinned to a specific migration in the original
//! system: where multiple migrations touched the same table, the latest
//! one's values are treated as normative.
//!
//! | Module              | Source migration                                   |
//! |----------------------|----------------------------------------------------|
//! | [`affinity`]          | `0003_fix_interests_to_tz` (affinity_map)          |
//! | [`interest_ranges`]   | `0003_fix_interests_to_tz` (agent_interests)       |
//! | [`attribute_ranges`]  | `8a2c1e5d9abc_create_agents_profession_table`      |
//! | [`topic_mapping`]     | `2bebdbfef5d5_create_topic_interest_mapping`       |

pub mod affinity;
pub mod attribute_ranges;
pub mod error;
pub mod interest_ranges;
pub mod topic_mapping;


pub use affinity::{affinity, affinity_table, AffinityRow};
pub use attribute_ranges::{attribute_range_table, attribute_ranges, AttributeRangeRow};
pub use error::{ReferenceError, ReferenceResult};
pub use interest_ranges::{interest_range, interest_range_table, interest_ranges_for, InterestRangeRow};
pub use topic_mapping::topic_interest_category;
