//! Resume screening engine: normalization, per-dimension scoring, the overall
//! verdict, recommendations and batch ranking.

pub mod batch;
pub mod education;
pub mod experience;
pub mod handlers;
pub mod normalize;
pub mod recommendations;
pub mod scorer;
pub mod skills;
