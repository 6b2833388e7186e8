// Synergy engine: type chart, roles, strategies, scoring, recommendations.

pub mod analysis;
pub mod recommend;
pub mod roles;
pub mod scorer;
pub mod strategy;
pub mod type_chart;
