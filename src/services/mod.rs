pub mod intersection;
pub mod providers;
pub mod recommendations;

pub use intersection::IntersectionEngine;
pub use recommendations::RecommendationService;
