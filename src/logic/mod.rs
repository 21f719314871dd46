//! Tournament business logic: seeding, bracket building, result progression, registration.

mod builder;
mod lifecycle;
mod progression;
mod registration;
mod seeding;

pub use builder::build_bracket;
pub use lifecycle::{derive_status, generate_bracket, report_result};
pub use progression::{advance, Advancement};
pub use registration::{eligible_entrants, join_tournament, review_participant};
pub use seeding::{FixedSeeder, RandomSeeder, Seeder};
