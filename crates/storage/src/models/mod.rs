pub mod company;
pub mod evaluation;
pub mod internship;
pub mod status;
pub mod user;

pub use company::Company;
pub use evaluation::{Category, Evaluation, EvaluationStatus};
pub use internship::{Internship, InternshipStatus};
pub use status::{EvaluationDisplayStatus, PlacementStatus};
pub use user::{Role, User};
