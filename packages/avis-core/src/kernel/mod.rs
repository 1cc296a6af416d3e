// Kernel - infrastructure seams and their implementations

mod reputation;
pub mod test_dependencies;
mod traits;

pub use reputation::ReputationService;
pub use traits::BaseReputationService;
