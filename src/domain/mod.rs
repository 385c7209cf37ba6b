pub mod card;
pub mod review;
pub mod session;

pub use card::{CardType, LeitnerBox, ReviewCard};
pub use review::{ReviewLog, ReviewRating};
pub use session::{validate_session_counts, ReviewSession};
