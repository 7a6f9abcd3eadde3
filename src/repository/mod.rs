mod ratings;

pub use ratings::RatingRepository;
