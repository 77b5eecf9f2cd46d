use crate::domain::shared::errors::DomainError;
use validator::Validate;

/// A star rating that has passed range validation. Constructing one is the only
/// way to hand a rating to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Validate)]
pub struct RatingValue {
    #[validate(range(min = 1, max = 5))]
    value: i32,
}

impl RatingValue {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 5;

    pub fn new(value: i32) -> Result<Self, DomainError> {
        let rating = Self { value };
        rating.validate().map_err(|_| {
            DomainError::ValidationError(format!(
                "rating must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            ))
        })?;
        Ok(rating)
    }

    pub fn get(self) -> i32 {
        self.value
    }
}
