pub mod comment;
pub mod like;
pub mod material;
pub mod rating;
pub mod shared;
pub mod user;
