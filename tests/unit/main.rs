#[path = "../common/mod.rs"]
mod common;
mod mocks;

mod test_comments;
