//! A repository that stores nothing.

use crate::context::Context;
use crate::problem::Failure;

use super::{Complete, Incomplete, Repository};

/// Allocates the same id to every faction and keeps no state.
///
/// Useful for wiring demos and tests without a database.
#[derive(Clone, Debug)]
pub struct FakeRepository {
    id: String,
}

impl FakeRepository {
    /// Allocates the id `"foo"`.
    pub fn new() -> Self {
        Self::with_id("foo")
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl Default for FakeRepository {
    fn default() -> Self { Self::new() }
}

impl Repository for FakeRepository {
    async fn create(&self, _ctx: &Context, faction: Incomplete) -> Result<Complete, Failure> {
        Ok(Complete::new(self.id.clone(), faction))
    }

    async fn delete(&self, _ctx: &Context, _id: &str) -> Result<(), Failure> {
        Ok(())
    }

    async fn update(&self, _ctx: &Context, faction: Complete) -> Result<Complete, Failure> {
        Ok(faction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allocates_configured_id() {
        let repo = FakeRepository::with_id("faction-7");
        let complete = repo.create(&Context::new(), Incomplete::new("a", "b")).await.unwrap();
        assert_eq!(complete.id(), "faction-7");
    }
}
