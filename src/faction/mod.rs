//! Factions: a toy domain object behind a repository/manager pair.
//!
//! A faction starts [`Incomplete`] (data, no id). The [`Repository`] allocates
//! an id and hands back a [`Complete`] faction. The [`Manager`] is what
//! handlers talk to; it checks input and delegates storage to its repository.

use std::future::Future;

use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::context::Context;
use crate::problem::{Failure, Problem};

pub mod fake;

// ── Data ──────────────────────────────────────────────────────────────────────

/// The payload of a faction. A missing field reads as empty.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Data {
    pub title: String,
    pub description: String,
}

impl Data {
    pub fn set_description(&mut self, to: impl Into<String>) -> &mut Self {
        self.description = to.into();
        self
    }
}

/// A faction that has not been stored yet.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Incomplete {
    data: Data,
}

impl Incomplete {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self { data: Data { title: title.into(), description: description.into() } }
    }

    pub fn data(&self) -> &Data { &self.data }
    pub fn data_mut(&mut self) -> &mut Data { &mut self.data }
    pub fn into_data(self) -> Data { self.data }
}

impl From<Data> for Incomplete {
    fn from(data: Data) -> Self {
        Self { data }
    }
}

/// A stored faction: an allocated id plus its data.
///
/// Serializes flat: `{"id": "...", "title": "...", "description": "..."}`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Complete {
    id: String,
    #[serde(flatten)]
    data: Data,
}

impl Complete {
    /// Only repositories allocate ids; handlers receive `Complete`s from them.
    pub fn new(id: impl Into<String>, incomplete: Incomplete) -> Self {
        Self { id: id.into(), data: incomplete.data }
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn data(&self) -> &Data { &self.data }
    pub fn data_mut(&mut self) -> &mut Data { &mut self.data }
}

// ── Repository ────────────────────────────────────────────────────────────────

/// Data-layer access to factions.
pub trait Repository: Send + Sync + 'static {
    fn create(
        &self,
        ctx: &Context,
        faction: Incomplete,
    ) -> impl Future<Output = Result<Complete, Failure>> + Send;

    fn delete(&self, ctx: &Context, id: &str) -> impl Future<Output = Result<(), Failure>> + Send;

    fn update(
        &self,
        ctx: &Context,
        faction: Complete,
    ) -> impl Future<Output = Result<Complete, Failure>> + Send;
}

// ── Manager ───────────────────────────────────────────────────────────────────

/// Faction operations for handlers.
#[derive(Clone, Debug, Default)]
pub struct Manager<R> {
    repository: R,
}

impl<R: Repository> Manager<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R { &self.repository }

    /// Stores a new faction. A blank title is rejected with `422`.
    pub async fn create(&self, ctx: &Context, faction: Incomplete) -> Result<Complete, Failure> {
        require_title(faction.data())?;
        self.repository.create(ctx, faction).await
    }

    pub async fn delete(&self, ctx: &Context, id: &str) -> Result<(), Failure> {
        self.repository.delete(ctx, id).await
    }

    /// Replaces a stored faction's data. A blank title is rejected with `422`.
    pub async fn update(&self, ctx: &Context, faction: Complete) -> Result<Complete, Failure> {
        require_title(faction.data())?;
        self.repository.update(ctx, faction).await
    }
}

fn require_title(data: &Data) -> Result<(), Failure> {
    if data.title.trim().is_empty() {
        return Err(Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "faction title must not be blank").into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::fake::FakeRepository;
    use super::*;

    #[tokio::test]
    async fn create_then_update_description() {
        let ctx = Context::new();
        let manager = Manager::new(FakeRepository::new());

        let mut complete = manager.create(&ctx, Incomplete::new("foo", "bar")).await.unwrap();
        assert_eq!(complete.id(), "foo");
        assert_eq!(complete.data(), &Data { title: "foo".into(), description: "bar".into() });

        complete.data_mut().set_description("foobar");
        let updated = manager.update(&ctx, complete).await.unwrap();
        assert_eq!(updated.data().description, "foobar");
    }

    #[tokio::test]
    async fn blank_title_is_unprocessable() {
        let manager = Manager::new(FakeRepository::new());
        let err = manager.create(&Context::new(), Incomplete::new("  ", "x")).await.unwrap_err();

        match err {
            Failure::Problem(p) => assert_eq!(p.status, 422),
            Failure::Opaque(e) => panic!("expected problem, got opaque {e}"),
        }
    }

    #[tokio::test]
    async fn update_with_blank_title_is_unprocessable() {
        let manager = Manager::new(FakeRepository::new());
        let blanked = Complete::new("foo", Incomplete::new("\t", "still here"));
        let err = manager.update(&Context::new(), blanked).await.unwrap_err();

        match err {
            Failure::Problem(p) => {
                assert_eq!(p.status, 422);
                assert_eq!(p.detail, "faction title must not be blank");
            }
            Failure::Opaque(e) => panic!("expected problem, got opaque {e}"),
        }
    }

    #[tokio::test]
    async fn delete_succeeds() {
        let manager = Manager::new(FakeRepository::new());
        assert!(manager.delete(&Context::new(), "foo").await.is_ok());
    }

    #[test]
    fn complete_serializes_flat() {
        let complete = Complete::new("foo", Incomplete::new("Guild", "traders"));
        assert_eq!(
            serde_json::to_value(&complete).unwrap(),
            json!({"id": "foo", "title": "Guild", "description": "traders"})
        );
    }

    #[test]
    fn incomplete_reads_plain_data() {
        let incomplete: Incomplete =
            serde_json::from_value(json!({"title": "Guild", "description": "traders"})).unwrap();
        assert_eq!(incomplete, Incomplete::new("Guild", "traders"));
    }
}
