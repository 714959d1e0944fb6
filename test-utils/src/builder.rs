use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{GuildSettings, XpProfile};
///
/// let test = TestBuilder::new()
///     .with_table(GuildSettings)
///     .with_table(XpProfile)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// Vector of CREATE TABLE statements to execute during database setup.
    ///
    /// Statements are executed in the order they were added during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    ///
    /// # Returns
    /// - New `TestBuilder` instance with empty table configuration
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. The table will be created when `build()` is called.
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the guild settings and task marker tables.
    ///
    /// Every scheduled sweep reads guild settings to decide which guilds have the
    /// feature enabled, and several sweeps keep per-guild markers, so most service
    /// tests start from this base.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_guild_tables(self) -> Self {
        self.with_table(GuildSettings).with_table(TaskMarker)
    }

    /// Adds every table the bot persists.
    ///
    /// Use this for scheduler tests that run several sweeps against one database.
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_all_tables(self) -> Self {
        self.with_guild_tables()
            .with_table(BanRecord)
            .with_table(WarningRecord)
            .with_table(Giveaway)
            .with_table(XpProfile)
            .with_table(ModeratorPointProfile)
            .with_table(ModeratorPointEvent)
            .with_table(RankLink)
            .with_table(StreamLink)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}
