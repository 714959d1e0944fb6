//! Warden Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the warden
//! bot. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases and customizable table schemas, plus factories for seeding records.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Builders that insert records with sensible defaults
//!
//! # Usage
//!
//! Use `TestBuilder` to create a test context with the required database tables:
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::BanRecord;
//!
//! #[tokio::test]
//! async fn test_ban_operations() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(BanRecord)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
