//! skillshelf - Load, validate and query a library of skill documents
//!
//! A skill document is a markdown file with a metadata header (name,
//! description, tags) followed by instructions and code examples for AI
//! coding assistants. The pipeline is Loader → Validator → Lookup: files are
//! discovered and parsed into a [`Catalog`], checked against the configured
//! rules, and queried by name, tag or keyword.
//!
//! ```markdown
//! ---
//! name: react-hooks
//! description: Writing custom React hooks
//! tags: [react, frontend]
//! ---
//!
//! # React hooks
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod lookup;
pub mod validator;

pub use catalog::{Catalog, Entry};
pub use error::{CatalogError, ErrorKind};
pub use loader::{load_catalog, LoadReport, Loader};
pub use lookup::{find, Query};
pub use validator::{Severity, ValidationReport, Validator, Violation};
