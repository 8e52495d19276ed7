//! traknor-acl - Role-based access control for the TrakNor CMMS.
//!
//! The crate decides what an actor may do and what it may see:
//!
//! - **Vocabulary**: closed `Role`, `Action` and `Subject` enums
//! - **Table**: the role → allow-rule permission table, loaded once at startup
//! - **Ability**: capability checks against the table
//! - **Gate**: render-or-omit helpers for UI affordances
//! - **Filter**: per-type record visibility, field redaction and statistics
//! - **Report**: banner text explaining a filtered view
//! - **Dashboard**: KPI, chart, section and widget filtering
//! - **Session**: bearer token → `Viewer`
//!
//! Nothing here performs I/O after startup, holds mutable state, or caches a
//! decision. Every call takes the caller's role explicitly.
//!
//! # Example
//!
//! ```ignore
//! use traknor_acl::{DataFilter, DataType, FilterOptions, Loader, load_permission_table};
//!
//! let config = Loader::new("TRAKNOR").load(None, None, None)?;
//! let table = load_permission_table(&config.acl)?;
//!
//! let viewer = traknor_acl::session::viewer_from_headers(&headers, &config.auth);
//! let result = DataFilter::new(&table, &viewer)
//!     .filter(&rows, DataType::Inventory, &FilterOptions::default());
//! ```

pub mod ability;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod gate;
pub mod mask;
pub mod record;
pub mod report;
pub mod session;
pub mod table;
pub mod vocabulary;

// Re-export main types at crate root
pub use ability::{Ability, RuleContext};
pub use config::{Config, Loader};
pub use error::{Error, Result};
pub use filter::{DataFilter, DataType, FilterOptions, FilterStats, Filtered, Viewer};
pub use gate::Gate;
pub use record::{Priority, Record};
pub use report::{FilterNotice, describe};
pub use table::{Condition, PermissionTable, Rule, load_permission_table};
pub use vocabulary::{AccountRole, Action, Role, Subject, SubjectRef};
