//! Fleet response reports.
//!
//! Groups per-host responses by identical outcome, compresses each group's
//! hosts into range notation (`host[1-4,7]`) and renders aligned text
//! tables, so report size follows the number of distinct outcomes rather
//! than the number of hosts.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod error;
pub mod hostlist;
pub mod render;
pub mod response;
pub mod storage;
pub mod table;
pub mod ui;
pub mod units;

pub use aggregate::{AggregationGroup, Aggregator, HostError, HostErrorsMap, HostResults};
pub use error::{ReportError, Result};
pub use hostlist::{HostIdentifier, HostSet};
pub use render::{Presentable, RenderOptions, TableWriter, render_report, write_host_errors, write_response_errors};
pub use response::{HostResponse, HostResponses};
pub use storage::{HostStorage, StorageFormat};
pub use table::{Column, RowOrder, Table};
pub use units::{ByteBase, UnitConfig};
