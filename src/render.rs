/// Report rendering - Pure text layout
///
/// This module turns aggregated results into aligned, fixed-width text:
/// - Tables: every cell is padded to its column width and followed by a
///   single space, header and `-----` underline included
/// - The `Errors:` section, indented two spaces, closed by a blank line
/// - Host group headers for verbose output (`-----\nhost1\n-----`)
///
/// ## Output Contract
///
/// A report is laid out into a buffer first and written to the sink in one
/// call, so a failed render never leaves a partial report behind. An empty
/// batch produces no bytes at all.
use crate::aggregate::{Aggregator, HostError, HostErrorsMap, HostResults};
use crate::error::Result;
use crate::hostlist::HostSet;
use crate::table::{self, Column, RowOrder, Table};
use crate::units::UnitConfig;
use log::debug;
use serde::Serialize;
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

/// Immutable rendering configuration
///
/// - `include_ports`: host labels keep their `:port` suffixes
/// - `verbose`: one detail block per host group instead of a shared
///   summary table
/// - `units`: byte scaling used by size columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub include_ports: bool,
    pub verbose: bool,
    pub units: UnitConfig,
}

impl RenderOptions {
    pub fn with_host_ports(self, include_ports: bool) -> Self {
        Self { include_ports, ..self }
    }

    pub fn with_verbose(self, verbose: bool) -> Self {
        Self { verbose, ..self }
    }

    pub fn with_units(self, units: UnitConfig) -> Self {
        Self { units, ..self }
    }
}

/// A result payload that knows how to present itself in a report
pub trait Presentable: Serialize + Sized {
    /// Title line above the summary table. Titled tables are indented.
    const SUMMARY_TITLE: Option<&'static str> = None;

    /// Columns of the summary table, after the leading `Hosts` column
    fn summary_columns(units: UnitConfig) -> Vec<Column<'static, Self>>;

    /// Detail block printed under this value's host group header
    fn write_details<W: Write>(&self, out: &mut TableWriter<W>, opts: &RenderOptions) -> io::Result<()>;

    /// Failures of individual items inside an otherwise successful
    /// response. They are listed in the `Errors:` section against the
    /// hosts that reported them.
    fn item_failures(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Writer for report text
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write one line of text followed by a newline
    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", text)
    }

    pub fn write_blank(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }

    /// Write header, underline and rows, each line prefixed by `indent` spaces
    pub fn write_table(&mut self, table: &Table, indent: usize) -> io::Result<()> {
        let widths = table.widths();
        let underline: Vec<String> = table.headers.iter().map(|h| "-".repeat(display_width(h))).collect();

        self.write_row(&table.headers, &widths, indent)?;
        self.write_row(&underline, &widths, indent)?;
        for row in &table.rows {
            self.write_row(row, &widths, indent)?;
        }
        Ok(())
    }

    fn write_row(&mut self, cells: &[String], widths: &[usize], indent: usize) -> io::Result<()> {
        let mut line = " ".repeat(indent);
        for (cell, width) in cells.iter().zip(widths) {
            line.push_str(&pad_to_width(cell, *width));
            line.push(' ');
        }
        self.write_line(&line)
    }

    /// Host group header: the label between two rules of equal width
    pub fn write_host_header(&mut self, label: &str) -> io::Result<()> {
        let rule = "-".repeat(display_width(label));
        self.write_line(&rule)?;
        self.write_line(label)?;
        self.write_line(&rule)
    }

    /// Write `table`, or a tab-indented notice when it has no rows
    pub fn write_table_or(&mut self, table: &Table, empty_notice: &str) -> io::Result<()> {
        if table.is_empty() {
            self.write_line(&format!("\t{}", empty_notice))
        } else {
            self.write_table(table, 0)
        }
    }

    /// `Hosts`/`Error` table in first-seen error order
    pub fn write_host_errors(&mut self, errors: &HostErrorsMap, opts: &RenderOptions, indent: usize) -> io::Result<()> {
        self.write_table(&error_table(errors, opts), indent)
    }

    /// The `Errors:` section, or nothing when there are no errors
    pub fn write_response_errors(&mut self, errors: &HostErrorsMap, opts: &RenderOptions) -> io::Result<()> {
        self.write_errors_section(&error_table(errors, opts))
    }

    fn write_errors_section(&mut self, table: &Table) -> io::Result<()> {
        if table.is_empty() {
            return Ok(());
        }
        debug!("rendering {} error rows", table.rows.len());

        self.write_line("Errors:")?;
        self.write_table(table, 2)?;
        self.write_blank()
    }

    /// Summary table, or one detail block per host group in verbose mode
    pub fn write_results<V: Presentable>(
        &mut self,
        results: &Aggregator<V>,
        opts: &RenderOptions,
    ) -> io::Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        debug!("rendering {} result groups (verbose: {})", results.len(), opts.verbose);

        if opts.verbose {
            for (label, group) in table::labelled_groups(results.groups(), opts, RowOrder::HostLabel) {
                self.write_host_header(&label)?;
                group.value.write_details(self, opts)?;
            }
            return Ok(());
        }

        let columns = V::summary_columns(opts.units);
        let table = table::build(results.groups(), &columns, opts, RowOrder::HostLabel);
        match V::SUMMARY_TITLE {
            Some(title) => {
                self.write_line(title)?;
                self.write_table(&table, 2)
            }
            None => self.write_table(&table, 0),
        }
    }
}

/// Render a full report: the errors section followed by the results.
pub fn render_report<V: Presentable, W: Write>(results: &HostResults<V>, out: &mut W, opts: &RenderOptions) -> Result<()> {
    let text = report_to_string(results, opts)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Lay out a full report as a string
pub fn report_to_string<V: Presentable>(results: &HostResults<V>, opts: &RenderOptions) -> Result<String> {
    let mut errors = error_table(&results.errors, opts);
    for (label, failure) in item_failure_rows(&results.results, opts)? {
        errors.push_row(vec![label, failure]);
    }

    let mut writer = TableWriter::new(Vec::new());
    writer.write_errors_section(&errors)?;
    writer.write_results(&results.results, opts)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

fn error_table(errors: &HostErrorsMap, opts: &RenderOptions) -> Table {
    let columns = [Column::new("Error", |e: &HostError| e.to_string())];
    table::build(errors.groups(), &columns, opts, RowOrder::FirstSeen)
}

/// One `(hosts, message)` row per distinct item failure, in first-seen order.
/// A host repeating the same message is listed once.
fn item_failure_rows<V: Presentable>(results: &Aggregator<V>, opts: &RenderOptions) -> Result<Vec<(String, String)>> {
    let mut failures: Vec<(String, HostSet)> = Vec::new();

    for group in results.groups() {
        for message in group.value.item_failures() {
            let slot = match failures.iter().position(|(m, _)| *m == message) {
                Some(slot) => slot,
                None => {
                    failures.push((message, HostSet::new()));
                    failures.len() - 1
                }
            };
            let hosts = &mut failures[slot].1;
            for host in group.hosts.iter() {
                if !hosts.contains(host) {
                    hosts.insert(host.clone())?;
                }
            }
        }
    }

    Ok(failures.into_iter().map(|(message, hosts)| (hosts.compress_with(opts.include_ports), message)).collect())
}

/// Render only the `Hosts`/`Error` table, without title or indent
pub fn write_host_errors<W: Write>(errors: &HostErrorsMap, out: &mut W, opts: &RenderOptions) -> Result<()> {
    let mut writer = TableWriter::new(Vec::new());
    if !errors.is_empty() {
        writer.write_host_errors(errors, opts, 0)?;
    }
    out.write_all(&writer.into_inner())?;
    Ok(())
}

/// Render only the `Errors:` section
pub fn write_response_errors<W: Write>(errors: &HostErrorsMap, out: &mut W, opts: &RenderOptions) -> Result<()> {
    let mut writer = TableWriter::new(Vec::new());
    writer.write_response_errors(errors, opts)?;
    out.write_all(&writer.into_inner())?;
    Ok(())
}

/// Count the display width of a string, accounting for wide Unicode characters
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Pad string with trailing spaces to `width`; longer strings are kept whole
pub fn pad_to_width(s: &str, width: usize) -> String {
    let padding = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(padding))
}

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;
