/// Storage scan, storage format and generic RPC payloads
///
/// These are the structured per-host results of the supported operations.
/// Each type implements `Presentable`, which supplies the summary columns
/// and the verbose per-host-group detail block.
use crate::render::{Presentable, RenderOptions, TableWriter};
use crate::table::{Column, Table};
use crate::units::{CONTROLLER, MODULE, NAMESPACE, UnitConfig};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Persistent memory module found by a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmModule {
    pub physical_id: u32,
    pub socket_id: u32,
    pub memory_ctrlr_id: u32,
    pub channel_id: u32,
    pub channel_slot: u32,
    pub capacity: u64,
}

/// Persistent memory namespace (block device)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmNamespace {
    pub blockdev: String,
    pub numa_node: u32,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeController {
    pub pci_addr: String,
    pub model: String,
    pub fw_rev: String,
    pub socket_id: u32,
    /// Namespace sizes in bytes
    #[serde(default)]
    pub namespaces: Vec<u64>,
}

impl NvmeController {
    pub fn capacity(&self) -> u64 {
        self.namespaces.iter().sum()
    }
}

/// Result of a storage scan on one host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStorage {
    #[serde(default)]
    pub scm_modules: Vec<ScmModule>,
    #[serde(default)]
    pub scm_namespaces: Vec<ScmNamespace>,
    #[serde(default)]
    pub nvme_controllers: Vec<NvmeController>,
}

impl HostStorage {
    /// `"<bytes> (<n> namespaces)"` when namespaces exist, else modules
    pub fn scm_summary(&self, units: UnitConfig) -> String {
        if self.scm_namespaces.is_empty() {
            let total = self.scm_modules.iter().map(|m| m.capacity).sum();
            format!("{} ({})", units.bytes(total), MODULE.count(self.scm_modules.len()))
        } else {
            let total = self.scm_namespaces.iter().map(|ns| ns.size).sum();
            format!("{} ({})", units.bytes(total), NAMESPACE.count(self.scm_namespaces.len()))
        }
    }

    pub fn nvme_summary(&self, units: UnitConfig) -> String {
        let total = self.nvme_controllers.iter().map(NvmeController::capacity).sum();
        format!("{} ({})", units.bytes(total), CONTROLLER.count(self.nvme_controllers.len()))
    }

    fn scm_table(&self, units: UnitConfig) -> Table {
        if !self.scm_namespaces.is_empty() {
            let columns = [
                Column::new("SCM Namespace", |ns: &ScmNamespace| ns.blockdev.clone()),
                Column::new("Socket ID", |ns: &ScmNamespace| ns.numa_node.to_string()),
                Column::new("Capacity", move |ns: &ScmNamespace| units.bytes(ns.size)),
            ];
            return Table::from_items(&self.scm_namespaces, &columns);
        }

        let columns = [
            Column::new("SCM Module ID", |m: &ScmModule| m.physical_id.to_string()),
            Column::new("Socket ID", |m: &ScmModule| m.socket_id.to_string()),
            Column::new("Memory Ctrlr ID", |m: &ScmModule| m.memory_ctrlr_id.to_string()),
            Column::new("Channel ID", |m: &ScmModule| m.channel_id.to_string()),
            Column::new("Channel Slot", |m: &ScmModule| m.channel_slot.to_string()),
            Column::new("Capacity", move |m: &ScmModule| units.bytes(m.capacity)),
        ];
        Table::from_items(&self.scm_modules, &columns)
    }

    fn nvme_table(&self, units: UnitConfig) -> Table {
        let columns = [
            Column::new("NVMe PCI", |c: &NvmeController| c.pci_addr.clone()),
            Column::new("Model", |c: &NvmeController| c.model.clone()),
            Column::new("FW Revision", |c: &NvmeController| c.fw_rev.clone()),
            Column::new("Socket ID", |c: &NvmeController| c.socket_id.to_string()),
            Column::new("Capacity", move |c: &NvmeController| units.bytes(c.capacity())),
        ];
        Table::from_items(&self.nvme_controllers, &columns)
    }
}

impl Presentable for HostStorage {
    fn summary_columns(units: UnitConfig) -> Vec<Column<'static, Self>> {
        vec![
            Column::new("SCM Total", move |hs: &HostStorage| hs.scm_summary(units)),
            Column::new("NVMe Total", move |hs: &HostStorage| hs.nvme_summary(units)),
        ]
    }

    fn write_details<W: Write>(&self, out: &mut TableWriter<W>, opts: &RenderOptions) -> io::Result<()> {
        out.write_table_or(&self.scm_table(opts.units), "No SCM modules found")?;
        out.write_blank()?;
        out.write_table_or(&self.nvme_table(opts.units), "No NVMe devices found")?;
        out.write_blank()
    }
}

/// Outcome of formatting one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatStatus {
    Success,
    Failed(String),
}

impl FormatStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, FormatStatus::Success)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FormatStatus::Success => "CTL_SUCCESS",
            FormatStatus::Failed(msg) => msg,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScmMountResult {
    pub mount: String,
    pub status: FormatStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NvmeFormatResult {
    pub pci_addr: String,
    pub status: FormatStatus,
}

/// Result of a storage format on one host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageFormat {
    #[serde(default)]
    pub scm: Vec<ScmMountResult>,
    #[serde(default)]
    pub nvme: Vec<NvmeFormatResult>,
}

impl StorageFormat {
    pub fn scm_formatted(&self) -> usize {
        self.scm.iter().filter(|r| r.status.is_success()).count()
    }

    pub fn nvme_formatted(&self) -> usize {
        self.nvme.iter().filter(|r| r.status.is_success()).count()
    }
}

impl Presentable for StorageFormat {
    const SUMMARY_TITLE: Option<&'static str> = Some("Format Summary:");

    fn summary_columns(_units: UnitConfig) -> Vec<Column<'static, Self>> {
        vec![
            Column::new("SCM Devices", |sf: &StorageFormat| sf.scm_formatted().to_string()),
            Column::new("NVMe Devices", |sf: &StorageFormat| sf.nvme_formatted().to_string()),
        ]
    }

    fn write_details<W: Write>(&self, out: &mut TableWriter<W>, _opts: &RenderOptions) -> io::Result<()> {
        let formatted_scm: Vec<ScmMountResult> = self.scm.iter().filter(|r| r.status.is_success()).cloned().collect();
        let formatted_nvme: Vec<NvmeFormatResult> = self.nvme.iter().filter(|r| r.status.is_success()).cloned().collect();

        let scm = Table::from_items(
            &formatted_scm,
            &[
                Column::new("SCM Mount", |r: &ScmMountResult| r.mount.clone()),
                Column::new("Format Result", |r: &ScmMountResult| r.status.as_str().to_string()),
            ],
        );
        let nvme = Table::from_items(
            &formatted_nvme,
            &[
                Column::new("NVMe PCI", |r: &NvmeFormatResult| r.pci_addr.clone()),
                Column::new("Format Result", |r: &NvmeFormatResult| r.status.as_str().to_string()),
            ],
        );

        out.write_table_or(&scm, "No SCM mounts formatted")?;
        out.write_blank()?;
        out.write_table_or(&nvme, "No NVMe devices formatted")?;
        out.write_blank()
    }

    fn item_failures(&self) -> Vec<String> {
        let scm = self.scm.iter().map(|r| &r.status);
        let nvme = self.nvme.iter().map(|r| &r.status);
        scm.chain(nvme)
            .filter_map(|status| match status {
                FormatStatus::Failed(msg) => Some(msg.clone()),
                FormatStatus::Success => None,
            })
            .collect()
    }
}

/// Generic RPC results: any JSON value, shown as compact JSON
impl Presentable for serde_json::Value {
    fn summary_columns(_units: UnitConfig) -> Vec<Column<'static, Self>> {
        vec![Column::new("Result", |v: &serde_json::Value| v.to_string())]
    }

    fn write_details<W: Write>(&self, out: &mut TableWriter<W>, _opts: &RenderOptions) -> io::Result<()> {
        let pretty = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        for line in pretty.lines() {
            out.write_line(line)?;
        }
        out.write_blank()
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;
