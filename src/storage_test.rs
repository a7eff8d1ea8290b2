/// Tests for storage scan and format reports

#[cfg(test)]
mod tests {
    use crate::aggregate::HostResults;
    use crate::render::{RenderOptions, report_to_string};
    use crate::storage::*;

    fn module() -> ScmModule {
        ScmModule { physical_id: 1, socket_id: 1, memory_ctrlr_id: 1, channel_id: 1, channel_slot: 1, capacity: 1 }
    }

    fn controller() -> NvmeController {
        NvmeController {
            pci_addr: "0000:80:00.1".to_string(),
            model: "model-1".to_string(),
            fw_rev: "fwRev-1".to_string(),
            socket_id: 1,
            namespaces: vec![1],
        }
    }

    fn standard() -> HostStorage {
        HostStorage { scm_modules: vec![module()], scm_namespaces: vec![], nvme_controllers: vec![controller()] }
    }

    fn with_namespace() -> HostStorage {
        HostStorage {
            scm_namespaces: vec![ScmNamespace { blockdev: "/dev/pmem1".to_string(), numa_node: 1, size: 1 }],
            ..standard()
        }
    }

    fn no_nvme() -> HostStorage {
        HostStorage { nvme_controllers: vec![], ..standard() }
    }

    fn no_scm() -> HostStorage {
        HostStorage { scm_modules: vec![], ..standard() }
    }

    fn scan_report(entries: &[(&str, HostStorage)], errors: &[(&str, &str)], verbose: bool) -> String {
        let mut results = HostResults::new();
        for (host, msg) in errors {
            results.add_error(host, *msg).unwrap();
        }
        for (host, hs) in entries {
            results.add_result(host, hs.clone()).unwrap();
        }
        report_to_string(&results, &RenderOptions::default().with_verbose(verbose)).unwrap()
    }

    #[test]
    fn test_scan_server_error_only() {
        let expected = "\
Errors:
  Hosts Error  
  ----- -----  
  host1 failed 

";
        assert_eq!(scan_report(&[], &[("host1", "failed")], false), expected);
        assert_eq!(scan_report(&[], &[("host1", "failed")], true), expected);
    }

    #[test]
    fn test_scan_no_storage() {
        let expected = "\
Hosts SCM Total       NVMe Total          
----- ---------       ----------          
host1 0 B (0 modules) 0 B (0 controllers) 
";
        assert_eq!(scan_report(&[("host1", HostStorage::default())], &[], false), expected);
    }

    #[test]
    fn test_scan_single_host() {
        let expected = "\
Hosts SCM Total      NVMe Total         
----- ---------      ----------         
host1 1 B (1 module) 1 B (1 controller) 
";
        assert_eq!(scan_report(&[("host1", standard())], &[], false), expected);
    }

    #[test]
    fn test_scan_single_host_with_namespace() {
        let expected = "\
Hosts SCM Total         NVMe Total         
----- ---------         ----------         
host1 1 B (1 namespace) 1 B (1 controller) 
";
        assert_eq!(scan_report(&[("host1", with_namespace())], &[], false), expected);
    }

    #[test]
    fn test_scan_two_hosts_same_scan() {
        let expected = "\
Hosts     SCM Total      NVMe Total         
-----     ---------      ----------         
host[1-2] 1 B (1 module) 1 B (1 controller) 
";
        assert_eq!(scan_report(&[("host1", standard()), ("host2", standard())], &[], false), expected);
    }

    #[test]
    fn test_scan_two_hosts_different_scans() {
        let expected = "\
Hosts SCM Total       NVMe Total          
----- ---------       ----------          
host1 1 B (1 module)  0 B (0 controllers) 
host2 0 B (0 modules) 1 B (1 controller)  
";
        assert_eq!(scan_report(&[("host2", no_scm()), ("host1", no_nvme())], &[], false), expected);
    }

    #[test]
    fn test_scan_error_and_result_hosts() {
        let expected = "\
Errors:
  Hosts Error            
  ----- -----            
  host2 connection reset 

Hosts SCM Total      NVMe Total         
----- ---------      ----------         
host1 1 B (1 module) 1 B (1 controller) 
";
        assert_eq!(scan_report(&[("host1", standard())], &[("host2", "connection reset")], false), expected);
    }

    #[test]
    fn test_scan_1024_hosts_same_scan() {
        let entries: Vec<(String, HostStorage)> = (0..1024).map(|i| (format!("host{}", i), standard())).collect();
        let refs: Vec<(&str, HostStorage)> = entries.iter().map(|(h, s)| (h.as_str(), s.clone())).collect();

        let expected = "\
Hosts        SCM Total      NVMe Total         
-----        ---------      ----------         
host[0-1023] 1 B (1 module) 1 B (1 controller) 
";
        assert_eq!(scan_report(&refs, &[], false), expected);
    }

    #[test]
    fn test_scan_verbose_single_host() {
        let expected = "\
-----
host1
-----
SCM Module ID Socket ID Memory Ctrlr ID Channel ID Channel Slot Capacity 
------------- --------- --------------- ---------- ------------ -------- 
1             1         1               1          1            1 B      

NVMe PCI     Model   FW Revision Socket ID Capacity 
--------     -----   ----------- --------- -------- 
0000:80:00.1 model-1 fwRev-1     1         1 B      

";
        assert_eq!(scan_report(&[("host1", standard())], &[], true), expected);
    }

    #[test]
    fn test_scan_verbose_with_namespace() {
        let expected = "\
-----
host1
-----
SCM Namespace Socket ID Capacity 
------------- --------- -------- 
/dev/pmem1    1         1 B      

NVMe PCI     Model   FW Revision Socket ID Capacity 
--------     -----   ----------- --------- -------- 
0000:80:00.1 model-1 fwRev-1     1         1 B      

";
        assert_eq!(scan_report(&[("host1", with_namespace())], &[], true), expected);
    }

    #[test]
    fn test_scan_verbose_no_storage() {
        let expected = "\
---------
host[1-2]
---------
\tNo SCM modules found

\tNo NVMe devices found

";
        let entries = [("host1", HostStorage::default()), ("host2", HostStorage::default())];
        assert_eq!(scan_report(&entries, &[], true), expected);
    }

    #[test]
    fn test_scan_verbose_two_hosts_different_scans() {
        let expected = "\
-----
host1
-----
SCM Module ID Socket ID Memory Ctrlr ID Channel ID Channel Slot Capacity 
------------- --------- --------------- ---------- ------------ -------- 
1             1         1               1          1            1 B      

\tNo NVMe devices found

-----
host2
-----
\tNo SCM modules found

NVMe PCI     Model   FW Revision Socket ID Capacity 
--------     -----   ----------- --------- -------- 
0000:80:00.1 model-1 fwRev-1     1         1 B      

";
        assert_eq!(scan_report(&[("host1", no_nvme()), ("host2", no_scm())], &[], true), expected);
    }

    #[test]
    fn test_scan_summary_binary_units() {
        let mut hs = standard();
        hs.scm_modules[0].capacity = 512 * 1024 * 1024 * 1024;
        hs.nvme_controllers[0].namespaces = vec![2 * 1000 * 1000 * 1000 * 1000, 1000];

        let units = crate::units::UnitConfig { byte_base: crate::units::ByteBase::Binary };
        assert_eq!(hs.scm_summary(units), "512 GiB (1 module)");
        assert_eq!(hs.nvme_summary(crate::units::UnitConfig::default()), "2.0 TB (1 controller)");
    }

    fn format_result(scm: usize, nvme: usize, scm_fail: Option<usize>, nvme_fail: Option<usize>) -> StorageFormat {
        let status = |i: usize, fail: Option<usize>, msg: String| {
            if fail == Some(i) { FormatStatus::Failed(msg) } else { FormatStatus::Success }
        };
        StorageFormat {
            scm: (0..scm)
                .map(|i| ScmMountResult {
                    mount: format!("/mnt/{}", i + 1),
                    status: status(i, scm_fail, format!("/mnt/{} format failed", i + 1)),
                })
                .collect(),
            nvme: (0..nvme)
                .map(|i| NvmeFormatResult {
                    pci_addr: format!("{}", i + 1),
                    status: status(i, nvme_fail, format!("NVMe device {} format failed", i + 1)),
                })
                .collect(),
        }
    }

    fn format_report(hosts: usize, sf: StorageFormat, verbose: bool) -> String {
        let mut results = HostResults::new();
        for i in 1..=hosts {
            results.add_result(&format!("host{}", i), sf.clone()).unwrap();
        }
        report_to_string(&results, &RenderOptions::default().with_verbose(verbose)).unwrap()
    }

    #[test]
    fn test_format_summary() {
        let expected = "\
Format Summary:
  Hosts     SCM Devices NVMe Devices 
  -----     ----------- ------------ 
  host[1-2] 2           2            
";
        assert_eq!(format_report(2, format_result(2, 2, None, None), false), expected);
    }

    #[test]
    fn test_format_summary_lists_failed_devices_as_errors() {
        let expected = "\
Errors:
  Hosts Error                
  ----- -----                
  host1 /mnt/1 format failed 

Format Summary:
  Hosts SCM Devices NVMe Devices 
  ----- ----------- ------------ 
  host1 1           2            
";
        assert_eq!(format_report(1, format_result(2, 2, Some(0), None), false), expected);
    }

    #[test]
    fn test_format_failures_group_hosts_across_results() {
        let mut results = HostResults::new();
        results.add_error("host3", "failed").unwrap();
        results.add_result("host1", format_result(2, 2, Some(0), None)).unwrap();
        // Different payload, same failing mount
        results.add_result("host2", format_result(2, 1, Some(0), None)).unwrap();

        let expected = "\
Errors:
  Hosts     Error                
  -----     -----                
  host3     failed               
  host[1-2] /mnt/1 format failed 

Format Summary:
  Hosts SCM Devices NVMe Devices 
  ----- ----------- ------------ 
  host1 1           2            
  host2 1           1            
";
        assert_eq!(report_to_string(&results, &RenderOptions::default()).unwrap(), expected);
    }

    #[test]
    fn test_format_verbose() {
        let expected = "\
---------
host[1-2]
---------
SCM Mount Format Result 
--------- ------------- 
/mnt/1    CTL_SUCCESS   
/mnt/2    CTL_SUCCESS   

NVMe PCI Format Result 
-------- ------------- 
1        CTL_SUCCESS   
2        CTL_SUCCESS   

";
        assert_eq!(format_report(2, format_result(2, 2, None, None), true), expected);
    }

    #[test]
    fn test_format_verbose_moves_failed_device_to_errors() {
        let expected = "\
Errors:
  Hosts Error                       
  ----- -----                       
  host1 NVMe device 2 format failed 

-----
host1
-----
SCM Mount Format Result 
--------- ------------- 
/mnt/1    CTL_SUCCESS   
/mnt/2    CTL_SUCCESS   

NVMe PCI Format Result 
-------- ------------- 
1        CTL_SUCCESS   

";
        assert_eq!(format_report(1, format_result(2, 2, None, Some(1)), true), expected);
    }

    #[test]
    fn test_format_verbose_nothing_formatted() {
        let expected = "\
-----
host1
-----
\tNo SCM mounts formatted

\tNo NVMe devices formatted

";
        assert_eq!(format_report(1, StorageFormat::default(), true), expected);
    }

    #[test]
    fn test_generic_summary_and_verbose() {
        let mut results = HostResults::new();
        results.add_result("io1", serde_json::json!({"state": "ready"})).unwrap();
        results.add_result("io2", serde_json::json!({"state": "ready"})).unwrap();
        results.add_result("io3", serde_json::json!({"state": "down"})).unwrap();

        let summary = report_to_string(&results, &RenderOptions::default()).unwrap();
        let expected = "\
Hosts   Result            
-----   ------            
io[1-2] {\"state\":\"ready\"} 
io3     {\"state\":\"down\"}  
";
        assert_eq!(summary, expected);

        let verbose = report_to_string(&results, &RenderOptions::default().with_verbose(true)).unwrap();
        let expected = "\
-------
io[1-2]
-------
{
  \"state\": \"ready\"
}

---
io3
---
{
  \"state\": \"down\"
}

";
        assert_eq!(verbose, expected);
    }
}
