/// Tests for report rendering
///
/// Expected strings are byte-exact: trailing spaces after the last column
/// are part of the output format.

#[cfg(test)]
mod tests {
    use crate::aggregate::{HostError, HostErrorsMap, HostResults};
    use crate::render::*;
    use crate::table::Table;

    fn errors_map(entries: &[(&str, &str)]) -> HostErrorsMap {
        let mut hem = HostErrorsMap::new();
        for (host, msg) in entries {
            hem.add(host, HostError::new(*msg)).unwrap();
        }
        hem
    }

    fn host_errors_string(entries: &[(&str, &str)]) -> String {
        let mut out = Vec::new();
        write_host_errors(&errors_map(entries), &mut out, &RenderOptions::default().with_host_ports(true)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_one_host_one_error() {
        let expected = "\
Hosts Error  
----- -----  
host1 whoops 
";
        assert_eq!(host_errors_string(&[("host1", "whoops")]), expected);
    }

    #[test]
    fn test_two_hosts_one_error() {
        let expected = "\
Hosts     Error  
-----     -----  
host[1-2] whoops 
";
        assert_eq!(host_errors_string(&[("host1", "whoops"), ("host2", "whoops")]), expected);
    }

    #[test]
    fn test_two_hosts_one_error_sorted() {
        let expected = "\
Hosts     Error  
-----     -----  
host[1-2] whoops 
";
        assert_eq!(host_errors_string(&[("host2", "whoops"), ("host1", "whoops")]), expected);
    }

    #[test]
    fn test_two_hosts_two_errors() {
        let expected = "\
Hosts Error  
----- -----  
host1 whoops 
host2 oops   
";
        assert_eq!(host_errors_string(&[("host1", "whoops"), ("host2", "oops")]), expected);
    }

    #[test]
    fn test_error_rows_keep_first_seen_order() {
        let expected = "\
Hosts  Error  
-----  -----  
host10 whoops 
host2  oops   
";
        assert_eq!(host_errors_string(&[("host10", "whoops"), ("host2", "oops")]), expected);
    }

    #[test]
    fn test_two_hosts_same_port_one_error() {
        let expected = "\
Hosts       Error  
-----       -----  
host[1-2]:1 whoops 
";
        assert_eq!(host_errors_string(&[("host1:1", "whoops"), ("host2:1", "whoops")]), expected);
    }

    #[test]
    fn test_two_hosts_different_port_one_error() {
        let expected = "\
Hosts           Error  
-----           -----  
host1:1,host2:2 whoops 
";
        assert_eq!(host_errors_string(&[("host1:1", "whoops"), ("host2:2", "whoops")]), expected);
    }

    #[test]
    fn test_empty_error_map_writes_nothing() {
        assert_eq!(host_errors_string(&[]), "");

        let mut out = Vec::new();
        write_response_errors(&HostErrorsMap::new(), &mut out, &RenderOptions::default()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_response_errors_section() {
        let mut out = Vec::new();
        let hem = errors_map(&[("host1:10001", "failed"), ("host2:10001", "failed")]);
        write_response_errors(&hem, &mut out, &RenderOptions::default()).unwrap();

        let expected = "\
Errors:
  Hosts     Error  
  -----     -----  
  host[1-2] failed 

";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_empty_batch_renders_zero_bytes() {
        let results: HostResults<serde_json::Value> = HostResults::new();
        for opts in [RenderOptions::default(), RenderOptions::default().with_verbose(true)] {
            let mut out = Vec::new();
            render_report(&results, &mut out, &opts).unwrap();
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_host_header_rule_matches_label() {
        let mut writer = TableWriter::new(Vec::new());
        writer.write_host_header("host[0-1023]").unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text, "------------\nhost[0-1023]\n------------\n");
    }

    #[test]
    fn test_write_table_or_notice() {
        let mut writer = TableWriter::new(Vec::new());
        writer.write_table_or(&Table::new(["Model"]), "No NVMe devices found").unwrap();
        assert_eq!(String::from_utf8(writer.into_inner()).unwrap(), "\tNo NVMe devices found\n");
    }

    #[test]
    fn test_pad_to_width() {
        assert_eq!(pad_to_width("hi", 5), "hi   ");
        assert_eq!(pad_to_width("hello", 3), "hello");
        assert_eq!(display_width("📦"), 2);
    }

    #[test]
    fn test_render_error_from_failing_sink() {
        struct Broken;
        impl std::io::Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("sink closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut results: HostResults<serde_json::Value> = HostResults::new();
        results.add_error("host1", "failed").unwrap();
        let err = render_report(&results, &mut Broken, &RenderOptions::default()).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Render(_)));
    }
}
