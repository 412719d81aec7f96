//! Human-readable dumps of whole property mappings

use wpd_core::{PropertyKey, PropertyValues};

/// One `key = value` line per entry, in mapping order
pub fn render_values(values: &PropertyValues) -> String {
    render_values_with(values, |_| None)
}

/// Like [`render_values`], printing `name` instead of the raw key where the
/// lookup knows one
pub fn render_values_with<'a, F>(values: &PropertyValues, name_of: F) -> String
where
    F: Fn(&PropertyKey) -> Option<&'a str>,
{
    let mut out = String::new();
    for (key, value) in values.iter() {
        let label = name_of(key).map_or_else(|| key.to_string(), str::to_string);
        out.push_str(&label);
        out.push_str(" = ");
        out.push_str(&value.to_debug_string());
        out.push('\n');
    }
    out
}

/// Log a mapping entry by entry. Compiled out without the `comtrace` feature.
#[cfg(feature = "comtrace")]
pub fn trace_values(label: &str, values: &PropertyValues) {
    tracing::debug!(label, entries = values.len(), "Property mapping dump");
    for (key, value) in values.iter() {
        tracing::debug!(label, key = %key, value = %value, "Mapping entry");
    }
}

#[cfg(not(feature = "comtrace"))]
#[inline(always)]
pub fn trace_values(_label: &str, _values: &PropertyValues) {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use wpd_core::HResult;

    #[test]
    fn test_render_values() {
        let mut values = PropertyValues::new();
        values.set(keys::HRESULT, HResult::S_OK);
        values.set(keys::DRIVER_ERROR_CODE, 42u32);

        let text = render_values(&values);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "{f0422a9c-5dc8-4440-b5bd-5df28835658a} 1003 = Error: S_OK",
                "{f0422a9c-5dc8-4440-b5bd-5df28835658a} 1004 = 42",
            ]
        );
    }

    #[test]
    fn test_render_values_with_names() {
        let mut values = PropertyValues::new();
        values.set(keys::HRESULT, HResult::E_ACCESSDENIED);
        values.set(keys::COMMAND_ID, 7u32);

        let text = render_values_with(&values, |key| (*key == keys::HRESULT).then_some("HRESULT"));
        assert!(text.starts_with("HRESULT = Error: E_ACCESSDENIED\n"));
        assert!(text.contains("} 1002 = 7"));
    }

    #[cfg(feature = "comtrace")]
    #[test]
    fn test_trace_values_logs_each_entry() {
        use wpd_core::test_support::capture_logs;

        let mut values = PropertyValues::new();
        values.set(keys::HRESULT, HResult::S_OK);
        values.set(keys::DRIVER_ERROR_CODE, 42u32);

        let ((), logs) = capture_logs(|| trace_values("reply", &values));
        let entries: Vec<&str> = logs.lines().filter(|l| l.contains("Mapping entry")).collect();
        assert_eq!(entries.len(), 2, "{logs}");
        assert!(entries.iter().all(|l| l.contains("DEBUG")));
        assert!(entries[0].contains("Error: S_OK"));
        assert!(entries[1].contains("value=42"));
        assert!(logs.contains("Property mapping dump"));
    }

    #[cfg(not(feature = "comtrace"))]
    #[test]
    fn test_trace_values_is_silent_without_comtrace() {
        use wpd_core::test_support::capture_logs;

        let mut values = PropertyValues::new();
        values.set(keys::HRESULT, HResult::S_OK);
        let ((), logs) = capture_logs(|| trace_values("reply", &values));
        assert!(logs.is_empty());
    }
}
