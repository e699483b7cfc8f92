//! Shared test setup: logging and unit fixtures.

use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{Unit, UnitSnapshot};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("unitsel=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_target(true)
            .with_thread_names(false)
            .with_test_writer()
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Small agency chart used across tests.
///
/// ```text
/// 1 Sekretariat Utama            (I)
/// ├── 10 Biro Umum               (II)
/// │   └── 100 Bagian Keuangan    (III)
/// │       └── 1000 Subbagian Gaji (IV)
/// └── 11 Biro Hukum              (II)
/// 2 Kantor Regional X            (I)
/// 3 Kantor Regional II           (I)
/// 4 Deputi Bidang Mutasi         (I)
/// └── 40 Direktorat Mutasi       (II)
/// 5 UPT Lainnya                  (I)
/// ```
pub fn sample_units() -> Vec<Unit> {
    vec![
        Unit::new(5, "UPT Lainnya", "Eselon I", None),
        Unit::new(2, "Kantor Regional X", "Eselon I", Some(0)),
        Unit::new(1000, "Subbagian Gaji", "Eselon IV", Some(100)),
        Unit::new(1, "Sekretariat Utama", "Eselon I", None),
        Unit::new(11, "Biro Hukum", "Eselon II", Some(1)),
        Unit::new(10, "Biro Umum", "Eselon II", Some(1)),
        Unit::new(100, "Bagian Keuangan", "Eselon III", Some(10)),
        Unit::new(3, "Kantor Regional II", "Eselon I", None),
        Unit::new(40, "Direktorat Mutasi", "Eselon II", Some(4)),
        Unit::new(4, "Deputi Bidang Mutasi", "Eselon I", None),
    ]
}

/// Units document in the repository wire format: `{"units": [...]}`.
pub fn units_document(units: &[Unit]) -> String {
    let snapshot = UnitSnapshot::from(units.to_vec());
    serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| String::from(r#"{"units":[]}"#))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn test_units_document_parses_back() {
        let doc = units_document(&sample_units());
        let snapshot: UnitSnapshot = serde_json::from_str(&doc).unwrap();
        assert_eq!(snapshot.units.len(), sample_units().len());
        assert!(doc.contains("parentId"));
    }
}
