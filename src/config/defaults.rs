//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// Common Defaults
// ============================================================================

pub fn r#true() -> bool {
    true
}

pub fn r#false() -> bool {
    false
}

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn entry() -> PathBuf {
        "index.html".into()
    }

    pub fn content() -> PathBuf {
        "content.json".into()
    }

    pub fn output() -> PathBuf {
        "dist".into()
    }

    pub fn preview() -> PathBuf {
        "preview.html".into()
    }

    pub fn carrier() -> PathBuf {
        "carrier.html".into()
    }

    pub mod styles {
        use std::path::PathBuf;

        pub fn input() -> Option<PathBuf> {
            None
        }

        pub fn command() -> Vec<String> {
            Vec::new()
        }

        pub fn file() -> PathBuf {
            "styles.css".into()
        }
    }

    pub mod scripts {
        use std::path::PathBuf;

        pub fn head() -> Option<PathBuf> {
            None
        }

        pub fn footer() -> Option<PathBuf> {
            None
        }
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
